use std::collections::HashMap;
use std::fmt;

use deunicode::deunicode;

use crate::session::error::ScreenError;

/// Occurrence counts per cleaned label, scoped to one schema walk.
pub type RepeatCounter = HashMap<String, usize>;

/// Input shape a field key promises, carried as the key's last `_` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Button,
    Select,
    Flag,
    More,
}

impl FieldType {
    pub fn suffix(self) -> &'static str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::Button => "BUTTON",
            FieldType::Select => "SELECT",
            FieldType::Flag => "FLAG",
            FieldType::More => "MORE",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "TEXT" => Some(FieldType::Text),
            "BUTTON" => Some(FieldType::Button),
            "SELECT" => Some(FieldType::Select),
            "FLAG" => Some(FieldType::Flag),
            "MORE" => Some(FieldType::More),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Turn raw label text into a field-name token.
///
/// `-`, `/` and `&` become spaces, the rest is transliterated to ASCII
/// (`Straße` reads `strasse`), lowercased, stripped of anything outside
/// `[a-z0-9 _]`, and each remaining space becomes `_`. Underscores survive
/// so that cleaning a token again is a no-op.
pub fn clean(label: &str) -> String {
    let separated: String = label
        .chars()
        .map(|c| if matches!(c, '-' | '/' | '&') { ' ' } else { c })
        .collect();

    deunicode(&separated)
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '_')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Count one more binding of `token`; second and later bindings get `_<n>`.
pub fn disambiguate(token: &str, counters: &mut RepeatCounter) -> String {
    let count = counters.entry(token.to_string()).or_insert(0);
    *count += 1;

    if *count > 1 {
        format!("{}_{}", token, count)
    } else {
        token.to_string()
    }
}

pub fn field_key(label: &str, field_type: FieldType) -> String {
    format!("{}_{}", label, field_type.suffix())
}

/// Read the declared input type off a field key.
pub fn field_type_of(key: &str) -> Result<FieldType, ScreenError> {
    key.rsplit('_')
        .next()
        .and_then(FieldType::from_suffix)
        .ok_or_else(|| ScreenError::UnknownFieldType(key.to_string()))
}

/// Date fields are text fields whose label ends in `date`
/// (`posting_date_TEXT`).
pub fn is_date_field(key: &str) -> bool {
    let tokens: Vec<&str> = key.split('_').collect();
    tokens.len() >= 2 && tokens[tokens.len() - 2] == "date"
}
