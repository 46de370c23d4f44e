use std::collections::HashMap;

use serde::Deserialize;

use crate::date::resolver::DateInput;

/// Caller-supplied values keyed by field key. A key that is absent is
/// "not passed": cleared by default, kept as-is while a variant is active.
pub type ParamMap = HashMap<String, ParamValue>;

/// A value for one field. The dispatcher checks the tag against the field
/// key's suffix before writing anything.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawParam")]
pub enum ParamValue {
    /// Explicit null in a job file; treated as if the key were absent.
    Unset,
    Text(String),
    TextList(Vec<String>),
    Date(DateInput),
    DateList(Vec<DateInput>),
    Flag(bool),
    Select(bool),
    Buttons(Vec<String>),
    More(ParamMap),
}

impl ParamValue {
    pub fn text(value: impl ToString) -> Self {
        ParamValue::Text(value.to_string())
    }

    pub fn text_list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        ParamValue::TextList(values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn buttons<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        ParamValue::Buttons(values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn month(month: u32, year: i32) -> Self {
        ParamValue::Date(DateInput::MonthYear { month, year })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ParamValue::Unset => "unset",
            ParamValue::Text(_) => "text",
            ParamValue::TextList(_) => "text list",
            ParamValue::Date(_) => "date",
            ParamValue::DateList(_) => "date list",
            ParamValue::Flag(_) => "flag",
            ParamValue::Select(_) => "select",
            ParamValue::Buttons(_) => "button list",
            ParamValue::More(_) => "nested group",
        }
    }
}

/// Shape of a value in a job file, before it is given a tag.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawParam {
    Null,
    Flag(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Month { month: u32, year: i32 },
    List(Vec<RawItem>),
    Group(ParamMap),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawItem {
    Integer(i64),
    Float(f64),
    Text(String),
    Month { month: u32, year: i32 },
}

impl RawItem {
    fn into_date(self) -> DateInput {
        match self {
            RawItem::Month { month, year } => DateInput::MonthYear { month, year },
            RawItem::Integer(n) => DateInput::Exact(n.to_string()),
            RawItem::Float(n) => DateInput::Exact(n.to_string()),
            RawItem::Text(s) => DateInput::Exact(s),
        }
    }
}

impl From<RawParam> for ParamValue {
    fn from(raw: RawParam) -> Self {
        match raw {
            RawParam::Null => ParamValue::Unset,
            RawParam::Flag(b) => ParamValue::Flag(b),
            RawParam::Integer(n) => ParamValue::Text(n.to_string()),
            RawParam::Float(n) => ParamValue::Text(n.to_string()),
            RawParam::Text(s) => ParamValue::Text(s),
            RawParam::Month { month, year } => ParamValue::month(month, year),
            RawParam::List(items) => {
                let dates: Vec<DateInput> = items.into_iter().map(RawItem::into_date).collect();
                if dates.iter().any(|d| matches!(d, DateInput::MonthYear { .. })) {
                    ParamValue::DateList(dates)
                } else {
                    ParamValue::TextList(
                        dates
                            .into_iter()
                            .filter_map(|d| match d {
                                DateInput::Exact(s) => Some(s),
                                DateInput::MonthYear { .. } => None,
                            })
                            .collect(),
                    )
                }
            }
            RawParam::Group(map) => ParamValue::More(map),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}
