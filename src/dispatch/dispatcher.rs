use tracing::{debug, info, warn};

use crate::date::resolver::{DateInput, resolve, validate_date};
use crate::dispatch::value::{ParamMap, ParamValue};
use crate::dispatch::vkey;
use crate::naming::field_name::{FieldType, field_type_of, is_date_field};
use crate::schema::builder::discover_schema;
use crate::schema::catalog::{ScreenSchema, WellKnownButton};
use crate::schema::tree_model::TypeMap;
use crate::session::error::ScreenError;
use crate::session::facade::GuiSession;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{WriteAction, WriteEvent};

/// Field key the variant dialog exposes for the variant name.
const VARIANT_FIELD: &str = "variant_TEXT";

/// Writes caller values into the controls of a discovered screen.
///
/// Sub-dialogs (variant load, nested option groups) are handled by
/// discovering window `w + 1`, dispatching into it and confirming it before
/// the parent loop continues.
pub struct Dispatcher<'a, S: GuiSession + ?Sized> {
    session: &'a mut S,
    types: &'a TypeMap,
    date_format: &'a str,
    tracer: &'a TraceLogger,
}

impl<'a, S: GuiSession + ?Sized> Dispatcher<'a, S> {
    pub fn new(
        session: &'a mut S,
        types: &'a TypeMap,
        date_format: &'a str,
        tracer: &'a TraceLogger,
    ) -> Self {
        Dispatcher {
            session,
            types,
            date_format,
            tracer,
        }
    }

    /// Load `variant` (if non-empty) and write every catalog field in
    /// discovery order.
    ///
    /// A value is validated in full before its field is written, but a
    /// failure does not undo fields written earlier in the same call.
    pub fn apply(
        &mut self,
        schema: &ScreenSchema,
        variant: &str,
        values: &ParamMap,
    ) -> Result<(), ScreenError> {
        let variant_active = !variant.is_empty();
        if variant_active {
            self.load_variant(schema, variant)?;
        }

        for key in values.keys() {
            if !schema.catalog.contains(key) {
                warn!(key = %key, window = schema.window, "No field with this key on the screen");
            }
        }

        for entry in schema.catalog.entries() {
            let key = entry.key.as_str();
            let ids = entry.control_ids.as_slice();
            let value = values.get(key).filter(|v| **v != ParamValue::Unset);
            let field = Field {
                window: schema.window,
                key,
                ids,
                variant_active,
            };

            match field_type_of(key)? {
                FieldType::Text if is_date_field(key) => self.set_date(&field, value)?,
                FieldType::Text => self.set_text(&field, value)?,
                FieldType::Button => self.set_buttons(&field, value)?,
                FieldType::Flag => self.set_flag(&field, value)?,
                FieldType::Select => self.set_selection(&field, value)?,
                FieldType::More => self.set_more(&field, value)?,
            }
        }
        Ok(())
    }

    fn load_variant(&mut self, schema: &ScreenSchema, variant: &str) -> Result<(), ScreenError> {
        info!(variant = %variant, window = schema.window, "Loading variant");

        if let Some(code) = schema.virtual_key(WellKnownButton::Variant) {
            self.send_virtual_key(schema.window, code)?;
        }

        let mut values = ParamMap::new();
        values.insert(VARIANT_FIELD.to_string(), ParamValue::text(variant));
        self.sub_dialog(schema.window + 1, &values, vkey::EXECUTE)
    }

    /// Discover `window`, dispatch `values` into it with no variant, then
    /// send `confirm_key` to close it.
    fn sub_dialog(&mut self, window: usize, values: &ParamMap, confirm_key: u32) -> Result<(), ScreenError> {
        let schema = discover_schema(&mut *self.session, window, self.types)?;
        self.apply(&schema, "", values)?;
        self.send_virtual_key(window, confirm_key)
    }

    fn set_text(&mut self, field: &Field<'_>, value: Option<&ParamValue>) -> Result<(), ScreenError> {
        let writes: Vec<String> = match value {
            None if field.variant_active => return Ok(()),
            None => vec![String::new(); field.ids.len()],
            Some(ParamValue::Text(text)) => {
                let mut writes = vec![text.clone()];
                if !field.variant_active {
                    writes.resize(field.ids.len(), String::new());
                }
                writes
            }
            Some(ParamValue::TextList(list)) => {
                field.check_len(list.len())?;
                let mut writes = list.clone();
                if !field.variant_active {
                    writes.resize(field.ids.len(), String::new());
                }
                writes
            }
            Some(_) => return Err(ScreenError::InvalidTextValue(field.key.to_string())),
        };

        self.write_texts(field, &writes)
    }

    fn set_date(&mut self, field: &Field<'_>, value: Option<&ParamValue>) -> Result<(), ScreenError> {
        let writes: Vec<String> = match value {
            None if field.variant_active => return Ok(()),
            None => vec![String::new(); field.ids.len()],
            Some(ParamValue::Text(text)) | Some(ParamValue::Date(DateInput::Exact(text))) => {
                vec![validate_date(text, self.date_format)?]
            }
            Some(ParamValue::Date(month @ DateInput::MonthYear { .. })) => {
                // A month fills a from/to pair.
                (0..field.ids.len().min(2))
                    .map(|slot| resolve(month, slot, self.date_format))
                    .collect::<Result<_, _>>()?
            }
            Some(ParamValue::TextList(list)) => {
                let dates: Vec<DateInput> = list.iter().map(|t| DateInput::from(t.as_str())).collect();
                self.resolve_dates(field, &dates)?
            }
            Some(ParamValue::DateList(dates)) => self.resolve_dates(field, dates)?,
            Some(_) => return Err(ScreenError::InvalidTextValue(field.key.to_string())),
        };

        self.write_texts(field, &writes)
    }

    fn resolve_dates(&self, field: &Field<'_>, dates: &[DateInput]) -> Result<Vec<String>, ScreenError> {
        field.check_len(dates.len())?;
        dates
            .iter()
            .enumerate()
            .map(|(slot, date)| resolve(date, slot, self.date_format))
            .collect()
    }

    fn write_texts(&mut self, field: &Field<'_>, writes: &[String]) -> Result<(), ScreenError> {
        for (id, text) in field.ids.iter().zip(writes) {
            debug!(key = %field.key, id = %id, value = %text, "set_text");
            self.session.set_text(id, text)?;
            self.tracer.log(
                &field
                    .event(WriteAction::SetText)
                    .with_control(id)
                    .with_value(text),
            );
        }
        Ok(())
    }

    fn set_buttons(&mut self, field: &Field<'_>, value: Option<&ParamValue>) -> Result<(), ScreenError> {
        let values = match value {
            None => return Ok(()),
            Some(ParamValue::Buttons(values)) | Some(ParamValue::TextList(values)) => values,
            Some(_) => return Err(ScreenError::InvalidButtonValue(field.key.to_string())),
        };
        let Some(id) = field.ids.first() else {
            return Ok(());
        };

        debug!(key = %field.key, id = %id, count = values.len(), "Pasting value list");
        self.session.copy_to_clipboard(values)?;
        self.press(field, id)?;

        let dialog = field.window + 1;
        for code in [vkey::CLEAR_LIST, vkey::PASTE, vkey::CONFIRM, vkey::EXECUTE] {
            self.send_virtual_key(dialog, code)?;
        }
        self.tracer.log(
            &field
                .event(WriteAction::Paste)
                .with_control(id)
                .with_value(values.join(",")),
        );
        Ok(())
    }

    fn set_flag(&mut self, field: &Field<'_>, value: Option<&ParamValue>) -> Result<(), ScreenError> {
        let selected = match value {
            None if field.variant_active => return Ok(()),
            None => false,
            Some(ParamValue::Flag(b)) | Some(ParamValue::Select(b)) => *b,
            Some(_) => return Err(ScreenError::InvalidFlagValue(field.key.to_string())),
        };
        let Some(id) = field.ids.first() else {
            return Ok(());
        };

        debug!(key = %field.key, id = %id, selected, "set_selected");
        self.session.set_selected(id, selected)?;
        self.tracer.log(
            &field
                .event(WriteAction::SetSelected)
                .with_control(id)
                .with_value(selected),
        );
        Ok(())
    }

    /// Radio buttons follow the host default unless explicitly chosen.
    fn set_selection(&mut self, field: &Field<'_>, value: Option<&ParamValue>) -> Result<(), ScreenError> {
        let chosen = match value {
            None => return Ok(()),
            Some(ParamValue::Flag(b)) | Some(ParamValue::Select(b)) => *b,
            Some(_) => return Err(ScreenError::InvalidFlagValue(field.key.to_string())),
        };
        let Some(id) = field.ids.first() else {
            return Ok(());
        };

        if chosen {
            debug!(key = %field.key, id = %id, "select");
            self.session.select(id)?;
            self.tracer
                .log(&field.event(WriteAction::Select).with_control(id));
        }
        Ok(())
    }

    fn set_more(&mut self, field: &Field<'_>, value: Option<&ParamValue>) -> Result<(), ScreenError> {
        let nested = match value {
            None => return Ok(()),
            Some(ParamValue::More(nested)) => nested,
            Some(_) => return Err(ScreenError::InvalidMoreValue(field.key.to_string())),
        };
        let Some(id) = field.ids.first() else {
            return Ok(());
        };

        self.press(field, id)?;
        self.sub_dialog(field.window + 1, nested, vkey::CONFIRM)
    }

    fn press(&mut self, field: &Field<'_>, id: &str) -> Result<(), ScreenError> {
        debug!(key = %field.key, id = %id, "press");
        self.session.press(id)?;
        self.tracer.log(&field.event(WriteAction::Press).with_control(id));
        Ok(())
    }

    fn send_virtual_key(&mut self, window: usize, code: u32) -> Result<(), ScreenError> {
        debug!(window, code, "send_virtual_key");
        self.session.send_virtual_key(window, code)?;
        self.tracer
            .log(&WriteEvent::now(window, WriteAction::VirtualKey).with_value(code));
        Ok(())
    }
}

/// One catalog entry being dispatched.
struct Field<'f> {
    window: usize,
    key: &'f str,
    ids: &'f [String],
    variant_active: bool,
}

impl Field<'_> {
    fn check_len(&self, got: usize) -> Result<(), ScreenError> {
        if got > self.ids.len() {
            return Err(ScreenError::TooManyValues {
                field: self.key.to_string(),
                expected: self.ids.len(),
                got,
            });
        }
        Ok(())
    }

    fn event(&self, action: WriteAction) -> WriteEvent {
        WriteEvent::now(self.window, action).with_field(self.key)
    }
}
