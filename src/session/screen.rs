use tracing::info;

use crate::date::resolver::{DEFAULT_DATE_FORMAT, check_format};
use crate::dispatch::dispatcher::Dispatcher;
use crate::dispatch::value::ParamMap;
use crate::schema::builder::discover_schema;
use crate::schema::catalog::{FieldCatalog, ScreenSchema, WellKnownButton};
use crate::schema::tree_model::TypeMap;
use crate::session::error::ScreenError;
use crate::session::facade::GuiSession;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{WriteAction, WriteEvent};

/// Window that receives execute keys, whichever window was discovered.
const MAIN_WINDOW: usize = 0;

/// The one screen a caller is working on.
///
/// Owns the host session and the schema of the current screen. Anything that
/// can change the screen (execute, transaction start/end) drops the schema;
/// call [`ScreenSession::discover`] again before dispatching.
pub struct ScreenSession<S: GuiSession> {
    pub(crate) session: S,
    pub(crate) date_format: String,
    pub(crate) types: TypeMap,
    pub(crate) tracer: TraceLogger,
    pub(crate) schema: Option<ScreenSchema>,
}

impl<S: GuiSession> ScreenSession<S> {
    pub fn new(session: S) -> Self {
        ScreenSession {
            session,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            types: TypeMap::default(),
            tracer: TraceLogger::disabled(),
            schema: None,
        }
    }

    /// Use `format` (strftime syntax) for every date field.
    pub fn with_date_format(mut self, format: &str) -> Result<Self, ScreenError> {
        check_format(format)?;
        self.date_format = format.to_string();
        Ok(self)
    }

    pub fn with_type_map(mut self, types: TypeMap) -> Self {
        self.types = types;
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn start_transaction(&mut self, code: &str) -> Result<(), ScreenError> {
        self.invalidate();
        if code.trim().is_empty() {
            return Err(ScreenError::InvalidTransactionCode(code.to_string()));
        }

        info!(transaction = %code, "Starting transaction");
        self.session.start_transaction(code)
    }

    pub fn end_transaction(&mut self) -> Result<(), ScreenError> {
        self.invalidate();
        info!("Ending transaction");
        self.session.end_transaction()
    }

    /// Rebuild the schema from `window` of the live screen.
    pub fn discover(&mut self, window: usize) -> Result<&ScreenSchema, ScreenError> {
        self.schema = None;
        let schema = discover_schema(&mut self.session, window, &self.types)?;
        Ok(self.schema.insert(schema))
    }

    pub fn schema(&self) -> Option<&ScreenSchema> {
        self.schema.as_ref()
    }

    pub fn catalog(&self) -> Option<&FieldCatalog> {
        self.schema.as_ref().map(|s| &s.catalog)
    }

    /// Write `values` into the current screen, after loading `variant` if it
    /// is non-empty. Fields left out of `values` are cleared unless a variant
    /// is active.
    pub fn apply_parameters(&mut self, variant: &str, values: &ParamMap) -> Result<(), ScreenError> {
        let schema = self.schema.as_ref().ok_or(ScreenError::NoCatalog)?;
        let mut dispatcher =
            Dispatcher::new(&mut self.session, &self.types, &self.date_format, &self.tracer);
        dispatcher.apply(schema, variant, values)
    }

    /// Send `vkey`, or the discovered execute key when `None`, to the main
    /// window (`wnd[0]`). The schema is dropped afterwards.
    pub fn execute(&mut self, vkey: Option<u32>) -> Result<(), ScreenError> {
        let window = MAIN_WINDOW;
        let code = match vkey {
            Some(code) => code,
            None => self
                .schema
                .as_ref()
                .and_then(|s| s.virtual_key(WellKnownButton::Execute))
                .ok_or_else(|| ScreenError::VirtualKeyNotFound("EXECUTE".into()))?,
        };

        info!(window, code, "Executing");
        self.session.send_virtual_key(window, code)?;
        self.tracer
            .log(&WriteEvent::now(window, WriteAction::VirtualKey).with_value(code));
        self.invalidate();
        Ok(())
    }

    /// Forget the current schema.
    pub fn invalidate(&mut self) {
        self.schema = None;
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn into_inner(self) -> S {
        self.session
    }
}
