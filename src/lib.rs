pub mod cli;
pub mod date;
pub mod dispatch;
pub mod job;
pub mod naming;
pub mod schema;
pub mod session;
pub mod trace;

pub use dispatch::value::{ParamMap, ParamValue};
pub use schema::catalog::{FieldCatalog, ScreenSchema};
pub use session::error::ScreenError;
pub use session::facade::GuiSession;
pub use session::screen::ScreenSession;
