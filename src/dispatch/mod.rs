pub mod dispatcher;
pub mod value;
pub mod vkey;
