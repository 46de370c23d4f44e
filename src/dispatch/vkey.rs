//! Virtual key codes sent to host windows.

/// Enter / confirm the active dialog
pub const CONFIRM: u32 = 0;
/// F8
pub const EXECUTE: u32 = 8;
/// Overwrite an existing file in the save dialog
pub const REPLACE: u32 = 11;
/// Clear the multiple-selection list
pub const CLEAR_LIST: u32 = 16;
/// Upload from clipboard into the multiple-selection list
pub const PASTE: u32 = 24;
