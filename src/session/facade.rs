use crate::schema::tree_model::ObjectTree;
use crate::session::error::ScreenError;

/// Blocking capability set of a live host session.
///
/// Every call is one round trip; implementations impose any timeout.
/// Control ids are window-relative paths such as `wnd[0]/usr/ctxtMATNR`.
pub trait GuiSession {
    fn start_transaction(&mut self, code: &str) -> Result<(), ScreenError>;
    fn end_transaction(&mut self) -> Result<(), ScreenError>;

    /// Fails with `SchemaAccessDenied` when the user may not read the tree.
    fn discover_tree(&mut self, window: usize, properties: &[&str]) -> Result<ObjectTree, ScreenError>;

    fn get_text(&mut self, id: &str) -> Result<String, ScreenError>;
    fn set_text(&mut self, id: &str, value: &str) -> Result<(), ScreenError>;
    fn get_selected(&mut self, id: &str) -> Result<bool, ScreenError>;
    fn set_selected(&mut self, id: &str, selected: bool) -> Result<(), ScreenError>;
    fn press(&mut self, id: &str) -> Result<(), ScreenError>;
    fn select(&mut self, id: &str) -> Result<(), ScreenError>;

    /// Label the host already associates with the control, if any.
    fn left_label(&mut self, id: &str) -> Result<Option<String>, ScreenError>;
    fn parent_text(&mut self, id: &str) -> Result<String, ScreenError>;

    fn send_virtual_key(&mut self, window: usize, code: u32) -> Result<(), ScreenError>;
    fn press_toolbar_context_button(&mut self, id: &str, token: &str) -> Result<(), ScreenError>;
    fn select_context_menu_item(&mut self, id: &str, token: &str) -> Result<(), ScreenError>;

    /// Put `values` on the clipboard, one per row.
    fn copy_to_clipboard(&mut self, values: &[String]) -> Result<(), ScreenError>;
}
