use tracing::{debug, info, warn};

use crate::naming::field_name::{FieldType, RepeatCounter, clean, disambiguate, field_key};
use crate::schema::catalog::{ScreenSchema, WellKnownButton};
use crate::schema::tree_model::{
    ControlDescriptor, ControlKind, ObjectTree, TREE_PROPERTIES, TreeNode, TypeMap,
};
use crate::session::error::ScreenError;
use crate::session::facade::GuiSession;

/// Icon of the "multiple selection" button next to a range field.
const MORE_OPTIONS_ICON: &str = "B_MORE";
/// Internal name of the result grid used as export fallback.
const EXPORT_SHELL_NAME: &str = "shell";
/// Cleaned parent label under which menu items are export options.
const EXPORT_MENU_LABEL: &str = "export";

/// Fetch the object tree of `window` and build its schema.
pub fn discover_schema<S: GuiSession + ?Sized>(
    session: &mut S,
    window: usize,
    types: &TypeMap,
) -> Result<ScreenSchema, ScreenError> {
    let tree = session.discover_tree(window, &TREE_PROPERTIES)?;
    let schema = build_schema(session, window, &tree, types)?;

    info!(
        window,
        fields = schema.catalog.len(),
        fingerprint = %schema.catalog.fingerprint(),
        "Discovered screen schema"
    );
    Ok(schema)
}

/// Walk an already fetched tree. The session is only consulted for label
/// associations and menu parents.
pub fn build_schema<S: GuiSession + ?Sized>(
    session: &mut S,
    window: usize,
    tree: &ObjectTree,
    types: &TypeMap,
) -> Result<ScreenSchema, ScreenError> {
    let mut builder = SchemaBuilder {
        session,
        types,
        left_labels: Vec::new(),
        repeats: RepeatCounter::new(),
        schema: ScreenSchema::new(window),
    };

    builder.walk(&tree.children)?;
    Ok(builder.schema)
}

/// State of one walk. Dropped when the walk ends, so counters and label
/// context never leak into the next discovery.
struct SchemaBuilder<'a, S: GuiSession + ?Sized> {
    session: &'a mut S,
    types: &'a TypeMap,
    /// Static labels seen so far; the last one names the next unlabeled control.
    left_labels: Vec<String>,
    repeats: RepeatCounter,
    schema: ScreenSchema,
}

impl<S: GuiSession + ?Sized> SchemaBuilder<'_, S> {
    fn walk(&mut self, nodes: &[TreeNode]) -> Result<(), ScreenError> {
        for node in nodes {
            // Descendants first: labels they push are visible to later siblings.
            if !node.children.is_empty() {
                self.walk(&node.children)?;
            }

            let control = ControlDescriptor::from_node(&node.properties, self.types);
            self.classify(&control)?;
        }
        Ok(())
    }

    fn classify(&mut self, control: &ControlDescriptor) -> Result<(), ScreenError> {
        match control.kind {
            ControlKind::TextStatic => self.static_label(control),
            ControlKind::TextEditable => {
                self.bind_to_left_label(control, FieldType::Text);
                Ok(())
            }
            ControlKind::Button => {
                self.button(control);
                Ok(())
            }
            ControlKind::Radio => {
                self.bind_own_label(control, FieldType::Select);
                Ok(())
            }
            ControlKind::Checkbox => {
                self.bind_own_label(control, FieldType::Flag);
                Ok(())
            }
            ControlKind::Menu => self.menu_item(control),
            ControlKind::Shell => {
                if control.name == EXPORT_SHELL_NAME {
                    debug!(id = %control.id, "Export grid shell");
                    self.schema.shell_id = Some(control.id.clone());
                }
                Ok(())
            }
            ControlKind::Ignored => Ok(()),
        }
    }

    fn static_label(&mut self, control: &ControlDescriptor) -> Result<(), ScreenError> {
        let label = disambiguate(&clean(&control.label_text), &mut self.repeats);

        // A display field that already has a label is not a label itself.
        if self.session.left_label(&control.id)?.is_none() {
            debug!(label = %label, "Left label");
            self.left_labels.push(label);
        }
        Ok(())
    }

    fn bind_to_left_label(&mut self, control: &ControlDescriptor, field_type: FieldType) {
        match self.left_labels.last() {
            Some(label) => {
                let key = field_key(label, field_type);
                debug!(key = %key, id = %control.id, "Bound field");
                self.schema.catalog.bind(key, control.id.clone());
            }
            None => warn!(
                id = %control.id,
                field_type = %field_type,
                "No preceding label; control left unbound"
            ),
        }
    }

    fn bind_own_label(&mut self, control: &ControlDescriptor, field_type: FieldType) {
        let label = disambiguate(&clean(&control.label_text), &mut self.repeats);
        let key = field_key(&label, field_type);
        debug!(key = %key, id = %control.id, "Bound field");
        self.schema.catalog.bind(key, control.id.clone());
    }

    fn button(&mut self, control: &ControlDescriptor) {
        let icon = control.icon_name.as_deref().unwrap_or_default();

        if let Some(button) = WellKnownButton::from_icon(icon) {
            match virtual_key_number(&control.name) {
                Some(code) => {
                    debug!(?button, code, "Virtual key");
                    self.schema.virtual_keys.insert(button, code);
                }
                None => warn!(
                    name = %control.name,
                    ?button,
                    "Could not read virtual key number from button name"
                ),
            }
        } else if icon == MORE_OPTIONS_ICON {
            self.bind_to_left_label(control, FieldType::Button);
        } else {
            let text = clean(&control.label_text);
            if text.is_empty() {
                return;
            }
            let key = field_key(&text, FieldType::More);
            debug!(key = %key, id = %control.id, "Bound field");
            self.schema.catalog.bind(key, control.id.clone());
        }
    }

    fn menu_item(&mut self, control: &ControlDescriptor) -> Result<(), ScreenError> {
        let parent = clean(&self.session.parent_text(&control.id)?);
        if parent != EXPORT_MENU_LABEL {
            return Ok(());
        }

        let label = disambiguate(&clean(&control.label_text), &mut self.repeats);
        debug!(label = %label, id = %control.id, "Export option");
        self.schema.add_export_option(label, control.id.clone());
        Ok(())
    }
}

/// `btn[8]` yields 8.
fn virtual_key_number(name: &str) -> Option<u32> {
    let (_, tail) = name.rsplit_once('[')?;
    tail.strip_suffix(']')?.parse().ok()
}
