//! input snapshots: the string value a condition sees for a form control

use crate::conditions::ValueSource;

use super::{ControlKind, Dom, NodeId};

/// value reported for a radio group with no checked member
pub const UNCHECKED_RADIO: &str = "false";

/// snapshot of a single control
///
/// checkboxes report `"true"`/`"false"`, radios their value when checked and
/// `"false"` otherwise, everything else its raw value
pub fn control_snapshot<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Option<String> {
    let kind = dom.control_kind(node)?;
    let value = match kind {
        ControlKind::Checkbox => dom.checked(node).to_string(),
        ControlKind::Radio if dom.checked(node) => dom.value(node).unwrap_or_default().to_string(),
        ControlKind::Radio => UNCHECKED_RADIO.to_string(),
        ControlKind::Text | ControlKind::Select => dom.value(node).unwrap_or_default().to_string(),
    };
    Some(value)
}

/// snapshot of the input named `name`, `None` when the form has no such control
///
/// radio groups resolve to the checked member's value or `"false"`
pub fn input_snapshot<D: Dom + ?Sized>(dom: &D, name: &str) -> Option<String> {
    let controls: Vec<(NodeId, ControlKind)> = dom
        .elements_named(name)
        .into_iter()
        .filter_map(|id| dom.control_kind(id).map(|kind| (id, kind)))
        .collect();

    let (first, kind) = *controls.first()?;

    if kind == ControlKind::Radio {
        let checked = controls
            .iter()
            .find(|(id, kind)| *kind == ControlKind::Radio && dom.checked(*id));
        return Some(match checked {
            Some((id, _)) => dom.value(*id).unwrap_or_default().to_string(),
            None => UNCHECKED_RADIO.to_string(),
        });
    }

    control_snapshot(dom, first)
}

/// [`ValueSource`] backed by the live controls of a document
pub struct DomValues<'a, D: Dom + ?Sized> {
    dom: &'a D,
}

impl<'a, D: Dom + ?Sized> DomValues<'a, D> {
    pub fn new(dom: &'a D) -> Self {
        Self { dom }
    }
}

impl<D: Dom + ?Sized> ValueSource for DomValues<'_, D> {
    fn value_of(&self, name: &str) -> Option<String> {
        input_snapshot(self.dom, name)
    }

    fn known_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for node in self.dom.elements_with_attr("name") {
            if self.dom.control_kind(node).is_none() {
                continue;
            }
            if let Some(name) = self.dom.attr(node, "name") {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}
