//! a document with a bound controller, driven like a user would
//!
//! every interaction mutates the control first and then fires the event a
//! browser would fire for it

use tracing::debug;

use crate::config::Config;
use crate::dom::{ControlKind, Document, Dom, DomError, EventKind, NodeId};

use super::controller::Controller;
use super::report::UpdateReport;

#[derive(Debug)]
pub struct Page {
    document: Document,
    controller: Controller,
}

impl Page {
    pub fn new(document: Document, config: Config) -> Self {
        Self {
            document,
            controller: Controller::new(config),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn mount(&mut self) -> Result<UpdateReport, DomError> {
        self.controller.connect(&mut self.document)
    }

    pub fn unmount(&mut self) {
        self.controller.disconnect(&mut self.document);
    }

    /// set a control by name the way a user would
    ///
    /// text fields and selects take `value` verbatim, checkboxes accept
    /// `true`/`false`, radios check the group member carrying `value`
    pub fn set(&mut self, name: &str, value: &str) -> Result<UpdateReport, DomError> {
        let node = self.document.control_named(name)?;
        match self.document.control_kind(node) {
            Some(ControlKind::Radio) => self.check_radio(name, value),
            Some(ControlKind::Checkbox) => self.set_checked(name, value == "true"),
            _ => self.type_text(name, value),
        }
    }

    /// replace the value of a text field or select and fire its event
    pub fn type_text(&mut self, name: &str, value: &str) -> Result<UpdateReport, DomError> {
        let node = self.document.control_named(name)?;
        self.document.set_value(node, value)?;
        Ok(self.fire_control(node))
    }

    /// check or uncheck a checkbox (or a radio) by name
    pub fn set_checked(&mut self, name: &str, checked: bool) -> Result<UpdateReport, DomError> {
        let node = self.document.control_named(name)?;
        self.document.set_checked(node, checked)?;
        Ok(self.fire_control(node))
    }

    /// check the member of radio group `name` whose value is `value`
    pub fn check_radio(&mut self, name: &str, value: &str) -> Result<UpdateReport, DomError> {
        let node = self
            .document
            .elements_named(name)
            .into_iter()
            .find(|&id| {
                self.document.control_kind(id) == Some(ControlKind::Radio)
                    && self.document.value(id) == Some(value)
            })
            .ok_or_else(|| DomError::NoSuchRadio {
                name: name.to_string(),
                value: value.to_string(),
            })?;

        self.document.set_checked(node, true)?;
        Ok(self.fire_control(node))
    }

    pub fn click(&mut self, node: NodeId) -> UpdateReport {
        self.fire(node, EventKind::Click)
    }

    /// click the element whose `id` attribute is `id`
    pub fn click_id(&mut self, id: &str) -> Result<UpdateReport, DomError> {
        let node = self
            .document
            .element_by_id(id)
            .ok_or_else(|| DomError::NoElementWithId(id.to_string()))?;
        Ok(self.click(node))
    }

    /// dispatch an event to whatever listeners are attached to `node`
    pub fn fire(&mut self, node: NodeId, event: EventKind) -> UpdateReport {
        debug!(%node, %event, "dispatching event");
        self.controller
            .handle_event(&mut self.document, node, event)
    }

    fn fire_control(&mut self, node: NodeId) -> UpdateReport {
        let event = self
            .document
            .control_kind(node)
            .map(|kind| kind.event())
            .unwrap_or(EventKind::Input);
        self.fire(node, event)
    }
}
