//! document model used by the binding layer
//!
//! the [`Dom`] trait is the seam between the controller and whatever hosts
//! the elements; [`Document`] is the in-memory implementation.

mod document;
mod fixture;
mod snapshot;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use document::{Document, Element};
pub use fixture::{load_fixture, parse_fixture, Fixture, FixtureError, NodeSpec};
pub use snapshot::{control_snapshot, input_snapshot, DomValues};

/// handle to an element inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// handle returned when a listener is attached, required to detach it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) u64);

/// DOM events the binding layer listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Input,
    Change,
    Click,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Click => "click",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(EventKind::Input),
            "change" => Ok(EventKind::Change),
            "click" => Ok(EventKind::Click),
            _ => Err(format!("unknown event '{}': use input, change, or click", s)),
        }
    }
}

/// how a form control reports its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// text-like `<input>` and `<textarea>`
    Text,
    Checkbox,
    Radio,
    Select,
}

impl ControlKind {
    /// classify an element from its tag and `type` attribute
    pub fn classify(tag: &str, input_type: Option<&str>) -> Option<Self> {
        match tag {
            "select" => Some(ControlKind::Select),
            "textarea" => Some(ControlKind::Text),
            "input" => match input_type.map(|t| t.to_ascii_lowercase()).as_deref() {
                Some("checkbox") => Some(ControlKind::Checkbox),
                Some("radio") => Some(ControlKind::Radio),
                _ => Some(ControlKind::Text),
            },
            _ => None,
        }
    }

    /// event a user interaction with this control fires
    pub fn event(&self) -> EventKind {
        match self {
            ControlKind::Select => EventKind::Change,
            _ => EventKind::Input,
        }
    }
}

/// errors raised by document operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("no form control named '{0}'")]
    NoControl(String),
    #[error("no element with id '{0}'")]
    NoElementWithId(String),
    #[error("control '{0}' is not a checkbox or radio")]
    NotCheckable(String),
    #[error("radio group '{name}' has no member with value '{value}'")]
    NoSuchRadio { name: String, value: String },
    #[error("invalid class name '{0}'")]
    InvalidClass(String),
}

/// the DOM primitives the binding layer relies on
///
/// queries return elements of the root's subtree in document order
pub trait Dom {
    /// elements carrying the given attribute
    fn elements_with_attr(&self, attr: &str) -> Vec<NodeId>;

    /// elements with the given tag name
    fn elements_by_tag(&self, tag: &str) -> Vec<NodeId>;

    /// elements whose `name` attribute equals `name`
    fn elements_named(&self, name: &str) -> Vec<NodeId>;

    fn tag(&self, node: NodeId) -> Option<&str>;

    fn attr(&self, node: NodeId, name: &str) -> Option<&str>;

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError>;

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError>;

    /// flip a class, returns whether it is present afterwards
    fn toggle_class(&mut self, node: NodeId, class: &str) -> Result<bool, DomError> {
        if self.has_class(node, class) {
            self.remove_class(node, class)?;
            Ok(false)
        } else {
            self.add_class(node, class)?;
            Ok(true)
        }
    }

    fn text(&self, node: NodeId) -> Option<&str>;

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError>;

    /// current value property of a form control
    fn value(&self, node: NodeId) -> Option<&str>;

    /// checked property of a checkbox or radio
    fn checked(&self, node: NodeId) -> bool;

    fn control_kind(&self, node: NodeId) -> Option<ControlKind> {
        let tag = self.tag(node)?;
        ControlKind::classify(tag, self.attr(node, "type"))
    }

    fn add_listener(&mut self, node: NodeId, event: EventKind) -> Result<ListenerId, DomError>;

    /// detach a listener, returns false if the handle was not attached
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// handles of listeners attached to `node` for `event`
    fn listeners_for(&self, node: NodeId, event: EventKind) -> Vec<ListenerId>;
}
