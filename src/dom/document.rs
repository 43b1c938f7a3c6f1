//! arena-backed in-memory document

use std::collections::BTreeMap;

use super::{ControlKind, Dom, DomError, EventKind, ListenerId, NodeId};

/// an element under construction or stored in a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// attributes other than `class`
    pub attrs: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    /// value property of form controls
    pub value: String,
    /// checked property of checkboxes and radios
    pub checked: bool,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// set an attribute; `class`, `value` and `checked` also set the
    /// matching properties
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match name.as_str() {
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
                return self;
            }
            "value" => self.value = value.clone(),
            "checked" => self.checked = true,
            _ => {}
        }
        self.attrs.insert(name, value);
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    children: Vec<NodeId>,
    element: Element,
}

#[derive(Debug, Clone, Copy)]
struct Listener {
    node: NodeId,
    event: EventKind,
}

/// a tree of elements rooted at the scope element
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    listeners: BTreeMap<ListenerId, Listener>,
    next_listener: u64,
}

impl Document {
    /// create a document whose root (the query scope) is `root`
    pub fn new(root: Element) -> Self {
        Self {
            nodes: vec![Node {
                children: Vec::new(),
                element: root,
            }],
            root: NodeId(0),
            listeners: BTreeMap::new(),
            next_listener: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// append `element` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, element: Element) -> Result<NodeId, DomError> {
        if parent.0 >= self.nodes.len() {
            return Err(DomError::UnknownNode(parent));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            children: Vec::new(),
            element,
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0).map(|n| &n.element)
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element, DomError> {
        self.nodes
            .get_mut(node.0)
            .map(|n| &mut n.element)
            .ok_or(DomError::UnknownNode(node))
    }

    /// all elements of the subtree in document order, root first
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    fn find_all(&self, predicate: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|id| predicate(&self.nodes[id.0].element))
            .collect()
    }

    /// first element with the given `id` attribute
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_all(|e| e.attrs.get("id").map(String::as_str) == Some(id))
            .into_iter()
            .next()
    }

    /// first form control named `name`
    pub fn control_named(&self, name: &str) -> Result<NodeId, DomError> {
        self.elements_named(name)
            .into_iter()
            .find(|id| self.control_kind(*id).is_some())
            .ok_or_else(|| DomError::NoControl(name.to_string()))
    }

    /// set the value property of a control
    pub fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), DomError> {
        self.element_mut(node)?.value = value.to_string();
        Ok(())
    }

    /// set the checked property; checking a radio unchecks the rest of its group
    pub fn set_checked(&mut self, node: NodeId, checked: bool) -> Result<(), DomError> {
        let kind = self.control_kind(node);
        let name = self.attr(node, "name").map(str::to_string);

        match kind {
            Some(ControlKind::Checkbox) => {}
            Some(ControlKind::Radio) if checked => {
                if let Some(name) = &name {
                    for other in self.elements_named(name) {
                        if other != node && self.control_kind(other) == Some(ControlKind::Radio) {
                            self.element_mut(other)?.checked = false;
                        }
                    }
                }
            }
            Some(ControlKind::Radio) => {}
            _ => return Err(DomError::NotCheckable(name.unwrap_or_else(|| node.to_string()))),
        }

        self.element_mut(node)?.checked = checked;
        Ok(())
    }

    /// number of listeners currently attached anywhere in the document
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// serialize the subtree as indented HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root, 0, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id.0];
        let el = &node.element;
        let indent = "  ".repeat(depth);

        out.push_str(&indent);
        out.push('<');
        out.push_str(&el.tag);
        if !el.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape(&el.classes.join(" "))));
        }
        for (name, value) in &el.attrs {
            if name == "value" || name == "checked" {
                continue;
            }
            out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
        }
        if let Some(kind) = self.control_kind(id) {
            if kind != ControlKind::Select || !el.value.is_empty() {
                out.push_str(&format!(" value=\"{}\"", escape(&el.value)));
            }
            if el.checked {
                out.push_str(" checked");
            }
        }
        out.push('>');

        if node.children.is_empty() {
            if let Some(text) = &el.text {
                out.push_str(&escape(text));
            }
            out.push_str(&format!("</{}>\n", el.tag));
            return;
        }

        out.push('\n');
        if let Some(text) = &el.text {
            out.push_str(&"  ".repeat(depth + 1));
            out.push_str(&escape(text));
            out.push('\n');
        }
        for child in &node.children {
            self.write_node(*child, depth + 1, out);
        }
        out.push_str(&indent);
        out.push_str(&format!("</{}>\n", el.tag));
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Dom for Document {
    fn elements_with_attr(&self, attr: &str) -> Vec<NodeId> {
        if attr == "class" {
            return self.find_all(|e| !e.classes.is_empty());
        }
        self.find_all(|e| e.attrs.contains_key(attr))
    }

    fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_ascii_lowercase();
        self.find_all(|e| e.tag == tag)
    }

    fn elements_named(&self, name: &str) -> Vec<NodeId> {
        self.find_all(|e| e.attrs.get("name").map(String::as_str) == Some(name))
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|e| e.attrs.get(name))
            .map(String::as_str)
    }

    /// `value` and `checked` also update the properties snapshots read;
    /// `checked="false"` unchecks
    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        if name == "class" {
            self.element_mut(node)?.classes =
                value.split_whitespace().map(str::to_string).collect();
            return Ok(());
        }

        match name {
            "value" => self.set_value(node, value)?,
            "checked" => {
                let checked = value != "false";
                match self.control_kind(node) {
                    Some(ControlKind::Checkbox | ControlKind::Radio) => {
                        self.set_checked(node, checked)?
                    }
                    _ => self.element_mut(node)?.checked = checked,
                }
            }
            _ => {}
        }
        self.element_mut(node)?
            .attrs
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .map(|e| e.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        validate_class(class)?;
        let el = self.element_mut(node)?;
        if !el.classes.iter().any(|c| c == class) {
            el.classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        validate_class(class)?;
        self.element_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.element(node).and_then(|e| e.text.as_deref())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        self.element_mut(node)?.text = Some(text.to_string());
        Ok(())
    }

    fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.value.as_str())
    }

    fn checked(&self, node: NodeId) -> bool {
        self.element(node).map(|e| e.checked).unwrap_or(false)
    }

    fn add_listener(&mut self, node: NodeId, event: EventKind) -> Result<ListenerId, DomError> {
        if node.0 >= self.nodes.len() {
            return Err(DomError::UnknownNode(node));
        }
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, Listener { node, event });
        Ok(id)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn listeners_for(&self, node: NodeId, event: EventKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, l)| l.node == node && l.event == event)
            .map(|(id, _)| *id)
            .collect()
    }
}

// classList.add/remove reject empty tokens and tokens containing whitespace
fn validate_class(class: &str) -> Result<(), DomError> {
    if class.is_empty() || class.chars().any(char::is_whitespace) {
        return Err(DomError::InvalidClass(class.to_string()));
    }
    Ok(())
}
