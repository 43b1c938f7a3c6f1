//! directive types

use std::fmt;

use crate::conditions::Condition;

/// directive attributes, in the order effects are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DirectiveKind {
    Show,
    Hide,
    Disable,
    Classname,
    If,
    State,
    Switch,
}

impl DirectiveKind {
    /// every kind, in application order
    pub const ALL: [DirectiveKind; 7] = [
        DirectiveKind::Show,
        DirectiveKind::Hide,
        DirectiveKind::Disable,
        DirectiveKind::Classname,
        DirectiveKind::If,
        DirectiveKind::State,
        DirectiveKind::Switch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::Show => "show",
            DirectiveKind::Hide => "hide",
            DirectiveKind::Disable => "disable",
            DirectiveKind::Classname => "classname",
            DirectiveKind::If => "if",
            DirectiveKind::State => "state",
            DirectiveKind::Switch => "switch",
        }
    }

    /// the HTML attribute carrying this directive
    pub fn attribute(&self) -> &'static str {
        match self {
            DirectiveKind::Show => "data-show",
            DirectiveKind::Hide => "data-hide",
            DirectiveKind::Disable => "data-disable",
            DirectiveKind::Classname => "data-classname",
            DirectiveKind::If => "data-if",
            DirectiveKind::State => "data-state",
            DirectiveKind::Switch => "data-switch",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// attribute that selects the class a switch toggles
pub const SWITCH_CLASS_ATTRIBUTE: &str = "data-switch-class";

/// attribute marking a switch element as a click trigger
pub const SWITCH_TRIGGER_ATTRIBUTE: &str = "target";

/// one `class list:condition` pair of a classname directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRule {
    pub classes: Vec<String>,
    pub condition: Condition,
}

/// an `attr=value` assignment of an if directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrAssign {
    pub name: String,
    pub value: String,
}

impl AttrAssign {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for AttrAssign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

/// `condition?attr=value:attr=value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfRule {
    pub condition: Condition,
    pub then: AttrAssign,
    /// absent when the directive has no else branch
    pub otherwise: Option<AttrAssign>,
}

/// a parsed directive attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Show(Condition),
    Hide(Condition),
    Disable(Condition),
    Classname(Vec<ClassRule>),
    If(IfRule),
    /// mirrors the named input's value as text
    State(String),
    Switch {
        group: String,
        /// class to toggle, the hidden marker class when absent
        class: Option<String>,
    },
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Show(_) => DirectiveKind::Show,
            Directive::Hide(_) => DirectiveKind::Hide,
            Directive::Disable(_) => DirectiveKind::Disable,
            Directive::Classname(_) => DirectiveKind::Classname,
            Directive::If(_) => DirectiveKind::If,
            Directive::State(_) => DirectiveKind::State,
            Directive::Switch { .. } => DirectiveKind::Switch,
        }
    }

    /// input names whose changes must re-apply this directive
    ///
    /// switch groups are not inputs and reference nothing
    pub fn references(&self) -> Vec<String> {
        match self {
            Directive::Show(c) | Directive::Hide(c) | Directive::Disable(c) => c.references(),
            Directive::Classname(rules) => {
                let mut names: Vec<String> = Vec::new();
                for rule in rules {
                    for name in rule.condition.references() {
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                }
                names
            }
            Directive::If(rule) => rule.condition.references(),
            Directive::State(name) => vec![name.clone()],
            Directive::Switch { .. } => Vec::new(),
        }
    }
}
