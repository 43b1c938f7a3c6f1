use serde::{Deserialize, Serialize};

use crate::conditions::{Precedence, UnknownInputPolicy};
use crate::directives::ParseOptions;

pub const DEFAULT_HIDDEN_CLASS: &str = "bs-d-none";
pub const DEFAULT_DISABLED_CLASS: &str = "bs-ui-disabled";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub classes: MarkerClasses,
    #[serde(default)]
    pub evaluation: Evaluation,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl Config {
    /// options used when parsing directive attributes
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            precedence: self.evaluation.precedence,
            quoted_classnames: self.capabilities.quoted_classnames,
        }
    }
}

/// classes toggled by show/hide/disable and default switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerClasses {
    #[serde(default = "default_hidden_class")]
    pub hidden: String,
    #[serde(default = "default_disabled_class")]
    pub disabled: String,
}

fn default_hidden_class() -> String {
    DEFAULT_HIDDEN_CLASS.to_string()
}

fn default_disabled_class() -> String {
    DEFAULT_DISABLED_CLASS.to_string()
}

impl Default for MarkerClasses {
    fn default() -> Self {
        Self {
            hidden: default_hidden_class(),
            disabled: default_disabled_class(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default)]
    pub precedence: Precedence,
    #[serde(default)]
    pub unknown_input: UnknownInputPolicy,
}

/// optional directive support
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// enable data-switch click toggles
    #[serde(default = "default_true")]
    pub switch: bool,
    /// accept quoted class lists in data-classname
    #[serde(default = "default_true")]
    pub quoted_classnames: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            switch: true,
            quoted_classnames: true,
        }
    }
}
