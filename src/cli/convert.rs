//! conversion helpers for CLI commands

use std::fmt;
use std::str::FromStr;

use crate::binding::{Page, UpdateReport};
use crate::conditions::Precedence;
use crate::dom::DomError;

use super::commands::PrecedenceArg;

impl From<PrecedenceArg> for Precedence {
    fn from(arg: PrecedenceArg) -> Self {
        match arg {
            PrecedenceArg::LeftToRight => Precedence::LeftToRight,
            PrecedenceArg::Standard => Precedence::Standard,
        }
    }
}

/// split `name=value` at the first `=`; the value may be empty
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid assignment '{}': expected name=value", s))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("invalid assignment '{}': missing input name", s));
    }

    Ok((name.to_string(), value.to_string()))
}

/// one user interaction replayed by `simulate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `set:name=value`
    Set { name: String, value: String },
    /// `check:name`
    Check(String),
    /// `uncheck:name`
    Uncheck(String),
    /// `click:id`
    Click(String),
}

impl Step {
    /// perform the interaction on a mounted page
    pub fn apply(&self, page: &mut Page) -> Result<UpdateReport, DomError> {
        match self {
            Step::Set { name, value } => page.set(name, value),
            Step::Check(name) => page.set_checked(name, true),
            Step::Uncheck(name) => page.set_checked(name, false),
            Step::Click(id) => page.click_id(id),
        }
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (action, arg) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid step '{}': expected action:argument", s))?;

        let require = |arg: &str| -> Result<String, String> {
            let arg = arg.trim();
            if arg.is_empty() {
                Err(format!("invalid step '{}': missing argument", s))
            } else {
                Ok(arg.to_string())
            }
        };

        match action.trim().to_lowercase().as_str() {
            "set" => {
                let (name, value) = parse_assignment(arg)?;
                Ok(Step::Set { name, value })
            }
            "check" => Ok(Step::Check(require(arg)?)),
            "uncheck" => Ok(Step::Uncheck(require(arg)?)),
            "click" => Ok(Step::Click(require(arg)?)),
            other => Err(format!(
                "invalid step '{}': unknown action '{}', use set, check, uncheck, or click",
                s, other
            )),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Set { name, value } => write!(f, "set:{}={}", name, value),
            Step::Check(name) => write!(f, "check:{}", name),
            Step::Uncheck(name) => write!(f, "uncheck:{}", name),
            Step::Click(id) => write!(f, "click:{}", id),
        }
    }
}
