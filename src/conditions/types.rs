//! core types for the condition language

use std::fmt;

use serde::{Deserialize, Serialize};

/// comparison operators supported in conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// equality: ==
    Eq,
    /// inequality: !=
    Ne,
}

impl CompareOp {
    /// parse operator from its textual form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            _ => None,
        }
    }

    /// apply the operator to an input value and a normalized literal
    ///
    /// input values are always strings, so loose equality is string equality
    pub fn apply(&self, value: &str, literal: &str) -> bool {
        match self {
            CompareOp::Eq => value == literal,
            CompareOp::Ne => value != literal,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Ne => write!(f, "!="),
        }
    }
}

/// how `&&` and `||` bind relative to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// operators apply strictly left to right: `a || b && c` is `(a || b) && c`
    #[default]
    LeftToRight,
    /// `&&` binds tighter than `||`
    Standard,
}

/// what a comparison does when its input does not exist in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownInputPolicy {
    /// fail the directive with an unknown-input error
    #[default]
    Error,
    /// treat the comparison as false and log a warning
    False,
}

/// a single `name OP literal` comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// input name (matches the form control's `name` attribute)
    pub name: String,
    /// comparison operator
    pub op: CompareOp,
    /// literal with surrounding quotes already stripped
    pub literal: String,
}

impl Comparison {
    pub fn new(name: impl Into<String>, op: CompareOp, literal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op,
            literal: literal.into(),
        }
    }

    /// create an equality comparison
    pub fn eq(name: impl Into<String>, literal: impl Into<String>) -> Self {
        Self::new(name, CompareOp::Eq, literal)
    }

    /// create an inequality comparison
    pub fn ne(name: impl Into<String>, literal: impl Into<String>) -> Self {
        Self::new(name, CompareOp::Ne, literal)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} '{}'", self.name, self.op, self.literal)
    }
}

/// the condition AST
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// a comparison against an input value
    Compare(Comparison),
    /// logical negation
    Not(Box<Condition>),
    /// logical AND
    And(Box<Condition>, Box<Condition>),
    /// logical OR
    Or(Box<Condition>, Box<Condition>),
    /// parenthesized sub-condition
    Group(Box<Condition>),
}

impl Condition {
    /// create a comparison condition
    pub fn compare(comparison: Comparison) -> Self {
        Condition::Compare(comparison)
    }

    /// create a NOT condition
    #[allow(clippy::should_implement_trait)]
    pub fn negate(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    /// create an AND condition
    pub fn and(lhs: Condition, rhs: Condition) -> Self {
        Condition::And(Box::new(lhs), Box::new(rhs))
    }

    /// create an OR condition
    pub fn or(lhs: Condition, rhs: Condition) -> Self {
        Condition::Or(Box::new(lhs), Box::new(rhs))
    }

    /// wrap a condition in a group
    pub fn group(inner: Condition) -> Self {
        Condition::Group(Box::new(inner))
    }

    /// input names referenced by this condition, in order of first appearance
    pub fn references(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references(&self, names: &mut Vec<String>) {
        match self {
            Condition::Compare(c) => {
                if !names.contains(&c.name) {
                    names.push(c.name.clone());
                }
            }
            Condition::Not(inner) | Condition::Group(inner) => inner.collect_references(names),
            Condition::And(lhs, rhs) | Condition::Or(lhs, rhs) => {
                lhs.collect_references(names);
                rhs.collect_references(names);
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Compare(c) => write!(f, "{}", c),
            Condition::Not(inner) => write!(f, "!{}", inner),
            Condition::And(lhs, rhs) => write!(f, "{} && {}", lhs, rhs),
            Condition::Or(lhs, rhs) => write!(f, "{} || {}", lhs, rhs),
            Condition::Group(inner) => write!(f, "({})", inner),
        }
    }
}
