//! condition evaluator
//!
//! evaluates parsed conditions against the current input values

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::warn;

use super::parser::{parse_condition, ParseError};
use super::types::{Comparison, Condition, Precedence, UnknownInputPolicy};

/// maximum edit distance for "did you mean" suggestions
const SUGGESTION_DISTANCE: usize = 2;

/// error returned when a condition cannot be evaluated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unknown input '{name}'{}", format_suggestions(.suggestions))]
    UnknownInput {
        name: String,
        suggestions: Vec<String>,
    },
    #[error("invalid condition: {0}")]
    Parse(#[from] ParseError),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

/// source of current input values, keyed by input name
pub trait ValueSource {
    /// current value of the named input, `None` when no such input exists
    fn value_of(&self, name: &str) -> Option<String>;

    /// names of all known inputs, used for suggestions
    fn known_names(&self) -> Vec<String> {
        Vec::new()
    }
}

impl ValueSource for HashMap<String, String> {
    fn value_of(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }

    fn known_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys().cloned().collect();
        names.sort();
        names
    }
}

impl ValueSource for BTreeMap<String, String> {
    fn value_of(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }

    fn known_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

/// two value sources where `top` shadows `bottom`
pub struct Layered<'a> {
    pub top: &'a dyn ValueSource,
    pub bottom: &'a dyn ValueSource,
}

impl ValueSource for Layered<'_> {
    fn value_of(&self, name: &str) -> Option<String> {
        self.top
            .value_of(name)
            .or_else(|| self.bottom.value_of(name))
    }

    fn known_names(&self) -> Vec<String> {
        let mut names = self.top.known_names();
        for name in self.bottom.known_names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// the input whose change triggered this evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedInput<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> ChangedInput<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Self { name, value }
    }
}

/// context for evaluating conditions
pub struct EvalContext<'a> {
    /// where input values are looked up
    pub source: &'a dyn ValueSource,
    /// the input that just changed, its value is used without a lookup
    pub changed: Option<ChangedInput<'a>>,
    /// what happens when a comparison names a missing input
    pub unknown_input: UnknownInputPolicy,
}

impl<'a> EvalContext<'a> {
    /// create a new evaluation context
    pub fn new(source: &'a dyn ValueSource) -> Self {
        Self {
            source,
            changed: None,
            unknown_input: UnknownInputPolicy::default(),
        }
    }

    /// set the changed input
    pub fn with_changed(mut self, changed: Option<ChangedInput<'a>>) -> Self {
        self.changed = changed;
        self
    }

    /// set the unknown input policy
    pub fn with_unknown_input(mut self, policy: UnknownInputPolicy) -> Self {
        self.unknown_input = policy;
        self
    }

    fn resolve(&self, name: &str) -> Option<String> {
        match self.changed {
            Some(changed) if changed.name == name => Some(changed.value.to_string()),
            _ => self.source.value_of(name),
        }
    }
}

/// evaluate a condition against the given context
///
/// every comparison is evaluated, AND/OR do not short-circuit, so a missing
/// input is reported even when the result would already be decided
pub fn evaluate(condition: &Condition, ctx: &EvalContext) -> Result<bool, EvalError> {
    match condition {
        Condition::Compare(c) => evaluate_comparison(c, ctx),
        Condition::Not(inner) => Ok(!evaluate(inner, ctx)?),
        Condition::Group(inner) => evaluate(inner, ctx),
        Condition::And(lhs, rhs) => {
            let lhs = evaluate(lhs, ctx)?;
            let rhs = evaluate(rhs, ctx)?;
            Ok(lhs && rhs)
        }
        Condition::Or(lhs, rhs) => {
            let lhs = evaluate(lhs, ctx)?;
            let rhs = evaluate(rhs, ctx)?;
            Ok(lhs || rhs)
        }
    }
}

/// parse and evaluate condition text in one step
pub fn evaluate_str(
    input: &str,
    ctx: &EvalContext,
    precedence: Precedence,
) -> Result<bool, EvalError> {
    let condition = parse_condition(input, precedence)?;
    evaluate(&condition, ctx)
}

fn evaluate_comparison(c: &Comparison, ctx: &EvalContext) -> Result<bool, EvalError> {
    match ctx.resolve(&c.name) {
        Some(value) => Ok(c.op.apply(&value, &c.literal)),
        None => match ctx.unknown_input {
            UnknownInputPolicy::Error => Err(EvalError::UnknownInput {
                name: c.name.clone(),
                suggestions: suggest(&c.name, &ctx.source.known_names()),
            }),
            UnknownInputPolicy::False => {
                warn!(input = %c.name, "condition references unknown input, treating as false");
                Ok(false)
            }
        },
    }
}

/// known names within a small edit distance of `name`, closest first
pub fn suggest(name: &str, known: &[String]) -> Vec<String> {
    let mut scored: Vec<(usize, &String)> = known
        .iter()
        .map(|k| (strsim::levenshtein(name, k), k))
        .filter(|(d, _)| *d <= SUGGESTION_DISTANCE)
        .collect();
    scored.sort();
    scored.into_iter().map(|(_, k)| k.clone()).collect()
}
