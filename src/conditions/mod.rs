//! condition language for form directives
//!
//! conditions compare named form inputs against literals:
//! - comparison operators: ==, !=
//! - logical operators: &&, ||, prefix !
//! - parenthesized groups
//!
//! `&&` and `||` fold left to right by default; see [`Precedence`].

mod eval;
mod parser;
mod types;

pub use eval::{evaluate, evaluate_str, suggest, ChangedInput, EvalContext, EvalError, Layered, ValueSource};
pub use parser::{parse_condition, ParseError};
pub use types::{CompareOp, Comparison, Condition, Precedence, UnknownInputPolicy};
