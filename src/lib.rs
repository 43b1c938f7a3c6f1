// library crate for formfx
// the binary is a thin wrapper over `cli`; embedders use `binding` directly

pub mod binding;
pub mod cli;
pub mod conditions;
pub mod config;
pub mod directives;
pub mod dom;
