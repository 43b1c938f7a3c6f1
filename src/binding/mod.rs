//! binding layer: indexes directives, listens to inputs and applies effects

mod controller;
mod index;
mod page;
mod report;

pub use controller::Controller;
pub use index::{DependencyIndex, IndexedDirective};
pub use page::Page;
pub use report::{DirectiveFailure, EffectError, EffectState, UpdateReport};
