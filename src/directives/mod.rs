//! declarative directive attributes
//!
//! | attribute         | value                          |
//! |-------------------|--------------------------------|
//! | data-show         | condition                      |
//! | data-hide         | condition                      |
//! | data-disable      | condition                      |
//! | data-classname    | `class list:condition[, ...]`  |
//! | data-if           | `condition?attr=val[:attr=val]`|
//! | data-state        | input name                     |
//! | data-switch       | switch group name              |
//! | data-switch-class | class toggled by the switch    |

mod parse;
mod types;

pub use parse::{
    parse_directive, split_once_outside_quotes, split_outside_quotes, strip_quotes,
    DirectiveError, ParseOptions,
};
pub use types::{
    AttrAssign, ClassRule, Directive, DirectiveKind, IfRule, SWITCH_CLASS_ATTRIBUTE,
    SWITCH_TRIGGER_ATTRIBUTE,
};

use crate::dom::{Dom, NodeId};

/// read and parse the directive of `kind` carried by `node`
///
/// returns `None` when the element has no such attribute
pub fn read_directive<D: Dom + ?Sized>(
    dom: &D,
    node: NodeId,
    kind: DirectiveKind,
    options: &ParseOptions,
) -> Option<Result<Directive, DirectiveError>> {
    let raw = dom.attr(node, kind.attribute())?;
    let parsed = parse_directive(kind, raw, options).map(|directive| match directive {
        Directive::Switch { group, .. } => Directive::Switch {
            group,
            class: dom
                .attr(node, SWITCH_CLASS_ATTRIBUTE)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        },
        other => other,
    });
    Some(parsed)
}
