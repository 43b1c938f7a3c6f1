//! dependency index: input name -> directive-bearing elements

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::directives::{
    read_directive, Directive, DirectiveKind, ParseOptions, SWITCH_TRIGGER_ATTRIBUTE,
};
use crate::dom::{Dom, NodeId};

use super::report::{DirectiveFailure, EffectError};

/// a parsed directive and the element carrying it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedDirective {
    pub node: NodeId,
    pub directive: Directive,
}

/// directives of one subtree, built on connect and discarded on disconnect
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    /// ordered by application kind, then document order
    entries: Vec<IndexedDirective>,
    /// input name -> positions in `entries`, ascending
    by_name: HashMap<String, Vec<usize>>,
    /// switch group -> member elements in document order
    switch_groups: BTreeMap<String, Vec<NodeId>>,
    /// directives that failed to parse
    failures: Vec<DirectiveFailure>,
}

impl DependencyIndex {
    /// scan the document for directives
    ///
    /// switch directives are only indexed when `switches` is enabled
    pub fn build<D: Dom + ?Sized>(dom: &D, options: &ParseOptions, switches: bool) -> Self {
        let mut index = Self::default();

        for kind in DirectiveKind::ALL {
            if kind == DirectiveKind::Switch && !switches {
                continue;
            }

            for node in dom.elements_with_attr(kind.attribute()) {
                let Some(parsed) = read_directive(dom, node, kind, options) else {
                    continue;
                };

                match parsed {
                    Ok(directive) => index.insert(node, directive),
                    Err(error) => index.failures.push(DirectiveFailure {
                        node,
                        kind,
                        error: EffectError::Directive(error),
                    }),
                }
            }
        }

        debug!(
            directives = index.entries.len(),
            inputs = index.by_name.len(),
            failures = index.failures.len(),
            "built dependency index"
        );

        index
    }

    fn insert(&mut self, node: NodeId, directive: Directive) {
        let position = self.entries.len();

        if let Directive::Switch { group, .. } = &directive {
            self.switch_groups.entry(group.clone()).or_default().push(node);
        }

        for name in directive.references() {
            self.by_name.entry(name).or_default().push(position);
        }

        self.entries.push(IndexedDirective { node, directive });
    }

    /// every indexed directive, in application order
    pub fn entries(&self) -> &[IndexedDirective] {
        &self.entries
    }

    /// directives of the given kind, in document order
    pub fn of_kind(&self, kind: DirectiveKind) -> impl Iterator<Item = &IndexedDirective> {
        self.entries
            .iter()
            .filter(move |e| e.directive.kind() == kind)
    }

    /// directives referencing `name`, in application order
    pub fn dependents(&self, name: &str) -> impl Iterator<Item = &IndexedDirective> {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(move |&i| &self.entries[i])
    }

    /// whether any directive reacts to changes of `name`
    pub fn is_registered(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// input names referenced by at least one directive, sorted
    pub fn input_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// members of a switch group
    pub fn switch_members(&self, group: &str) -> &[NodeId] {
        self.switch_groups
            .get(group)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// switch members that act as click triggers: they carry a `target` attribute
    pub fn switch_triggers<D: Dom + ?Sized>(&self, dom: &D) -> Vec<NodeId> {
        let mut triggers: Vec<NodeId> = self
            .switch_groups
            .values()
            .flatten()
            .copied()
            .filter(|node| dom.attr(*node, SWITCH_TRIGGER_ATTRIBUTE).is_some())
            .collect();
        triggers.sort();
        triggers
    }

    /// directives that could not be parsed
    pub fn failures(&self) -> &[DirectiveFailure] {
        &self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.failures.is_empty()
    }
}
