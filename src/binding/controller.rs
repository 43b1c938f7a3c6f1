//! binding controller: wires directives to input listeners and applies effects

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::conditions::{
    evaluate, suggest, ChangedInput, Condition, EvalContext, EvalError, UnknownInputPolicy,
    ValueSource,
};
use crate::config::Config;
use crate::directives::{Directive, DirectiveKind};
use crate::dom::{
    control_snapshot, input_snapshot, ControlKind, Dom, DomError, DomValues, EventKind,
    ListenerId, NodeId,
};

use super::index::{DependencyIndex, IndexedDirective};
use super::report::{DirectiveFailure, EffectError, EffectState, UpdateReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    InputChange,
    Toggle,
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    id: ListenerId,
    node: NodeId,
    event: EventKind,
    handler: Handler,
}

/// reactive binding for one document subtree
///
/// the host calls [`Controller::connect`] once per mount and
/// [`Controller::disconnect`] once per unmount
#[derive(Debug)]
pub struct Controller {
    config: Config,
    index: DependencyIndex,
    listeners: Vec<Registration>,
    states: HashMap<(NodeId, DirectiveKind), EffectState>,
    connected: bool,
}

impl Controller {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            index: DependencyIndex::default(),
            listeners: Vec::new(),
            states: HashMap::new(),
            connected: false,
        }
    }

    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// number of listeners this controller currently holds
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// last evaluated state of a show/hide/disable/if directive
    pub fn effect_state(&self, node: NodeId, kind: DirectiveKind) -> Option<EffectState> {
        self.states.get(&(node, kind)).copied()
    }

    /// mount: index directives, apply initial effects and attach listeners
    ///
    /// connecting an already connected controller disconnects it first
    pub fn connect<D: Dom + ?Sized>(&mut self, dom: &mut D) -> Result<UpdateReport, DomError> {
        if self.connected {
            self.disconnect(dom);
        }

        let report = self.init(dom);
        self.connected = true;

        for node in dom.elements_by_tag("select") {
            self.register_input(dom, node, EventKind::Change)?;
        }
        for node in dom.elements_by_tag("input") {
            self.register_input(dom, node, EventKind::Input)?;
        }
        if self.config.capabilities.switch {
            for node in self.index.switch_triggers(&*dom) {
                self.listen(dom, node, EventKind::Click, Handler::Toggle)?;
            }
        }

        debug!(
            listeners = self.listeners.len(),
            applied = report.applied,
            failures = report.failures.len(),
            "connected"
        );

        Ok(report)
    }

    /// unmount: detach every listener attached by `connect` and drop the index
    pub fn disconnect<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        for registration in self.listeners.drain(..) {
            if !dom.remove_listener(registration.id) {
                warn!(
                    node = %registration.node,
                    event = %registration.event,
                    "listener was already detached"
                );
            }
        }
        self.index = DependencyIndex::default();
        self.states.clear();
        self.connected = false;
        debug!("disconnected");
    }

    /// rebuild the index and apply every directive from current DOM state
    ///
    /// no input counts as changed, so every referenced input is looked up
    pub fn init<D: Dom + ?Sized>(&mut self, dom: &mut D) -> UpdateReport {
        self.index = DependencyIndex::build(
            &*dom,
            &self.config.parse_options(),
            self.config.capabilities.switch,
        );

        let mut report = UpdateReport {
            applied: 0,
            failures: self.index.failures().to_vec(),
        };
        for failure in &report.failures {
            warn!(%failure, "directive skipped");
        }

        for entry in self.index.entries() {
            if entry.directive.kind() == DirectiveKind::Switch {
                continue;
            }
            let outcome = apply_effect(dom, &self.config, entry, None);
            record(&mut self.states, &mut report, entry, outcome);
        }

        report
    }

    /// re-apply every directive that references the input at `node`
    pub fn handle_input_change<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        node: NodeId,
    ) -> UpdateReport {
        let mut report = UpdateReport::default();

        let Some(name) = dom.attr(node, "name").map(str::to_string) else {
            debug!(%node, "change on an unnamed control ignored");
            return report;
        };

        let value = match dom.control_kind(node) {
            Some(ControlKind::Radio) => input_snapshot(&*dom, &name),
            Some(_) => control_snapshot(&*dom, node),
            None => None,
        };
        let Some(value) = value else {
            debug!(%node, "change on a non-control element ignored");
            return report;
        };

        debug!(input = %name, value = %value, "input changed");
        let changed = ChangedInput::new(&name, &value);

        for entry in self.index.dependents(&name) {
            let outcome = apply_effect(dom, &self.config, entry, Some(changed));
            record(&mut self.states, &mut report, entry, outcome);
        }

        report
    }

    /// toggle the switch class on every member of the trigger's group,
    /// the trigger included
    pub fn handle_toggle<D: Dom + ?Sized>(&mut self, dom: &mut D, trigger: NodeId) -> UpdateReport {
        let mut report = UpdateReport::default();
        if !self.config.capabilities.switch {
            return report;
        }

        let Some(group) = dom
            .attr(trigger, DirectiveKind::Switch.attribute())
            .map(|g| g.trim().to_string())
        else {
            return report;
        };

        let targets: Vec<(NodeId, String)> = self
            .index
            .of_kind(DirectiveKind::Switch)
            .filter_map(|e| match &e.directive {
                Directive::Switch { group: g, class } if *g == group => Some((
                    e.node,
                    class
                        .clone()
                        .unwrap_or_else(|| self.config.classes.hidden.clone()),
                )),
                _ => None,
            })
            .collect();

        for (member, class) in targets {
            match dom.toggle_class(member, &class) {
                Ok(present) => {
                    debug!(group = %group, node = %member, class = %class, present, "switch toggled");
                    report.applied += 1;
                }
                Err(error) => {
                    let failure = DirectiveFailure {
                        node: member,
                        kind: DirectiveKind::Switch,
                        error: error.into(),
                    };
                    warn!(%failure, "switch toggle failed");
                    report.failures.push(failure);
                }
            }
        }

        report
    }

    /// route a DOM event to the handler this controller attached for it
    ///
    /// events on nodes without one of our listeners are ignored
    pub fn handle_event<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        node: NodeId,
        event: EventKind,
    ) -> UpdateReport {
        let attached = dom.listeners_for(node, event);
        let handlers: Vec<Handler> = self
            .listeners
            .iter()
            .filter(|r| attached.contains(&r.id))
            .map(|r| r.handler)
            .collect();

        let mut report = UpdateReport::default();
        for handler in handlers {
            match handler {
                Handler::InputChange => report.merge(self.handle_input_change(dom, node)),
                Handler::Toggle => report.merge(self.handle_toggle(dom, node)),
            }
        }
        report
    }

    fn register_input<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        node: NodeId,
        event: EventKind,
    ) -> Result<(), DomError> {
        let registered = dom
            .attr(node, "name")
            .map(|name| self.index.is_registered(name))
            .unwrap_or(false);

        if registered {
            self.listen(dom, node, event, Handler::InputChange)?;
        }
        Ok(())
    }

    fn listen<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        node: NodeId,
        event: EventKind,
        handler: Handler,
    ) -> Result<(), DomError> {
        let id = dom.add_listener(node, event)?;
        debug!(%node, %event, "listener attached");
        self.listeners.push(Registration {
            id,
            node,
            event,
            handler,
        });
        Ok(())
    }
}

fn record(
    states: &mut HashMap<(NodeId, DirectiveKind), EffectState>,
    report: &mut UpdateReport,
    entry: &IndexedDirective,
    outcome: Result<Option<EffectState>, EffectError>,
) {
    let kind = entry.directive.kind();
    match outcome {
        Ok(state) => {
            report.applied += 1;
            if let Some(state) = state {
                states.insert((entry.node, kind), state);
            }
        }
        Err(error) => {
            let failure = DirectiveFailure {
                node: entry.node,
                kind,
                error,
            };
            warn!(%failure, "directive update failed");
            report.failures.push(failure);
        }
    }
}

fn evaluate_condition<D: Dom + ?Sized>(
    dom: &D,
    config: &Config,
    condition: &Condition,
    changed: Option<ChangedInput>,
) -> Result<bool, EvalError> {
    let values = DomValues::new(dom);
    let ctx = EvalContext::new(&values)
        .with_changed(changed)
        .with_unknown_input(config.evaluation.unknown_input);
    evaluate(condition, &ctx)
}

fn set_class<D: Dom + ?Sized>(
    dom: &mut D,
    node: NodeId,
    class: &str,
    present: bool,
) -> Result<(), DomError> {
    if present {
        dom.add_class(node, class)
    } else {
        dom.remove_class(node, class)
    }
}

/// apply one directive; conditions are evaluated before the DOM is touched,
/// so a failing directive leaves its element unchanged
fn apply_effect<D: Dom + ?Sized>(
    dom: &mut D,
    config: &Config,
    entry: &IndexedDirective,
    changed: Option<ChangedInput>,
) -> Result<Option<EffectState>, EffectError> {
    let node = entry.node;

    match &entry.directive {
        Directive::Show(condition) => {
            let active = evaluate_condition(&*dom, config, condition, changed)?;
            set_class(dom, node, &config.classes.hidden, !active)?;
            Ok(Some(active.into()))
        }
        Directive::Hide(condition) => {
            let active = evaluate_condition(&*dom, config, condition, changed)?;
            set_class(dom, node, &config.classes.hidden, active)?;
            Ok(Some(active.into()))
        }
        Directive::Disable(condition) => {
            let active = evaluate_condition(&*dom, config, condition, changed)?;
            set_class(dom, node, &config.classes.disabled, active)?;
            Ok(Some(active.into()))
        }
        Directive::Classname(rules) => {
            let results = rules
                .iter()
                .map(|rule| evaluate_condition(&*dom, config, &rule.condition, changed))
                .collect::<Result<Vec<bool>, EvalError>>()?;

            for (rule, present) in rules.iter().zip(results) {
                for class in &rule.classes {
                    set_class(dom, node, class, present)?;
                }
            }
            Ok(None)
        }
        Directive::If(rule) => {
            let active = evaluate_condition(&*dom, config, &rule.condition, changed)?;
            let assign = if active {
                Some(&rule.then)
            } else {
                rule.otherwise.as_ref()
            };
            if let Some(assign) = assign {
                dom.set_attr(node, &assign.name, &assign.value)?;
            }
            Ok(Some(active.into()))
        }
        Directive::State(name) => {
            let value = match changed {
                Some(c) if c.name == name.as_str() => Some(c.value.to_string()),
                _ => input_snapshot(&*dom, name),
            };

            match value {
                Some(value) => dom.set_text(node, &value)?,
                None => match config.evaluation.unknown_input {
                    UnknownInputPolicy::Error => {
                        let known = DomValues::new(&*dom).known_names();
                        return Err(EvalError::UnknownInput {
                            name: name.clone(),
                            suggestions: suggest(name, &known),
                        }
                        .into());
                    }
                    UnknownInputPolicy::False => {
                        warn!(input = %name, "state directive references unknown input");
                    }
                },
            }
            Ok(None)
        }
        Directive::Switch { .. } => Ok(None),
    }
}
