// listener registration across mount/unmount cycles

use formfx::binding::Controller;
use formfx::config::Config;
use formfx::dom::{parse_fixture, Dom, EventKind};

use crate::common::page;

const FORM: &str = r#"{ root: { tag: "form", children: [
    { tag: "input", attrs: { name: "role", value: "admin" } },
    { tag: "input", attrs: { type: "checkbox", name: "agree" } },
    { tag: "input", attrs: { type: "radio", name: "tier", value: "a" } },
    { tag: "input", attrs: { type: "radio", name: "tier", value: "b" } },
    { tag: "select", attrs: { name: "status" } },
    { tag: "input", attrs: { name: "notes" } },
    { tag: "p", attrs: { "data-show": "role==admin && agree==true" } },
    { tag: "p", attrs: { "data-hide": "tier==b || status==off" } },
    { tag: "button", attrs: { id: "toggle", "data-switch": "g", target: "" } },
    { tag: "div", attrs: { "data-switch": "g" } },
] } }"#;

#[test]
fn test_listener_counts_per_control() {
    let mut page = page(FORM);
    page.mount().unwrap();

    // role, agree, two tier radios, status, toggle; notes is never referenced
    assert_eq!(page.controller().listener_count(), 6);
    assert_eq!(page.document().listener_count(), 6);

    let doc = page.document();
    let status = doc.control_named("status").unwrap();
    let notes = doc.control_named("notes").unwrap();
    let toggle = doc.element_by_id("toggle").unwrap();
    assert_eq!(doc.listeners_for(status, EventKind::Change).len(), 1);
    assert!(doc.listeners_for(status, EventKind::Input).is_empty());
    assert!(doc.listeners_for(notes, EventKind::Input).is_empty());
    assert_eq!(doc.listeners_for(toggle, EventKind::Click).len(), 1);
}

#[test]
fn test_repeated_mount_unmount_is_symmetric() {
    let mut page = page(FORM);

    for _ in 0..5 {
        page.mount().unwrap();
        assert_eq!(page.document().listener_count(), 6);
        page.unmount();
        assert_eq!(page.document().listener_count(), 0);
        assert!(!page.controller().is_connected());
    }
}

#[test]
fn test_connect_twice_does_not_duplicate_listeners() {
    let mut doc = parse_fixture(FORM).unwrap();
    let mut controller = Controller::new(Config::default());

    controller.connect(&mut doc).unwrap();
    controller.connect(&mut doc).unwrap();
    assert_eq!(doc.listener_count(), 6);

    controller.disconnect(&mut doc);
    assert_eq!(doc.listener_count(), 0);
    assert!(controller.index().is_empty());
}

#[test]
fn test_unmount_leaves_foreign_listeners() {
    let mut doc = parse_fixture(FORM).unwrap();
    let role = doc.control_named("role").unwrap();
    let foreign = doc.add_listener(role, EventKind::Input).unwrap();

    let mut controller = Controller::new(Config::default());
    controller.connect(&mut doc).unwrap();
    assert_eq!(doc.listeners_for(role, EventKind::Input).len(), 2);

    controller.disconnect(&mut doc);
    assert_eq!(doc.listeners_for(role, EventKind::Input), vec![foreign]);
}

#[test]
fn test_events_after_unmount_change_nothing() {
    let mut page = page(FORM);
    page.mount().unwrap();
    page.unmount();

    let report = page.set_checked("agree", true).unwrap();
    assert_eq!(report.applied, 0);
    let report = page.click_id("toggle").unwrap();
    assert_eq!(report.applied, 0);
}
