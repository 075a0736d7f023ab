use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use fieldaudit_diff::{compute_changes, format_value, DiffEntry, IgnoredFields, CYCLE_PLACEHOLDER};
use fieldaudit_types::{audit_enum, auditable, AuditValue};
use proptest::prelude::*;

auditable! {
    #[derive(Debug)]
    struct Node {
        label: String,
        peer: OnceCell<Rc<Node>>,
    }
}

// Comparing peers would walk the cycle, so equality stops at the label.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

auditable! {
    #[derive(Debug, PartialEq)]
    struct Graph {
        nodes: Vec<Rc<Node>>,
    }
}

fn node(label: &str) -> Rc<Node> {
    Rc::new(Node {
        label: label.into(),
        peer: OnceCell::new(),
    })
}

/// Two nodes pointing at each other.
fn cycle(a: &str, b: &str) -> Rc<Node> {
    let first = node(a);
    let second = Rc::new(Node {
        label: b.into(),
        peer: OnceCell::from(Rc::clone(&first)),
    });
    assert!(first.peer.set(second).is_ok());
    first
}

#[test]
fn cyclic_graph_terminates_with_placeholder() {
    let a = cycle("A", "B");
    let rendered = format_value(&a.audit_value()).unwrap();
    assert_eq!(
        rendered,
        format!("{{\"label\": \"A\", \"peer\": {{\"label\": \"B\", \"peer\": {CYCLE_PLACEHOLDER}}}}}")
    );
}

#[test]
fn self_reference_terminates() {
    let lonely = node("solo");
    assert!(lonely.peer.set(Rc::clone(&lonely)).is_ok());
    assert_eq!(
        format_value(&lonely.audit_value()).unwrap(),
        "{\"label\": \"solo\", \"peer\": {...}}"
    );
}

#[test]
fn changed_sequence_of_cyclic_nodes_is_rendered() {
    let old = Graph { nodes: vec![cycle("A", "B")] };
    let new = Graph { nodes: vec![cycle("A", "C")] };

    // The nodes compare equal by label, so only a length change is visible.
    assert!(compute_changes(&old, &new, &IgnoredFields::none()).unwrap().is_empty());

    let new = Graph { nodes: vec![cycle("A", "C"), node("D")] };
    let changes = compute_changes(&old, &new, &IgnoredFields::none()).unwrap();
    assert_eq!(
        changes.get("nodes"),
        Some(&DiffEntry::texts(
            "[{\"label\": \"A\", \"peer\": {\"label\": \"B\", \"peer\": {...}}}]",
            "[{\"label\": \"A\", \"peer\": {\"label\": \"C\", \"peer\": {...}}}, {\"label\": \"D\"}]"
        ))
    );
}

audit_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Tier {
        Free => "FREE",
        Pro => "PRO",
    }
}

auditable! {
    #[derive(Debug, Clone, PartialEq)]
    struct Account {
        id: u64,
        name: String,
        tier: Tier,
        emails: Vec<String>,
        limits: BTreeMap<String, u32>,
    }
}

auditable! {
    #[derive(Debug, Clone, PartialEq)]
    struct Team {
        title: String,
        members: Vec<Account>,
    }
}

#[test]
fn nested_entities_summarize_to_id_and_name() {
    let account = Account {
        id: 42,
        name: "Ana".into(),
        tier: Tier::Pro,
        emails: vec!["ana@example.com".into()],
        limits: [("seats".to_string(), 5)].into(),
    };
    let old = Team { title: "Core".into(), members: vec![] };
    let new = Team { title: "Core".into(), members: vec![account] };

    let changes = compute_changes(&old, &new, &IgnoredFields::none()).unwrap();
    let entry = changes.get("members").unwrap();
    assert_eq!(entry.old.as_deref(), Some("[]"));
    assert_eq!(entry.new.as_deref(), Some("[{\"id\": \"42\", \"name\": \"Ana\"}]"));
}

#[test]
fn empty_collections_on_both_sides_are_unchanged() {
    let old = Team { title: "Core".into(), members: vec![] };
    let new = Team { title: "Core".into(), members: Vec::new() };
    assert!(compute_changes(&old, &new, &IgnoredFields::none()).unwrap().is_empty());
}

const ACCOUNT_FIELDS: [&str; 5] = ["id", "name", "tier", "emails", "limits"];

fn account_strategy() -> impl Strategy<Value = Account> {
    (
        0u64..4,
        "[a-z]{0,6}",
        prop_oneof![Just(Tier::Free), Just(Tier::Pro)],
        prop::collection::vec("[a-z]{1,4}", 0..3),
        prop::collection::btree_map("[a-z]{1,3}", 0u32..10, 0..3),
    )
        .prop_map(|(id, name, tier, emails, limits)| Account {
            id,
            name,
            tier,
            emails,
            limits,
        })
}

proptest! {
    #[test]
    fn comparing_a_value_with_itself_is_empty(account in account_strategy()) {
        let changes = compute_changes(&account, &account.clone(), &IgnoredFields::none()).unwrap();
        prop_assert!(changes.is_empty());
    }

    #[test]
    fn ignored_fields_never_reported(
        old in account_strategy(),
        new in account_strategy(),
        mask in prop::collection::vec(any::<bool>(), ACCOUNT_FIELDS.len()),
    ) {
        let ignored: IgnoredFields = ACCOUNT_FIELDS
            .iter()
            .zip(&mask)
            .filter(|(_, ignore)| **ignore)
            .map(|(field, _)| *field)
            .collect();
        let changes = compute_changes(&old, &new, &ignored).unwrap();
        for field in changes.fields() {
            prop_assert!(!ignored.contains(field));
        }
    }

    #[test]
    fn reported_fields_are_exactly_the_unequal_ones(
        old in account_strategy(),
        new in account_strategy(),
    ) {
        let changes = compute_changes(&old, &new, &IgnoredFields::none()).unwrap();
        prop_assert_eq!(changes.contains("id"), old.id != new.id);
        prop_assert_eq!(changes.contains("name"), old.name != new.name);
        prop_assert_eq!(changes.contains("tier"), old.tier != new.tier);
        prop_assert_eq!(changes.contains("emails"), old.emails != new.emails);
        prop_assert_eq!(changes.contains("limits"), old.limits != new.limits);
    }
}
