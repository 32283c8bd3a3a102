use std::collections::HashMap;

use proptest::prelude::*;

use crate::{build_forest, filter_by_query, flatten, EmployeeNode, EmployeeRecord, Forest};

fn scenario() -> Vec<EmployeeRecord> {
    vec![
        EmployeeRecord::new("A", "Alice", "Grant", "CEO"),
        EmployeeRecord::new("B", "Bob", "Meyer", "VP").with_manager("A"),
        EmployeeRecord::new("C", "Carol", "Diaz", "VP")
            .with_manager("A")
            .with_sort_order(1),
        EmployeeRecord::new("D", "Dave", "Chen", "Eng").with_manager("B"),
    ]
}

fn ids<'a>(nodes: &[&'a EmployeeNode]) -> Vec<&'a str> {
    nodes.iter().map(|node| node.id()).collect()
}

fn child_ids(node: &EmployeeNode) -> Vec<&str> {
    node.subordinates.iter().map(EmployeeNode::id).collect()
}

fn root_ids(forest: &Forest) -> Vec<&str> {
    forest.roots().iter().map(EmployeeNode::id).collect()
}

#[test]
fn builds_example_org_chart() {
    let forest = build_forest(&scenario());

    assert_eq!(root_ids(&forest), vec!["A"]);
    let alice = &forest.roots()[0];
    assert_eq!(child_ids(alice), vec!["B", "C"]);
    assert_eq!(child_ids(&alice.subordinates[0]), vec!["D"]);
    assert!(alice.subordinates[1].subordinates.is_empty());

    let flat = flatten(&forest);
    assert_eq!(ids(&flat), vec!["A", "B", "D", "C"]);
    assert_eq!(ids(&filter_by_query(&flat, "dave")), vec!["D"]);
}

#[test]
fn rebuilding_same_input_is_identical() {
    let records = scenario();
    let first = build_forest(&records);
    let second = build_forest(&records);
    assert_eq!(first, second);
    assert_eq!(flatten(&first), flatten(&second));
}

#[test]
fn every_record_appears_once() {
    let records = scenario();
    let forest = build_forest(&records);
    assert_eq!(forest.len(), records.len());
    assert_eq!(flatten(&forest).len(), records.len());
    assert!(forest.detached().is_empty());

    let mut seen = ids(&flatten(&forest));
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), records.len());
}

#[test]
fn unknown_manager_falls_back_to_root() {
    let records = vec![
        EmployeeRecord::new("A", "Alice", "Grant", "CEO"),
        EmployeeRecord::new("E", "Eve", "Moss", "Contractor").with_manager("gone"),
    ];
    let forest = build_forest(&records);
    assert_eq!(root_ids(&forest), vec!["A", "E"]);
}

#[test]
fn self_managed_record_is_a_root() {
    let records = vec![EmployeeRecord::new("S", "Sam", "Ortiz", "Lead").with_manager("S")];
    let forest = build_forest(&records);
    assert_eq!(root_ids(&forest), vec!["S"]);
    assert!(forest.roots()[0].subordinates.is_empty());
}

#[test]
fn siblings_sort_stably_by_sort_order() {
    let under_manager = vec![
        EmployeeRecord::new("M", "Mia", "Hart", "Manager"),
        EmployeeRecord::new("w", "W", "Three", "Tech").with_manager("M").with_sort_order(3),
        EmployeeRecord::new("x", "X", "One", "Tech").with_manager("M").with_sort_order(1),
        EmployeeRecord::new("y", "Y", "One", "Tech").with_manager("M").with_sort_order(1),
        EmployeeRecord::new("z", "Z", "Two", "Tech").with_manager("M").with_sort_order(2),
    ];
    let forest = build_forest(&under_manager);
    assert_eq!(child_ids(&forest.roots()[0]), vec!["x", "y", "z", "w"]);

    let top_level = vec![
        EmployeeRecord::new("w", "W", "Three", "Tech").with_sort_order(3),
        EmployeeRecord::new("x", "X", "One", "Tech").with_sort_order(1),
        EmployeeRecord::new("y", "Y", "One", "Tech").with_sort_order(1),
        EmployeeRecord::new("z", "Z", "Two", "Tech").with_sort_order(2),
    ];
    assert_eq!(root_ids(&build_forest(&top_level)), vec!["x", "y", "z", "w"]);
}

#[test]
fn manager_listed_after_report_still_attaches() {
    let records = vec![
        EmployeeRecord::new("D", "Dave", "Chen", "Eng").with_manager("B"),
        EmployeeRecord::new("B", "Bob", "Meyer", "VP"),
    ];
    let forest = build_forest(&records);
    assert_eq!(root_ids(&forest), vec!["B"]);
    assert_eq!(child_ids(&forest.roots()[0]), vec!["D"]);
}

#[test]
fn search_degrades_to_flat_list() {
    let forest = build_forest(&scenario());
    let flat = flatten(&forest);
    assert_eq!(filter_by_query(&flat, ""), flat);
    assert!(filter_by_query(&flat, "zz-no-such-substring").is_empty());
}

#[test]
fn manager_cycle_terminates_and_is_reported() {
    let records = vec![
        EmployeeRecord::new("A", "Alice", "Grant", "CEO"),
        EmployeeRecord::new("P", "Pat", "Quinn", "Lead").with_manager("Q"),
        EmployeeRecord::new("Q", "Quin", "Park", "Lead").with_manager("P"),
    ];
    let forest = build_forest(&records);
    assert_eq!(root_ids(&forest), vec!["A"]);
    assert_eq!(forest.detached(), &["P".to_string(), "Q".to_string()]);
    assert!(forest.len() <= records.len());
}

#[test]
fn duplicate_ids_do_not_panic() {
    let records = vec![
        EmployeeRecord::new("A", "Alice", "Grant", "CEO"),
        EmployeeRecord::new("A", "Alicia", "Grant", "Chair"),
        EmployeeRecord::new("B", "Bob", "Meyer", "VP").with_manager("A"),
    ];
    let forest = build_forest(&records);
    assert_eq!(forest.len(), records.len());
    // Last record wins the id lookup, so Bob reports to the second "A".
    assert_eq!(forest.roots()[1].record.first_name, "Alicia");
    assert_eq!(child_ids(&forest.roots()[1]), vec!["B"]);
}

#[test]
fn empty_input_gives_empty_forest() {
    let forest = build_forest(&[]);
    assert!(forest.is_empty());
    assert_eq!(forest.len(), 0);
    assert_eq!(forest.depth(), 0);
}

#[test]
fn thousand_level_chain_builds() {
    let mut records = vec![EmployeeRecord::new("0", "Root", "Node", "CEO")];
    for index in 1..1_000 {
        records.push(
            EmployeeRecord::new(index.to_string(), "Chain", "Link", "Staff")
                .with_manager((index - 1).to_string()),
        );
    }
    let forest = build_forest(&records);
    assert_eq!(forest.depth(), 1_000);
    assert_eq!(forest.roots()[0].headcount(), 1_000);
}

#[test]
fn find_and_counts() {
    let forest = build_forest(&scenario());
    let alice = forest.find("A").expect("alice");
    assert_eq!(alice.reports_count(), 2);
    assert_eq!(alice.headcount(), 4);
    assert!(forest.has_subordinates("B"));
    assert!(!forest.has_subordinates("C"));
    assert!(forest.find("missing").is_none());
    assert_eq!(forest.depth(), 3);
}

#[test]
fn serializes_nodes_with_nested_subordinates() {
    let forest = build_forest(&scenario());
    let json = serde_json::to_value(&forest).expect("serialize forest");
    assert_eq!(json["roots"][0]["firstName"], "Alice");
    assert_eq!(json["roots"][0]["subordinates"][0]["id"], "B");
    assert!(json.get("detached").is_none());
}

#[test]
fn mixed_input_places_every_record_in_order() {
    let records = vec![
        EmployeeRecord::new("D", "Dave", "Chen", "Eng")
            .with_manager("B")
            .with_sort_order(2),
        EmployeeRecord::new("S", "Sam", "Ortiz", "Lead")
            .with_manager("S")
            .with_sort_order(1),
        EmployeeRecord::new("O", "Omar", "Reyes", "Contractor")
            .with_manager("ghost")
            .with_sort_order(1),
        EmployeeRecord::new("B", "Bob", "Meyer", "VP").with_sort_order(-5),
        EmployeeRecord::new("E", "Erin", "Holt", "Eng")
            .with_manager("B")
            .with_sort_order(2),
        EmployeeRecord::new("F", "Fay", "Lund", "Eng")
            .with_manager("B")
            .with_sort_order(i32::MIN),
    ];
    let forest = build_forest(&records);

    assert_eq!(root_ids(&forest), vec!["B", "S", "O"]);
    assert_eq!(child_ids(&forest.roots()[0]), vec!["F", "D", "E"]);
    assert_eq!(ids(&flatten(&forest)), vec!["B", "F", "D", "E", "S", "O"]);
    assert_eq!(forest.len(), records.len());
    assert!(forest.detached().is_empty());
}

// ── Generated record sets ─────────────────────────────────────────────

#[derive(Debug, Clone)]
enum ManagerPick {
    Root,
    SelfRef,
    Ghost,
    Earlier(usize),
}

fn arb_manager_pick() -> impl Strategy<Value = ManagerPick> {
    prop_oneof![
        1 => Just(ManagerPick::Root),
        1 => Just(ManagerPick::SelfRef),
        1 => Just(ManagerPick::Ghost),
        5 => any::<usize>().prop_map(ManagerPick::Earlier),
    ]
}

/// Unique ids, no cycles: a record only reports to one generated before it.
/// Shuffling afterwards puts some managers after their reports.
fn arb_records() -> impl Strategy<Value = Vec<EmployeeRecord>> {
    prop::collection::vec((arb_manager_pick(), -2i32..3), 0..48)
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(index, (pick, sort_order))| {
                    let id = format!("e{index}");
                    let record = EmployeeRecord::new(id.clone(), "Gen", "Staff", "Staff")
                        .with_sort_order(sort_order);
                    match pick {
                        ManagerPick::Root => record,
                        ManagerPick::SelfRef => record.with_manager(id),
                        ManagerPick::Ghost => record.with_manager("ghost"),
                        ManagerPick::Earlier(_) if index == 0 => record,
                        ManagerPick::Earlier(seed) => {
                            record.with_manager(format!("e{}", seed % index))
                        }
                    }
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

proptest! {
    #[test]
    fn every_generated_record_appears_once(records in arb_records()) {
        let forest = build_forest(&records);
        prop_assert_eq!(forest.len(), records.len());
        prop_assert_eq!(flatten(&forest).len(), records.len());
        prop_assert!(forest.detached().is_empty());

        let mut seen = ids(&flatten(&forest));
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), records.len());
    }

    #[test]
    fn generated_builds_are_deterministic(records in arb_records()) {
        let first = build_forest(&records);
        let second = build_forest(&records);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(ids(&flatten(&first)), ids(&flatten(&second)));
    }

    #[test]
    fn generated_siblings_keep_stable_sort_order(records in arb_records()) {
        let position: HashMap<&str, usize> = records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.id.as_str(), index))
            .collect();
        let forest = build_forest(&records);

        let mut lists: Vec<&[EmployeeNode]> = vec![forest.roots()];
        lists.extend(forest.walk().map(|(_, node)| node.subordinates.as_slice()));
        for list in lists {
            for pair in list.windows(2) {
                let (left, right) = (&pair[0].record, &pair[1].record);
                prop_assert!(
                    left.sort_order < right.sort_order
                        || (left.sort_order == right.sort_order
                            && position[left.id.as_str()] < position[right.id.as_str()]),
                    "{} before {}",
                    left.id,
                    right.id
                );
            }
        }
    }

    #[test]
    fn generated_reports_sit_under_their_manager(records in arb_records()) {
        let forest = build_forest(&records);
        for root in forest.roots() {
            let manager = root.record.effective_manager_id();
            prop_assert!(manager.map_or(true, |id| forest.find(id).is_none()));
        }
        for (_, node) in forest.walk() {
            for report in &node.subordinates {
                prop_assert_eq!(report.record.effective_manager_id(), Some(node.id()));
            }
        }
    }
}
