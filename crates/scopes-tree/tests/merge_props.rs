use proptest::prelude::*;
use scopes_model::{nodes_map, Node, NodePath, NodeReason};
use scopes_tree::{NodeId, NodeTree};
use std::collections::HashSet;

const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn names_subset() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(NAMES.to_vec(), 0..=NAMES.len())
}

fn leaves(names: &[&str]) -> scopes_model::NodesMap {
    nodes_map(
        names
            .iter()
            .map(|n| Node::leaf(*n, n.to_uppercase(), format!("scope-{n}"))),
    )
}

proptest! {
    #[test]
    fn prop_selected_children_survive_refetch(
        before in names_subset(),
        after in names_subset(),
        selected in names_subset(),
    ) {
        let mut tree = NodeTree::new();
        tree.merge_children(NodeId::ROOT, leaves(&before), &HashSet::new()).unwrap();

        let retained: HashSet<String> = selected.iter().map(|s| (*s).to_string()).collect();
        let report = tree.merge_children(NodeId::ROOT, leaves(&after), &retained).unwrap();

        for name in selected.iter().copied() {
            let path = NodePath::from(["", name]);
            let was_present = before.contains(&name);
            let is_fresh = after.contains(&name);

            if is_fresh {
                let id = tree.resolve(&path).unwrap();
                prop_assert_eq!(tree.get(id).unwrap().reason, NodeReason::Result);
            } else if was_present {
                let id = tree.resolve(&path).unwrap();
                prop_assert_eq!(tree.get(id).unwrap().reason, NodeReason::Persisted);
                prop_assert!(report.persisted.contains(&name.to_string()));
            } else {
                prop_assert!(tree.resolve(&path).is_err());
            }
        }
    }

    #[test]
    fn prop_sibling_names_stay_unique(
        rounds in proptest::collection::vec((names_subset(), names_subset()), 1..6),
    ) {
        let mut tree = NodeTree::new();
        for (fetched, selected) in rounds {
            let retained: HashSet<String> = selected.iter().map(|s| (*s).to_string()).collect();
            tree.merge_children(NodeId::ROOT, leaves(&fetched), &retained).unwrap();

            let names: Vec<String> = tree
                .children(NodeId::ROOT)
                .into_iter()
                .map(|c| tree.get(c).unwrap().name.clone())
                .collect();
            let unique: HashSet<&String> = names.iter().collect();
            prop_assert_eq!(unique.len(), names.len());
            prop_assert_eq!(tree.len(), names.len() + 1);
        }
    }
}
