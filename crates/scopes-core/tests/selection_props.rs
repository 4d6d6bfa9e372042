use proptest::prelude::*;
use scopes_core::{ControllerConfig, ScopeTreeController};
use scopes_model::NodePath;
use scopes_test_utils::{harness, path};
use std::collections::HashSet;

const LEAVES: [&[&str]; 7] = [
    &["teamA"],
    &["teamB"],
    &["teamC"],
    &["regions", "eu"],
    &["regions", "us"],
    &["apps", "app1"],
    &["apps", "app2"],
];

fn expanded_controller() -> ScopeTreeController {
    let h = harness();
    let controller = ScopeTreeController::new(h.nodes.clone(), h.scopes.clone())
        .with_config(ControllerConfig::new().with_warm_up_on_select(false))
        .unwrap();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        controller.activate().await.unwrap();
        controller
            .update_node(&path(&["regions"]), true, "")
            .await
            .unwrap();
        controller
            .update_node(&path(&["apps"]), true, "")
            .await
            .unwrap();
    });
    controller
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_draft_stays_consistent(toggles in prop::collection::vec(0..LEAVES.len(), 1..24)) {
        let controller = expanded_controller();

        for idx in toggles {
            controller.toggle_node_select(&path(LEAVES[idx])).unwrap();
            let draft = controller.state().tree_scopes;

            let names: HashSet<_> = draft.iter().map(|ts| ts.scope_name.clone()).collect();
            prop_assert_eq!(names.len(), draft.len());

            let parents: HashSet<NodePath> = draft.iter().map(|ts| ts.path.parent()).collect();
            prop_assert!(parents.len() <= 1);

            if parents.contains(&path(&["regions"])) {
                prop_assert!(draft.len() <= 1);
            }
        }
    }

    #[test]
    fn prop_reset_restores_committed(toggles in prop::collection::vec(0..LEAVES.len(), 0..12)) {
        let controller = expanded_controller();
        let committed = controller.state().committed_tree_scopes();

        for idx in toggles {
            controller.toggle_node_select(&path(LEAVES[idx])).unwrap();
        }
        controller.reset_dirty_scope_names();

        let state = controller.state();
        prop_assert!(!state.is_dirty());
        prop_assert_eq!(state.tree_scopes, committed);
    }
}
