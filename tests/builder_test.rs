//! Tests for RouteBuilder flows-file parsing and route merging

use std::path::Path;

use rstest::rstest;

use flowtree::util::testing::init_test_setup;
use flowtree::{DomainError, Hop, RouteBuilder};

fn hops(names: &[&str]) -> Vec<Hop> {
    names.iter().copied().map(Hop::new).collect()
}

// ============================================================
// Route Merging Tests
// ============================================================

#[test]
fn given_single_route_when_building_flow_then_tree_is_a_chain() {
    init_test_setup();
    let builder = RouteBuilder::new();
    let flow = builder
        .build_flow("flow0", &[hops(&["dev4", "switch0", "switch1", "dev9"])])
        .unwrap();

    assert_eq!(flow.tree.node_count(), 4);
    assert_eq!(flow.tree.depth(), 4);
    let leaves = flow.tree.leaves().unwrap();
    assert_eq!(leaves.len(), 1);
    assert_eq!(
        flow.tree.get_node(leaves[0]).unwrap().payload().name,
        "dev9"
    );
    flow.tree.validate().unwrap();
}

#[test]
fn given_fanout_routes_when_building_flow_then_shared_prefix_forms_one_branch_point() {
    init_test_setup();
    let builder = RouteBuilder::new();
    let flow = builder
        .build_flow(
            "flow0",
            &[
                hops(&["dev4", "switch0", "switch3", "dev15"]),
                hops(&["dev4", "switch0", "switch3", "dev16"]),
                hops(&["dev4", "switch0", "switch3", "dev17"]),
            ],
        )
        .unwrap();

    // dev4 -> switch0 -> switch3 shared once, then three destinations
    assert_eq!(flow.tree.node_count(), 6);
    assert_eq!(flow.tree.depth(), 4);

    let leaves = flow.tree.leaves().unwrap();
    let leaf_names: Vec<String> = leaves
        .iter()
        .filter_map(|&idx| flow.tree.get_node(idx))
        .map(|node| node.payload().name.clone())
        .collect();
    assert_eq!(leaf_names, vec!["dev15", "dev16", "dev17"]);
    flow.tree.validate().unwrap();
}

#[test]
fn given_diverging_routes_when_building_flow_then_branches_open_at_first_divergence() {
    init_test_setup();
    let builder = RouteBuilder::new();
    let flow = builder
        .build_flow(
            "flow0",
            &[
                hops(&["dev4", "switch0", "switch4", "dev15"]),
                hops(&["dev4", "switch0", "switch1", "dev9"]),
            ],
        )
        .unwrap();

    let root = flow.tree.root().unwrap();
    let switch0 = flow.tree.get_node(root).unwrap().children()[0];
    assert_eq!(flow.tree.get_node(switch0).unwrap().children().len(), 2);

    let routes: Vec<Vec<String>> = flow
        .tree
        .routes()
        .unwrap()
        .iter()
        .map(|route| {
            route
                .iter()
                .filter_map(|&idx| flow.tree.get_node(idx))
                .map(|node| node.payload().name.clone())
                .collect()
        })
        .collect();
    assert_eq!(
        routes,
        vec![
            vec!["dev4", "switch0", "switch4", "dev15"],
            vec!["dev4", "switch0", "switch1", "dev9"],
        ]
    );
}

#[test]
fn given_mismatched_source_when_building_flow_then_source_mismatch_error() {
    init_test_setup();
    let builder = RouteBuilder::new();
    let result = builder.build_flow(
        "flow0",
        &[
            hops(&["dev4", "switch0", "dev15"]),
            hops(&["dev21", "switch0", "dev16"]),
        ],
    );

    match result {
        Err(DomainError::SourceMismatch { expected, found }) => {
            assert_eq!(expected, "dev4");
            assert_eq!(found, "dev21");
        }
        other => panic!("Expected SourceMismatch, got {:?}", other.map(|f| f.name)),
    }
}

#[test]
fn given_route_with_repeated_hop_when_building_flow_then_cycle_detected_error() {
    init_test_setup();
    let builder = RouteBuilder::new();
    let result = builder.build_flow(
        "flow0",
        &[hops(&["dev4", "switch0", "switch1", "switch0", "dev9"])],
    );

    assert!(matches!(
        result,
        Err(DomainError::CycleDetected(hop)) if hop == "switch0"
    ));
}

#[test]
fn given_no_routes_when_building_flow_then_empty_flow_error() {
    init_test_setup();
    let builder = RouteBuilder::new();
    assert!(matches!(
        builder.build_flow("flow0", &[]),
        Err(DomainError::EmptyFlow(_))
    ));
}

#[test]
fn given_route_without_hops_when_building_flow_then_empty_route_error() {
    init_test_setup();
    let builder = RouteBuilder::new();
    assert!(matches!(
        builder.build_flow("flow0", &[vec![]]),
        Err(DomainError::EmptyRoute(_))
    ));
}

#[rstest]
#[case(&["dev4"], 1, 1)]
#[case(&["dev4", "dev9"], 2, 2)]
#[case(&["dev4", "switch0", "switch1", "switch2", "dev9"], 5, 5)]
fn given_chain_route_when_building_flow_then_counts_match(
    #[case] route: &[&str],
    #[case] expected_nodes: usize,
    #[case] expected_depth: usize,
) {
    init_test_setup();
    let builder = RouteBuilder::new();
    let flow = builder.build_flow("flow0", &[hops(route)]).unwrap();
    assert_eq!(flow.tree.node_count(), expected_nodes);
    assert_eq!(flow.tree.depth(), expected_depth);
}

// ============================================================
// Flows File Parsing Tests
// ============================================================

#[test]
fn given_flows_content_when_parsing_then_sections_become_named_flows() {
    init_test_setup();
    let content = "\
# flow: control0
dev4 switch0 switch3 dev15
dev4 switch0 switch3 dev16

# flow:
dev21 switch4 dev2
";
    let builder = RouteBuilder::new();
    let flows = builder.parse(content).unwrap();

    assert_eq!(flows.len(), 2);
    assert_eq!(flows[0].name, "control0");
    assert_eq!(flows[0].tree.leaves().unwrap().len(), 2);
    assert_eq!(flows[1].name, "flow1");
    assert_eq!(flows[1].tree.depth(), 3);
}

#[test]
fn given_routes_before_any_directive_when_parsing_then_implicit_flow_is_created() {
    init_test_setup();
    let builder = RouteBuilder::new();
    let flows = builder.parse("dev4 switch0 dev9\n").unwrap();

    assert_eq!(flows.len(), 1);
    assert_eq!(flows[0].name, "flow0");
}

#[test]
fn given_comments_and_blank_lines_when_parsing_then_they_are_ignored() {
    init_test_setup();
    let content = "\
# Multicast demo topology

# flow: control0
# source first, destination last
dev4 switch0 dev15
";
    let builder = RouteBuilder::new();
    let flows = builder.parse(content).unwrap();

    assert_eq!(flows.len(), 1);
    assert_eq!(flows[0].tree.node_count(), 3);
}

// ============================================================
// Flows File Tests
// ============================================================

#[test]
fn given_fixture_file_when_building_then_all_flows_are_assembled() {
    init_test_setup();
    let builder = RouteBuilder::new();
    let flows = builder
        .build_from_file(Path::new("tests/resources/flows/demo.flows"))
        .unwrap();

    assert_eq!(flows.len(), 2);

    let control = &flows[0];
    assert_eq!(control.name, "control0");
    let leaf_names: Vec<String> = control
        .tree
        .leaves()
        .unwrap()
        .into_iter()
        .filter_map(|idx| control.tree.get_node(idx))
        .map(|node| node.payload().name.clone())
        .collect();
    assert_eq!(leaf_names, vec!["dev15", "dev16", "dev17", "dev9"]);
    control.tree.validate().unwrap();

    assert_eq!(flows[1].name, "flow1");
    assert_eq!(flows[1].tree.depth(), 4);
}

#[test]
fn given_missing_file_when_building_then_file_not_found_error() {
    init_test_setup();
    let builder = RouteBuilder::new();
    assert!(matches!(
        builder.build_from_file(Path::new("tests/resources/flows/not-existing.flows")),
        Err(DomainError::FileNotFound(_))
    ));
}
