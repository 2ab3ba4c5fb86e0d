use std::collections::HashSet;

use collab_network::api::{PersonRef, ProjectRecord};
use collab_network::network::{EdgeKind, FilterState, Selection, build_graph};
use proptest::prelude::*;

const DEPARTMENTS: &[&str] = &["CSE", "EEE", "MECH"];

fn department() -> impl Strategy<Value = String> {
	prop::sample::select(DEPARTMENTS).prop_map(str::to_string)
}

fn person() -> impl Strategy<Value = PersonRef> {
	(
		prop::option::of(0..6u8),
		prop::option::of("[A-Z][a-z]{2,8}"),
		department(),
	)
		.prop_map(|(id, name, department)| PersonRef {
			id: id.map(|i| format!("u{i}")),
			name,
			department,
			email: String::new(),
		})
}

fn projects() -> impl Strategy<Value = Vec<ProjectRecord>> {
	prop::collection::vec(
		(
			department(),
			prop::option::of(person()),
			prop::collection::vec(person(), 0..4),
			prop::option::of(person()),
		),
		0..8,
	)
	.prop_map(|rows| {
		rows.into_iter()
			.enumerate()
			.map(|(i, (department, owner, collaborators, mentor))| ProjectRecord {
				id: Some(format!("p{i}")),
				title: format!("Project {i}"),
				department,
				tech_stack: vec!["Rust".to_string()],
				progress: 0.0,
				owner,
				collaborators,
				mentor,
			})
			.collect()
	})
}

proptest! {
	#[test]
	fn node_ids_are_unique(projects in projects()) {
		let graph = build_graph(&projects, &FilterState::default());
		let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		prop_assert_eq!(ids.len(), graph.nodes.len());
	}

	#[test]
	fn edges_only_join_existing_nodes(projects in projects()) {
		let graph = build_graph(&projects, &FilterState::default());
		for edge in &graph.edges {
			prop_assert!(graph.node(&edge.source).is_some());
			prop_assert!(graph.node(&edge.target).is_some());
		}
	}

	#[test]
	fn owner_edge_exactly_when_owner_is_identifiable(projects in projects()) {
		let graph = build_graph(&projects, &FilterState::default());
		for project in &projects {
			let target = format!("project-{}", project.id.as_deref().unwrap_or_default());
			let has_owner_edge = graph
				.edges
				.iter()
				.any(|e| e.kind == EdgeKind::Owner && e.target == target);
			let identifiable = project.owner.as_ref().and_then(|o| o.key()).is_some();
			prop_assert_eq!(has_owner_edge, identifiable);
		}
	}

	#[test]
	fn interdepartmental_edges_cross_departments(projects in projects()) {
		let graph = build_graph(&projects, &FilterState::default());
		for edge in graph.edges.iter().filter(|e| e.kind == EdgeKind::Interdepartmental) {
			let (a, b) = (graph.node(&edge.source), graph.node(&edge.target));
			prop_assert!(a.is_some() && b.is_some());
			if let (Some(a), Some(b)) = (a, b) {
				prop_assert_ne!(&a.department, &b.department);
			}
		}
	}

	#[test]
	fn unknown_department_filter_yields_empty_graph(projects in projects()) {
		let filter = FilterState::new(Selection::Only("LAW".to_string()), Selection::All);
		let graph = build_graph(&projects, &filter);
		prop_assert!(graph.is_empty());
		prop_assert!(graph.edges.is_empty());
	}

	#[test]
	fn building_is_deterministic(projects in projects()) {
		let filter = FilterState::default();
		prop_assert_eq!(build_graph(&projects, &filter), build_graph(&projects, &filter));
	}
}
