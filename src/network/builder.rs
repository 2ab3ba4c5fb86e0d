use std::collections::HashMap;

use log::{debug, warn};

use super::filter::FilterState;
use super::types::{EdgeKind, GraphData, GraphEdge, GraphNode, NodeDetails, NodeKind};
use crate::api::{PersonRef, ProjectRecord};
use crate::error::RecordIssue;

/// Builds the collaboration graph of the projects that pass `filter`.
///
/// Projects are visited in input order. Every entity becomes at most one node;
/// owner, collaborator and mentor edges point from the person to the project.
/// Once all projects are in, owners and collaborators of the same project are
/// paired up and every pair from different departments gets an
/// interdepartmental edge. Pairs sharing several projects get one edge per
/// shared project.
pub fn build_graph(projects: &[ProjectRecord], filter: &FilterState) -> GraphData {
	let mut builder = GraphBuilder::default();
	for project in projects.iter().filter(|p| filter.matches(p)) {
		builder.add_project(project);
	}
	for issue in &builder.issues {
		warn!("Left out of graph: {issue}");
	}
	let graph = builder.finish();
	debug!(
		"Built graph with {} nodes and {} edges",
		graph.nodes.len(),
		graph.edges.len()
	);
	graph
}

/// Scratch state of one build. Nothing outlives the call.
#[derive(Default)]
struct GraphBuilder {
	nodes: Vec<GraphNode>,
	node_index: HashMap<String, usize>,
	edges: Vec<GraphEdge>,
	/// Owner and collaborator node ids per project node, in first-seen order.
	groups: Vec<Vec<String>>,
	group_index: HashMap<String, usize>,
	issues: Vec<RecordIssue>,
}

impl GraphBuilder {
	fn add_project(&mut self, project: &ProjectRecord) {
		let Some(record_id) = project.id.as_deref() else {
			self.issues.push(RecordIssue::MissingProjectId);
			return;
		};

		let project_id = NodeKind::Project.node_id(record_id);
		self.insert_node(GraphNode {
			id: project_id.clone(),
			name: project.title.clone(),
			kind: NodeKind::Project,
			department: project.department.clone(),
			details: NodeDetails::Project {
				record_id: record_id.to_string(),
				tech_stack: project.tech_stack.clone(),
				progress: project.progress,
			},
		});

		if let Some(owner) = &project.owner {
			if let Some(owner_id) = self.insert_person(owner, NodeKind::Student) {
				self.link(owner_id, &project_id, EdgeKind::Owner, true);
			}
		}

		for collaborator in &project.collaborators {
			if collaborator.id.is_none() {
				self.issues.push(RecordIssue::MissingCollaboratorId {
					project: record_id.to_string(),
				});
				continue;
			}
			if let Some(collaborator_id) = self.insert_person(collaborator, NodeKind::Student) {
				self.link(collaborator_id, &project_id, EdgeKind::Collaborator, true);
			}
		}

		if let Some(mentor) = &project.mentor {
			if let Some(mentor_id) = self.insert_person(mentor, NodeKind::Alumni) {
				self.link(mentor_id, &project_id, EdgeKind::Mentor, false);
			}
		}
	}

	fn insert_node(&mut self, node: GraphNode) {
		if self.node_index.contains_key(&node.id) {
			return;
		}
		self.node_index.insert(node.id.clone(), self.nodes.len());
		self.nodes.push(node);
	}

	/// Returns the node id, or `None` when the person cannot be identified.
	fn insert_person(&mut self, person: &PersonRef, kind: NodeKind) -> Option<String> {
		let key = person.key()?;
		let id = kind.node_id(key);
		self.insert_node(GraphNode {
			id: id.clone(),
			name: person.display_name().to_string(),
			kind,
			department: person.department.clone(),
			details: NodeDetails::Person {
				profile_id: person.id.clone(),
				email: person.email.clone(),
			},
		});
		Some(id)
	}

	fn link(&mut self, person_id: String, project_id: &str, kind: EdgeKind, member: bool) {
		if member {
			let group = match self.group_index.get(project_id) {
				Some(&i) => i,
				None => {
					self.group_index
						.insert(project_id.to_string(), self.groups.len());
					self.groups.push(Vec::new());
					self.groups.len() - 1
				}
			};
			let members = &mut self.groups[group];
			if !members.contains(&person_id) {
				members.push(person_id.clone());
			}
		}
		self.edges.push(GraphEdge::new(person_id, project_id, kind));
	}

	fn department(&self, node_id: &str) -> Option<&str> {
		self.node_index
			.get(node_id)
			.map(|&i| self.nodes[i].department.as_str())
	}

	fn finish(mut self) -> GraphData {
		let mut interdepartmental = Vec::new();
		for members in &self.groups {
			for (i, a) in members.iter().enumerate() {
				for b in &members[i + 1..] {
					if let (Some(dept_a), Some(dept_b)) = (self.department(a), self.department(b)) {
						if dept_a != dept_b {
							interdepartmental.push(GraphEdge::new(
								a.as_str(),
								b.as_str(),
								EdgeKind::Interdepartmental,
							));
						}
					}
				}
			}
		}
		self.edges.extend(interdepartmental);

		GraphData {
			nodes: self.nodes,
			edges: self.edges,
		}
	}
}
