use std::borrow::Cow;
use std::fmt;

const LABEL_LIMIT: usize = 20;
const LABEL_KEEP: usize = 17;

/// What a node stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Project,
	Student,
	Alumni,
}

impl NodeKind {
	/// Prefix of node ids of this kind.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::Project => "project",
			NodeKind::Student => "student",
			NodeKind::Alumni => "alumni",
		}
	}

	pub fn title(self) -> &'static str {
		match self {
			NodeKind::Project => "Project",
			NodeKind::Student => "Student",
			NodeKind::Alumni => "Alumni",
		}
	}

	/// Letter drawn inside the node.
	pub fn letter(self) -> &'static str {
		match self {
			NodeKind::Project => "P",
			NodeKind::Student => "S",
			NodeKind::Alumni => "A",
		}
	}

	/// Node id for an entity of this kind.
	pub fn node_id(self, entity: &str) -> String {
		format!("{}-{}", self.as_str(), entity)
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Relationship carried by an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
	Owner,
	Collaborator,
	Mentor,
	Interdepartmental,
}

impl EdgeKind {
	pub const ALL: [EdgeKind; 4] = [
		EdgeKind::Owner,
		EdgeKind::Collaborator,
		EdgeKind::Mentor,
		EdgeKind::Interdepartmental,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			EdgeKind::Owner => "owner",
			EdgeKind::Collaborator => "collaborator",
			EdgeKind::Mentor => "mentor",
			EdgeKind::Interdepartmental => "interdepartmental",
		}
	}

	pub fn title(self) -> &'static str {
		match self {
			EdgeKind::Owner => "Owner",
			EdgeKind::Collaborator => "Collaborator",
			EdgeKind::Mentor => "Mentor",
			EdgeKind::Interdepartmental => "Interdepartmental",
		}
	}
}

impl fmt::Display for EdgeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Kind-specific attributes of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeDetails {
	Project {
		record_id: String,
		tech_stack: Vec<String>,
		progress: f64,
	},
	Person {
		/// Id of the profile page, when the person had one.
		profile_id: Option<String>,
		email: String,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// `"<kind>-<entity id>"`, unique within a graph.
	pub id: String,
	pub name: String,
	pub kind: NodeKind,
	pub department: String,
	pub details: NodeDetails,
}

impl GraphNode {
	/// Name shortened for drawing below the node.
	pub fn label(&self) -> Cow<'_, str> {
		if self.name.chars().count() > LABEL_LIMIT {
			let kept: String = self.name.chars().take(LABEL_KEEP).collect();
			Cow::Owned(format!("{kept}..."))
		} else {
			Cow::Borrowed(&self.name)
		}
	}

	/// Route of the full record behind this node, if there is one.
	pub fn link(&self) -> Option<String> {
		match &self.details {
			NodeDetails::Project { record_id, .. } => Some(format!("/projects/{record_id}")),
			NodeDetails::Person {
				profile_id: Some(id),
				..
			} => Some(format!("/profile/{id}")),
			NodeDetails::Person { .. } => None,
		}
	}
}

/// Directed, typed edge between two node ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
	pub kind: EdgeKind,
}

impl GraphEdge {
	pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			kind,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn person(name: &str) -> GraphNode {
		GraphNode {
			id: NodeKind::Student.node_id("u1"),
			name: name.to_string(),
			kind: NodeKind::Student,
			department: "CSE".to_string(),
			details: NodeDetails::Person {
				profile_id: Some("u1".to_string()),
				email: String::new(),
			},
		}
	}

	#[test]
	fn node_ids_carry_the_kind() {
		assert_eq!(NodeKind::Project.node_id("p1"), "project-p1");
		assert_eq!(NodeKind::Alumni.node_id("m1"), "alumni-m1");
	}

	#[test]
	fn long_labels_are_truncated() {
		assert_eq!(person("Short name").label(), "Short name");
		assert_eq!(
			person("Exactly twenty chars").label(),
			"Exactly twenty chars"
		);
		assert_eq!(
			person("A considerably longer display name").label(),
			"A considerably lo..."
		);
	}

	#[test]
	fn links_point_at_records() {
		assert_eq!(person("A").link().as_deref(), Some("/profile/u1"));
		let project = GraphNode {
			id: "project-p1".to_string(),
			name: "X".to_string(),
			kind: NodeKind::Project,
			department: "CSE".to_string(),
			details: NodeDetails::Project {
				record_id: "p1".to_string(),
				tech_stack: Vec::new(),
				progress: 0.0,
			},
		};
		assert_eq!(project.link().as_deref(), Some("/projects/p1"));
	}
}
