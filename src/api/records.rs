//! Project records as returned by the projects API, and their resolution into
//! typed [`ProjectRecord`]s.
//!
//! Legacy records spell the same attribute in several ways. Every ambiguous
//! attribute goes through one resolver with a fixed priority list.

use serde::Deserialize;
use serde_json::Value;

use crate::error::RecordIssue;

const UNKNOWN_DEPARTMENT: &str = "Unknown";
const UNTITLED_PROJECT: &str = "Untitled Project";

/// Person as it appears on the wire (owner, creator, collaborator or mentor).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawPerson {
	#[serde(rename = "_id")]
	pub object_id: Option<Value>,
	pub id: Option<Value>,
	pub user_id: Option<Value>,
	pub name: Option<String>,
	pub dept: Option<String>,
	pub department: Option<String>,
	pub email: Option<String>,
}

/// Project as it appears on the wire. Everything past the scalar fields is
/// kept as raw JSON and resolved leniently, so one odd field never drops the
/// whole project.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawProject {
	#[serde(rename = "_id")]
	pub object_id: Option<Value>,
	pub id: Option<Value>,
	pub title: Option<String>,
	pub department: Option<String>,
	pub dept: Option<String>,
	#[serde(rename = "techStack")]
	pub tech_stack_camel: Option<Value>,
	pub tech_stack: Option<Value>,
	pub progress: Option<Value>,
	pub student: Option<Value>,
	pub creator: Option<Value>,
	pub created_by: Option<Value>,
	pub collaborators: Option<Value>,
	pub mentor: Option<Value>,
}

/// A resolved person reference.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonRef {
	pub id: Option<String>,
	pub name: Option<String>,
	pub department: String,
	pub email: String,
}

impl PersonRef {
	/// Identity used for node ids: the id, or the name when no id exists.
	pub fn key(&self) -> Option<&str> {
		self.id.as_deref().or(self.name.as_deref())
	}

	/// Name shown in the graph.
	pub fn display_name(&self) -> &str {
		self.name
			.as_deref()
			.or(self.id.as_deref())
			.unwrap_or("Unknown")
	}
}

/// A project with every ambiguous attribute resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectRecord {
	pub id: Option<String>,
	pub title: String,
	pub department: String,
	pub tech_stack: Vec<String>,
	pub progress: f64,
	pub owner: Option<PersonRef>,
	pub collaborators: Vec<PersonRef>,
	pub mentor: Option<PersonRef>,
}

fn non_blank(s: Option<&str>) -> Option<&str> {
	s.map(str::trim).filter(|s| !s.is_empty())
}

/// Ids arrive as strings, numbers or `{"$oid": ...}` objects.
fn id_text(value: Option<&Value>) -> Option<String> {
	match value? {
		Value::String(s) => non_blank(Some(s.as_str())).map(str::to_string),
		Value::Number(n) => Some(n.to_string()),
		Value::Object(map) => id_text(map.get("$oid")),
		_ => None,
	}
}

/// Numbers, plain and numeric-string values; anything else counts as 0.
fn progress_value(value: Option<&Value>) -> f64 {
	let progress = match value {
		Some(Value::Number(n)) => n.as_f64(),
		Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
		_ => None,
	};
	progress
		.filter(|p| p.is_finite())
		.unwrap_or(0.0)
		.clamp(0.0, 100.0)
}

impl RawPerson {
	/// A populated person object, or an unpopulated reference holding just the id.
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Object(_) => serde_json::from_value(value.clone()).ok(),
			Value::String(_) | Value::Number(_) => id_text(Some(value)).map(|id| RawPerson {
				id: Some(Value::String(id)),
				..RawPerson::default()
			}),
			_ => None,
		}
	}

	/// `_id` → `id` → `user_id`.
	fn resolve_id(&self) -> Option<String> {
		id_text(self.object_id.as_ref())
			.or_else(|| id_text(self.id.as_ref()))
			.or_else(|| id_text(self.user_id.as_ref()))
	}

	/// `dept` → `department`.
	fn resolve_department(&self) -> Option<String> {
		non_blank(self.dept.as_deref())
			.or_else(|| non_blank(self.department.as_deref()))
			.map(str::to_string)
	}

	fn resolve(&self) -> PersonRef {
		PersonRef {
			id: self.resolve_id(),
			name: non_blank(self.name.as_deref()).map(str::to_string),
			department: self
				.resolve_department()
				.unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string()),
			email: non_blank(self.email.as_deref()).unwrap_or_default().to_string(),
		}
	}
}

impl RawProject {
	/// `_id` → `id`.
	pub fn resolve_id(&self) -> Option<String> {
		id_text(self.object_id.as_ref()).or_else(|| id_text(self.id.as_ref()))
	}

	fn student(&self) -> Option<RawPerson> {
		self.student.as_ref().and_then(RawPerson::from_value)
	}

	fn creator(&self) -> Option<RawPerson> {
		self.creator.as_ref().and_then(RawPerson::from_value)
	}

	/// `department` → `dept` → `student.dept` → `creator.dept` → `"Unknown"`.
	pub fn resolve_department(&self) -> String {
		non_blank(self.department.as_deref())
			.or_else(|| non_blank(self.dept.as_deref()))
			.map(str::to_string)
			.or_else(|| self.student().and_then(|p| p.resolve_department()))
			.or_else(|| self.creator().and_then(|p| p.resolve_department()))
			.unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string())
	}

	/// `techStack` → `tech_stack` → empty. Non-string entries are ignored.
	pub fn resolve_tech_stack(&self) -> Vec<String> {
		let stack = [&self.tech_stack_camel, &self.tech_stack]
			.into_iter()
			.find_map(|field| field.as_ref().and_then(Value::as_array));
		stack
			.map(|stack| {
				stack
					.iter()
					.filter_map(|tech| non_blank(tech.as_str()))
					.map(str::to_string)
					.collect()
			})
			.unwrap_or_default()
	}

	/// `student` → `creator` → bare `created_by` id. An owner object without
	/// an id takes the `created_by` id. Unidentifiable owners are dropped.
	pub fn resolve_owner(&self) -> Option<PersonRef> {
		let created_by = id_text(self.created_by.as_ref());
		let mut owner = match self.student().or_else(|| self.creator()) {
			Some(person) => person.resolve(),
			None => PersonRef {
				id: created_by.clone(),
				name: None,
				department: UNKNOWN_DEPARTMENT.to_string(),
				email: String::new(),
			},
		};
		if owner.id.is_none() {
			owner.id = created_by;
		}
		owner.key().is_some().then_some(owner)
	}

	/// Mentors are person objects or bare ids, and need at least a name or an id.
	pub fn resolve_mentor(&self) -> Option<PersonRef> {
		let mentor = RawPerson::from_value(self.mentor.as_ref()?)?.resolve();
		mentor.key().is_some().then_some(mentor)
	}

	/// Collaborators are bare ids or person objects; entries without an id are `None`.
	fn resolve_collaborators(&self) -> Vec<Option<PersonRef>> {
		let Some(entries) = self.collaborators.as_ref().and_then(Value::as_array) else {
			return Vec::new();
		};
		entries
			.iter()
			.map(|entry| {
				let person = RawPerson::from_value(entry)?.resolve();
				person.id.is_some().then_some(person)
			})
			.collect()
	}

	/// Resolves every attribute, reporting collaborators that had to be dropped.
	pub fn resolve(&self, issues: &mut Vec<RecordIssue>) -> ProjectRecord {
		let id = self.resolve_id();
		let mut collaborators = Vec::new();
		for resolved in self.resolve_collaborators() {
			match resolved {
				Some(person) => collaborators.push(person),
				None => issues.push(RecordIssue::MissingCollaboratorId {
					project: id.clone().unwrap_or_default(),
				}),
			}
		}

		ProjectRecord {
			title: non_blank(self.title.as_deref())
				.unwrap_or(UNTITLED_PROJECT)
				.to_string(),
			department: self.resolve_department(),
			tech_stack: self.resolve_tech_stack(),
			progress: progress_value(self.progress.as_ref()),
			owner: self.resolve_owner(),
			mentor: self.resolve_mentor(),
			collaborators,
			id,
		}
	}
}

/// Decodes every element of a JSON array on its own so one bad record never
/// spoils the batch.
pub fn decode_projects(values: Vec<Value>) -> (Vec<ProjectRecord>, Vec<RecordIssue>) {
	let mut issues = Vec::new();
	let mut records = Vec::with_capacity(values.len());
	for (index, value) in values.into_iter().enumerate() {
		match serde_json::from_value::<RawProject>(value) {
			Ok(raw) => records.push(raw.resolve(&mut issues)),
			Err(e) => issues.push(RecordIssue::Undecodable {
				index,
				reason: e.to_string(),
			}),
		}
	}
	(records, issues)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	fn raw(value: Value) -> RawProject {
		serde_json::from_value(value).expect("valid raw project")
	}

	#[test]
	fn department_prefers_explicit_field() {
		let project = raw(json!({
			"department": "CSE",
			"dept": "ECE",
			"student": { "dept": "MECH" },
		}));
		assert_eq!(project.resolve_department(), "CSE");
	}

	#[test]
	fn department_falls_back_through_owner_fields() {
		assert_eq!(
			raw(json!({ "dept": "ECE", "student": { "dept": "MECH" } })).resolve_department(),
			"ECE"
		);
		assert_eq!(
			raw(json!({ "student": { "dept": "MECH" }, "creator": { "dept": "CIVIL" } }))
				.resolve_department(),
			"MECH"
		);
		assert_eq!(
			raw(json!({ "creator": { "dept": "CIVIL" } })).resolve_department(),
			"CIVIL"
		);
		assert_eq!(
			raw(json!({ "department": "  ", "title": "x" })).resolve_department(),
			"Unknown"
		);
	}

	#[test]
	fn tech_stack_accepts_both_spellings() {
		assert_eq!(
			raw(json!({ "techStack": ["React"], "tech_stack": ["Vue"] })).resolve_tech_stack(),
			vec!["React".to_string()]
		);
		assert_eq!(
			raw(json!({ "tech_stack": ["Rust", ""] })).resolve_tech_stack(),
			vec!["Rust".to_string()]
		);
		assert!(raw(json!({})).resolve_tech_stack().is_empty());
	}

	#[test]
	fn owner_comes_from_student_then_creator_then_created_by() {
		let owner = raw(json!({
			"student": { "_id": "s1", "name": "Asha" },
			"creator": { "_id": "c1", "name": "Ravi" },
		}))
		.resolve_owner()
		.expect("owner");
		assert_eq!(owner.id.as_deref(), Some("s1"));

		let owner = raw(json!({ "creator": { "id": "c1", "name": "Ravi", "dept": "EEE" } }))
			.resolve_owner()
			.expect("owner");
		assert_eq!(owner.id.as_deref(), Some("c1"));
		assert_eq!(owner.department, "EEE");

		let owner = raw(json!({ "created_by": "u9" })).resolve_owner().expect("owner");
		assert_eq!(owner.key(), Some("u9"));
		assert_eq!(owner.department, "Unknown");
	}

	#[test]
	fn owner_without_id_or_name_is_dropped() {
		assert_eq!(raw(json!({ "student": { "dept": "CSE" } })).resolve_owner(), None);
	}

	#[test]
	fn owner_without_id_is_keyed_by_name() {
		let owner = raw(json!({ "student": { "name": "Asha" } }))
			.resolve_owner()
			.expect("owner");
		assert_eq!(owner.key(), Some("Asha"));
	}

	#[test]
	fn ids_accept_numbers_and_oid_objects() {
		assert_eq!(raw(json!({ "_id": 42 })).resolve_id().as_deref(), Some("42"));
		assert_eq!(
			raw(json!({ "_id": { "$oid": "65f0" } })).resolve_id().as_deref(),
			Some("65f0")
		);
		assert_eq!(raw(json!({ "id": "p7" })).resolve_id().as_deref(), Some("p7"));
		assert_eq!(raw(json!({ "_id": "" })).resolve_id(), None);
	}

	#[test]
	fn collaborators_mix_ids_and_objects() {
		let mut issues = Vec::new();
		let record = raw(json!({
			"_id": "p1",
			"collaborators": [
				"u2",
				{ "user_id": "u3", "name": "Meera", "dept": "ECE" },
				{ "name": "No Id" },
			],
		}))
		.resolve(&mut issues);

		let ids: Vec<_> = record
			.collaborators
			.iter()
			.map(|c| c.id.as_deref().unwrap_or_default())
			.collect();
		assert_eq!(ids, vec!["u2", "u3"]);
		assert_eq!(record.collaborators[1].department, "ECE");
		assert_eq!(
			issues,
			vec![RecordIssue::MissingCollaboratorId {
				project: "p1".to_string()
			}]
		);
	}

	#[test]
	fn defaults_fill_missing_fields() {
		let mut issues = Vec::new();
		let record = raw(json!({ "_id": "p1", "progress": 140.0 })).resolve(&mut issues);
		assert_eq!(record.title, "Untitled Project");
		assert_eq!(record.department, "Unknown");
		assert_eq!(record.progress, 100.0);
		assert!(record.collaborators.is_empty());
		assert!(issues.is_empty());
	}

	#[test]
	fn undecodable_elements_are_skipped() {
		let (records, issues) = decode_projects(vec![
			json!({ "_id": "p1", "title": "Good" }),
			json!({ "_id": "p2", "title": 7 }),
			json!("not an object"),
			json!({ "_id": "p3" }),
		]);
		let ids: Vec<_> = records.iter().filter_map(|r| r.id.as_deref()).collect();
		assert_eq!(ids, vec!["p1", "p3"]);
		assert_eq!(issues.len(), 2);
		assert!(matches!(issues[0], RecordIssue::Undecodable { index: 1, .. }));
	}

	#[test]
	fn odd_collaborator_entries_only_drop_themselves() {
		let (records, issues) = decode_projects(vec![json!({
			"_id": "p1",
			"creator": { "_id": "u1", "name": "Asha", "dept": "CSE" },
			"collaborators": [null, 42, { "id": "u2", "name": "Ravi" }, { "name": 5 }],
		})]);
		assert_eq!(records.len(), 1);
		let ids: Vec<_> = records[0]
			.collaborators
			.iter()
			.filter_map(|c| c.id.as_deref())
			.collect();
		assert_eq!(ids, vec!["42", "u2"]);
		assert_eq!(
			issues,
			vec![
				RecordIssue::MissingCollaboratorId {
					project: "p1".to_string()
				};
				2
			]
		);
	}

	#[test]
	fn progress_accepts_numeric_strings() {
		let (records, _) = decode_projects(vec![
			json!({ "_id": "p1", "progress": "50" }),
			json!({ "_id": "p2", "progress": "half" }),
			json!({ "_id": "p3", "progress": null }),
		]);
		let progress: Vec<_> = records.iter().map(|r| r.progress).collect();
		assert_eq!(progress, vec![50.0, 0.0, 0.0]);
	}

	#[test]
	fn mentor_may_be_a_bare_id() {
		let mentor = raw(json!({ "_id": "p1", "mentor": "65f0aa" }))
			.resolve_mentor()
			.expect("mentor");
		assert_eq!(mentor.key(), Some("65f0aa"));
		assert_eq!(mentor.department, "Unknown");
		assert_eq!(raw(json!({ "mentor": [] })).resolve_mentor(), None);
	}

	#[test]
	fn nameless_creator_takes_created_by_id() {
		let owner = raw(json!({
			"creator": { "name": "Unknown" },
			"created_by": "u7",
		}))
		.resolve_owner()
		.expect("owner");
		assert_eq!(owner.key(), Some("u7"));
		assert_eq!(owner.name.as_deref(), Some("Unknown"));
	}
}
