use std::collections::BTreeSet;

use crate::api::ProjectRecord;

const ALL: &str = "all";

/// A drop-down choice: everything, or one value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Selection {
	#[default]
	All,
	Only(String),
}

impl Selection {
	/// Parses a `<select>` value, where `"all"` and blank mean no restriction.
	pub fn from_value(value: &str) -> Self {
		let value = value.trim();
		if value.is_empty() || value == ALL {
			Selection::All
		} else {
			Selection::Only(value.to_string())
		}
	}

	pub fn as_value(&self) -> &str {
		match self {
			Selection::All => ALL,
			Selection::Only(value) => value,
		}
	}

	pub fn is_all(&self) -> bool {
		matches!(self, Selection::All)
	}
}

/// Department and technology filters applied before the graph is built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
	pub department: Selection,
	pub technology: Selection,
}

impl FilterState {
	pub fn new(department: Selection, technology: Selection) -> Self {
		Self {
			department,
			technology,
		}
	}

	pub fn matches(&self, project: &ProjectRecord) -> bool {
		let department_ok = match &self.department {
			Selection::All => true,
			Selection::Only(dept) => project.department == *dept,
		};
		let technology_ok = match &self.technology {
			Selection::All => true,
			Selection::Only(tech) => project.tech_stack.iter().any(|t| t == tech),
		};
		department_ok && technology_ok
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}

	pub fn is_default(&self) -> bool {
		self.department.is_all() && self.technology.is_all()
	}
}

/// Options offered by the filter drop-downs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCatalog {
	pub departments: Vec<String>,
	pub technologies: Vec<String>,
	/// Every department on a project or a person, so department colors do
	/// not depend on the active filters.
	pub palette_departments: Vec<String>,
}

impl FilterCatalog {
	pub fn from_projects(projects: &[ProjectRecord]) -> Self {
		let mut departments = BTreeSet::new();
		let mut technologies = BTreeSet::new();
		let mut palette_departments = BTreeSet::new();
		for project in projects {
			departments.insert(project.department.clone());
			technologies.extend(project.tech_stack.iter().cloned());
			let people = project
				.owner
				.iter()
				.chain(&project.collaborators)
				.chain(&project.mentor);
			palette_departments.extend(people.map(|p| p.department.clone()));
		}
		palette_departments.extend(departments.iter().cloned());
		Self {
			departments: departments.into_iter().collect(),
			technologies: technologies.into_iter().collect(),
			palette_departments: palette_departments.into_iter().collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::api::PersonRef;

	fn project(department: &str, tech: &[&str]) -> ProjectRecord {
		ProjectRecord {
			id: Some("p1".to_string()),
			title: "X".to_string(),
			department: department.to_string(),
			tech_stack: tech.iter().map(|t| t.to_string()).collect(),
			progress: 0.0,
			owner: None,
			collaborators: Vec::new(),
			mentor: None,
		}
	}

	#[test]
	fn selection_parses_all() {
		assert_eq!(Selection::from_value("all"), Selection::All);
		assert_eq!(Selection::from_value(""), Selection::All);
		assert_eq!(
			Selection::from_value("CSE"),
			Selection::Only("CSE".to_string())
		);
		assert_eq!(Selection::Only("CSE".to_string()).as_value(), "CSE");
	}

	#[test]
	fn filters_combine_with_and() {
		let p = project("CSE", &["React", "Flask"]);
		let only = |d: &str, t: &str| FilterState::new(Selection::from_value(d), Selection::from_value(t));
		assert!(only("all", "all").matches(&p));
		assert!(only("CSE", "React").matches(&p));
		assert!(!only("ECE", "React").matches(&p));
		assert!(!only("CSE", "Vue").matches(&p));
	}

	#[test]
	fn reset_restores_defaults() {
		let mut filters = FilterState::new(Selection::from_value("CSE"), Selection::All);
		assert!(!filters.is_default());
		filters.reset();
		assert!(filters.is_default());
	}

	#[test]
	fn catalog_is_sorted_and_distinct() {
		let catalog = FilterCatalog::from_projects(&[
			project("ECE", &["React"]),
			project("CSE", &["Rust", "React"]),
		]);
		assert_eq!(catalog.departments, vec!["CSE", "ECE"]);
		assert_eq!(catalog.technologies, vec!["React", "Rust"]);
	}

	#[test]
	fn palette_departments_include_people() {
		let mut p = project("CSE", &[]);
		p.mentor = Some(PersonRef {
			id: Some("m1".to_string()),
			name: None,
			department: "MECH".to_string(),
			email: String::new(),
		});
		let catalog = FilterCatalog::from_projects(&[p]);
		assert_eq!(catalog.departments, vec!["CSE"]);
		assert_eq!(catalog.palette_departments, vec!["CSE", "MECH"]);
	}
}
