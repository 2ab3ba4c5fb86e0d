//! Error types for fetching and decoding project data.

use thiserror::Error;

/// Failure of the data acquisition stage. Stops the pipeline for the current cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
	/// The caller lacks the staff/admin role, or the API answered 403.
	#[error("You are not authorized to view the collaboration network")]
	Unauthorized,

	/// The request succeeded but returned no project records.
	#[error("No project data is available yet")]
	Empty,

	/// Network or server failure.
	#[error("Failed to load project data: {0}")]
	Transient(String),
}

impl FetchError {
	/// Whether the UI should offer a retry action.
	pub fn is_retryable(&self) -> bool {
		matches!(self, FetchError::Transient(_))
	}
}

impl From<reqwest::Error> for FetchError {
	fn from(e: reqwest::Error) -> Self {
		if e.status() == Some(reqwest::StatusCode::FORBIDDEN) {
			return FetchError::Unauthorized;
		}
		FetchError::Transient(e.to_string())
	}
}

/// A single record that could not become part of the graph. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordIssue {
	#[error("project record has no identifier")]
	MissingProjectId,

	#[error("collaborator on project {project} has no identifier")]
	MissingCollaboratorId { project: String },

	#[error("undecodable project record at index {index}: {reason}")]
	Undecodable { index: usize, reason: String },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_transient_errors_are_retryable() {
		assert!(FetchError::Transient("timeout".into()).is_retryable());
		assert!(!FetchError::Unauthorized.is_retryable());
		assert!(!FetchError::Empty.is_retryable());
	}

	#[test]
	fn messages_are_distinct() {
		let unauthorized = FetchError::Unauthorized.to_string();
		let empty = FetchError::Empty.to_string();
		assert_ne!(unauthorized, empty);
		assert!(
			FetchError::Transient("502".into())
				.to_string()
				.contains("502")
		);
	}
}
