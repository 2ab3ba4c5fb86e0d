//! Data acquisition from the projects API.

mod client;
pub mod records;

pub use client::{
	Attempt, BrowserStorage, ProjectsClient, TokenStore, check_role, classify_status,
	collect_projects, next_attempt,
};
pub use records::{PersonRef, ProjectRecord, decode_projects};
