use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use super::records::{ProjectRecord, decode_projects};
use crate::config::NetworkConfig;
use crate::error::FetchError;

const ALL_PROJECTS_PATH: &str = "/projects/all";
const REFRESH_PATH: &str = "/refresh-token";
const PRIVILEGED_ROLES: &[&str] = &["staff", "admin"];

/// Key/value storage holding the session tokens.
pub trait TokenStore {
	fn get(&self, key: &str) -> Option<String>;
	fn set(&self, key: &str, value: &str);
	fn remove(&self, key: &str);
}

/// `window.localStorage`. Every operation is a no-op when storage is unavailable.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
	fn storage() -> Option<web_sys::Storage> {
		web_sys::window()?.local_storage().ok().flatten()
	}
}

impl TokenStore for BrowserStorage {
	fn get(&self, key: &str) -> Option<String> {
		Self::storage()?.get_item(key).ok().flatten()
	}

	fn set(&self, key: &str, value: &str) {
		let Some(storage) = Self::storage() else {
			warn!("localStorage unavailable, {key} not stored");
			return;
		};
		if let Err(e) = storage.set_item(key, value) {
			warn!("Failed to store {key}: {e:?}");
		}
	}

	fn remove(&self, key: &str) {
		let Some(storage) = Self::storage() else {
			warn!("localStorage unavailable, {key} not removed");
			return;
		};
		if let Err(e) = storage.remove_item(key) {
			warn!("Failed to remove {key}: {e:?}");
		}
	}
}

/// Rejects sessions whose stored role can never see all projects.
/// A missing role is left for the server to decide.
pub fn check_role(role: Option<&str>) -> Result<(), FetchError> {
	match role.map(str::trim).filter(|r| !r.is_empty()) {
		Some(role) if !PRIVILEGED_ROLES.iter().any(|p| p.eq_ignore_ascii_case(role)) => {
			Err(FetchError::Unauthorized)
		}
		_ => Ok(()),
	}
}

/// Maps a non-success HTTP status to the error shown to the user.
pub fn classify_status(status: StatusCode) -> Option<FetchError> {
	if status.is_success() {
		return None;
	}
	Some(match status {
		StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => FetchError::Unauthorized,
		status => FetchError::Transient(format!("server answered {status}")),
	})
}

/// What to do with the answer to one listing request.
#[derive(Debug, PartialEq, Eq)]
pub enum Attempt {
	/// Read the body.
	Proceed,
	/// Refresh the access token and ask again.
	Refresh,
	Fail(FetchError),
}

/// Only the first 401 of a fetch earns a token refresh; after that every
/// non-success status is final.
pub fn next_attempt(status: StatusCode, refreshed: bool) -> Attempt {
	if status == StatusCode::UNAUTHORIZED && !refreshed {
		return Attempt::Refresh;
	}
	match classify_status(status) {
		Some(error) => Attempt::Fail(error),
		None => Attempt::Proceed,
	}
}

/// Turns the decoded response body into records. Malformed elements are logged and dropped.
pub fn collect_projects(values: Vec<Value>) -> Result<Vec<ProjectRecord>, FetchError> {
	let received = values.len();
	let (records, issues) = decode_projects(values);
	for issue in &issues {
		warn!("Skipping record: {issue}");
	}
	if records.is_empty() {
		if received > 0 {
			return Err(FetchError::Transient(format!(
				"none of the {received} project records could be read"
			)));
		}
		return Err(FetchError::Empty);
	}
	Ok(records)
}

#[derive(Deserialize)]
struct RefreshResponse {
	access_token: String,
}

/// Client of the project-listing endpoint.
pub struct ProjectsClient<S = BrowserStorage> {
	http: reqwest::Client,
	config: NetworkConfig,
	store: S,
}

impl ProjectsClient<BrowserStorage> {
	pub fn new(config: NetworkConfig) -> Self {
		Self::with_store(config, BrowserStorage)
	}
}

impl<S: TokenStore> ProjectsClient<S> {
	pub fn with_store(config: NetworkConfig, store: S) -> Self {
		Self {
			http: reqwest::Client::new(),
			config,
			store,
		}
	}

	/// Client-side role pre-check; runs before any request is sent.
	pub fn authorize(&self) -> Result<(), FetchError> {
		check_role(self.store.get(&self.config.role_key).as_deref())
	}

	/// Lists every project visible to the current (staff or admin) user.
	pub async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>, FetchError> {
		self.authorize()?;

		let mut refreshed = false;
		loop {
			let response = self.get_all_projects().await?;
			match next_attempt(response.status(), refreshed) {
				Attempt::Proceed => {
					let values: Vec<Value> = response.json().await?;
					info!("Fetched {} project records", values.len());
					return collect_projects(values);
				}
				Attempt::Refresh => {
					debug!("Access token rejected, refreshing");
					self.refresh_access_token().await?;
					refreshed = true;
				}
				Attempt::Fail(error) => {
					warn!("Project fetch failed with status {}", response.status());
					return Err(error);
				}
			}
		}
	}

	async fn get_all_projects(&self) -> Result<reqwest::Response, FetchError> {
		let mut request = self.http.get(self.config.endpoint(ALL_PROJECTS_PATH));
		if let Some(token) = self.store.get(&self.config.access_token_key) {
			request = request.bearer_auth(token);
		}
		Ok(request.send().await?)
	}

	/// One refresh attempt. Any failure ends the session.
	async fn refresh_access_token(&self) -> Result<(), FetchError> {
		let refreshed = async {
			let refresh_token = self.store.get(&self.config.refresh_token_key)?;
			let response = self
				.http
				.post(self.config.endpoint(REFRESH_PATH))
				.bearer_auth(refresh_token)
				.send()
				.await
				.ok()?;
			if !response.status().is_success() {
				return None;
			}
			response.json::<RefreshResponse>().await.ok()
		}
		.await;
		self.store_refreshed(refreshed.map(|r| r.access_token))
	}

	/// Saves a refreshed access token, or ends the session when there is none.
	fn store_refreshed(&self, access_token: Option<String>) -> Result<(), FetchError> {
		match access_token {
			Some(access_token) => {
				self.store.set(&self.config.access_token_key, &access_token);
				Ok(())
			}
			None => {
				warn!("Token refresh failed, clearing session");
				self.store.remove(&self.config.access_token_key);
				self.store.remove(&self.config.refresh_token_key);
				Err(FetchError::Unauthorized)
			}
		}
	}
}
