//! Page state: fetch lifecycle, filters and selection.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info, warn};

use crate::api::{ProjectRecord, ProjectsClient};
use crate::components::force_graph::export_or_log;
use crate::config::NetworkConfig;
use crate::error::FetchError;
use crate::network::{FilterCatalog, FilterState, GraphData, GraphNode, Selection, build_graph};

/// Where the current fetch cycle stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
	#[default]
	Loading,
	Ready,
	Failed(FetchError),
}

impl LoadStatus {
	pub fn is_loading(&self) -> bool {
		matches!(self, LoadStatus::Loading)
	}

	pub fn error(&self) -> Option<&FetchError> {
		match self {
			LoadStatus::Failed(e) => Some(e),
			_ => None,
		}
	}
}

/// Ticket handed to one fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Hands out increasing tickets; only the newest one may apply its response.
#[derive(Clone, Debug, Default)]
pub struct RequestGate {
	latest: Arc<AtomicU64>,
}

impl RequestGate {
	pub fn issue(&self) -> Ticket {
		Ticket(self.latest.fetch_add(1, Ordering::Relaxed) + 1)
	}

	pub fn is_current(&self, ticket: Ticket) -> bool {
		self.latest.load(Ordering::Relaxed) == ticket.0
	}
}

/// Reactive handle to the network page, shared through context.
///
/// Filter changes rebuild the graph from the records already fetched; only
/// [`NetworkController::retry`] goes back to the API.
#[derive(Clone, Copy)]
pub struct NetworkController {
	config: StoredValue<NetworkConfig>,
	gate: StoredValue<RequestGate>,
	projects: RwSignal<Vec<ProjectRecord>>,
	status: RwSignal<LoadStatus>,
	filter: RwSignal<FilterState>,
	selected: RwSignal<Option<GraphNode>>,
	graph: Memo<GraphData>,
	catalog: Memo<FilterCatalog>,
	canvas: NodeRef<leptos::html::Canvas>,
}

impl NetworkController {
	/// Creates the controller and starts the first fetch.
	pub fn new(config: NetworkConfig) -> Self {
		let projects = RwSignal::new(Vec::<ProjectRecord>::new());
		let filter = RwSignal::new(FilterState::default());
		let graph = Memo::new(move |_| projects.with(|p| filter.with(|f| build_graph(p, f))));
		let catalog = Memo::new(move |_| projects.with(|p| FilterCatalog::from_projects(p)));

		let controller = Self {
			config: StoredValue::new(config),
			gate: StoredValue::new(RequestGate::default()),
			projects,
			status: RwSignal::new(LoadStatus::Loading),
			filter,
			selected: RwSignal::new(None),
			graph,
			catalog,
			canvas: NodeRef::new(),
		};
		controller.retry();
		controller
	}

	pub fn graph(&self) -> Memo<GraphData> {
		self.graph
	}

	pub fn catalog(&self) -> Memo<FilterCatalog> {
		self.catalog
	}

	pub fn status(&self) -> ReadSignal<LoadStatus> {
		self.status.read_only()
	}

	pub fn filter(&self) -> ReadSignal<FilterState> {
		self.filter.read_only()
	}

	pub fn selected(&self) -> ReadSignal<Option<GraphNode>> {
		self.selected.read_only()
	}

	/// Canvas the graph view draws into; export reads from it.
	pub fn canvas_ref(&self) -> NodeRef<leptos::html::Canvas> {
		self.canvas
	}

	/// Fetches the project list again. Responses of earlier fetches that are
	/// still in flight are discarded when they arrive.
	pub fn retry(&self) {
		let ticket = self.gate.with_value(RequestGate::issue);
		let gate = self.gate.get_value();
		let config = self.config.get_value();
		let (projects, status) = (self.projects, self.status);
		status.set(LoadStatus::Loading);
		debug!("Fetching projects (request {ticket:?})");

		spawn_local(async move {
			let result = ProjectsClient::new(config).fetch_projects().await;
			if !gate.is_current(ticket) {
				warn!("Dropping stale project response (request {ticket:?})");
				return;
			}
			match result {
				Ok(records) => {
					info!("Loaded {} projects", records.len());
					let _ = projects.try_set(records);
					let _ = status.try_set(LoadStatus::Ready);
				}
				Err(e) => {
					error!("Project fetch failed: {e}");
					let _ = projects.try_set(Vec::new());
					let _ = status.try_set(LoadStatus::Failed(e));
				}
			}
		});
	}

	pub fn set_department_filter(&self, department: Selection) {
		self.update_filter(|f| f.department = department);
	}

	pub fn set_tech_filter(&self, technology: Selection) {
		self.update_filter(|f| f.technology = technology);
	}

	pub fn reset_filters(&self) {
		self.update_filter(FilterState::reset);
	}

	fn update_filter(&self, change: impl FnOnce(&mut FilterState)) {
		self.filter.update(change);
		// The selected node may not survive the rebuild
		self.selected.set(None);
		debug!("Filters now {:?}", self.filter.get_untracked());
	}

	pub fn select(&self, node: Option<GraphNode>) {
		self.selected.set(node);
	}

	pub fn clear_selection(&self) {
		self.selected.set(None);
	}

	/// Downloads the canvas as a PNG. Returns false when nothing was exported.
	pub fn export_current_view(&self) -> bool {
		let Some(canvas) = self.canvas.get_untracked() else {
			warn!("Export requested before the canvas was mounted");
			return false;
		};
		let file_name = self.config.with_value(|c| c.export_file_name.clone());
		export_or_log(&canvas, &file_name)
	}
}
