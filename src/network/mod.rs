//! Collaboration graph model and construction.

mod builder;
mod filter;
pub mod palette;
mod types;

pub use builder::build_graph;
pub use filter::{FilterCatalog, FilterState, Selection};
pub use palette::DepartmentPalette;
pub use types::{EdgeKind, GraphData, GraphEdge, GraphNode, NodeDetails, NodeKind};
