//! Canvas view of the collaboration graph: layout simulation, pointer
//! interaction, drawing and PNG export.

mod component;
mod export;
mod render;
pub mod scale;
mod simulation;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use export::{export_or_log, export_png};
pub use render::tooltip_lines;
pub use simulation::Simulation;
pub use types::{SimLink, SimNode, SimulationCommand};
