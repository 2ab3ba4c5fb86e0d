pub mod detail_panel;
pub mod filter_bar;
pub mod force_graph;
pub mod legend;
