//! Command implementations for autovars-cli

pub mod explain;
pub mod graph;
pub mod host;
pub mod list;

pub use explain::run_explain;
pub use graph::run_graph;
pub use host::run_host;
pub use list::run_list;
