//! Version resolution, the dependency and plugin graphs, and the ordering
//! algorithms shared between them.

pub mod conflict;
pub mod graph;
pub mod order;
pub mod plugin_graph;
pub mod resolver;
pub mod version;
