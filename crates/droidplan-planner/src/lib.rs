//! Build planning: validation of a resolved descriptor, emission of the
//! ordered task list, and the pipeline that drives both.

pub mod emit;
pub mod pipeline;
pub mod task;
pub mod validate;

pub use pipeline::{Pipeline, PlanInputs, Stage};
pub use task::{ResolvedBuildPlan, Task, TaskKind};
