//! Recovery domain module
//!
//! Value objects for the post-generation recovery path: heuristic JSON
//! repair outcomes and the fallback decision state machine's context and
//! results. The procedures that act on these live in the infrastructure
//! layer; everything here is pure data.

pub mod fallback;
pub mod repair;

pub use fallback::{FallbackContext, FallbackMode, FallbackReason, FallbackResult};
pub use repair::RepairResult;
