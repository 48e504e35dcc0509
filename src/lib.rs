pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod media;
pub mod planning;
pub mod split;
pub mod types;

pub use error::{ExtractError, PlanError, ProbeError};
pub use planning::{plan_segments, LengthSource, RandomLengths, ScriptedLengths};
pub use types::{PlanConfig, Segment};
