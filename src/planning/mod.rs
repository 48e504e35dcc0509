//! Segment planning: partitions a media duration into randomized, contiguous slices.

mod planner;
mod source;


pub use planner::plan_segments;
pub use source::{LengthSource, RandomLengths, ScriptedLengths};
