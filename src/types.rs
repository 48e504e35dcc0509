//! Core types for the vidsplit segmentation pipeline

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// A contiguous slice of source media, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: f64,    // seconds from media start
    pub duration: f64, // seconds
}

impl Segment {
    pub fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Bounds for randomized segment sizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Smallest length a regular segment may be drawn with (whole seconds)
    pub min_segment: u32,
    /// Largest length a regular segment may be drawn with (whole seconds)
    pub max_segment: u32,
    /// Trailing remainders shorter than this are folded into the previous segment
    pub min_last_segment: f64,
}

impl PlanConfig {
    pub const DEFAULT_MIN_SEGMENT: u32 = 95;
    pub const DEFAULT_MAX_SEGMENT: u32 = 110;
    pub const DEFAULT_MIN_LAST_SEGMENT: f64 = 70.0;

    pub fn new(min_segment: u32, max_segment: u32, min_last_segment: f64) -> Self {
        Self {
            min_segment,
            max_segment,
            min_last_segment,
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.min_segment == 0 {
            return Err(PlanError::InvalidConfig(
                "min_segment must be greater than zero".to_string(),
            ));
        }
        if self.max_segment < self.min_segment {
            return Err(PlanError::InvalidConfig(format!(
                "max_segment ({}) must be >= min_segment ({})",
                self.max_segment, self.min_segment
            )));
        }
        if !self.min_last_segment.is_finite() || self.min_last_segment < 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "min_last_segment must be a finite, non-negative number, got {}",
                self.min_last_segment
            )));
        }
        Ok(())
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MIN_SEGMENT,
            Self::DEFAULT_MAX_SEGMENT,
            Self::DEFAULT_MIN_LAST_SEGMENT,
        )
    }
}

/// A segment file written by the extractor
#[derive(Debug, Clone, Serialize)]
pub struct SegmentOutput {
    /// 1-based position within the plan
    pub segment_number: usize,
    pub filename: String,
    pub path: PathBuf,
    pub start: f64,
    pub duration: f64,
    /// Size of the written file in bytes
    pub size: u64,
}

/// A segment whose extraction failed; other segments are unaffected
#[derive(Debug, Clone, Serialize)]
pub struct SegmentFailure {
    pub segment_number: usize,
    pub segment: Segment,
    pub error: String,
}

/// Outcome of splitting one media file
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub source: PathBuf,
    pub duration: f64,
    pub output_directory: PathBuf,
    pub outputs: Vec<SegmentOutput>,
    pub failures: Vec<SegmentFailure>,
    pub original_deleted: bool,
}

impl SplitReport {
    pub fn segments_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Container and stream details reported by ffprobe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaInfo {
    pub duration: f64,
    pub size: u64,
    pub bit_rate: u64,
    pub format_name: String,
    pub video: Option<VideoStreamInfo>,
    pub audio: Option<AudioStreamInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoStreamInfo {
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub bit_rate: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioStreamInfo {
    pub codec: String,
    pub sample_rate: u32,
    pub channels: u32,
    pub bit_rate: u64,
}
