//! Probe → plan → extract orchestration for single files and batches

pub mod naming;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::media::{DurationProbe, SliceExtractor};
use crate::planning::{plan_segments, LengthSource};
use crate::types::{PlanConfig, SegmentFailure, SegmentOutput, SplitReport};

pub use naming::sanitize_filename;

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub output_dir: PathBuf,
    pub plan: PlanConfig,
    pub delete_original: bool,
}

impl From<&AppConfig> for SplitConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            plan: config.plan,
            delete_original: config.delete_original,
        }
    }
}

pub struct Splitter<P, E> {
    probe: P,
    extractor: E,
    config: SplitConfig,
}

impl<P: DurationProbe, E: SliceExtractor> Splitter<P, E> {
    pub fn new(probe: P, extractor: E, config: SplitConfig) -> Self {
        Self {
            probe,
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Split one media file into segment files.
    ///
    /// A failed segment is recorded in the report and does not stop the
    /// remaining ones; the call only fails when the duration is unknown, the
    /// plan cannot be built, or no segment was written at all.
    pub fn split_media<S: LengthSource + ?Sized>(
        &self,
        source: &Path,
        lengths: &mut S,
    ) -> Result<SplitReport> {
        ensure!(source.is_file(), "Input path is not a file: {:?}", source);
        info!("Starting video split: {:?}", source);

        let duration = self
            .probe
            .probe_duration(source)
            .with_context(|| format!("Could not get duration of {:?}", source))?;
        info!("Media duration: {:.2} seconds", duration);

        let segments = plan_segments(duration, &self.config.plan, lengths)
            .with_context(|| format!("Failed to plan segments for {:?}", source))?;
        info!("Will create {} segments", segments.len());

        let extension = naming::output_extension(source);
        let (output_directory, title) =
            naming::claim_output_directory(&self.config.output_dir, &naming::media_title(source))
                .with_context(|| {
                    format!(
                        "Failed to create output directory for {:?} in {:?}",
                        source, self.config.output_dir
                    )
                })?;

        let mut outputs = Vec::with_capacity(segments.len());
        let mut failures = Vec::new();
        for (idx, segment) in segments.iter().enumerate() {
            let segment_number = idx + 1;
            let filename = naming::segment_filename(&title, segment_number, &extension);
            let path = output_directory.join(&filename);
            info!(
                "Creating segment {}: start={:.2}s, duration={:.2}s",
                segment_number, segment.start, segment.duration
            );

            let written = self
                .extractor
                .extract(source, segment, &path)
                .map_err(|err| err.to_string())
                .and_then(|()| {
                    fs::metadata(&path)
                        .map(|meta| meta.len())
                        .map_err(|err| format!("could not stat segment file {:?}: {}", path, err))
                });
            match written {
                Ok(size) => {
                    info!("Segment {} created: {}", segment_number, filename);
                    outputs.push(SegmentOutput {
                        segment_number,
                        filename,
                        path,
                        start: segment.start,
                        duration: segment.duration,
                        size,
                    });
                }
                Err(err) => {
                    error!("Failed to create segment {}: {}", segment_number, err);
                    failures.push(SegmentFailure {
                        segment_number,
                        segment: *segment,
                        error: err,
                    });
                }
            }
        }

        ensure!(
            !outputs.is_empty(),
            "No segments were created successfully for {:?} ({} failed)",
            source,
            failures.len()
        );
        info!(
            "Created {} of {} segments in {:?}",
            outputs.len(),
            segments.len(),
            output_directory
        );

        let original_deleted = self.config.delete_original
            && failures.is_empty()
            && self.delete_original(source);

        Ok(SplitReport {
            source: source.to_path_buf(),
            duration,
            output_directory,
            outputs,
            failures,
            original_deleted,
        })
    }

    /// Split every source independently; one item's failure never stops the batch
    pub fn split_batch<I, S>(&self, sources: I, lengths: &mut S) -> Vec<(PathBuf, Result<SplitReport>)>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
        S: LengthSource + ?Sized,
    {
        sources
            .into_iter()
            .map(|source| {
                let source = source.as_ref().to_path_buf();
                let result = self.split_media(&source, lengths);
                if let Err(err) = &result {
                    warn!("Skipping {:?}: {:#}", source, err);
                }
                (source, result)
            })
            .collect()
    }

    fn delete_original(&self, source: &Path) -> bool {
        match fs::remove_file(source) {
            Ok(()) => {
                info!("Deleted original video file: {:?}", source);
                true
            }
            Err(err) => {
                warn!("Could not delete original {:?}: {}", source, err);
                false
            }
        }
    }
}
