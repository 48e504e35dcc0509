use std::ffi::OsString;
use std::path::Path;

use tracing::debug;

use crate::error::ExtractError;
use crate::types::Segment;

use super::{run_tool, stderr_tail};

/// Writes one segment of a source file to a new media file
pub trait SliceExtractor {
    fn extract(&self, source: &Path, segment: &Segment, output: &Path) -> Result<(), ExtractError>;
}

impl<E: SliceExtractor + ?Sized> SliceExtractor for &E {
    fn extract(&self, source: &Path, segment: &Segment, output: &Path) -> Result<(), ExtractError> {
        (**self).extract(source, segment, output)
    }
}

impl<E: SliceExtractor + ?Sized> SliceExtractor for Box<E> {
    fn extract(&self, source: &Path, segment: &Segment, output: &Path) -> Result<(), ExtractError> {
        (**self).extract(source, segment, output)
    }
}

/// Stream-copies a time range with the `ffmpeg` executable (no re-encode)
#[derive(Debug, Clone)]
pub struct FfmpegExtractor {
    binary: String,
}

impl FfmpegExtractor {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command_args(&self, source: &Path, segment: &Segment, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(16);
        for arg in ["-y", "-v", "error", "-ss"] {
            args.push(arg.into());
        }
        args.push(segment.start.to_string().into());
        args.push("-i".into());
        args.push(source.as_os_str().to_owned());
        args.push("-t".into());
        args.push(segment.duration.to_string().into());
        for arg in ["-c", "copy", "-avoid_negative_ts", "make_zero"] {
            args.push(arg.into());
        }
        args.push(output.as_os_str().to_owned());
        args
    }
}

impl Default for FfmpegExtractor {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl SliceExtractor for FfmpegExtractor {
    fn extract(&self, source: &Path, segment: &Segment, output: &Path) -> Result<(), ExtractError> {
        debug!(
            ?source,
            ?output,
            start = segment.start,
            duration = segment.duration,
            "running ffmpeg"
        );
        let result = run_tool(&self.binary, self.command_args(source, segment, output)).map_err(
            |source| ExtractError::Spawn {
                program: self.binary.clone(),
                source,
            },
        )?;

        if !result.status.success() {
            return Err(ExtractError::Failed {
                program: self.binary.clone(),
                status: result.status,
                stderr: stderr_tail(&result.stderr),
            });
        }

        match std::fs::metadata(output) {
            Ok(meta) if meta.len() > 0 => Ok(()),
            _ => Err(ExtractError::EmptyOutput(output.to_path_buf())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_stream_copy_arguments() {
        let extractor = FfmpegExtractor::default();
        let segment = Segment::new(102.0, 98.5);
        let args = extractor.command_args(
            Path::new("in/video.mp4"),
            &segment,
            Path::new("out/video_02.mp4"),
        );
        let args: Vec<String> = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "-y",
                "-v",
                "error",
                "-ss",
                "102",
                "-i",
                "in/video.mp4",
                "-t",
                "98.5",
                "-c",
                "copy",
                "-avoid_negative_ts",
                "make_zero",
                "out/video_02.mp4",
            ]
        );
    }

    #[test]
    fn keeps_full_precision_of_planned_times() {
        let extractor = FfmpegExtractor::default();
        let segment = Segment::new(210.0, 102.4805);
        let args = extractor.command_args(Path::new("in.mp4"), &segment, Path::new("out.mp4"));

        assert_eq!(args[4], "210");
        assert_eq!(args[8], "102.4805");
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = FfmpegExtractor::new("definitely-not-a-real-ffmpeg");
        let result = extractor.extract(
            &dir.path().join("in.mp4"),
            &Segment::new(0.0, 10.0),
            &dir.path().join("out.mp4"),
        );
        assert!(matches!(result, Err(ExtractError::Spawn { .. })));
    }
}
