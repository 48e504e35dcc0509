use std::ffi::OsStr;
use std::fs::File;
use std::path::Path;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::{FormatOptions, Track};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::ProbeError;

use super::{run_tool, stderr_tail};

const DURATION_ARGS: [&str; 6] = [
    "-v",
    "error",
    "-show_entries",
    "format=duration",
    "-of",
    "default=noprint_wrappers=1:nokey=1",
];

/// Reports the duration of a local media file in seconds
pub trait DurationProbe {
    fn probe_duration(&self, path: &Path) -> Result<f64, ProbeError>;
}

impl<P: DurationProbe + ?Sized> DurationProbe for &P {
    fn probe_duration(&self, path: &Path) -> Result<f64, ProbeError> {
        (**self).probe_duration(path)
    }
}

impl<P: DurationProbe + ?Sized> DurationProbe for Box<P> {
    fn probe_duration(&self, path: &Path) -> Result<f64, ProbeError> {
        (**self).probe_duration(path)
    }
}

/// Reads the container duration with the `ffprobe` executable
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    binary: String,
}

impl FfprobeProbe {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl DurationProbe for FfprobeProbe {
    fn probe_duration(&self, path: &Path) -> Result<f64, ProbeError> {
        ensure_exists(path)?;
        let mut args: Vec<&OsStr> = DURATION_ARGS.iter().map(|arg| OsStr::new(*arg)).collect();
        args.push(path.as_os_str());
        let output = run_tool(&self.binary, args).map_err(|source| ProbeError::Spawn {
            program: self.binary.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                program: self.binary.clone(),
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }

        let duration = parse_duration_output(&String::from_utf8_lossy(&output.stdout))?;
        debug!(?path, duration, "ffprobe reported duration");
        checked_duration(path, duration)
    }
}

/// Reads the duration from container headers in-process with symphonia.
///
/// Only tracks symphonia can identify count, so this suits audio files and
/// containers with a supported audio track.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProbe;

impl DurationProbe for NativeProbe {
    fn probe_duration(&self, path: &Path) -> Result<f64, ProbeError> {
        ensure_exists(path)?;
        let file = File::open(path).map_err(|err| {
            ProbeError::Decode(format!("failed to open {}: {}", path.display(), err))
        })?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|err| ProbeError::Decode(err.to_string()))?;

        let duration = probed
            .format
            .tracks()
            .iter()
            .filter(|track| track.codec_params.codec != CODEC_TYPE_NULL)
            .find_map(track_duration)
            .ok_or_else(|| ProbeError::NoDuration(path.to_path_buf()))?;
        debug!(?path, duration, "container headers reported duration");
        checked_duration(path, duration)
    }
}

fn track_duration(track: &Track) -> Option<f64> {
    let params = &track.codec_params;
    let frames = params.n_frames?;
    if let Some(time_base) = params.time_base {
        let time = time_base.calc_time(frames);
        return Some(time.seconds as f64 + time.frac);
    }
    params
        .sample_rate
        .map(|rate| frames as f64 / f64::from(rate))
}

fn ensure_exists(path: &Path) -> Result<(), ProbeError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ProbeError::Missing(path.to_path_buf()))
    }
}

fn parse_duration_output(raw: &str) -> Result<f64, ProbeError> {
    let trimmed = raw.trim();
    // containers without a duration header report "N/A"
    trimmed
        .parse::<f64>()
        .map_err(|_| ProbeError::Parse(format!("unexpected duration value '{}'", trimmed)))
}

fn checked_duration(path: &Path, duration: f64) -> Result<f64, ProbeError> {
    if duration.is_finite() && duration > 0.0 {
        Ok(duration)
    } else {
        Err(ProbeError::NoDuration(path.to_path_buf()))
    }
}
