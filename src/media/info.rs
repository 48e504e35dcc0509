use std::ffi::OsStr;
use std::path::Path;

use serde::Deserialize;

use crate::error::ProbeError;
use crate::types::{AudioStreamInfo, MediaInfo, VideoStreamInfo};

use super::{run_tool, stderr_tail};

const INFO_ARGS: [&str; 6] = [
    "-v",
    "error",
    "-show_format",
    "-show_streams",
    "-of",
    "json",
];

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
    size: Option<String>,
    bit_rate: Option<String>,
    #[serde(default)]
    format_name: String,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    #[serde(default)]
    codec_name: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    bit_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
}

/// Collect container and first video/audio stream details with ffprobe
pub fn probe_media_info(ffprobe: &str, path: &Path) -> Result<MediaInfo, ProbeError> {
    if !path.is_file() {
        return Err(ProbeError::Missing(path.to_path_buf()));
    }
    let mut args: Vec<&OsStr> = INFO_ARGS.iter().map(|arg| OsStr::new(*arg)).collect();
    args.push(path.as_os_str());
    let output = run_tool(ffprobe, args).map_err(|source| ProbeError::Spawn {
        program: ffprobe.to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(ProbeError::Failed {
            program: ffprobe.to_string(),
            status: output.status,
            stderr: stderr_tail(&output.stderr),
        });
    }

    parse_media_info(&String::from_utf8_lossy(&output.stdout))
}

pub(crate) fn parse_media_info(raw: &str) -> Result<MediaInfo, ProbeError> {
    let probe: ProbeOutput =
        serde_json::from_str(raw).map_err(|err| ProbeError::Parse(err.to_string()))?;
    let format = probe
        .format
        .ok_or_else(|| ProbeError::Parse("ffprobe output has no format section".to_string()))?;

    let duration = format
        .duration
        .as_deref()
        .and_then(|value| value.parse::<f64>().ok())
        .ok_or_else(|| ProbeError::Parse("format section has no duration".to_string()))?;

    let video = probe
        .streams
        .iter()
        .find(|stream| stream.codec_type.as_deref() == Some("video"))
        .map(|stream| VideoStreamInfo {
            codec: stream.codec_name.clone(),
            width: stream.width.unwrap_or(0),
            height: stream.height.unwrap_or(0),
            fps: stream
                .r_frame_rate
                .as_deref()
                .map(parse_frame_rate)
                .unwrap_or(0.0),
            bit_rate: parse_number(stream.bit_rate.as_deref()),
        });

    let audio = probe
        .streams
        .iter()
        .find(|stream| stream.codec_type.as_deref() == Some("audio"))
        .map(|stream| AudioStreamInfo {
            codec: stream.codec_name.clone(),
            sample_rate: parse_number(stream.sample_rate.as_deref()) as u32,
            channels: stream.channels.unwrap_or(0),
            bit_rate: parse_number(stream.bit_rate.as_deref()),
        });

    Ok(MediaInfo {
        duration,
        size: parse_number(format.size.as_deref()),
        bit_rate: parse_number(format.bit_rate.as_deref()),
        format_name: format.format_name,
        video,
        audio,
    })
}

/// Parse ffprobe's rational frame rate ("30000/1001") or a plain number
fn parse_frame_rate(raw: &str) -> f64 {
    match raw.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().unwrap_or(0.0);
            let den = den.trim().parse::<f64>().unwrap_or(0.0);
            if den == 0.0 {
                0.0
            } else {
                num / den
            }
        }
        None => raw.trim().parse::<f64>().unwrap_or(0.0),
    }
}

fn parse_number(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0)
}
