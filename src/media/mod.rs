//! Adapters over external media tools (ffprobe/ffmpeg) and the in-process symphonia probe.

pub mod extract;
pub mod info;
pub mod probe;

use std::ffi::OsStr;
use std::process::{Command, Output, Stdio};

pub use extract::{FfmpegExtractor, SliceExtractor};
pub use info::probe_media_info;
pub use probe::{DurationProbe, FfprobeProbe, NativeProbe};

const STDERR_TAIL_LINES: usize = 8;

/// Run an external tool to completion, capturing stdout and stderr
fn run_tool<I, S>(program: &str, args: I) -> std::io::Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
}

/// Last few non-empty lines of a tool's stderr, joined for error messages
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}
