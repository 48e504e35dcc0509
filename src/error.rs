//! Typed errors for planning and the media adapters

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid plan configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("media file not found: {0:?}")]
    Missing(PathBuf),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("could not parse probe output: {0}")]
    Parse(String),
    #[error("no discoverable duration for {0:?}")]
    NoDuration(PathBuf),
    #[error("failed to read media container: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("segment file was not created or is empty: {0:?}")]
    EmptyOutput(PathBuf),
}
