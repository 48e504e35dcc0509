use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::config::{AppConfig, ProbeBackend};
use crate::planning::{LengthSource, RandomLengths, ScriptedLengths};
use crate::types::PlanConfig;

#[derive(Parser, Debug)]
#[command(
    name = "vidsplit",
    version,
    about = "Split long videos into randomized 95-110 second segments"
)]
pub struct Cli {
    /// Optional JSON configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Also append logs to this file.
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the segment plan for a duration or a media file.
    Plan(PlanArgs),
    /// Cut media files into segment files.
    Split(SplitArgs),
    /// Show container and stream details of a media file.
    Info(InfoArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct BoundsArgs {
    /// Shortest regular segment in whole seconds.
    #[arg(long = "min-segment")]
    pub min_segment: Option<u32>,
    /// Longest regular segment in whole seconds.
    #[arg(long = "max-segment")]
    pub max_segment: Option<u32>,
    /// Trailing remainders shorter than this merge into the previous segment.
    #[arg(long = "min-last-segment")]
    pub min_last_segment: Option<f64>,
}

impl BoundsArgs {
    pub fn apply(&self, base: PlanConfig) -> PlanConfig {
        PlanConfig {
            min_segment: self.min_segment.unwrap_or(base.min_segment),
            max_segment: self.max_segment.unwrap_or(base.max_segment),
            min_last_segment: self.min_last_segment.unwrap_or(base.min_last_segment),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RandomnessArgs {
    /// Seed for reproducible segment lengths.
    #[arg(long, conflicts_with = "draws")]
    pub seed: Option<u64>,
    /// Fixed segment lengths to replay in order, e.g. `--draws 100,105`.
    #[arg(long, value_delimiter = ',')]
    pub draws: Option<Vec<u32>>,
}

impl RandomnessArgs {
    pub fn length_source(&self) -> Result<Box<dyn LengthSource>> {
        let source: Box<dyn LengthSource> = match (&self.draws, self.seed) {
            (Some(draws), _) => Box::new(ScriptedLengths::new(draws.clone())?),
            (None, Some(seed)) => Box::new(RandomLengths::seeded(seed)),
            (None, None) => Box::new(RandomLengths::from_entropy()),
        };
        Ok(source)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProbeArgs {
    /// Read durations in-process instead of running ffprobe.
    #[arg(long = "native-probe")]
    pub native_probe: bool,
}

impl ProbeArgs {
    pub fn backend(&self, config: &AppConfig) -> ProbeBackend {
        if self.native_probe {
            ProbeBackend::Native
        } else {
            config.probe
        }
    }
}

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["duration", "input"])))]
pub struct PlanArgs {
    /// Media duration in seconds.
    #[arg(long, allow_hyphen_values = true)]
    pub duration: Option<f64>,
    /// Media file whose duration should be probed.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,
    #[command(flatten)]
    pub bounds: BoundsArgs,
    #[command(flatten)]
    pub randomness: RandomnessArgs,
    #[command(flatten)]
    pub probe: ProbeArgs,
    /// Print the plan as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Media files to split.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,
    /// Directory that receives one sub-directory per input.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// Delete each source once all of its segments were written.
    #[arg(long = "delete-original")]
    pub delete_original: bool,
    #[command(flatten)]
    pub bounds: BoundsArgs,
    #[command(flatten)]
    pub randomness: RandomnessArgs,
    #[command(flatten)]
    pub probe: ProbeArgs,
    /// Print the per-item reports as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Media file to inspect.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
    /// Print the details as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SplitArgs {
    /// Fold command-line overrides into the loaded configuration
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        config.delete_original |= self.delete_original;
        config.plan = self.bounds.apply(config.plan);
        config.probe = self.probe.backend(&config);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use crate::config::{AppConfig, ProbeBackend};
    use crate::planning::LengthSource;
    use crate::types::PlanConfig;
    use clap::Parser;

    #[test]
    fn parses_plan_with_negative_duration() {
        let cli = Cli::try_parse_from(["vidsplit", "plan", "--duration", "-5"]).unwrap();
        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        assert_eq!(args.duration, Some(-5.0));
    }

    #[test]
    fn plan_requires_a_source() {
        assert!(Cli::try_parse_from(["vidsplit", "plan"]).is_err());
        assert!(Cli::try_parse_from([
            "vidsplit",
            "plan",
            "--duration",
            "300",
            "--input",
            "clip.mp4"
        ])
        .is_err());
    }

    #[test]
    fn seed_and_draws_conflict() {
        assert!(Cli::try_parse_from([
            "vidsplit",
            "plan",
            "--duration",
            "300",
            "--seed",
            "1",
            "--draws",
            "100"
        ])
        .is_err());
    }

    #[test]
    fn draws_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "vidsplit",
            "plan",
            "--duration",
            "300",
            "--draws",
            "100,105",
        ])
        .unwrap();
        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        assert_eq!(args.randomness.draws, Some(vec![100, 105]));
        let mut source = args.randomness.length_source().unwrap();
        assert_eq!(source.next_length(95, 110), 100);
        assert_eq!(source.next_length(95, 110), 105);
    }

    #[test]
    fn split_overrides_config() {
        let cli = Cli::try_parse_from([
            "vidsplit",
            "split",
            "a.mp4",
            "b.mp4",
            "--output-dir",
            "cuts",
            "--max-segment",
            "120",
            "--native-probe",
            "--delete-original",
        ])
        .unwrap();
        let Command::Split(args) = cli.command else {
            panic!("expected split command");
        };
        assert_eq!(args.inputs.len(), 2);

        let config = args.apply(AppConfig::default());
        assert!(config.output_dir.ends_with("cuts"));
        assert_eq!(config.plan, PlanConfig::new(95, 120, 70.0));
        assert_eq!(config.probe, ProbeBackend::Native);
        assert!(config.delete_original);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["vidsplit", "info", "clip.mp4", "--verbose", "--json"]).unwrap();
        assert!(cli.verbose);
        let Command::Info(args) = cli.command else {
            panic!("expected info command");
        };
        assert!(args.json);
    }
}
