use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};

use vidsplit::cli::{Cli, Command, InfoArgs, PlanArgs, SplitArgs};
use vidsplit::config::{AppConfig, ProbeBackend};
use vidsplit::logging::init_logging;
use vidsplit::media::{probe_media_info, DurationProbe, FfmpegExtractor, FfprobeProbe, NativeProbe};
use vidsplit::planning::plan_segments;
use vidsplit::split::{SplitConfig, Splitter};
use vidsplit::types::{MediaInfo, SplitReport};

#[derive(Serialize)]
struct ItemOutcome<'a> {
    source: &'a Path,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a SplitReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let log_file = cli.log_file.clone().or_else(|| config.log_file.clone());
    init_logging(cli.verbose, log_file.as_deref())?;

    match &cli.command {
        Command::Plan(args) => handle_plan(args, config),
        Command::Split(args) => handle_split(args, config),
        Command::Info(args) => handle_info(args, &config),
    }
}

fn handle_plan(args: &PlanArgs, mut config: AppConfig) -> Result<()> {
    config.plan = args.bounds.apply(config.plan);
    config.probe = args.probe.backend(&config);
    config.validate()?;

    let duration = match (&args.input, args.duration) {
        (Some(input), _) => duration_probe(&config)
            .probe_duration(input)
            .with_context(|| format!("Could not get duration of {:?}", input))?,
        (None, Some(duration)) => duration,
        (None, None) => bail!("Provide --duration or --input"),
    };

    let mut lengths = args.randomness.length_source()?;
    let segments = plan_segments(duration, &config.plan, &mut *lengths)
        .with_context(|| format!("Failed to plan segments for duration {}", duration))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&segments)?);
        return Ok(());
    }

    println!("Duration: {:.2} seconds", duration);
    println!("Segments: {}", segments.len());
    for (i, segment) in segments.iter().enumerate() {
        println!(
            "  {:02}  start={:>9.2}s  duration={:>7.2}s  end={:>9.2}s",
            i + 1,
            segment.start,
            segment.duration,
            segment.end()
        );
    }
    Ok(())
}

fn handle_split(args: &SplitArgs, config: AppConfig) -> Result<()> {
    let config = args.apply(config);
    config.validate()?;

    let splitter = Splitter::new(
        duration_probe(&config),
        FfmpegExtractor::new(config.ffmpeg.clone()),
        SplitConfig::from(&config),
    );
    info!(
        "Splitting {} file(s) into {:?}",
        args.inputs.len(),
        splitter.config().output_dir
    );

    let mut lengths = args.randomness.length_source()?;
    let results = splitter.split_batch(&args.inputs, &mut *lengths);
    let failed = results.iter().filter(|(_, result)| result.is_err()).count();

    if args.json {
        let items: Vec<ItemOutcome> = results
            .iter()
            .map(|(source, result)| ItemOutcome {
                source,
                success: result.is_ok(),
                report: result.as_ref().ok(),
                error: result.as_ref().err().map(|err| format!("{:#}", err)),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for (source, result) in &results {
            match result {
                Ok(report) => {
                    println!(
                        "✓ {:?}: {} segment(s) in {:?}",
                        source,
                        report.segments_count(),
                        report.output_directory
                    );
                    for failure in &report.failures {
                        println!(
                            "    segment {:02} failed: {}",
                            failure.segment_number, failure.error
                        );
                    }
                    if report.original_deleted {
                        println!("    original deleted");
                    }
                }
                Err(err) => println!("✗ {:?}: {:#}", source, err),
            }
        }
    }

    if failed > 0 {
        error!("{} of {} item(s) failed", failed, results.len());
        bail!("{} of {} item(s) failed", failed, results.len());
    }
    Ok(())
}

fn handle_info(args: &InfoArgs, config: &AppConfig) -> Result<()> {
    let info = probe_media_info(&config.ffprobe, &args.input)
        .with_context(|| format!("Could not read media info for {:?}", args.input))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_media_info(&info);
    }
    Ok(())
}

fn print_media_info(info: &MediaInfo) {
    println!("Format:   {}", info.format_name);
    println!("Duration: {:.2} seconds", info.duration);
    println!("Size:     {} bytes", info.size);
    println!("Bitrate:  {} b/s", info.bit_rate);
    if let Some(video) = &info.video {
        println!(
            "Video:    {} {}x{} @ {:.2} fps",
            video.codec, video.width, video.height, video.fps
        );
    }
    if let Some(audio) = &info.audio {
        println!(
            "Audio:    {} {} Hz, {} channel(s)",
            audio.codec, audio.sample_rate, audio.channels
        );
    }
}

fn duration_probe(config: &AppConfig) -> Box<dyn DurationProbe> {
    match config.probe {
        ProbeBackend::Ffprobe => Box::new(FfprobeProbe::new(config.ffprobe.clone())),
        ProbeBackend::Native => Box::new(NativeProbe),
    }
}
