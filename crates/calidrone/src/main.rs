//! `calidrone` - CLI for the calidrone planner and recorder
//!
//! This binary inspects saved flight paths and runs camera recording
//! sessions from the command line.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path as FsPath;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::sync::mpsc;

use calidrone::catalog::{format_duration, format_file_size};
use calidrone::cli::{Cli, Command, ConfigCommand, PathCommand, PathReport, RecordCommand};
use calidrone::clock::{Clock, IdGenerator, RandomIds, SystemClock};
use calidrone::recording::{run_ticker, FeedSource, UnavailableCamera};
use calidrone::{init_logging, Config, GroundStation, Path, SessionStatus};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Path(path_cmd) => handle_path(&config, path_cmd),
        Command::Record(record_cmd) => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(handle_record(config, record_cmd))
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn read_path(file: &FsPath) -> anyhow::Result<Path> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    serde_json::from_str(&json).with_context(|| format!("{} is not a saved path", file.display()))
}

fn handle_path(config: &Config, cmd: PathCommand) -> anyhow::Result<()> {
    match cmd {
        PathCommand::Info { file, json } => {
            let path = read_path(&file)?;
            let report = PathReport::new(&path, config.planner.cruise_speed);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }
        PathCommand::Reverse { file, output } => {
            let path = read_path(&file)?;
            let reversed = path.reversed(RandomIds.next_id(), SystemClock.now());
            let json = serde_json::to_string_pretty(&reversed)?;
            match output {
                Some(out) => {
                    std::fs::write(&out, json)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    println!("Wrote {} to {}", reversed.name(), out.display());
                }
                None => println!("{json}"),
            }
        }
    }
    Ok(())
}

async fn handle_record(config: Config, cmd: RecordCommand) -> anyhow::Result<()> {
    let output = cmd.output.clone().unwrap_or_else(|| config.recordings_dir());
    let period = config.camera.tick_interval();
    let mut station = GroundStation::with_system(config);

    let mut settings = station.session().settings();
    if let Some(format) = cmd.format {
        settings.format = format;
    }
    if let Some(quality) = cmd.quality {
        settings.quality = quality;
    }
    station.session_mut().set_settings(settings)?;
    if cmd.demo {
        station.session_mut().set_feed_source(FeedSource::Demo)?;
    }

    let mut camera = UnavailableCamera;
    let mut status = station.start_recording(&mut camera).await?;
    if status == SessionStatus::Errored {
        println!("Camera unavailable, recording from the demo feed.");
        status = station.start_recording(&mut camera).await?;
    }
    let Some(tick) = station.session().tick_handle().cloned() else {
        bail!("recording did not start (session is {status})");
    };

    let (tx, mut rx) = mpsc::channel(8);
    let ticker = tokio::spawn(run_ticker(tick.clone(), period, tx));
    println!(
        "Recording {} at {} quality (Ctrl-C to stop)...",
        settings.format, settings.quality
    );

    let recorded = loop {
        tokio::select! {
            Some(event) = rx.recv() => {
                if let Some(id) = station.handle_tick(event)? {
                    break Some(id);
                }
                println!("  {}", format_duration(station.session().elapsed_seconds()));
            }
            _ = tokio::signal::ctrl_c() => {
                break station.stop_recording(&mut camera).await?;
            }
        }
    };

    tick.cancel();
    ticker.await.context("tick timer panicked")?;

    if let Some(id) = recorded {
        let file = station.recordings().export(id, &output)?;
        let stats = station.recordings().aggregate();
        println!(
            "Saved {} ({}, {})",
            file.display(),
            format_duration(stats.total_duration_seconds),
            format_file_size(stats.total_size_bytes)
        );
    }

    station.shutdown(&mut camera);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Planner]");
                println!("  Snap size:          {}", config.planner.snap_size);
                println!("  Cruise speed:       {}", config.planner.cruise_speed);
                println!(
                    "  Default path name:  {}",
                    config.planner.default_path_name
                );
                println!();
                println!("[Camera]");
                println!("  Feed source:        {}", config.camera.feed_source);
                println!("  Format:             {}", config.camera.format);
                println!("  Quality:            {}", config.camera.quality);
                println!("  Framerate:          {}", config.camera.framerate);
                println!(
                    "  Resolution:         {}x{}",
                    config.camera.width, config.camera.height
                );
                println!(
                    "  Demo auto-stop:     {}s",
                    config.camera.demo_auto_stop_secs
                );
                println!();
                println!("[Export]");
                println!("  Recordings dir:     {}", config.recordings_dir().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
