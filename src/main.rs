//! edgebook main entry point
//!
//! Thin CLI front end over the library: parse and validate parameters,
//! segment the input text, hand the segments to the synthesis pipeline,
//! and render progress and errors.

use anyhow::{bail, Context};
use clap::Parser;
use edgebook::config::Config;
use edgebook::synth::{create_synthesizer, default_voice, Synthesizer, VoiceParams, FALLBACK_VOICE};
use edgebook::{pipeline, segment, BookError};
use log::{error, info, warn};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(name = "edgebook", version)]
#[command(about = "Turn a text file into a natural-sounding audiobook with Edge neural TTS")]
struct Cli {
    /// Path to the source text file
    #[arg(required_unless_present = "list_voices")]
    input: Option<PathBuf>,

    /// Where to save the generated audiobook (default: audiobook.mp3)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Voice to use, e.g. en-US-JennyNeural
    #[arg(short, long)]
    voice: Option<String>,

    /// Speech rate adjustment, e.g. +10% for faster, -10% for slower
    #[arg(long)]
    rate: Option<String>,

    /// Speech pitch adjustment, e.g. +2Hz or -2Hz
    #[arg(long)]
    pitch: Option<String>,

    /// Maximum characters per request to the speech service
    #[arg(long)]
    max_chars: Option<usize>,

    /// List the available voices and exit
    #[arg(long)]
    list_voices: bool,

    /// Write debug logs to edgebook.log
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.debug);

    if let Err(e) = run(cli) {
        error!("Fatal error: {e:#}");
        process::exit(1);
    }
}

/// Initialize logging: debug mode writes to edgebook.log, normal mode
/// reports errors to stderr
fn init_logger(debug_mode: bool) {
    if debug_mode {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("edgebook.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: failed to open edgebook.log for debug logging: {e}");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "edgebook {} starting (debug mode, logging to edgebook.log)",
            edgebook::VERSION
        );
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;
    info!("Config loaded from {}", config.path().display());

    let mut synth = create_synthesizer();

    if cli.list_voices {
        let voices = synth
            .voices()
            .context("failed to query the voice catalog")?;
        for voice in &voices {
            println!("{voice}");
        }
        return Ok(());
    }

    let Some(input) = cli.input else {
        bail!("an input text file is required");
    };
    if !input.exists() {
        bail!("input file '{}' does not exist", input.display());
    }
    let text = fs::read_to_string(&input)
        .with_context(|| format!("failed to read '{}'", input.display()))?;

    // Flags override the config file, which overrides built-in defaults
    let voice = match cli.voice.or_else(|| config.voice()) {
        Some(voice) => voice,
        None => pick_default_voice(synth.as_mut()),
    };
    let rate = cli.rate.unwrap_or_else(|| config.rate());
    let pitch = cli.pitch.unwrap_or_else(|| config.pitch());
    let max_chars = match cli.max_chars {
        Some(max) => max,
        None => config.max_chars()?,
    };
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(config.output()));

    // Parameter and segmentation errors surface here, before the output
    // file is touched or a synthesis request goes out
    let params = VoiceParams::new(&voice, &rate, &pitch)?;
    let segments = segment::segment(&text, max_chars)?;
    if segments.is_empty() {
        return Err(BookError::NoContent.into());
    }

    println!("Generating audiobook with {} chunk(s)...", segments.len());

    pipeline::run(&segments, synth.as_mut(), &params, &output, |done, total| {
        println!("Finished chunk {done}/{total}");
    })?;

    println!("Saved audiobook to {}", output.display());
    Ok(())
}

/// Pick a default voice from the catalog, degrading to the fallback when
/// the catalog is unreachable
fn pick_default_voice(synth: &mut dyn Synthesizer) -> String {
    match synth.voices() {
        Ok(voices) => default_voice(&voices).to_string(),
        Err(e) => {
            warn!("Voice catalog unavailable ({e}), falling back to {FALLBACK_VOICE}");
            FALLBACK_VOICE.to_string()
        }
    }
}
