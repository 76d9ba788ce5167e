//! Sublate - Media Localization Pipeline
//!
//! This is the main entry point for the sublate application, which turns a
//! media URL or audio file into translated subtitles using yt-dlp, whisper
//! and ollama.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sublate::cli::{Args, Commands};
use sublate::config::Config;
use sublate::pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load sublate.toml from current directory first
            if std::path::Path::new("sublate.toml").exists() {
                info!("Found sublate.toml in current directory, loading...");
                Config::from_file("sublate.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Execute command
    match args.command {
        Commands::Process {
            input,
            target_lang,
            output_dir,
        } => {
            info!("Processing media input: {}", input);

            let mut pipeline = Pipeline::new(config)?;
            let output = pipeline
                .process(&input, &output_dir, target_lang.as_deref())
                .await?;
            println!("Translated subtitles written to {}", output.display());
        }
        Commands::Batch {
            input_dir,
            target_lang,
            output_dir,
        } => {
            info!("Processing directory: {}", input_dir.display());

            let mut pipeline = Pipeline::new(config)?;
            pipeline
                .process_directory(&input_dir, &output_dir, target_lang.as_deref())
                .await?;
        }
        Commands::Download { url, output_dir } => {
            info!("Downloading audio from: {}", url);

            let output_dir =
                output_dir.unwrap_or_else(|| config.download.audio_dir.clone().into());
            let pipeline = Pipeline::new(config)?;
            let audio = pipeline.download(&url, &output_dir).await?;
            println!("Audio downloaded to {}", audio.display());
        }
        Commands::Transcribe {
            input,
            output,
            language,
        } => {
            info!("Transcribing audio: {}", input.display());

            let mut pipeline = Pipeline::new(config)?;
            pipeline
                .transcribe_audio(&input, &output, language.as_deref())
                .await?;
            println!("Subtitles written to {}", output.display());
        }
        Commands::Translate {
            input,
            output,
            target_lang,
        } => {
            info!("Translating subtitles: {}", input.display());

            let mut pipeline = Pipeline::new(config)?;
            pipeline
                .translate_subtitle_file(&input, &output, target_lang.as_deref())
                .await?;
            println!("Translated subtitles written to {}", output.display());
        }
    }

    info!("sublate completed successfully");
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let sublate_dir = std::env::current_dir()?.join(".sublate");
    let log_dir = sublate_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "sublate.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer().with_target(false);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
