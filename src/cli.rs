use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline on a media URL or local audio file
    Process {
        /// Media URL or local audio file
        #[arg(short, long)]
        input: String,

        /// Target language for translation
        #[arg(short, long)]
        target_lang: Option<String>,

        /// Output directory for subtitle files
        #[arg(short, long, default_value = "subtitles")]
        output_dir: PathBuf,
    },

    /// Run the full pipeline on every audio file in a directory
    Batch {
        /// Input directory containing audio files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Target language for translation
        #[arg(short, long)]
        target_lang: Option<String>,

        /// Output directory for subtitle files
        #[arg(short, long, default_value = "subtitles")]
        output_dir: PathBuf,
    },

    /// Download audio from a media URL
    Download {
        /// Media URL
        #[arg(short, long)]
        url: String,

        /// Output directory for the audio file
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Transcribe an audio file to subtitles
    Transcribe {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,

        /// Output subtitle file
        #[arg(short, long)]
        output: PathBuf,

        /// Source language hint
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Translate a subtitle file, preserving timings and entry count
    Translate {
        /// Input subtitle file
        #[arg(short, long)]
        input: PathBuf,

        /// Output subtitle file
        #[arg(short, long)]
        output: PathBuf,

        /// Target language for translation
        #[arg(short, long)]
        target_lang: Option<String>,
    },
}
