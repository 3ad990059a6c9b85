use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{BackendArg, LogLevel, OutputFormat};

#[derive(Parser)]
#[command(name = "spanlens")]
#[command(about = "Inspect exported agent traces and measure span content duplication", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding backend exports and spanlens.toml [env: SPANLENS_PATH]
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check which span content is re-sent in later spans of a session")]
    Compare {
        /// Session file (*_sessions.jsonl)
        path: PathBuf,

        /// Only report this session (number or id)
        #[arg(long)]
        session: Option<String>,

        /// Characters of context shown around each match
        #[arg(long)]
        context_chars: Option<usize>,
    },

    #[command(about = "Summarize the structure of a flat trace export")]
    Analyze {
        /// Trace file (default: auto-detect under the data directory)
        path: Option<PathBuf>,

        /// Backend to look for first when auto-detecting
        #[arg(long)]
        backend: Option<BackendArg>,
    },

    #[command(about = "Group exported spans into sessions and write a session file")]
    Reconstruct {
        /// Trace file (default: auto-detect under the data directory)
        path: Option<PathBuf>,

        /// Output path (default: input name with `traces` replaced by `sessions`)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Backend to look for first when auto-detecting
        #[arg(long)]
        backend: Option<BackendArg>,
    },
}
