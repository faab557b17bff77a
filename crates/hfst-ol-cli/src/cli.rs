//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use hfst_ol::LoadOptions;

/// Look words up in an HFST optimized-lookup transducer.
///
/// Words are taken from the command line, or read from stdin one per line.
/// Each analysis is printed on its own line (output, then a tab and the
/// weight for weighted transducers), followed by a blank line per word.
#[derive(Parser, Debug, Clone)]
#[command(name = "hfst-ol-lookup")]
#[command(version)]
pub struct Cli {
    /// Transducer file (`.hfstol`). Falls back to $HFST_OL_TRANSDUCER.
    #[arg(short, long)]
    pub transducer: Option<PathBuf>,

    /// Words to look up. Reads stdin when none are given.
    pub words: Vec<String>,

    /// String shown in place of flag diacritics.
    #[arg(long, default_value = hfst_ol::symbols::DEFAULT_FLAG_PLACEHOLDER)]
    pub flag_placeholder: String,

    /// Maximum number of arcs on one search path.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Print `word:` before each word's analyses.
    #[arg(long)]
    pub echo: bool,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::default()
            .flag_placeholder(self.flag_placeholder.as_str())
            .max_depth(self.max_depth)
    }
}
