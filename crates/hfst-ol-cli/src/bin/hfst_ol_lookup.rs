// hfst-ol-lookup: look words up in an HFST optimized-lookup transducer.
//
// Usage:
//   hfst-ol-lookup -t FILE [WORD...]
//   hfst-ol-lookup -t FILE < words.txt
//
// Each analysis is printed on its own line, weighted ones as OUTPUT<TAB>WEIGHT,
// with a blank line after each word. Logs go to stderr.

use std::io::{self, BufRead};

use hfst_ol_cli::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let path = hfst_ol_cli::resolve_transducer_path(cli.transducer.as_deref())?;
    let transducer = hfst_ol_cli::load_transducer(&path, cli.load_options())?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    if cli.words.is_empty() {
        let stdin = io::stdin();
        hfst_ol_cli::run_loaded(&transducer, stdin.lock().lines(), cli.echo, &mut out)?;
    } else {
        let words = cli.words.iter().cloned().map(Ok);
        hfst_ol_cli::run_loaded(&transducer, words, cli.echo, &mut out)?;
    }
    Ok(())
}
