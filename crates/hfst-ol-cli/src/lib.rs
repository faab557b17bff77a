// hfst-ol-cli: loading, lookup loop and output rendering for hfst-ol-lookup.

pub mod cli;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use hfst_ol::{Analysis, LoadOptions, LoadedTransducer, LookupError, Transducer};
use tracing::{debug, info, warn};

/// Environment variable naming the transducer when no path is given.
pub const TRANSDUCER_ENV: &str = "HFST_OL_TRANSDUCER";

/// Pick the transducer file: the explicit argument, else `$HFST_OL_TRANSDUCER`.
pub fn resolve_transducer_path(arg: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = arg {
        return Ok(path.to_path_buf());
    }
    match std::env::var_os(TRANSDUCER_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => bail!("no transducer given: pass --transducer or set {TRANSDUCER_ENV}"),
    }
}

/// Read and load a transducer file.
pub fn load_transducer(path: &Path, options: LoadOptions) -> anyhow::Result<LoadedTransducer> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let transducer = hfst_ol::load(&data, options)
        .with_context(|| format!("failed to load transducer {}", path.display()))?;
    info!(
        path = %path.display(),
        weighted = transducer.is_weighted(),
        symbols = transducer.alphabet().len(),
        "transducer ready"
    );
    Ok(transducer)
}

/// Write one analysis per line, then a blank line.
pub fn render_analyses<W: Write>(out: &mut W, analyses: &[Analysis]) -> io::Result<()> {
    for analysis in analyses {
        writeln!(out, "{analysis}")?;
    }
    writeln!(out)
}

/// Counts reported at the end of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub words: usize,
    /// Words with at least one analysis.
    pub analyzed: usize,
    /// Words that could not be tokenized.
    pub untokenizable: usize,
}

/// Look up every word, rendering results to `out`.
///
/// Words that cannot be tokenized are logged and skipped; a corrupt
/// transducer ends the session with an error.
pub fn run_session<T, I, W>(
    transducer: &T,
    words: I,
    echo: bool,
    out: &mut W,
) -> anyhow::Result<SessionStats>
where
    T: Transducer,
    I: IntoIterator<Item = io::Result<String>>,
    W: Write,
{
    let mut config = transducer.new_config();
    let mut stats = SessionStats::default();

    for word in words {
        let word = word.context("failed to read input")?;
        let word = word.trim();
        if word.is_empty() {
            continue;
        }
        stats.words += 1;
        if echo {
            writeln!(out, "{word}:")?;
        }

        match transducer.analyze_with(&mut config, word) {
            Ok(analyses) => {
                if !analyses.is_empty() {
                    stats.analyzed += 1;
                }
                render_analyses(out, &analyses)?;
            }
            Err(LookupError::Tokenization { word }) => {
                warn!(word, "cannot tokenize, skipping");
                stats.untokenizable += 1;
            }
            Err(err @ LookupError::Format(_)) => {
                return Err(err).with_context(|| format!("lookup of {word:?} failed"));
            }
        }
    }

    out.flush()?;
    debug!(
        words = stats.words,
        analyzed = stats.analyzed,
        untokenizable = stats.untokenizable,
        "session finished"
    );
    Ok(stats)
}

/// [`run_session`] over whichever kind of transducer was loaded.
pub fn run_loaded<I, W>(
    transducer: &LoadedTransducer,
    words: I,
    echo: bool,
    out: &mut W,
) -> anyhow::Result<SessionStats>
where
    I: IntoIterator<Item = io::Result<String>>,
    W: Write,
{
    match transducer {
        LoadedTransducer::Weighted(t) => run_session(t, words, echo, out),
        LoadedTransducer::Unweighted(t) => run_session(t, words, echo, out),
    }
}

#[cfg(test)]
#[path = "../../hfst-ol/tests/common/mod.rs"]
mod test_utils;
