use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, trace};
use tracing_subscriber::{EnvFilter, fmt};

use posgrep::{Match, Regex};

// Usage: posgrep <pattern> [file]...
#[derive(Parser, Debug)]
#[command(name = "posgrep", version, about = "Search text for a pattern")]
struct Cli {
    /// Pattern: literals, escapes, `.`, `|`, `(...)` and `*`
    pattern: String,

    /// Files to search; standard input when none are given
    files: Vec<PathBuf>,

    /// Print only the number of matches
    #[arg(short, long)]
    count: bool,

    /// Print the compiled automaton to stderr before searching
    #[arg(long)]
    dump_automaton: bool,

    /// Accepted for compatibility, patterns are always extended
    #[arg(short = 'E', hide = true)]
    #[allow(dead_code)]
    extended: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("POSGREP_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("posgrep: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether anything matched.
fn run() -> Result<bool> {
    let cli = Cli::parse();

    let started = Instant::now();
    let regex = Regex::new(&cli.pattern)
        .with_context(|| format!("invalid pattern {:?}", cli.pattern))?;
    debug!(
        positions = regex.automaton().len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "compiled pattern"
    );
    trace!("automaton:\n{}", regex.automaton());
    if cli.dump_automaton {
        eprintln!("{}", regex.automaton());
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut any = false;

    if cli.files.is_empty() {
        any |= search_one(&regex, io::stdin().lock(), None, cli.count, &mut out)?;
    } else {
        let show_name = cli.files.len() > 1;
        for path in &cli.files {
            let file = File::open(path).with_context(|| format!("{}", path.display()))?;
            let name = show_name.then(|| path.display().to_string());
            any |= search_one(&regex, file, name.as_deref(), cli.count, &mut out)
                .with_context(|| format!("{}", path.display()))?;
        }
    }
    out.flush()?;
    Ok(any)
}

fn search_one<R: Read, W: Write>(
    regex: &Regex,
    source: R,
    name: Option<&str>,
    count_only: bool,
    out: &mut W,
) -> Result<bool> {
    let started = Instant::now();
    let mut count = 0usize;
    for found in regex.search(source) {
        let found = found?;
        count += 1;
        if !count_only {
            print_match(out, name, &found)?;
        }
    }
    debug!(
        input = name.unwrap_or("-"),
        matches = count,
        elapsed_us = started.elapsed().as_micros() as u64,
        "searched input"
    );
    if count_only {
        if let Some(name) = name {
            write!(out, "{}:", name)?;
        }
        writeln!(out, "{}", count)?;
    }
    Ok(count > 0)
}

fn print_match<W: Write>(out: &mut W, name: Option<&str>, found: &Match) -> io::Result<()> {
    if let Some(name) = name {
        write!(out, "{}:", name)?;
    }
    writeln!(
        out,
        "{}:{}: {}[{}]{}",
        found.start_line(),
        found.start_col(),
        String::from_utf8_lossy(found.context_before()),
        escape(found.matched_text()),
        String::from_utf8_lossy(found.context_after()),
    )
}

/// Makes line breaks and tabs inside a match visible.
fn escape(text: &[u8]) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in String::from_utf8_lossy(text).chars() {
        match c {
            '\n' => escaped.push_str(r"\n"),
            '\r' => escaped.push_str(r"\r"),
            '\t' => escaped.push_str(r"\t"),
            c => escaped.push(c),
        }
    }
    escaped
}
