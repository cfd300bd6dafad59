//! unionck CLI

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use unionck::analyzer::Analyzer;
use unionck::config::Config;
use unionck::diagnostics::{self, Diagnostic};
use unionck::error::report_error;
use unionck::fix::{apply_edits, fix_edit};
use unionck::{CheckError, Document};

#[derive(Parser)]
#[command(name = "unionck", version, about = "Exhaustiveness checker for union matches")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Check every match in a snapshot
    Check {
        /// Snapshot file (JSON)
        snapshot: PathBuf,
        /// Config file (default: unionck.toml next to the snapshot)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Source file the snapshot was taken from
        #[arg(long)]
        source: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
        /// Print progress to stderr
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the source with fixes for non-exhaustive matches applied
    Fix {
        /// Snapshot file (JSON)
        snapshot: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        source: Option<PathBuf>,
    },
    /// Parse and dump a snapshot (debug)
    Dump {
        /// Snapshot file (JSON)
        snapshot: PathBuf,
    },
}

/// A loaded snapshot with its config and, when available, source text
struct Input {
    doc: Document,
    config: Config,
    filename: String,
    source: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check {
            snapshot,
            config,
            source,
            format,
            verbose,
        } => load(&snapshot, config.as_deref(), source.as_deref())
            .and_then(|input| check(&input, format, verbose)),
        Command::Fix {
            snapshot,
            config,
            source,
        } => load(&snapshot, config.as_deref(), source.as_deref()).and_then(|input| fix(&input)),
        Command::Dump { snapshot } => dump(&snapshot),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err((filename, source, e)) => {
            report_error(&filename, source.as_deref(), &e);
            std::process::exit(1);
        }
    }
}

/// An error with whatever source context was loaded before it happened
type CliError = (String, Option<String>, CheckError);

fn load(snapshot: &Path, config: Option<&Path>, source: Option<&Path>) -> Result<Input, CliError> {
    let bare = |e: CheckError| -> CliError { (snapshot.display().to_string(), None, e) };

    let text = std::fs::read_to_string(snapshot).map_err(|e| bare(e.into()))?;
    let doc = Document::from_json(&text).map_err(|e| bare(e.into()))?;

    let dir = snapshot.parent().unwrap_or(Path::new("."));
    let config = match config {
        Some(path) => Config::load(path),
        None => Config::load_or_default(dir),
    }
    .map_err(bare)?;

    let source_path = source
        .map(Path::to_path_buf)
        .or_else(|| doc.source.as_ref().map(|s| dir.join(s)));
    let (filename, source) = match source_path {
        Some(path) => {
            let text = std::fs::read_to_string(&path).map_err(|e| bare(e.into()))?;
            (path.display().to_string(), Some(text))
        }
        None => (snapshot.display().to_string(), None),
    };
    doc.validate_spans(source.as_deref())
        .map_err(|e| -> CliError { (filename.clone(), None, e) })?;

    Ok(Input {
        doc,
        config,
        filename,
        source,
    })
}

fn analyze(input: &Input, verbose: bool) -> Result<Vec<Diagnostic>, CliError> {
    let fail = |e: CheckError| -> CliError { (input.filename.clone(), input.source.clone(), e) };

    let analyzer = Analyzer::new(&input.config, &input.doc).map_err(fail)?;
    if verbose {
        eprintln!(
            "unionck: {} match(es), {} declared union(s)",
            input.doc.matches.len(),
            analyzer.registry().declared_count()
        );
    }

    let mut diagnostics = vec![];
    for (i, expr) in input.doc.matches.iter().enumerate() {
        let found = analyzer.analyze_match(expr).map_err(fail)?;
        if verbose {
            eprintln!("unionck: match #{i} on `{}`: {} diagnostic(s)", expr.scrutinee, found.len());
        }
        diagnostics.extend(found);
    }
    Ok(diagnostics)
}

fn check(input: &Input, format: Format, verbose: bool) -> Result<bool, CliError> {
    let diagnostics = analyze(input, verbose)?;

    match format {
        Format::Json => {
            let json = diagnostics::to_json(&diagnostics).map_err(|e| -> CliError {
                (input.filename.clone(), None, e.into())
            })?;
            println!("{json}");
        }
        Format::Text => match &input.source {
            Some(source) => {
                let color = std::io::stdout().is_terminal();
                for diagnostic in &diagnostics {
                    print!(
                        "{}",
                        diagnostics::render_report(diagnostic, &input.filename, source, color)
                    );
                }
            }
            None => print!(
                "{}",
                diagnostics::render_text(&diagnostics, &input.filename, None)
            ),
        },
    }

    Ok(!diagnostics::has_errors(&diagnostics))
}

fn fix(input: &Input) -> Result<bool, CliError> {
    let Some(source) = &input.source else {
        return Err((
            input.filename.clone(),
            None,
            CheckError::io_error("no source file: pass --source or set `source` in the snapshot"),
        ));
    };

    let diagnostics = analyze(input, false)?;
    let edits: Vec<_> = diagnostics
        .iter()
        .filter_map(|d| d.fix.as_ref())
        .filter_map(|fix| fix_edit(fix, source))
        .collect();
    let fixed = apply_edits(source, &edits)
        .map_err(|e| (input.filename.clone(), input.source.clone(), e))?;

    print!("{fixed}");
    Ok(true)
}

fn dump(snapshot: &Path) -> Result<bool, CliError> {
    let bare = |e: CheckError| -> CliError { (snapshot.display().to_string(), None, e) };

    let text = std::fs::read_to_string(snapshot).map_err(|e| bare(e.into()))?;
    let doc = Document::from_json(&text).map_err(|e| bare(e.into()))?;
    let json = serde_json::to_string_pretty(&doc).map_err(|e| bare(e.into()))?;
    println!("{json}");
    Ok(true)
}
