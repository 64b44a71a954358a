use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::*;
use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use codespan_reporting::term::{self, Config as TermConfig};
use colored::Colorize;
use go_model::ast::Span;
use log::{error, info, warn, LevelFilter};
use simplelog::{Config as LogConfig, SimpleLogger, TermLogger, TerminalMode};

use conformance::EvyRunner;
use options::Options;

mod conformance;
mod options;

#[derive(Parser)]
#[clap(
    name = env!("CARGO_BIN_NAME"),
    about = "Translate Go test fixtures into Evy programs. Accepts a single .go file or a directory; directory batches continue past per-file failures.",
    rename_all = "kebab-case",
    author,
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Args {
    /// Path to a .go file or a directory of .go files.
    path: PathBuf,

    /// Run the external conformance check (`evy test`) on each artifact.
    #[clap(long)]
    check: bool,

    /// Conformance executable to invoke.
    #[clap(long = "evy")]
    evy_binary: Option<String>,

    /// Path to a TOML options file.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let options = match load_options(&args) {
        Ok(options) => options,
        Err(err) => return fail(err),
    };

    let level = match args.verbose {
        0 => options.verbosity_level,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if TermLogger::init(level, LogConfig::default(), TerminalMode::Mixed).is_err() {
        let _ = SimpleLogger::init(level, LogConfig::default());
    }

    if let Err(err) = run(&args, &options) {
        fail(err);
    }
}

fn fail(err: anyhow::Error) {
    let err = format!("{:?}", err);
    println!("{}", err.bold().red());
    std::process::exit(1);
}

fn load_options(args: &Args) -> anyhow::Result<Options> {
    let mut options = Options::load(args.config.as_deref())?;
    if let Some(binary) = &args.evy_binary {
        options.evy_binary = binary.clone();
    }
    if args.check {
        options.run_conformance = true;
    }
    Ok(options)
}

/// Process-level errors (a missing or invalid path) are the only thing
/// that affects the exit code; per-file failures are reported and the
/// batch moves on.
fn run(args: &Args, options: &Options) -> anyhow::Result<()> {
    let meta = fs::metadata(&args.path)
        .with_context(|| format!("invalid path `{}`", args.path.display()))?;

    if meta.is_dir() {
        let pattern = args.path.join("*.go");
        let pattern = pattern
            .to_str()
            .with_context(|| format!("non-UTF-8 path `{}`", args.path.display()))?;
        let mut paths: Vec<PathBuf> = glob::glob(pattern)
            .context("invalid glob pattern")?
            .filter_map(Result::ok)
            .collect();
        paths.sort();
        if paths.is_empty() {
            warn!("no .go files under {}", args.path.display());
        }
        for path in paths {
            if let Err(err) = process_file(&path, options) {
                error!("{}: {:#}", path.display(), err);
            }
        }
    } else if let Err(err) = process_file(&args.path, options) {
        error!("{}: {:#}", args.path.display(), err);
    }
    Ok(())
}

fn process_file(path: &Path, options: &Options) -> anyhow::Result<()> {
    info!("translating {}", path.display());
    let source = fs::read_to_string(path)
        .with_context(|| format!("cannot read `{}`", path.display()))?;

    let file = match go_model::parse(&source) {
        Ok(file) => file,
        Err(err) => {
            report_span(path, &source, err.span, &err.to_string());
            anyhow::bail!("parse failed");
        }
    };
    let type_info = match go_model::check(&file) {
        Ok(info) => info,
        Err(err) => {
            report_span(path, &source, err.span, &err.to_string());
            anyhow::bail!("type check failed");
        }
    };

    let translation = evy_backend::translate(&file, &type_info);
    report_diagnostics(path, &source, &translation.diagnostics);
    if translation.has_errors() {
        let errors = translation
            .diagnostics
            .iter()
            .filter(|d| d.is_error())
            .count();
        anyhow::bail!("translation failed with {} error(s)", errors);
    }

    let artifact = path.with_extension("evy");
    fs::write(&artifact, &translation.output)
        .with_context(|| format!("cannot write `{}`", artifact.display()))?;
    info!("wrote {}", artifact.display());

    if options.run_conformance {
        let runner = EvyRunner {
            binary: options.evy_binary.clone(),
        };
        match runner.run(&artifact) {
            Ok(result) => {
                println!(
                    "exit code for {} is {}",
                    artifact.display(),
                    result
                        .exit_code
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "unknown".to_string())
                );
                if !result.success {
                    println!("{}", result.all_output);
                }
            }
            Err(err) => warn!("conformance check skipped: {:#}", err),
        }
    }
    Ok(())
}

fn report_span(path: &Path, source: &str, span: Span, message: &str) {
    let diagnostic = CsDiagnostic::error()
        .with_message(message.to_string())
        .with_labels(vec![Label::primary(
            (),
            span.start as usize..span.end as usize,
        )]);
    emit(path, source, &[diagnostic]);
}

fn report_diagnostics(path: &Path, source: &str, diagnostics: &[evy_backend::Diagnostic]) {
    let rendered: Vec<_> = diagnostics.iter().map(|d| d.to_codespan()).collect();
    emit(path, source, &rendered);
}

fn emit(path: &Path, source: &str, diagnostics: &[CsDiagnostic<()>]) {
    let file = SimpleFile::new(path.display().to_string(), source);
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = TermConfig::default();
    for diagnostic in diagnostics {
        let _ = term::emit(&mut writer.lock(), &config, &file, diagnostic);
    }
}
