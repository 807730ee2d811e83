//! Tincture CLI
//!
//! Build-time companion to the engine: validates DTCG token documents,
//! resolves individual tokens for debugging, and emits theme CSS with its
//! size report.

mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::TinctureConfig;
use tincture_core::{dtcg, Scope, ThemeFile, ThemeStack, Validator};
use tincture_engine::{CssRequest, ThemeEngine, TokenRegistry};

#[derive(Parser)]
#[command(name = "tincture", version, about = "Design-token resolution and theme CSS emission")]
struct Cli {
    /// Path to tincture.toml (or a directory containing one)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate DTCG token documents and print the report
    Validate {
        /// Token documents (falls back to [tokens].sources in tincture.toml)
        files: Vec<PathBuf>,
        /// Reject on any violation instead of downgrading naming issues
        #[arg(long)]
        strict: bool,
    },
    /// Resolve one token and print the outcome
    Resolve {
        /// Token id to resolve
        token: String,
        /// Scope to resolve within (defaults to global)
        #[arg(long)]
        scope: Option<String>,
        /// Token documents
        #[arg(long = "tokens")]
        token_files: Vec<PathBuf>,
        /// Theme files, in stack order
        #[arg(long = "theme")]
        theme_files: Vec<PathBuf>,
    },
    /// Emit theme CSS and its size report
    Emit {
        /// Token documents
        #[arg(long = "tokens")]
        token_files: Vec<PathBuf>,
        /// Theme files, in stack order
        #[arg(long = "theme")]
        theme_files: Vec<PathBuf>,
        /// Class definition file (JSON)
        #[arg(long)]
        classes: Option<PathBuf>,
        /// Output path (defaults to [emit].output, then theme.css)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => TinctureConfig::load(path)?,
        None => TinctureConfig::load(Path::new("tincture.toml")).unwrap_or_default(),
    };

    match cli.command {
        Command::Validate { files, strict } => validate(&config, files, strict),
        Command::Resolve {
            token,
            scope,
            token_files,
            theme_files,
        } => resolve(&config, &token, scope.as_deref(), token_files, theme_files),
        Command::Emit {
            token_files,
            theme_files,
            classes,
            out,
        } => emit(&config, token_files, theme_files, classes, out),
    }
}

fn source_files(config: &TinctureConfig, explicit: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    if !explicit.is_empty() {
        return Ok(explicit);
    }
    let from_config: Vec<PathBuf> = config.tokens.sources.iter().map(PathBuf::from).collect();
    if from_config.is_empty() {
        bail!("no token documents given (pass files or set [tokens].sources in tincture.toml)");
    }
    Ok(from_config)
}

fn theme_files(config: &TinctureConfig, explicit: Vec<PathBuf>) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        explicit
    } else {
        config.tokens.themes.iter().map(PathBuf::from).collect()
    }
}

/// Parse token documents into a fresh engine, printing per-file reports
fn load_engine(files: &[PathBuf], strict: bool) -> Result<ThemeEngine> {
    let validator = Validator::new(strict);
    let mut registry = TokenRegistry::new();
    for file in files {
        let src = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let doc = dtcg::parse_document(&src, strict)
            .with_context(|| format!("Failed to parse {}", file.display()))?;
        if !doc.report.is_clean() {
            eprintln!("{}: {}", file.display(), doc.report);
        }
        let report = registry.load("global", doc.tokens, &validator);
        if !report.is_clean() {
            eprintln!("{}: {}", file.display(), report);
        }
    }
    registry.verify_integrity()?;
    tracing::debug!(tokens = registry.len(), files = files.len(), "registry loaded");
    Ok(ThemeEngine::new(registry))
}

fn load_stack(files: &[PathBuf]) -> Result<ThemeStack> {
    let mut stack = ThemeStack::default();
    for file in files {
        let src = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let theme = ThemeFile::from_json(&src)
            .and_then(ThemeFile::into_definition)
            .with_context(|| format!("Failed to parse {}", file.display()))?;
        stack = stack.push(theme);
    }
    Ok(stack)
}

fn validate(config: &TinctureConfig, files: Vec<PathBuf>, strict: bool) -> Result<()> {
    let files = source_files(config, files)?;
    let strict = strict || config.tokens.strict;
    let validator = Validator::new(strict);

    let mut clean = true;
    for file in &files {
        let src = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let doc = dtcg::parse_document(&src, strict)
            .with_context(|| format!("Failed to parse {}", file.display()))?;
        let mut report = doc.report;
        report.merge(validator.validate_all(&doc.tokens));
        println!("{}: {}", file.display(), report);
        clean &= report.is_clean();
    }
    if !clean {
        bail!("validation failed");
    }
    Ok(())
}

fn resolve(
    config: &TinctureConfig,
    token: &str,
    scope: Option<&str>,
    token_files: Vec<PathBuf>,
    theme_filenames: Vec<PathBuf>,
) -> Result<()> {
    let engine = load_engine(&source_files(config, token_files)?, config.tokens.strict)?;
    let stack = load_stack(&theme_files(config, theme_filenames))?;
    let scope = scope.map(Scope::new);

    let resolved = engine
        .resolve(token, &stack, scope.as_ref())
        .with_context(|| format!("Failed to resolve `{token}`"))?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

fn emit(
    config: &TinctureConfig,
    token_files: Vec<PathBuf>,
    theme_filenames: Vec<PathBuf>,
    classes: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<()> {
    let engine = load_engine(&source_files(config, token_files)?, config.tokens.strict)?;
    let stack = load_stack(&theme_files(config, theme_filenames))?;

    let classes = classes.or_else(|| config.emit.classes.as_ref().map(PathBuf::from));
    let request = match classes {
        Some(path) => {
            let src = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<CssRequest>(&src)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => CssRequest::default(),
    };

    let output = engine.generate_css(&stack, &request);
    let out = out.unwrap_or_else(|| PathBuf::from(&config.emit.output));
    fs::write(&out, &output.css)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    println!(
        "wrote {} ({} bytes: tokens {}, components {}, utilities {})",
        out.display(),
        output.report.total_bytes,
        output.report.tokens_bytes,
        output.report.components_bytes,
        output.report.utilities_bytes
    );
    for overflow in &output.report.over_budget {
        eprintln!("warning: {overflow}");
    }
    Ok(())
}
