use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use hostfacts_parsers::{ParsedFacts, is_supported, parse_spec, supported_specs};
use hostfacts_specs::{CollectionConfig, SpecError, SpecRegistry, SpecSource};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// CLI output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "hostfacts")]
#[command(about = "Parse host facts collected into archive directories")]
struct Cli {
    /// Log resolution and parsing details to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse one captured output with the parser registered for a spec.
    Parse(ParseArgs),
    /// Parse every supported spec found in an archive directory.
    Collect(CollectArgs),
    /// Inspect the spec registry.
    Specs(SpecsArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Spec name (e.g. gluster_v_status).
    #[arg(long)]
    spec: String,
    /// File holding the captured output (default: stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CollectArgs {
    /// Extracted archive directory.
    #[arg(long)]
    archive: PathBuf,
    /// Collection config YAML with registry overrides and filters.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Only collect these specs (repeatable; default: every supported spec).
    #[arg(long = "spec")]
    specs: Vec<String>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct SpecsArgs {
    #[command(subcommand)]
    operation: SpecsOperation,
}

#[derive(Debug, Subcommand)]
enum SpecsOperation {
    /// List registered specs and where they are collected from.
    List(SpecsListArgs),
    /// Show which files each spec resolves to inside an archive.
    Resolve(SpecsResolveArgs),
}

#[derive(Debug, Args)]
struct SpecsListArgs {
    /// Collection config YAML with registry overrides and filters.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SpecsResolveArgs {
    /// Extracted archive directory.
    #[arg(long)]
    archive: PathBuf,
    /// Collection config YAML with registry overrides and filters.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Spec names to resolve (default: every registered spec).
    names: Vec<String>,
}

/// One parsed file of a collected spec.
#[derive(Debug, Serialize)]
struct CollectedFacts {
    spec: String,
    path: PathBuf,
    facts: ParsedFacts,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Collect(args) => run_collect(args),
        Command::Specs(args) => run_specs(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let content = match &args.input {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?,
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            content
        }
    };

    let facts = parse_spec(&args.spec, &content).map_err(|err| err.to_string())?;
    println!("{}", render(&facts, args.format)?);
    Ok(())
}

fn run_collect(args: CollectArgs) -> Result<(), String> {
    if !args.archive.is_dir() {
        return Err(format!(
            "Archive directory '{}' does not exist",
            args.archive.display()
        ));
    }
    if let Some(unsupported) = args.specs.iter().find(|spec| !is_supported(spec)) {
        return Err(format!("no parser registered for spec '{unsupported}'"));
    }

    let config = load_config(args.config.as_deref())?;
    let registry = config.apply(SpecRegistry::builtin());

    let requested: Vec<String> = if args.specs.is_empty() {
        supported_specs().iter().map(|s| s.to_string()).collect()
    } else {
        args.specs
    };
    let specs: Vec<String> = requested
        .into_iter()
        .filter(|spec| config.is_allowed(spec) && registry.contains(spec))
        .collect();
    debug!(count = specs.len(), "collecting specs");

    let mut collected: Vec<CollectedFacts> = specs
        .par_iter()
        .flat_map_iter(|spec| collect_spec(&registry, spec, &args.archive))
        .collect();
    collected.sort_by(|a, b| (&a.spec, &a.path).cmp(&(&b.spec, &b.path)));

    info!(parsed = collected.len(), "collection finished");
    println!("{}", render(&collected, args.format)?);
    Ok(())
}

/// Parses every file collected for `spec`; failures are logged and skipped.
fn collect_spec(registry: &SpecRegistry, spec: &str, archive: &Path) -> Vec<CollectedFacts> {
    let files = match registry.collect(spec, archive) {
        Ok(files) => files,
        Err(SpecError::NotCollected(_)) => {
            debug!(spec, "not present in archive");
            return Vec::new();
        }
        Err(err) => {
            warn!(spec, error = %err, "skipping spec");
            return Vec::new();
        }
    };

    files
        .into_iter()
        .filter_map(|file| match parse_spec(spec, &file.content) {
            Ok(facts) => Some(CollectedFacts {
                spec: file.spec,
                path: file.path,
                facts,
            }),
            Err(err) => {
                warn!(spec, path = %file.path.display(), error = %err, "failed to parse");
                None
            }
        })
        .collect()
}

fn run_specs(args: SpecsArgs) -> Result<(), String> {
    match args.operation {
        SpecsOperation::List(args) => run_specs_list(args),
        SpecsOperation::Resolve(args) => run_specs_resolve(args),
    }
}

fn run_specs_list(args: SpecsListArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let registry = config.apply(SpecRegistry::builtin());

    let issues = registry.validate();
    for issue in &issues {
        eprintln!("warning: {issue}");
    }

    for (name, source) in registry.iter() {
        if !config.is_allowed(name) {
            continue;
        }
        let marker = if is_supported(name) { "*" } else { " " };
        let multi = if source.is_multi_output() { " (multiple files)" } else { "" };
        println!("{marker} {name:<32} {}{multi}", describe_source(source));
    }
    Ok(())
}

fn run_specs_resolve(args: SpecsResolveArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let registry = config.apply(SpecRegistry::builtin());
    let explicit = !args.names.is_empty();

    let names: Vec<String> = if explicit {
        args.names
    } else {
        registry.names().map(str::to_string).collect()
    };

    for name in &names {
        match registry.resolve(name, &args.archive) {
            Ok(paths) => {
                for path in paths {
                    println!("{name}\t{}", path.display());
                }
            }
            Err(SpecError::NotCollected(_)) if explicit => {
                println!("{name}\t(not collected)");
            }
            Err(SpecError::NotCollected(_)) => {}
            Err(err) if explicit => return Err(err.to_string()),
            Err(err) => warn!(spec = %name, error = %err, "failed to resolve"),
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<CollectionConfig, String> {
    match path {
        Some(path) => CollectionConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display())),
        None => Ok(CollectionConfig::default()),
    }
}

fn describe_source(source: &SpecSource) -> String {
    match source {
        SpecSource::Simple { path } => path.clone(),
        SpecSource::Glob {
            pattern,
            ignore: Some(ignore),
        } => format!("{pattern} (ignoring {ignore})"),
        SpecSource::Glob {
            pattern,
            ignore: None,
        } => pattern.clone(),
        SpecSource::FirstOf { sources } => {
            let alternatives: Vec<String> = sources.iter().map(describe_source).collect();
            format!("first of [{}]", alternatives.join(", "))
        }
        SpecSource::Head { of } => format!("first file of {of}"),
    }
}

fn render<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| format!("Failed to serialize output: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|err| format!("Failed to serialize output: {err}")),
    }
}
