//! Command-line driver for schema-to-TypeScript generation.
//!
//! Walks an input directory for `*.json` schema files, generates one
//! TypeScript module per schema with `tsgen-core`, and writes each module
//! to its derived path under the output root. Per-file failures are
//! collected and reported at the end so one bad schema never discards the
//! output of the good ones.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tsgen_core::schema::SchemaDocument;
use tsgen_core::{Context, Engine, GenerateOptions, Packaging};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(
    name = "tsgen",
    version,
    about = "Generate TypeScript modules from API schema files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript modules from a directory of schema files
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Directory scanned recursively for *.json schema files
    #[arg(long, default_value = "schemas")]
    input: PathBuf,

    /// Root directory the generated modules are written under
    #[arg(long, default_value = "generated")]
    out: PathBuf,

    /// Remote import grammar
    #[arg(long, value_enum, default_value_t = PackagingArg::HostedUrl)]
    packaging: PackagingArg,

    /// Runtime conventions for remote module paths
    #[arg(long, value_enum, default_value_t = EngineArg::Deno)]
    engine: EngineArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum PackagingArg {
    /// Versioned https:// URLs
    HostedUrl,
    /// Scoped bare package specifiers
    BareSpecifier,
}

#[derive(Clone, Copy, ValueEnum)]
enum EngineArg {
    /// Remote paths end in .ts
    Deno,
    /// Remote paths end in .js
    Node,
}

impl GenerateArgs {
    fn options(&self) -> GenerateOptions {
        GenerateOptions {
            packaging: match self.packaging {
                PackagingArg::HostedUrl => Packaging::HostedUrl,
                PackagingArg::BareSpecifier => Packaging::BareSpecifier,
            },
            engine: match self.engine {
                EngineArg::Deno => Engine::Deno,
                EngineArg::Node => Engine::Node,
            },
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => match run_generate(&args) {
            Ok(count) => {
                info!(modules = count, "Generation complete.");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_generate(args: &GenerateArgs) -> Result<usize, String> {
    let schema_files = discover_schema_files(&args.input)?;
    if schema_files.is_empty() {
        return Err(format!(
            "No *.json schema files found under {}",
            args.input.display()
        ));
    }
    debug!(
        input = %args.input.display(),
        count = schema_files.len(),
        "Discovered schema files."
    );

    let options = args.options();
    let mut generated = 0;
    let mut failures = Vec::new();
    for schema_path in &schema_files {
        match generate_file(schema_path, &args.out, options) {
            Ok(module_path) => {
                info!(
                    schema = %schema_path.display(),
                    module = %module_path.display(),
                    "Module generated."
                );
                generated += 1;
            }
            Err(err) => {
                warn!(schema = %schema_path.display(), "Generation failed: {err}");
                failures.push(format!("{}: {err}", schema_path.display()));
            }
        }
    }

    if failures.is_empty() {
        Ok(generated)
    } else {
        Err(format!(
            "{} of {} schema file(s) failed:\n{}",
            failures.len(),
            schema_files.len(),
            failures.join("\n")
        ))
    }
}

/// Collect every `*.json` file under the input root, sorted so modules are
/// generated in a stable order.
fn discover_schema_files(input: &Path) -> Result<Vec<PathBuf>, String> {
    if !input.is_dir() {
        return Err(format!("{} is not a directory", input.display()));
    }
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == "json")
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Generate one schema file and write its module under the output root.
/// Returns the path of the written module.
fn generate_file(
    schema_path: &Path,
    out_root: &Path,
    options: GenerateOptions,
) -> Result<PathBuf, String> {
    let schema_json = fs::read_to_string(schema_path)
        .map_err(|err| format!("Failed to read schema: {err}"))?;
    let schema: SchemaDocument = serde_json::from_str(&schema_json)
        .map_err(|err| format!("Invalid schema JSON: {err}"))?;

    let ctx = Context::new(&schema, options);
    let module_path = out_root.join(ctx.module_path());
    let ts_code = tsgen_core::generate(&schema, options).map_err(|err| err.to_string())?;

    if let Some(parent) = module_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("Failed to create output directory: {err}"))?;
    }
    fs::write(&module_path, &ts_code)
        .map_err(|err| format!("Failed to write module: {err}"))?;

    debug!(
        module = %module_path.display(),
        ts_code_len = ts_code.len(),
        "Module written."
    );
    Ok(module_path)
}
