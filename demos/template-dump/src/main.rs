//! Prints component templates and tool metadata as JSON.

mod tools;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use component_config::load_catalog;
use component_schema::{ModuleExports, ModuleRegistry};
use component_telemetry::tracing_support;
use component_tools::{SourceToolExtractor, ToolCatalog};
use serde_json::Value;
use tracing::info;

#[derive(Parser)]
#[command(name = "template-dump", about = "Inspect flow-builder component templates")]
struct Cli {
    /// Fallback log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the template of a component declared in a catalog
    Template(Template),
    /// Extract tool metadata from a factory source file
    Tool(Tool),
    /// List the tools registered in this binary
    Tools,
}

#[derive(Args)]
struct Template {
    /// Path to the JSON catalog
    catalog: PathBuf,
    /// Class name of the component
    name: String,
    /// Look the component up in the factory registry instead of the class registry
    #[arg(long)]
    factory: bool,
}

#[derive(Args)]
struct Tool {
    /// Path to a Rust file holding the factory function
    file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_support::init(&cli.log)?;

    let output = match cli.command {
        Commands::Template(args) => template(&args)?,
        Commands::Tool(Tool { file }) => {
            let source = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let params = SourceToolExtractor::new(tools::constructors()?)
                .try_extract(&source)
                .with_context(|| format!("extracting tool metadata from {}", file.display()))?;
            serde_json::to_value(params)?
        }
        Commands::Tools => {
            let catalog = ToolCatalog::discovered()?;
            let extractor = SourceToolExtractor::new(tools::constructors()?);
            serde_json::to_value(catalog.describe(&extractor))?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn template(args: &Template) -> Result<Value> {
    let catalog = load_catalog(&args.catalog)
        .with_context(|| format!("loading catalog {}", args.catalog.display()))?;
    let builder = catalog.schema_builder(modules()?)?;

    let signature = if args.factory {
        builder.build_from_registered_factory(&args.name, catalog.factory_registry())?
    } else {
        builder.build_from_registered_class(&args.name, catalog.class_registry())?
    };
    info!(component = %args.name, fields = signature.template().fields().len(), "template built");

    Ok(serde_json::to_value(signature)?)
}

/// Default factories available to catalogs loaded by this binary.
fn modules() -> Result<Arc<ModuleRegistry>> {
    let mut registry = ModuleRegistry::new();
    registry.register(
        ModuleExports::new("langchain.chains.base").with_function("default_tools", || {
            let catalog = ToolCatalog::discovered()
                .map_err(|err| component_schema::DefaultFactoryError::invocation(err.to_string()))?;
            Ok(catalog.keys().collect::<Vec<_>>().into())
        }),
    )?;
    Ok(Arc::new(registry))
}
