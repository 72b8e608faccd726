//! DCAT Catalog Rectification CLI
//!
//! Command-line tool for importing a paginated DCAT export, reporting its
//! defects and displaying the rectified catalog.

use std::fs;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::{json, Value};

use dcat_rectify::{
    frame_category, import, CachedHttpSource, CatalogError, Category, CompactGraph, FrameSpec,
    FramedResource, Graph, GraphOptions, ImportOptions, ImportReport, ProcessorCompactor,
    PropertyOrder, Simplifier,
};

const DEFAULT_URL_PREFIX: &str = "https://preprod.data.developpement-durable.gouv.fr/dcat/catalog";

#[derive(Parser)]
#[command(name = "dcat-rectify")]
#[command(about = "Import, rectify and display a DCAT catalog export")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Increase log verbosity (repeatable)
    #[arg(short, long = "verbose", action = ArgAction::Count, global = true)]
    verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// URL of the catalog; pages are read from <prefix>/jsonld?page=N
    #[arg(long, default_value = DEFAULT_URL_PREFIX, global = true)]
    url_prefix: String,

    /// Directory caching the fetched pages
    #[arg(long, default_value = "json", global = true)]
    cache_dir: PathBuf,

    /// Only use cached pages
    #[arg(long, global = true)]
    offline: bool,

    /// First page to import
    #[arg(long, default_value_t = 1, global = true)]
    first_page: u32,

    /// Last page to import (default: announced by the export)
    #[arg(long, global = true)]
    last_page: Option<u32>,

    /// Don't tag plain titles, descriptions and names as French
    #[arg(long, global = true)]
    no_default_language: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pages that could not be loaded and the rejected records
    Errors,
    /// Print ingestion and rectification counters as YAML
    Stats,
    /// Display the simplified resources of a category
    Show(ShowArgs),
    /// Write the rectified graph as expanded JSON-LD
    Export(ExportArgs),
    /// Compact resources against a JSON-LD context, in a fixed property order
    Compact(CompactArgs),
}

#[derive(Args)]
struct ShowArgs {
    /// Category to display, e.g. Dataset, Catalog, DataService, GenResource
    category: Category,

    /// Include blank nodes
    #[arg(long)]
    blank_nodes: bool,

    /// Embed distributions in datasets and access services in distributions
    #[arg(long)]
    frame: bool,

    /// Print JSON instead of YAML
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExportArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct CompactArgs {
    /// JSON-LD context file
    #[arg(long)]
    context: PathBuf,

    /// Property order file (YAML or JSON), keyed by compacted type name
    #[arg(long)]
    order: Option<PathBuf>,

    /// Only compact this category (default: the whole graph)
    #[arg(long)]
    category: Option<Category>,

    /// Embed distributions before compacting (datasets unless --category is given)
    #[arg(long)]
    frame: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

/// Import the configured pages into a new graph
fn load(args: &SourceArgs) -> Result<(Graph, ImportReport), CatalogError> {
    let source = CachedHttpSource::new(args.url_prefix.as_str(), args.cache_dir.as_path())
        .offline(args.offline);
    let options = ImportOptions {
        first_page: args.first_page,
        last_page: args.last_page,
    };
    let mut graph = Graph::new(GraphOptions {
        default_language: if args.no_default_language {
            None
        } else {
            GraphOptions::default().default_language
        },
    });

    let report = import(&mut graph, &source, &options)?;
    eprintln!(
        "Loaded {} pages, {} resources ({} page errors, {} rejected records)",
        report.pages_loaded,
        graph.len(),
        report.errors.len(),
        report.rejected.len()
    );
    Ok((graph, report))
}

/// Write output to file or stdout
fn write_output(content: &str, output: Option<&PathBuf>) -> Result<(), CatalogError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

fn run_errors(source: &SourceArgs) -> Result<(), CatalogError> {
    let (_, report) = load(source)?;
    for (page, error) in &report.errors {
        println!("page {}: {}", page, error);
    }
    for rejected in &report.rejected {
        println!(
            "page {}: record {} rejected: {}",
            rejected.page,
            rejected.id.as_deref().unwrap_or("without @id"),
            rejected.reason
        );
    }
    Ok(())
}

fn run_stats(source: &SourceArgs) -> Result<(), CatalogError> {
    let (graph, report) = load(source)?;
    let summary = json!({
        "records": graph.stats(),
        "rectifications": graph.rectify_stats(),
        "statements": report.statements,
    });
    print!("{}", serde_yaml::to_string(&summary)?);
    Ok(())
}

fn run_show(source: &SourceArgs, args: ShowArgs) -> Result<(), CatalogError> {
    let (graph, _) = load(source)?;
    let spec = args.frame.then(FrameSpec::distributions);

    let mut simplifier = Simplifier::new(&graph);
    let view = simplifier.simplify_category(args.category, args.blank_nodes, spec.as_ref())?;
    let failures: usize = simplifier.deref_failures().values().sum();
    if failures > 0 {
        eprintln!("{} references could not be dereferenced", failures);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", serde_yaml::to_string(&view)?);
    }
    Ok(())
}

fn run_export(source: &SourceArgs, args: ExportArgs) -> Result<(), CatalogError> {
    let (graph, _) = load(source)?;
    let document = Value::Array(graph.all_as_json_ld());
    let output = if args.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    write_output(&output, args.output.as_ref())
}

fn run_compact(source: &SourceArgs, args: CompactArgs) -> Result<(), CatalogError> {
    let context: Value = serde_json::from_str(&fs::read_to_string(&args.context)?)?;
    let order: PropertyOrder = match &args.order {
        Some(path) => serde_yaml::from_str(&fs::read_to_string(path)?)?,
        None => PropertyOrder::new(),
    };

    let (graph, _) = load(source)?;
    let expanded: Vec<Value> = match (args.category, args.frame) {
        (category, true) => frame_category(
            &graph,
            category.unwrap_or(Category::Dataset),
            &FrameSpec::distributions(),
        )?
        .iter()
        .map(FramedResource::as_json_ld)
        .collect(),
        (Some(category), false) => graph.category_as_json_ld(category),
        (None, false) => graph.all_as_json_ld(),
    };

    let compacted = CompactGraph::compact_with(&ProcessorCompactor, &expanded, &context)?;
    let output = compacted.to_json_string(&order, args.pretty)?;
    write_output(&output, args.output.as_ref())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .module("dcat_rectify")
        .verbosity(cli.verbosity as usize)
        .init()
    {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Errors => run_errors(&cli.source),
        Commands::Stats => run_stats(&cli.source),
        Commands::Show(args) => run_show(&cli.source, args),
        Commands::Export(args) => run_export(&cli.source, args),
        Commands::Compact(args) => run_compact(&cli.source, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
