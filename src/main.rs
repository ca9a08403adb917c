// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use pagecast::utils::logging::{format_error, format_info, format_success, format_warning};
use pagecast::{
    CatalogLookup, CommandRecognizer, Config, ConsoleSink, JsonSink, OperationTimer, PlayerSink,
    RecognizedText, ResultSink, SearchOrchestrator, TextRecognizer, lookup,
};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pagecast")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Find the instructional video for a photographed page", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputKind {
    Console,
    Json,
    Play,
}

#[derive(clap::Args)]
struct OutputArgs {
    #[arg(short, long, value_enum, default_value_t = OutputKind::Console)]
    output: OutputKind,

    /// Write the json result to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    json_file: Option<PathBuf>,

    #[arg(short, long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize text in an image and resolve it to a video
    Scan {
        image: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Resolve already recognized text (argument or stdin) to a video
    Resolve {
        text: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the keywords that would be looked up
    Tokenize { text: Option<String> },

    /// Check the configured video catalog
    Catalog {
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    pagecast::utils::logging::init_logger(cli.color, cli.verbose);

    let config = if cli.config.exists() {
        info!("Loading configuration from: {}", cli.config.display());
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Scan { image, output } => {
            cmd_scan(&config, image, &output, cli.verbose).await?;
        }
        Commands::Resolve { text, output } => {
            cmd_resolve(&config, text, &output, cli.verbose).await?;
        }
        Commands::Tokenize { text } => {
            cmd_tokenize(text).await?;
        }
        Commands::Catalog { path } => {
            cmd_catalog(&config, path)?;
        }
    }

    Ok(())
}

async fn cmd_scan(config: &Config, image: PathBuf, output: &OutputArgs, verbose: bool) -> Result<()> {
    let timer = OperationTimer::new("text recognition");
    let recognizer = CommandRecognizer::new(config.recognition.clone());
    let text = recognizer
        .recognize(&image)
        .await
        .with_context(|| format!("Failed to recognize text in {}", image.display()))?;
    timer.finish();

    if text.is_empty() {
        warn!("No text recognized in {}", image.display());
    }

    run_search(config, &text, output, verbose).await
}

async fn cmd_resolve(
    config: &Config,
    text: Option<String>,
    output: &OutputArgs,
    verbose: bool,
) -> Result<()> {
    let text = RecognizedText::new(read_text(text).await?);
    run_search(config, &text, output, verbose).await
}

async fn run_search(
    config: &Config,
    text: &RecognizedText,
    output: &OutputArgs,
    verbose: bool,
) -> Result<()> {
    let store = lookup::from_config(&config.store).context("Failed to open video store")?;
    let orchestrator = SearchOrchestrator::new(store, &config.search);
    let sink = build_sink(config, output, verbose);

    let resolution = orchestrator
        .run(text, sink.as_ref())
        .await
        .context("Failed to deliver search result")?;

    info!(
        "Search {} finished in {} ms",
        resolution.search_id, resolution.stats.duration_ms
    );

    Ok(())
}

fn build_sink(config: &Config, output: &OutputArgs, verbose: bool) -> Box<dyn ResultSink> {
    match output.output {
        OutputKind::Console => Box::new(ConsoleSink::new(verbose)),
        OutputKind::Json => Box::new(JsonSink::new(output.json_file.clone(), output.pretty)),
        OutputKind::Play => Box::new(PlayerSink::new(config.playback.clone())),
    }
}

async fn cmd_tokenize(text: Option<String>) -> Result<()> {
    let text = RecognizedText::new(read_text(text).await?);
    let keywords = pagecast::Tokenizer::new().tokenize(&text);

    println!("{}", format_info(&format!("{} keyword(s)", keywords.len())));
    for (index, keyword) in keywords.iter().enumerate() {
        println!("  {:>3}. {}", index + 1, keyword);
    }

    Ok(())
}

fn cmd_catalog(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| config.store.catalog_path.clone());
    info!("Checking catalog {}", path.display());

    let catalog = CatalogLookup::load(&path).context("Failed to load catalog")?;
    let stats = catalog.stats();

    println!("{}", format_info(&format!("Records: {}", stats.records)));
    println!(
        "{}",
        format_info(&format!("Distinct keywords: {}", stats.distinct_keywords))
    );

    if stats.malformed_urls.is_empty() {
        println!("{}", format_success("All video URLs are well formed"));
    } else {
        println!(
            "{}",
            format_warning(&format!(
                "{} record(s) with malformed video URLs",
                stats.malformed_urls.len()
            ))
        );
        for url in &stats.malformed_urls {
            println!("  {}", format_error(url));
        }
    }

    Ok(())
}

async fn read_text(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}
