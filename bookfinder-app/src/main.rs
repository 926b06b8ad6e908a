use anyhow::{Context, Result};
use bookfinder_catalog::{CatalogClient, CoverSize, SearchField, SortOrder};
use bookfinder_common::observability::init_logging;
use bookfinder_config::{BookfinderConfig, BookfinderConfigLoader, default_config_path};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

mod render;
mod wiring;

const SEARCH_FAILED: &str = "Failed to search books. Please try again.";

/// Quick searches offered on an empty query.
const SUGGESTIONS: [&str; 5] = [
    "Harry Potter",
    "Machine Learning",
    "Shakespeare",
    "Python Programming",
    "Psychology",
];

#[derive(Parser)]
#[command(name = "bookfinder", version)]
#[command(about = "Search the Open Library catalog")]
struct Cli {
    /// YAML config file; defaults to the platform config dir when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[arg(long, value_enum, default_value_t = By::Title)]
        by: By,
        #[arg(long, value_enum, default_value_t = Sort::Relevance)]
        sort: Sort,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Raw document for a work or edition key.
    Details { key: String },
    /// Raw document for an author key.
    Author { key: String },
    Cover {
        id: i64,
        #[arg(long, default_value = "M")]
        size: CoverSize,
    },
    Suggestions,
    /// Print the effective configuration.
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum By {
    Title,
    Author,
    Subject,
    Isbn,
    Publisher,
    Any,
}

impl From<By> for SearchField {
    fn from(by: By) -> Self {
        match by {
            By::Title => SearchField::Title,
            By::Author => SearchField::Author,
            By::Subject => SearchField::Subject,
            By::Isbn => SearchField::Isbn,
            By::Publisher => SearchField::Publisher,
            By::Any => SearchField::Generic,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Sort {
    Relevance,
    Newest,
    Oldest,
    Title,
    Author,
}

impl From<Sort> for SortOrder {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Relevance => SortOrder::Relevance,
            Sort::Newest => SortOrder::Newest,
            Sort::Oldest => SortOrder::Oldest,
            Sort::Title => SortOrder::Title,
            Sort::Author => SortOrder::Author,
        }
    }
}

fn load_config(explicit: Option<&PathBuf>) -> Result<BookfinderConfig> {
    let loader = BookfinderConfigLoader::new();
    let loader = match (explicit, default_config_path()) {
        (Some(path), _) => loader.with_file(path),
        (None, Some(path)) => loader.with_optional_file(path),
        (None, None) => loader,
    };
    loader.load().context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1) Config (env wins), then logging from it
    let cfg = load_config(cli.config.as_ref())?;
    let log_path = init_logging(wiring::log_config(&cfg))?;
    tracing::debug!(log = %log_path.display(), "bookfinder.start");

    let client = wiring::build_client(&cfg)?;
    run(cli.command, &cfg, &client).await
}

async fn run(command: Command, cfg: &BookfinderConfig, client: &CatalogClient) -> Result<ExitCode> {
    match command {
        Command::Search {
            query,
            by,
            sort,
            limit,
            offset,
            json,
        } => {
            let mut req = client.request(query.join(" "), by.into(), sort.into())?;
            if let Some(limit) = limit {
                req = req.with_limit(limit);
            }
            if let Some(offset) = offset {
                req = req.with_offset(offset);
            }

            let outcome = match client.search(&req).await {
                Ok(outcome) => outcome,
                Err(error) => {
                    tracing::error!(%error, "bookfinder.search.failed");
                    eprintln!("{SEARCH_FAILED}");
                    return Ok(ExitCode::FAILURE);
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                if outcome.is_sample_data() {
                    eprintln!("Catalog unreachable; showing sample books.");
                }
                print!("{}", render::cards(client, &outcome.books));
            }
        }
        Command::Details { key } => {
            let doc = client.book_details(&key).await?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Author { key } => {
            let doc = client.author_info(&key).await?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Cover { id, size } => match client.cover_url(Some(id), size) {
            Some(url) => println!("{url}"),
            None => {
                eprintln!("No cover for id {id}");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Suggestions => {
            for s in SUGGESTIONS {
                println!("{s}");
            }
        }
        Command::Config => {
            print!("{}", serde_yaml::to_string(cfg)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}
