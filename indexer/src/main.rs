use clap::Parser;
use search_core::{persist, InvertedIndex, PageDir};
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "indexer")]
#[command(about = "Build an inverted index over a crawled page directory")]
struct Cli {
    /// Directory produced by the crawler
    page_directory: String,
    /// Output index file
    index_filename: String,
}

fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let pages = PageDir::new(&cli.page_directory);
    if !pages.verify() {
        eprintln!("{} is not a crawled page directory", cli.page_directory);
        process::exit(2);
    }

    let index = InvertedIndex::build(&pages);
    if let Err(err) = persist::save_index(&cli.index_filename, &index) {
        eprintln!("cannot write index to {}: {err:#}", cli.index_filename);
        process::exit(3);
    }
    tracing::info!(file = %cli.index_filename, words = index.len(), "index saved");
}
