use clap::Parser;
use querier::process_queries;
use search_core::{persist, PageDir};
use std::io;
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "querier")]
#[command(about = "Answer boolean keyword queries over a crawled corpus")]
struct Cli {
    /// Directory produced by the crawler
    page_directory: String,
    /// Index file produced by the indexer
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

    let index = match persist::load_index(&cli.index_filename) {
        Ok(index) => index,
        Err(err) => {
            eprintln!("cannot load index from {}: {err:#}", cli.index_filename);
            process::exit(3);
        }
    };

    let stdin = io::stdin();
    if let Err(err) = process_queries(stdin.lock(), io::stdout(), &index, &pages) {
        eprintln!("querier failed: {err:#}");
        process::exit(1);
    }
}
