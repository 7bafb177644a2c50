use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use bookshelf::shell::Shell;
use bookshelf::{
    logging, BookshelfConfig, CatalogSession, ColumnFilter, Grid, HttpBookStore, NewBook,
    SortDirection, SortSpec,
};

/// Book catalog manager
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(about = "List, search, add and delete books in a remote JSON store", long_about = None)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "bookshelf.toml")]
    config: PathBuf,

    /// Base URL of the document store (overrides the config file)
    #[arg(long)]
    url: Option<String>,

    /// Collection name (overrides the config file)
    #[arg(long)]
    collection: Option<String>,

    /// Debug logging for bookshelf
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Print the catalog grid
    List {
        /// Keep books whose title or author contains TERM (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Sort by this column
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Column filter FIELD=TEXT, repeatable
        #[arg(long = "where", value_name = "FIELD=TEXT")]
        filters: Vec<ColumnFilter>,

        /// Print rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add a book
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        isbn: Option<String>,
        #[arg(long)]
        price: Option<String>,
    },
    /// Delete a book by id
    Delete {
        /// Store keys usually start with '-'
        #[arg(
            allow_hyphen_values = true,
            value_parser = clap::builder::NonEmptyStringValueParser::new()
        )]
        id: String,
    },
    /// Interactive shell
    Shell,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = BookshelfConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?
        .with_overrides(cli.url, cli.collection);
    tracing::debug!(base_url = %config.store.base_url, collection = %config.store.collection, "using store");

    let store = HttpBookStore::from_config(&config.store)?;
    let session = CatalogSession::new(store);
    let mut grid = Grid::default().with_max_column_width(config.grid.max_column_width);

    match cli.command {
        CliCommand::List {
            search,
            sort,
            desc,
            filters,
            json,
        } => {
            if let Some(field) = sort {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                grid.set_sort(Some(SortSpec { field, direction }))?;
            }
            for filter in filters {
                grid.add_filter(filter)?;
            }

            session.reload().await;
            if let Some(term) = search {
                session.set_search_term(term);
            }

            let view = session.view();
            if json {
                println!("{}", serde_json::to_string_pretty(&grid.rows(&view))?);
            } else {
                print!("{}", grid.render(&view));
            }
        }
        CliCommand::Add {
            title,
            author,
            year,
            isbn,
            price,
        } => {
            let mut book = NewBook::new(title, author);
            if let Some(year) = year {
                book = book.with_year(year);
            }
            if let Some(isbn) = isbn {
                book = book.with_isbn(isbn);
            }
            if let Some(price) = price {
                book = book.with_price(price);
            }

            match session.add(book).await {
                Ok(Some(id)) => println!("{}", id),
                Ok(None) => {}
                Err(_) => return Ok(ExitCode::FAILURE),
            }
        }
        CliCommand::Delete { id } => {
            if !session.delete(&id).await {
                return Ok(ExitCode::FAILURE);
            }
        }
        CliCommand::Shell => {
            let input = BufReader::new(tokio::io::stdin());
            Shell::new(session, grid, std::io::stdout())
                .run(input)
                .await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
