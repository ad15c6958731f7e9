use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;
use std::time::Duration;

use clap::Parser;
use rusqlite::Connection;

use sales_dashboard::{
    DEFAULT_SEED_URL, Sale, SeedSource, count_sales, fetch_seed_records, initialize_db,
    insert_sales,
};

/// A utility for creating a seeded test database for the sales dashboard server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// A local JSON file holding an array of sales to load instead of downloading the dataset.
    #[arg(long, conflicts_with = "seed_url")]
    seed_file: Option<PathBuf>,

    /// Where to download the seed dataset from when no seed file is given.
    #[arg(long, default_value = DEFAULT_SEED_URL)]
    seed_url: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let sales = match &args.seed_file {
        Some(seed_file) => {
            println!("Reading sales from {seed_file:#?}");
            let contents = fs::read_to_string(seed_file)?;
            serde_json::from_str::<Vec<Sale>>(&contents)?
        }
        None => {
            println!("Downloading sales from {}", args.seed_url);
            let source = SeedSource::new(&args.seed_url, Duration::from_secs(30))?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(fetch_seed_records(&source))?
        }
    };

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Inserting {} sales...", sales.len());
    insert_sales(&sales, &conn)?;

    println!("Success! The database holds {} sales.", count_sales(&conn)?);

    Ok(())
}
