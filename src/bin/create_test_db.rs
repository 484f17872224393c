use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use category_tree::{
    NameCase,
    category::{CategoryName, create_category},
    initialize_db,
    product::set_product_categories,
};

/// A utility for creating a test database for the category_tree web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
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

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn, NameCase::Sensitive)?;

    println!("Creating test categories...");

    let electronics = create_category(&conn, CategoryName::new("Electronics")?, None)?;
    let phones = create_category(&conn, CategoryName::new("Phones")?, Some(electronics.id))?;
    let smartphones = create_category(&conn, CategoryName::new("Smartphones")?, Some(phones.id))?;
    let laptops = create_category(&conn, CategoryName::new("Laptops")?, Some(electronics.id))?;
    let books = create_category(&conn, CategoryName::new("Books")?, None)?;
    create_category(&conn, CategoryName::new("Fiction")?, Some(books.id))?;

    println!("Linking test products...");

    set_product_categories(&conn, 1, &[smartphones.id])?;
    set_product_categories(&conn, 2, &[smartphones.id, electronics.id])?;
    set_product_categories(&conn, 3, &[laptops.id])?;
    set_product_categories(&conn, 4, &[books.id])?;

    println!("Success!");

    Ok(())
}
