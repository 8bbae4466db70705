use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use budget_buddy::{
    CategoryName, PasswordHash, RawPassword, TransactionType, Username, create_user,
    initialize_db, insert_category, parse_email,
};

/// A utility for creating a test database for the REST API server of Budget Buddy.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const TEST_EMAIL: &str = "test@example.com";
const TEST_PASSWORD: &str = "test";

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

    initialize_db(&conn)?;

    println!("Creating test user {TEST_EMAIL} with the password \"{TEST_PASSWORD}\"...");

    let password_hash = PasswordHash::new(
        &RawPassword::new(TEST_PASSWORD)?,
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        Username::new("test")?,
        parse_email(TEST_EMAIL)?,
        password_hash,
        &conn,
    )?;

    println!("Creating starter categories...");

    for (name, kind) in [
        ("salary", TransactionType::Income),
        ("food", TransactionType::Expense),
        ("rent", TransactionType::Expense),
        ("transport", TransactionType::Expense),
    ] {
        insert_category(user.id, CategoryName::new(name)?, kind, &conn)?;
    }

    println!("Success!");

    Ok(())
}
