use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use budget_buddy::{PasswordHash, RawPassword, User, get_user_by_email, update_password};

/// A utility for changing the password for a registered user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The email address the user registered with.
    #[arg(long)]
    email: String,

    /// The bcrypt cost for hashing the new password.
    #[arg(long, default_value_t = PasswordHash::DEFAULT_COST)]
    bcrypt_cost: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    let connection = Connection::open(db_path)?;
    let user = get_user(&args.email, &connection);
    println!("Resetting password for {} ({})", user.username.as_ref(), user.email);

    let Some(password_hash) = get_new_password_hash(args.bcrypt_cost) else {
        return Ok(());
    };

    update_password(user.id, &password_hash, &connection)?;
    println!("Password updated successfully!");

    Ok(())
}

fn get_user(email: &str, connection: &Connection) -> User {
    match get_user_by_email(email, connection) {
        Ok(user) => user,
        Err(error) => {
            print_error(format!("Could not find a user with the email {email}: {error}"));
            exit(1);
        }
    }
}

fn validate_db_path(db_path: &Path) {
    match db_path.extension() {
        None => {
            print_error("Database path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            print_error("Database path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if !db_path.is_file() {
        print_error(format!("File does not exist at {db_path:#?}!"));
        exit(1);
    }
}

fn prompt_password(prompt: &str) -> Option<String> {
    match rpassword::prompt_password(prompt) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn get_new_password_hash(cost: u32) -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = prompt_password("Enter a new password: ")?;

        let password = match RawPassword::new(&first_password) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = prompt_password("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(&password, cost) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
            }
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
