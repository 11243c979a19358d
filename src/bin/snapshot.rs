use std::{error::Error, path::PathBuf, process::exit};

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use pembukuan_rs::{
    TransactionScope, Viewer, get_user_by_email, get_viewer, import_snapshot, initialize_db,
    list_transactions, parse_email, read_snapshot, write_snapshot,
};

/// Copies transactions between the database and a JSON snapshot file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write every transaction of the company that `email` belongs to.
    Export {
        /// The email address of a member of the company.
        #[arg(long)]
        email: String,

        /// Where to write the snapshot.
        #[arg(long, short)]
        output_path: PathBuf,
    },
    /// Add the transactions in a snapshot, owned by the user with `email`.
    Import {
        /// The email address of the user who will own the imported rows.
        #[arg(long)]
        email: String,

        /// The snapshot to read.
        #[arg(long, short)]
        input_path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    match args.command {
        Command::Export { email, output_path } => {
            let viewer = find_viewer(&email, &connection)?;
            let scope = TransactionScope {
                company_id: Some(viewer.company_id),
                user_id: None,
            };
            let transactions = list_transactions(scope, None, &connection)?;
            write_snapshot(&output_path, &transactions)?;
            println!(
                "Wrote {} transactions to {output_path:#?}",
                transactions.len()
            );
        }
        Command::Import { email, input_path } => {
            if !input_path.is_file() {
                eprintln!("File does not exist at {input_path:#?}!");
                exit(1);
            }

            let viewer = find_viewer(&email, &connection)?;
            let entries = read_snapshot(&input_path)?;
            let imported = import_snapshot(&entries, viewer.owner(), &connection)?;
            println!("Imported {imported} transactions from {input_path:#?}");
        }
    }

    Ok(())
}

fn find_viewer(raw_email: &str, connection: &Connection) -> Result<Viewer, pembukuan_rs::Error> {
    let email = parse_email(raw_email)?;
    let user = get_user_by_email(&email, connection)?;

    get_viewer(user.id, connection)
}
