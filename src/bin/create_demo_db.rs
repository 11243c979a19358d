use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::{Date, macros::date};

use pembukuan_rs::{
    PasswordHash, TransactionDraft, ValidatedPassword, Viewer, add_member, create_transaction,
    initialize_db, parse_email, register_account,
};

/// A utility for creating a demo database for the pembukuan_rs server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The password given to every demo account.
    #[arg(long, default_value = "demo")]
    password: String,
}

const SAMPLE_DEALS: [(Date, &str, i64, i64, i64); 4] = [
    (date!(2024 - 01 - 05), "B 1234 XYZ", 95_000_000, 2_500_000, 105_000_000),
    (date!(2024 - 01 - 18), "D 4567 ABC", 150_000_000, 4_000_000, 149_000_000),
    (date!(2024 - 02 - 02), "F 8901 KL", 60_000_000, 0, 68_500_000),
    (date!(2024 - 02 - 20), "B 2468 TUV", 210_000_000, 7_250_000, 232_000_000),
];

/// Create and populate a database for trying out the app.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path
        .extension()
        .is_none_or(|extension| extension.is_empty())
    {
        eprintln!("Output path must include a file extension (e.g., 'demo.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    let password_hash = || {
        PasswordHash::new(
            ValidatedPassword::new_unchecked(&args.password),
            PasswordHash::DEFAULT_COST,
        )
    };

    println!("Creating demo accounts...");
    let owner = register_account(
        parse_email("owner@jayamotor.id")?,
        password_hash()?,
        "Jaya Motor",
        &connection,
    )?;
    let staff = add_member(
        parse_email("staff@jayamotor.id")?,
        password_hash()?,
        owner.company_id,
        &connection,
    )?;
    let other_admin = register_account(
        parse_email("admin@sentosamobil.id")?,
        password_hash()?,
        "Sentosa Mobil",
        &connection,
    )?;

    println!("Creating sample transactions...");
    for (index, (tanggal, nopol, harga_beli, biaya, harga_jual)) in
        SAMPLE_DEALS.into_iter().enumerate()
    {
        let creator: &Viewer = match index % 3 {
            0 => &owner,
            1 => &staff,
            _ => &other_admin,
        };
        let draft = TransactionDraft {
            tanggal,
            nopol: nopol.to_owned(),
            harga_beli,
            biaya,
            harga_jual,
        };
        create_transaction(&draft, creator.owner(), &connection)?;
    }

    println!("Success! Log in as owner@jayamotor.id, staff@jayamotor.id or admin@sentosamobil.id.");

    Ok(())
}
