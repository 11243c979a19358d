//! Whole-list JSON snapshots of transactions.
//!
//! A snapshot is a single JSON array of objects with the fields `id`, `tanggal`,
//! `nopol`, `hargaBeli`, `biaya` and `hargaJual`. Amounts may be numbers or
//! numeric strings, and a missing or blank amount counts as zero.

use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::Path,
};

use rusqlite::Connection;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    Error,
    tenant::Owner,
    transaction::{FormError, Transaction, TransactionDraft, TransactionForm, create_transaction},
};

/// One transaction as stored in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// The ID the transaction had when the snapshot was taken.
    #[serde(default)]
    pub id: i64,
    /// The sale date, YYYY-MM-DD.
    #[serde(default)]
    pub tanggal: String,
    /// The licence plate.
    #[serde(default)]
    pub nopol: String,
    /// The purchase price.
    #[serde(rename = "hargaBeli", default, deserialize_with = "lenient_amount")]
    pub harga_beli: i64,
    /// Extra costs.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub biaya: i64,
    /// The sale price.
    #[serde(rename = "hargaJual", default, deserialize_with = "lenient_amount")]
    pub harga_jual: i64,
}

impl From<&Transaction> for SnapshotEntry {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id,
            tanggal: transaction.tanggal.to_string(),
            nopol: transaction.nopol.clone(),
            harga_beli: transaction.harga_beli,
            biaya: transaction.biaya,
            harga_jual: transaction.harga_jual,
        }
    }
}

impl SnapshotEntry {
    /// Check the entry the same way the transaction form is checked.
    ///
    /// # Errors
    /// Returns a [FormError] if the date or plate is empty or the date is invalid.
    pub fn draft(&self) -> Result<TransactionDraft, FormError> {
        TransactionForm {
            tanggal: self.tanggal.clone(),
            nopol: self.nopol.clone(),
            harga_beli: self.harga_beli.to_string(),
            biaya: self.biaya.to_string(),
            harga_jual: self.harga_jual.to_string(),
        }
        .validate()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Amount {
    Integer(i64),
    Float(f64),
    Text(String),
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Amount>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Amount::Integer(amount)) => Ok(amount),
        Some(Amount::Float(amount)) => Ok(amount.round() as i64),
        Some(Amount::Text(text)) if text.trim().is_empty() => Ok(0),
        Some(Amount::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("\"{text}\" is not an amount"))),
    }
}

/// Write `transactions` to `path` as one JSON array, replacing the file.
///
/// # Errors
/// Returns [Error::SnapshotError] if the file could not be written.
pub fn write_snapshot(path: &Path, transactions: &[Transaction]) -> Result<(), Error> {
    let entries: Vec<SnapshotEntry> = transactions.iter().map(SnapshotEntry::from).collect();

    let file = File::create(path).map_err(|error| snapshot_error(path, error))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &entries)?;
    writer.flush().map_err(|error| snapshot_error(path, error))?;

    tracing::debug!("Wrote {} transactions to {}", entries.len(), path.display());

    Ok(())
}

/// Read the entries stored at `path`. A file that does not exist reads as an
/// empty list.
///
/// # Errors
/// Returns [Error::SnapshotError] if the file could not be opened and
/// [Error::JSONSerializationError] if it is not a valid snapshot.
pub fn read_snapshot(path: &Path) -> Result<Vec<SnapshotEntry>, Error> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!("No snapshot at {}, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(error) => return Err(snapshot_error(path, error)),
    };

    let entries = serde_json::from_reader(BufReader::new(file))?;

    Ok(entries)
}

/// Save `entries` as new transactions owned by `owner`. Either every entry is
/// saved or none are. Entry IDs are not kept, the database assigns new ones.
///
/// # Errors
/// Returns [Error::InvalidForm] for the first entry that fails validation, or an
/// SQL error if an insert fails.
pub fn import_snapshot(
    entries: &[SnapshotEntry],
    owner: Owner,
    connection: &Connection,
) -> Result<usize, Error> {
    let transaction = connection.unchecked_transaction()?;

    for entry in entries {
        let draft = entry.draft().inspect_err(|error| {
            tracing::error!("Snapshot entry {} is invalid: {error}", entry.id)
        })?;
        create_transaction(&draft, owner, &transaction)?;
    }

    transaction.commit()?;

    Ok(entries.len())
}

fn snapshot_error(path: &Path, error: std::io::Error) -> Error {
    Error::SnapshotError(format!("{}: {error}", path.display()))
}
