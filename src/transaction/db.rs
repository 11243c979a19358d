//! Queries on the `transaksi` table.
//!
//! Every read, update and delete takes a [TransactionScope] so that a viewer can
//! only reach rows of their own company, or only their own rows for plain users.

use rusqlite::{Connection, Row, named_params};

use crate::{
    Error,
    auth::UserID,
    tenant::{CompanyID, Owner, TransactionScope},
    transaction::{Transaction, TransactionDraft, TransactionID},
};

const SCOPE_FILTER: &str = "(:company_id IS NULL OR company_id = :company_id)
    AND (:user_id IS NULL OR user_id = :user_id)";

const COLUMNS: &str = "id, tanggal, nopol, harga_beli, biaya, harga_jual, user_id, company_id";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transaksi (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tanggal TEXT NOT NULL,
                nopol TEXT NOT NULL,
                harga_beli INTEGER NOT NULL,
                biaya INTEGER NOT NULL DEFAULT 0,
                harga_jual INTEGER NOT NULL,
                user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
                company_id INTEGER NOT NULL REFERENCES company(id) ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaksi_company_user ON transaksi(company_id, user_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row selected with [COLUMNS] to a [Transaction].
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        tanggal: row.get(1)?,
        nopol: row.get(2)?,
        harga_beli: row.get(3)?,
        biaya: row.get(4)?,
        harga_jual: row.get(5)?,
        user_id: UserID::new(row.get(6)?),
        company_id: CompanyID::new(row.get(7)?),
    })
}

fn scope_ids(scope: TransactionScope) -> (Option<i64>, Option<i64>) {
    (
        scope.company_id.map(|id| id.as_i64()),
        scope.user_id.map(|id| id.as_i64()),
    )
}

/// Turn a search box value into a LIKE pattern, or `None` for an empty search.
fn search_pattern(search: Option<&str>) -> Option<String> {
    let search = search.map(str::trim).filter(|search| !search.is_empty())?;
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    Some(format!("%{escaped}%"))
}

/// Save `draft` as a new transaction owned by `owner`.
///
/// # Errors
/// Returns [Error::SqlError] if the owner does not exist or the insert fails.
pub fn create_transaction(
    draft: &TransactionDraft,
    owner: Owner,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO transaksi (tanggal, nopol, harga_beli, biaya, harga_jual, user_id, company_id)
            VALUES (:tanggal, :nopol, :harga_beli, :biaya, :harga_jual, :user_id, :company_id)
            RETURNING {COLUMNS}"
        ))?
        .query_row(
            named_params! {
                ":tanggal": draft.tanggal,
                ":nopol": draft.nopol,
                ":harga_beli": draft.harga_beli,
                ":biaya": draft.biaya,
                ":harga_jual": draft.harga_jual,
                ":user_id": owner.user_id.as_i64(),
                ":company_id": owner.company_id.as_i64(),
            },
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get the transaction `id` if it is within `scope`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such transaction in `scope`.
pub fn get_transaction(
    id: TransactionID,
    scope: TransactionScope,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let (company_id, user_id) = scope_ids(scope);

    let transaction = connection
        .prepare(&format!(
            "SELECT {COLUMNS} FROM transaksi WHERE id = :id AND {SCOPE_FILTER}"
        ))?
        .query_row(
            named_params! {
                ":id": id,
                ":company_id": company_id,
                ":user_id": user_id,
            },
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// List the transactions in `scope`, newest first.
///
/// `search` keeps only rows whose licence plate contains it, ignoring ASCII case.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_transactions(
    scope: TransactionScope,
    search: Option<&str>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (company_id, user_id) = scope_ids(scope);

    connection
        .prepare(&format!(
            "SELECT {COLUMNS} FROM transaksi
            WHERE {SCOPE_FILTER}
            AND (:search IS NULL OR nopol LIKE :search ESCAPE '\\')
            ORDER BY id DESC"
        ))?
        .query_map(
            named_params! {
                ":company_id": company_id,
                ":user_id": user_id,
                ":search": search_pattern(search),
            },
            map_transaction_row,
        )?
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Replace the editable fields of transaction `id` with `draft`.
///
/// The owner and company are left untouched. Returns the number of rows changed,
/// which is zero if `id` does not exist or is outside `scope`.
///
/// # Errors
/// Returns [Error::SqlError] if the update fails.
pub fn update_transaction(
    id: TransactionID,
    draft: &TransactionDraft,
    scope: TransactionScope,
    connection: &Connection,
) -> Result<usize, Error> {
    let (company_id, user_id) = scope_ids(scope);

    let rows_affected = connection.execute(
        &format!(
            "UPDATE transaksi
            SET tanggal = :tanggal, nopol = :nopol, harga_beli = :harga_beli,
                biaya = :biaya, harga_jual = :harga_jual
            WHERE id = :id AND {SCOPE_FILTER}"
        ),
        named_params! {
            ":tanggal": draft.tanggal,
            ":nopol": draft.nopol,
            ":harga_beli": draft.harga_beli,
            ":biaya": draft.biaya,
            ":harga_jual": draft.harga_jual,
            ":id": id,
            ":company_id": company_id,
            ":user_id": user_id,
        },
    )?;

    Ok(rows_affected)
}

/// Delete transaction `id`. Returns the number of rows deleted, which is zero if
/// `id` does not exist or is outside `scope`.
///
/// # Errors
/// Returns [Error::SqlError] if the delete fails.
pub fn delete_transaction(
    id: TransactionID,
    scope: TransactionScope,
    connection: &Connection,
) -> Result<usize, Error> {
    let (company_id, user_id) = scope_ids(scope);

    let rows_affected = connection.execute(
        &format!("DELETE FROM transaksi WHERE id = :id AND {SCOPE_FILTER}"),
        named_params! {
            ":id": id,
            ":company_id": company_id,
            ":user_id": user_id,
        },
    )?;

    Ok(rows_affected)
}

/// Count the transactions in `scope`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_transactions(
    scope: TransactionScope,
    connection: &Connection,
) -> Result<u32, Error> {
    let (company_id, user_id) = scope_ids(scope);

    connection
        .query_row(
            &format!("SELECT COUNT(id) FROM transaksi WHERE {SCOPE_FILTER}"),
            named_params! {
                ":company_id": company_id,
                ":user_id": user_id,
            },
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}
