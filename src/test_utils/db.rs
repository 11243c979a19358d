use rusqlite::Connection;

use crate::{
    auth::{PasswordHash, parse_email},
    db::initialize,
    tenant::{CompanyID, Viewer, add_member, register_account},
    transaction::{Transaction, TransactionDraft, create_transaction},
};

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory");
    initialize(&connection).expect("Could not initialize database");
    connection
}

/// Register an account that owns a new company. The first account in the
/// database is the super admin, every later one is an admin.
#[track_caller]
pub(crate) fn register_test_account(
    connection: &Connection,
    email: &str,
    company_name: &str,
) -> Viewer {
    register_account(
        parse_email(email).expect("invalid test email"),
        PasswordHash::new_unchecked("hunter2"),
        company_name,
        connection,
    )
    .expect("Could not register test account")
}

#[track_caller]
pub(crate) fn add_test_member(
    connection: &Connection,
    email: &str,
    company_id: CompanyID,
) -> Viewer {
    add_member(
        parse_email(email).expect("invalid test email"),
        PasswordHash::new_unchecked("hunter2"),
        company_id,
        connection,
    )
    .expect("Could not add test member")
}

#[track_caller]
pub(crate) fn create_test_transaction(
    connection: &Connection,
    viewer: &Viewer,
    nopol: &str,
    harga_beli: i64,
    biaya: i64,
    harga_jual: i64,
) -> Transaction {
    let draft = TransactionDraft {
        tanggal: time::macros::date!(2024 - 01 - 01),
        nopol: nopol.to_owned(),
        harga_beli,
        biaya,
        harga_jual,
    };

    create_transaction(&draft, viewer.owner(), connection)
        .expect("Could not create test transaction")
}
