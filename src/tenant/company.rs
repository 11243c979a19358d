//! Companies (tenants) and the `company_users` mapping from users to companies.

use std::fmt::Display;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserID};

/// A newtype wrapper for integer company IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CompanyID(i64);

impl CompanyID {
    /// Create a new company ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the company ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for CompanyID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A dealership whose transactions are kept apart from other dealerships.
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    /// The ID of the company.
    pub id: CompanyID,
    /// The display name, unique across the app.
    pub name: String,
}

/// Create the `company` and `company_users` tables.
pub fn create_company_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS company (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS company_users (
                user_id INTEGER PRIMARY KEY REFERENCES user(id) ON DELETE CASCADE,
                company_id INTEGER NOT NULL REFERENCES company(id) ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Create a company called `name`.
///
/// # Errors
///
/// Returns [Error::EmptyCompanyName] for a blank name or
/// [Error::DuplicateCompanyName] if the name is taken.
pub fn create_company(name: &str, connection: &Connection) -> Result<Company, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyCompanyName);
    }

    connection.execute("INSERT INTO company (name) VALUES (?1)", (name,))?;

    Ok(Company {
        id: CompanyID::new(connection.last_insert_rowid()),
        name: name.to_owned(),
    })
}

/// Get the company with `company_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such company.
pub fn get_company(company_id: CompanyID, connection: &Connection) -> Result<Company, Error> {
    connection
        .prepare("SELECT id, name FROM company WHERE id = :id")?
        .query_row(&[(":id", &company_id.as_i64())], |row| {
            Ok(Company {
                id: CompanyID::new(row.get(0)?),
                name: row.get(1)?,
            })
        })
        .map_err(|error| error.into())
}

/// Make `user_id` a member of `company_id`. A user belongs to one company.
pub fn add_company_user(
    user_id: UserID,
    company_id: CompanyID,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO company_users (user_id, company_id) VALUES (?1, ?2)",
        (user_id.as_i64(), company_id.as_i64()),
    )?;

    Ok(())
}

/// Get the company `user_id` belongs to.
///
/// # Errors
///
/// Returns [Error::MissingCompany] if the user is not a member of any company.
pub fn get_company_id_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<CompanyID, Error> {
    connection
        .query_row(
            "SELECT company_id FROM company_users WHERE user_id = :user_id",
            &[(":user_id", &user_id.as_i64())],
            |row| row.get(0).map(CompanyID::new),
        )
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::MissingCompany(user_id),
            error => error,
        })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::{PasswordHash, create_user, parse_email},
        db::initialize,
        tenant::company::{
            CompanyID, add_company_user, create_company, get_company, get_company_id_for_user,
        },
    };

    fn get_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn create_and_get_company() {
        let connection = get_connection();

        let company = create_company("  Jaya Motor ", &connection).unwrap();

        assert_eq!(company.name, "Jaya Motor");
        assert_eq!(get_company(company.id, &connection), Ok(company));
    }

    #[test]
    fn blank_company_name_is_rejected() {
        let connection = get_connection();

        assert_eq!(
            create_company("   ", &connection),
            Err(Error::EmptyCompanyName)
        );
    }

    #[test]
    fn duplicate_company_name_is_rejected() {
        let connection = get_connection();
        create_company("Jaya Motor", &connection).unwrap();

        assert_eq!(
            create_company("Jaya Motor", &connection),
            Err(Error::DuplicateCompanyName)
        );
    }

    #[test]
    fn missing_company_is_not_found() {
        let connection = get_connection();

        assert_eq!(
            get_company(CompanyID::new(99), &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn user_company_lookup() {
        let connection = get_connection();
        let company = create_company("Jaya Motor", &connection).unwrap();
        let user = create_user(
            parse_email("sari@dealer.id").unwrap(),
            PasswordHash::new_unchecked("hash"),
            &connection,
        )
        .unwrap();

        assert_eq!(
            get_company_id_for_user(user.id, &connection),
            Err(Error::MissingCompany(user.id))
        );

        add_company_user(user.id, company.id, &connection).unwrap();

        assert_eq!(get_company_id_for_user(user.id, &connection), Ok(company.id));
    }
}
