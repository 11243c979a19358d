//! The `user` table: accounts identified by email address.

use std::fmt::Display;

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from company and transaction IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The address the user logs in with.
    pub email: EmailAddress,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] if the email address is taken, or
/// [Error::SqlError] for any other SQL error.
pub fn create_user(
    email: EmailAddress,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (email, password) VALUES (?1, ?2)",
        (email.as_str(), password_hash.as_ref()),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        email,
        password_hash,
    })
}

/// Parse an email address typed into a form, ignoring surrounding whitespace and case.
///
/// # Errors
///
/// Returns [Error::InvalidEmail] if the address is malformed.
pub fn parse_email(raw_email: &str) -> Result<EmailAddress, Error> {
    let email = raw_email.trim().to_lowercase();

    email
        .parse()
        .map_err(|_| Error::InvalidEmail(raw_email.to_owned()))
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(1)?;
    let email = EmailAddress::new_unchecked(raw_email);
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        email,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

/// Get the user registered with `email`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has that email address.
pub fn get_user_by_email(email: &EmailAddress, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, password FROM user WHERE email = :email")?
        .query_row(&[(":email", &email.as_str())], map_user_row)
        .map_err(|error| error.into())
}

/// Replace the password hash of the user with `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such user.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::{
            PasswordHash,
            user::{
                UserID, count_users, create_user, create_user_table, get_user_by_email,
                parse_email, update_password,
            },
        },
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let connection = get_db_connection();
        let email = parse_email("budi@dealer.id").unwrap();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let user = create_user(email.clone(), password_hash.clone(), &connection).unwrap();

        assert!(user.id.as_i64() > 0);
        assert_eq!(user.email, email);
        assert_eq!(user.password_hash, password_hash);
    }

    #[test]
    fn insert_duplicate_email_fails() {
        let connection = get_db_connection();
        let email = parse_email("budi@dealer.id").unwrap();
        create_user(
            email.clone(),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        let result = create_user(email, PasswordHash::new_unchecked("hunter3"), &connection);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn parse_email_normalizes_case_and_whitespace() {
        let email = parse_email("  Budi@Dealer.ID ").unwrap();

        assert_eq!(email.as_str(), "budi@dealer.id");
    }

    #[test]
    fn parse_email_rejects_garbage() {
        let result = parse_email("bukan email");

        assert_eq!(result, Err(Error::InvalidEmail("bukan email".to_owned())));
    }

    #[test]
    fn get_user_fails_with_unknown_email() {
        let connection = get_db_connection();
        let email = parse_email("hilang@dealer.id").unwrap();

        assert_eq!(get_user_by_email(&email, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_user_by_email_returns_created_user() {
        let connection = get_db_connection();
        let email = parse_email("budi@dealer.id").unwrap();
        let user =
            create_user(email.clone(), PasswordHash::new_unchecked("hunter2"), &connection)
                .unwrap();

        assert_eq!(get_user_by_email(&email, &connection), Ok(user));
    }

    #[test]
    fn update_password_replaces_hash() {
        let connection = get_db_connection();
        let user = create_user(
            parse_email("budi@dealer.id").unwrap(),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let new_hash = PasswordHash::new_unchecked("hunter3");

        update_password(user.id, &new_hash, &connection).unwrap();

        let got = get_user_by_email(&user.email, &connection).unwrap();
        assert_eq!(got.password_hash, new_hash);
    }

    #[test]
    fn update_password_of_missing_user_fails() {
        let connection = get_db_connection();

        let result = update_password(
            UserID::new(7),
            &PasswordHash::new_unchecked("hunter2"),
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn returns_correct_count() {
        let connection = get_db_connection();
        assert_eq!(count_users(&connection), Ok(0));

        create_user(
            parse_email("budi@dealer.id").unwrap(),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        assert_eq!(count_users(&connection), Ok(1));
    }
}
