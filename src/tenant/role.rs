//! The roles a user can have and the `profiles` table that stores them.

use std::{fmt::Display, str::FromStr};

use rusqlite::Connection;

use crate::{Error, auth::UserID};

/// What a user is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Sees and edits only their own transactions within their company.
    User,
    /// Sees and edits every transaction of their company and manages its members.
    Admin,
    /// Sees and edits every transaction of every company.
    SuperAdmin,
}

impl Role {
    /// The value stored in the `profiles.role` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Whether the role may open the members page.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(Error::InvalidRole(other.to_owned())),
        }
    }
}

/// Create the `profiles` table, one row per user.
pub fn create_profile_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS profiles (
                id INTEGER PRIMARY KEY REFERENCES user(id) ON DELETE CASCADE,
                role TEXT NOT NULL CHECK (role IN ('user', 'admin', 'super_admin'))
                )",
        (),
    )?;

    Ok(())
}

/// Give `user_id` the `role`.
///
/// # Errors
///
/// Returns [Error::SqlError] if the user already has a profile or does not exist.
pub fn create_profile(user_id: UserID, role: Role, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO profiles (id, role) VALUES (?1, ?2)",
        (user_id.as_i64(), role.as_str()),
    )?;

    Ok(())
}

/// Get the role of `user_id`.
///
/// # Errors
///
/// Returns [Error::MissingProfile] if the user has no profile, or
/// [Error::InvalidRole] if the stored role is unknown.
pub fn get_role(user_id: UserID, connection: &Connection) -> Result<Role, Error> {
    let raw_role: String = connection
        .query_row(
            "SELECT role FROM profiles WHERE id = :id",
            &[(":id", &user_id.as_i64())],
            |row| row.get(0),
        )
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::MissingProfile(user_id),
            error => error,
        })?;

    raw_role.parse()
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::{PasswordHash, UserID, create_user, parse_email},
        db::initialize,
        tenant::role::{Role, create_profile, get_role},
    };

    fn get_connection_with_user() -> (Connection, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_user(
            parse_email("sari@dealer.id").unwrap(),
            PasswordHash::new_unchecked("hash"),
            &connection,
        )
        .unwrap();

        (connection, user.id)
    }

    #[test]
    fn parses_stored_roles() {
        assert_eq!("user".parse(), Ok(Role::User));
        assert_eq!("admin".parse(), Ok(Role::Admin));
        assert_eq!("super_admin".parse(), Ok(Role::SuperAdmin));
        assert_eq!(
            "owner".parse::<Role>(),
            Err(Error::InvalidRole("owner".to_owned()))
        );
    }

    #[test]
    fn only_admins_manage_members() {
        assert!(!Role::User.can_manage_members());
        assert!(Role::Admin.can_manage_members());
        assert!(Role::SuperAdmin.can_manage_members());
    }

    #[test]
    fn get_role_returns_created_role() {
        let (connection, user_id) = get_connection_with_user();

        create_profile(user_id, Role::Admin, &connection).unwrap();

        assert_eq!(get_role(user_id, &connection), Ok(Role::Admin));
    }

    #[test]
    fn get_role_without_profile_fails() {
        let (connection, user_id) = get_connection_with_user();

        assert_eq!(
            get_role(user_id, &connection),
            Err(Error::MissingProfile(user_id))
        );
    }

    #[test]
    fn table_rejects_unknown_role() {
        let (connection, user_id) = get_connection_with_user();

        let result = connection.execute(
            "INSERT INTO profiles (id, role) VALUES (?1, 'owner')",
            (user_id.as_i64(),),
        );

        assert!(result.is_err());
    }
}
