//! Resolves who is looking at the data and which transaction rows they may see.

use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    tenant::{CompanyID, Role, get_company_id_for_user, get_role},
};

/// The logged in user together with their role and company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    /// The logged in user.
    pub user_id: UserID,
    /// The role from the user's profile.
    pub role: Role,
    /// The company the user belongs to.
    pub company_id: CompanyID,
}

/// Which transaction rows a query may touch. `None` means "any".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionScope {
    /// Only rows of this company.
    pub company_id: Option<CompanyID>,
    /// Only rows created by this user.
    pub user_id: Option<UserID>,
}

impl TransactionScope {
    /// Every row in the database.
    pub const ALL: Self = Self {
        company_id: None,
        user_id: None,
    };
}

/// The user and company stamped onto a new transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    /// The user who created the transaction.
    pub user_id: UserID,
    /// The company the transaction belongs to.
    pub company_id: CompanyID,
}

impl Viewer {
    /// The rows this viewer may see and change.
    pub fn scope(&self) -> TransactionScope {
        match self.role {
            Role::SuperAdmin => TransactionScope::ALL,
            Role::Admin => TransactionScope {
                company_id: Some(self.company_id),
                user_id: None,
            },
            Role::User => TransactionScope {
                company_id: Some(self.company_id),
                user_id: Some(self.user_id),
            },
        }
    }

    /// The owner of the transactions this viewer creates.
    pub fn owner(&self) -> Owner {
        Owner {
            user_id: self.user_id,
            company_id: self.company_id,
        }
    }
}

/// Look up the role and company of `user_id`.
///
/// # Errors
///
/// Returns [Error::MissingProfile] or [Error::MissingCompany] if the account was not set up.
pub fn get_viewer(user_id: UserID, connection: &Connection) -> Result<Viewer, Error> {
    let role = get_role(user_id, connection)?;
    let company_id = get_company_id_for_user(user_id, connection)?;

    Ok(Viewer {
        user_id,
        role,
        company_id,
    })
}
