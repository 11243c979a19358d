//! Creating accounts together with their profile and company membership.

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    Error,
    auth::{PasswordHash, count_users, create_user},
    tenant::{CompanyID, Role, Viewer, add_company_user, create_company, create_profile},
};

/// Register a new account that owns a new company called `company_name`.
///
/// The very first account becomes the super admin, every later one becomes the
/// admin of the company it creates. Nothing is written if any step fails.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail], [Error::EmptyCompanyName] or
/// [Error::DuplicateCompanyName] for bad input, or [Error::SqlError].
pub fn register_account(
    email: EmailAddress,
    password_hash: PasswordHash,
    company_name: &str,
    connection: &Connection,
) -> Result<Viewer, Error> {
    let transaction = connection.unchecked_transaction()?;

    let role = if count_users(&transaction)? == 0 {
        Role::SuperAdmin
    } else {
        Role::Admin
    };

    let user = create_user(email, password_hash, &transaction)?;
    let company = create_company(company_name, &transaction)?;
    create_profile(user.id, role, &transaction)?;
    add_company_user(user.id, company.id, &transaction)?;

    transaction.commit()?;

    tracing::info!(
        "Registered user {} as {role} of company {}",
        user.id,
        company.id
    );

    Ok(Viewer {
        user_id: user.id,
        role,
        company_id: company.id,
    })
}

/// Add a new account with the `user` role to `company_id`.
///
/// Nothing is written if any step fails.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] if the email address is taken, or [Error::SqlError].
pub fn add_member(
    email: EmailAddress,
    password_hash: PasswordHash,
    company_id: CompanyID,
    connection: &Connection,
) -> Result<Viewer, Error> {
    let transaction = connection.unchecked_transaction()?;

    let user = create_user(email, password_hash, &transaction)?;
    create_profile(user.id, Role::User, &transaction)?;
    add_company_user(user.id, company_id, &transaction)?;

    transaction.commit()?;

    Ok(Viewer {
        user_id: user.id,
        role: Role::User,
        company_id,
    })
}
