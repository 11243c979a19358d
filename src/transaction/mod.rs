//! Car buy/sell transactions.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, its editable `TransactionDraft` and the profit rule
//! - Database functions that only touch rows within a viewer's scope
//! - The transaction form, the list page with its totals, and the edit page
//! - The create, update and delete endpoints

mod core;
mod create_endpoint;
mod db;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod list_page;
mod summary;

pub(crate) use core::clamp_rupiah;
pub use core::{Transaction, TransactionDraft, TransactionID};
pub use create_endpoint::{TransactionApiState, create_transaction_endpoint};
pub use db::{
    count_transactions, create_transaction, create_transaction_table, delete_transaction,
    get_transaction, list_transactions, update_transaction,
};
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use form::{FormError, TransactionForm};
pub use list_page::{SearchQuery, TransactionsPageState, get_transactions_page};
pub use summary::TransactionSummary;
