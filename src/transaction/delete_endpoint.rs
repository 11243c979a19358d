//! Defines the endpoint for deleting a transaction.
use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error,
    auth::UserID,
    endpoints,
    tenant::get_viewer,
    transaction::{TransactionApiState, TransactionID, delete_transaction},
};

/// A route handler for deleting a transaction the logged in user can see.
/// Redirects to the transactions view so the list and totals are reloaded.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = get_viewer(user_id, &connection)
        .and_then(|viewer| delete_transaction(transaction_id, viewer.scope(), &connection));

    match result {
        Ok(rows_affected) if rows_affected != 0 => {
            tracing::info!("User {user_id} deleted transaction {transaction_id}");
            (
                HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Ok(_) => Error::DeleteMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
