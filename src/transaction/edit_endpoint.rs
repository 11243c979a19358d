//! Defines the endpoint for updating a transaction.
use axum::{
    Extension, Form,
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
    transaction::{TransactionApiState, TransactionForm, TransactionID, update_transaction},
};

/// A route handler for replacing the fields of a transaction the logged in user
/// can see. Redirects to the transactions view on success.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionID>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(error) => {
            tracing::error!("Rejected transaction form {form:?}: {error}");
            return Error::from(error).into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let result = get_viewer(user_id, &connection).and_then(|viewer| {
        update_transaction(transaction_id, &draft, viewer.scope(), &connection)
    });

    match result {
        Ok(rows_affected) if rows_affected != 0 => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(_) => Error::UpdateMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
