//! Defines the endpoint for recording a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    tenant::get_viewer,
    transaction::{TransactionForm, create_transaction},
};

/// The state needed to create, update or delete a transaction.
#[derive(Debug, Clone)]
pub struct TransactionApiState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction owned by the logged in user and
/// their company. Redirects to the transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Extension(user_id): Extension<UserID>,
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

    let result = get_viewer(user_id, &connection)
        .and_then(|viewer| create_transaction(&draft, viewer.owner(), &connection));

    match result {
        Ok(transaction) => {
            tracing::debug!("User {user_id} created transaction {}", transaction.id);
            (
                HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::State,
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        endpoints,
        test_utils::{assert_hx_redirect, get_test_connection, register_test_account},
        transaction::{
            TransactionForm, count_transactions,
            create_endpoint::{TransactionApiState, create_transaction_endpoint},
            list_transactions,
        },
    };

    fn form(tanggal: &str, nopol: &str) -> TransactionForm {
        TransactionForm {
            tanggal: tanggal.to_owned(),
            nopol: nopol.to_owned(),
            harga_beli: "50000000".to_owned(),
            biaya: "2000000".to_owned(),
            harga_jual: "60000000".to_owned(),
        }
    }

    #[tokio::test]
    async fn creates_transaction_for_viewer() {
        let connection = get_test_connection();
        let viewer = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");
        let state = TransactionApiState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = create_transaction_endpoint(
            State(state.clone()),
            Extension(viewer.user_id),
            Form(form("2024-01-01", "B123XYZ")),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let transactions = list_transactions(viewer.scope(), None, &connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].nopol, "B123XYZ");
        assert_eq!(transactions[0].profit(), 8_000_000);
        assert_eq!(transactions[0].user_id, viewer.user_id);
        assert_eq!(transactions[0].company_id, viewer.company_id);
    }

    #[tokio::test]
    async fn empty_date_or_plate_does_not_create() {
        let connection = get_test_connection();
        let viewer = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");
        let state = TransactionApiState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        for bad_form in [form("", "B123XYZ"), form("2024-01-01", "")] {
            let response = create_transaction_endpoint(
                State(state.clone()),
                Extension(viewer.user_id),
                Form(bad_form),
            )
            .await
            .into_response();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(viewer.scope(), &connection), Ok(0));
    }
}
