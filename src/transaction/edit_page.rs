//! The page for editing an existing transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    auth::UserID,
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, rupiah_input_styles},
    navigation::NavBar,
    tenant::{Viewer, get_viewer},
    transaction::{
        Transaction, TransactionID, TransactionsPageState,
        form::{FormMode, TransactionForm, transaction_form},
        get_transaction,
    },
};

fn edit_transaction_view(viewer: &Viewer, transaction: &Transaction) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW, viewer.role).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-6xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Edit Transaksi " (transaction.nopol) }

                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Batal" }
                }

                div class=(CARD_STYLE)
                {
                    (transaction_form(
                        FormMode::Edit(transaction.id),
                        &TransactionForm::from(transaction),
                    ))
                }
            }
        }
    };

    base("Edit Transaksi", &[rupiah_input_styles()], &content)
}

/// Renders the form prefilled with a transaction the logged in user can see.
///
/// Transactions outside the user's scope get the 404 page.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionsPageState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let viewer = get_viewer(user_id, &connection)?;
    let transaction = get_transaction(transaction_id, viewer.scope(), &connection)?;

    Ok(edit_transaction_view(&viewer, &transaction).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        test_utils::{
            assert_form_input_with_value, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_valid_html, create_test_transaction, get_test_connection,
            must_get_form, parse_html_document, register_test_account,
        },
        transaction::{TransactionsPageState, get_edit_transaction_page},
    };

    #[tokio::test]
    async fn form_is_prefilled() {
        let connection = get_test_connection();
        let viewer = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");
        let transaction =
            create_test_transaction(&connection, &viewer, "B123XYZ", 50_000_000, 0, 60_000_000);
        let state = TransactionsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            get_edit_transaction_page(State(state), Extension(viewer.user_id), Path(transaction.id))
                .await
                .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, &format!("/api/transaksi/{}", transaction.id), "hx-put");
        assert_form_input_with_value(&form, "tanggal", "date", "2024-01-01");
        assert_form_input_with_value(&form, "nopol", "text", "B123XYZ");
        assert_form_input_with_value(&form, "hargaJual", "number", "60000000");
        assert_form_submit_button_with_text(&form, "Update Transaksi");
    }

    #[tokio::test]
    async fn other_company_gets_404() {
        let connection = get_test_connection();
        let owner = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");
        let other = register_test_account(&connection, "rudi@sentosa.id", "Sentosa Mobil");
        let transaction = create_test_transaction(&connection, &owner, "B1", 1, 0, 1);
        let state = TransactionsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result =
            get_edit_transaction_page(State(state), Extension(other.user_id), Path(transaction.id))
                .await;

        assert_eq!(result.into_response().status(), StatusCode::NOT_FOUND);
    }
}
