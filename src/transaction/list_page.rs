//! The transactions page: the entry form, the totals, the search box and the table.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        edit_delete_action_links, format_rupiah, profit_style, rupiah_input_styles,
    },
    navigation::NavBar,
    tenant::{Viewer, get_viewer},
    transaction::{
        Transaction, TransactionSummary,
        form::{FormMode, TransactionForm, transaction_form},
        list_transactions,
    },
};

const DELETE_CONFIRM_MESSAGE: &str = "Yakin ingin menghapus data ini?";

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The `?q=` query parameter shared by the transactions page and the exports.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchQuery {
    /// Part of a licence plate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl SearchQuery {
    /// The search text, or `None` if it is blank.
    pub fn text(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
    }

    /// `endpoint` with this search appended as a query string.
    pub fn append_to(&self, endpoint: &str) -> String {
        match self.text() {
            Some(search) => match serde_urlencoded::to_string(&[("q", search)]) {
                Ok(query) => format!("{endpoint}?{query}"),
                Err(error) => {
                    tracing::error!("could not encode search query {search:?}: {error}");
                    endpoint.to_owned()
                }
            },
            None => endpoint.to_owned(),
        }
    }
}

/// Display the transactions visible to the logged in user, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let viewer = get_viewer(user_id, &connection)?;
    let transactions = list_transactions(viewer.scope(), query.text(), &connection)
        .inspect_err(|error| tracing::error!("could not load transactions: {error}"))?;

    Ok(transactions_view(&viewer, &transactions, &query).into_response())
}

fn transactions_view(viewer: &Viewer, transactions: &[Transaction], query: &SearchQuery) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW, viewer.role).into_html();
    let summary = TransactionSummary::new(transactions);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-6xl space-y-6"
            {
                h1 class="text-xl font-bold" { "Pembukuan Jual Beli Mobil" }

                div class=(CARD_STYLE)
                {
                    (transaction_form(FormMode::Create, &TransactionForm::default()))
                }

                (summary.into_html())

                (toolbar(query))

                (transactions_table(transactions))
            }
        }
    };

    base("Transaksi", &[rupiah_input_styles()], &content)
}

fn toolbar(query: &SearchQuery) -> Markup {
    html! {
        div class="flex flex-wrap justify-between items-end gap-4"
        {
            form
                method="get"
                action=(endpoints::TRANSACTIONS_VIEW)
                role="search"
                class="flex gap-2"
            {
                input
                    type="search"
                    name="q"
                    placeholder="Cari No Polisi"
                    aria-label="Cari No Polisi"
                    value=[query.text()]
                    class=(FORM_TEXT_INPUT_STYLE);

                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Cari" }
            }

            div class="flex gap-2" data-export-links="true"
            {
                a href=(query.append_to(endpoints::EXPORT_XLSX)) class=(BUTTON_SECONDARY_STYLE)
                { "Export Excel" }
                a href=(query.append_to(endpoints::EXPORT_PDF)) class=(BUTTON_SECONDARY_STYLE)
                { "Export PDF" }
                a href=(query.append_to(endpoints::EXPORT_CSV)) class=(BUTTON_SECONDARY_STYLE)
                { "Export CSV" }
            }
        }
    }
}

fn transactions_table(transactions: &[Transaction]) -> Markup {
    let table_row = |transaction: &Transaction| {
        let profit = transaction.profit();
        let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
        let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);

        html! {
            tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(transaction.tanggal) { (transaction.tanggal) }
                }
                td class=(TABLE_CELL_STYLE) { (transaction.nopol) }
                td class="px-6 py-4 text-right tabular-nums" { (format_rupiah(transaction.harga_beli)) }
                td class="px-6 py-4 text-right tabular-nums" { (format_rupiah(transaction.biaya)) }
                td class="px-6 py-4 text-right tabular-nums" { (format_rupiah(transaction.harga_jual)) }
                td class="px-6 py-4 text-right tabular-nums"
                {
                    span class=(profit_style(profit)) data-profit=(profit) { (format_rupiah(profit)) }
                }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4 justify-center"
                    {
                        (edit_delete_action_links(&edit_url, &delete_url, DELETE_CONFIRM_MESSAGE))
                    }
                }
            }
        }
    };

    html! {
        section class="w-full overflow-x-auto rounded-lg shadow dark:bg-gray-800"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Tanggal" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "No Polisi" }
                        th scope="col" class="px-6 py-3 text-right" { "Harga Beli" }
                        th scope="col" class="px-6 py-3 text-right" { "Biaya" }
                        th scope="col" class="px-6 py-3 text-right" { "Harga Jual" }
                        th scope="col" class="px-6 py-3 text-right" { "Keuntungan" }
                        th scope="col" class="px-6 py-3 text-center" { "Aksi" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (table_row(transaction))
                    }

                    @if transactions.is_empty() {
                        tr
                        {
                            td
                                colspan="7"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "Belum ada transaksi"
                            }
                        }
                    }
                }
            }
        }

        p class="text-xs text-gray-500 dark:text-gray-400"
        {
            "Keuntungan = Harga Jual - Harga Beli - Biaya. "
            a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Muat ulang" }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        auth::UserID,
        test_utils::{
            add_test_member, assert_status_ok, assert_valid_html, create_test_transaction,
            get_test_connection, must_get_form, parse_html_document, register_test_account,
        },
        transaction::list_page::{SearchQuery, TransactionsPageState, get_transactions_page},
    };

    async fn render(connection: Connection, user_id: UserID, q: Option<&str>) -> Html {
        let state = TransactionsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_transactions_page(
            State(state),
            Extension(user_id),
            Query(SearchQuery {
                q: q.map(str::to_owned),
            }),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        html
    }

    fn plates(html: &Html) -> Vec<String> {
        let selector = Selector::parse("tr[data-transaction-id] td:nth-child(2)").unwrap();
        html.select(&selector)
            .map(|cell| cell.text().collect())
            .collect()
    }

    #[tokio::test]
    async fn empty_list_shows_placeholder_row() {
        let connection = get_test_connection();
        let owner = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");

        let html = render(connection, owner.user_id, None).await;

        let tbody_text: String = html
            .select(&Selector::parse("tbody").unwrap())
            .flat_map(|tbody| tbody.text())
            .collect();
        assert_eq!(tbody_text.trim(), "Belum ada transaksi");
        must_get_form(&html);
    }

    #[tokio::test]
    async fn rows_show_rupiah_and_profit() {
        let connection = get_test_connection();
        let owner = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");
        create_test_transaction(&connection, &owner, "B123XYZ", 50_000_000, 2_000_000, 60_000_000);

        let html = render(connection, owner.user_id, None).await;

        let cells: Vec<String> = html
            .select(&Selector::parse("tr[data-transaction-id] td").unwrap())
            .take(6)
            .map(|cell| cell.text().collect())
            .collect();
        assert_eq!(
            cells,
            vec![
                "2024-01-01",
                "B123XYZ",
                "Rp 50.000.000",
                "Rp 2.000.000",
                "Rp 60.000.000",
                "Rp 8.000.000"
            ]
        );
        let profit = html
            .select(&Selector::parse("[data-profit]").unwrap())
            .next()
            .unwrap();
        assert!(profit.value().attr("class").unwrap().contains("text-green-600"));
    }

    #[tokio::test]
    async fn loss_is_red() {
        let connection = get_test_connection();
        let owner = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");
        create_test_transaction(&connection, &owner, "B1", 70_000_000, 1_500_000, 65_000_000);

        let html = render(connection, owner.user_id, None).await;

        let profit = html
            .select(&Selector::parse("[data-profit]").unwrap())
            .next()
            .unwrap();
        assert_eq!(profit.value().attr("data-profit"), Some("-6500000"));
        assert!(profit.value().attr("class").unwrap().contains("text-red-600"));
    }

    #[tokio::test]
    async fn user_only_sees_own_rows() {
        let connection = get_test_connection();
        let owner = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");
        let staff = add_test_member(&connection, "sales@jaya.id", owner.company_id);
        let other = register_test_account(&connection, "rudi@sentosa.id", "Sentosa Mobil");
        create_test_transaction(&connection, &owner, "OWNER", 1, 0, 2);
        create_test_transaction(&connection, &staff, "STAFF", 1, 0, 2);
        create_test_transaction(&connection, &other, "OTHER", 1, 0, 2);

        let html = render(connection, staff.user_id, None).await;

        assert_eq!(plates(&html), vec!["STAFF"]);
    }

    #[tokio::test]
    async fn search_filters_rows_and_export_links() {
        let connection = get_test_connection();
        let owner = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");
        create_test_transaction(&connection, &owner, "B 1234 XYZ", 1, 0, 2);
        create_test_transaction(&connection, &owner, "D 777 AB", 1, 0, 2);

        let html = render(connection, owner.user_id, Some("d 777")).await;

        assert_eq!(plates(&html), vec!["D 777 AB"]);
        let export_links: Vec<&str> = html
            .select(&Selector::parse("[data-export-links] a").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect();
        assert_eq!(
            export_links,
            vec![
                "/api/export/xlsx?q=d+777",
                "/api/export/pdf?q=d+777",
                "/api/export/csv?q=d+777"
            ]
        );
    }

    #[test]
    fn blank_search_is_none() {
        let query = SearchQuery {
            q: Some("   ".to_owned()),
        };

        assert_eq!(query.text(), None);
        assert_eq!(query.append_to("/api/export/csv"), "/api/export/csv");
    }
}
