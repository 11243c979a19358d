//! Route handlers that serve the exports as file downloads.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::UserID,
    export::{ExportRow, write_csv, write_pdf, write_spreadsheet},
    tenant::get_viewer,
    timezone::get_local_offset,
    transaction::{SearchQuery, list_transactions},
};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The state needed to export transactions.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Download the visible transactions as an Excel workbook.
pub async fn export_xlsx_endpoint(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, Error> {
    let (rows, today) = load_rows(&state, user_id, &query)?;
    let bytes = write_spreadsheet(&rows)
        .inspect_err(|error| tracing::error!("could not write spreadsheet: {error}"))?;

    Ok(attachment(bytes, XLSX_CONTENT_TYPE, &file_name(today, "xlsx")))
}

/// Download the visible transactions as a PDF report.
pub async fn export_pdf_endpoint(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, Error> {
    let (rows, today) = load_rows(&state, user_id, &query)?;
    let title = format!("Laporan Transaksi {today}");
    let bytes = write_pdf(&rows, &title)
        .inspect_err(|error| tracing::error!("could not write PDF: {error}"))?;

    Ok(attachment(bytes, "application/pdf", &file_name(today, "pdf")))
}

/// Download the visible transactions as a CSV file.
pub async fn export_csv_endpoint(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, Error> {
    let (rows, today) = load_rows(&state, user_id, &query)?;
    let bytes =
        write_csv(&rows).inspect_err(|error| tracing::error!("could not write CSV: {error}"))?;

    Ok(attachment(bytes, "text/csv; charset=utf-8", &file_name(today, "csv")))
}

/// Load the rows the user can see with the same search as the transactions page,
/// along with today's date in the server's timezone.
fn load_rows(
    state: &ExportState,
    user_id: UserID,
    query: &SearchQuery,
) -> Result<(Vec<ExportRow>, Date), Error> {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezoneError(state.local_timezone.clone()));
    };
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let viewer = get_viewer(user_id, &connection)?;
    let rows = list_transactions(viewer.scope(), query.text(), &connection)?
        .iter()
        .map(ExportRow::from)
        .collect();

    Ok((rows, today))
}

fn file_name(today: Date, extension: &str) -> String {
    format!("transaksi-{today}.{extension}")
}

fn attachment(bytes: Vec<u8>, content_type: &'static str, file_name: &str) -> Response {
    (
        [
            (CONTENT_TYPE, content_type.to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        body::to_bytes,
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::{
        export::{ExportState, export_csv_endpoint, export_pdf_endpoint, export_xlsx_endpoint},
        test_utils::{
            add_test_member, assert_content_type, create_test_transaction, get_header,
            get_test_connection, register_test_account,
        },
        transaction::SearchQuery,
    };

    fn state(connection: Connection) -> ExportState {
        ExportState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Asia/Jakarta".to_owned(),
        }
    }

    #[tokio::test]
    async fn csv_is_scoped_and_searchable() {
        let connection = get_test_connection();
        let owner = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");
        let staff = add_test_member(&connection, "sales@jaya.id", owner.company_id);
        create_test_transaction(&connection, &owner, "B 1 OWN", 1, 0, 2);
        create_test_transaction(&connection, &staff, "B 2 STAFF", 10, 1, 20);
        create_test_transaction(&connection, &staff, "D 3 STAFF", 10, 1, 20);

        let response = export_csv_endpoint(
            State(state(connection)),
            Extension(staff.user_id),
            Query(SearchQuery {
                q: Some("b ".to_owned()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/csv; charset=utf-8");
        assert!(
            get_header(&response, "content-disposition")
                .starts_with("attachment; filename=\"transaksi-")
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8_lossy(&body);
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 2, "got {body}");
        assert_eq!(lines[1], "2024-01-01,B 2 STAFF,10,1,20,9");
    }

    #[tokio::test]
    async fn xlsx_and_pdf_are_attachments() {
        let connection = get_test_connection();
        let owner = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");
        create_test_transaction(&connection, &owner, "B123XYZ", 50_000_000, 2_000_000, 60_000_000);
        let state = state(connection);

        let xlsx = export_xlsx_endpoint(
            State(state.clone()),
            Extension(owner.user_id),
            Query(SearchQuery::default()),
        )
        .await
        .unwrap();
        let pdf = export_pdf_endpoint(
            State(state),
            Extension(owner.user_id),
            Query(SearchQuery::default()),
        )
        .await
        .unwrap();

        assert!(get_header(&xlsx, "content-disposition").ends_with(".xlsx\""));
        assert_content_type(&pdf, "application/pdf");
        assert!(get_header(&pdf, "content-disposition").ends_with(".pdf\""));
    }

    #[tokio::test]
    async fn invalid_timezone_is_server_error() {
        let connection = get_test_connection();
        let owner = register_test_account(&connection, "owner@jaya.id", "Jaya Motor");
        let state = ExportState {
            local_timezone: "Mars/Olympus_Mons".to_owned(),
            ..state(connection)
        };

        let result = export_csv_endpoint(
            State(state),
            Extension(owner.user_id),
            Query(SearchQuery::default()),
        )
        .await;

        assert_eq!(
            result.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
