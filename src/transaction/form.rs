//! The transaction form: the raw values as typed, their validation and the markup.

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
    transaction::{Transaction, TransactionDraft, TransactionID},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The largest amount, positive or negative, a price field may hold (one quadrillion rupiah).
pub const MAX_RUPIAH: i64 = 1_000_000_000_000_000;

/// Why a submitted transaction form was rejected.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FormError {
    /// The date was left empty.
    #[error("Tanggal wajib diisi")]
    MissingDate,

    /// The licence plate was left empty.
    #[error("Nomor polisi wajib diisi")]
    MissingPlate,

    /// The purchase price was left empty.
    #[error("Harga beli wajib diisi")]
    MissingPurchasePrice,

    /// The sale price was left empty.
    #[error("Harga jual wajib diisi")]
    MissingSalePrice,

    /// The date is not a calendar date in the form YYYY-MM-DD.
    #[error("\"{0}\" bukan tanggal yang valid")]
    InvalidDate(String),

    /// A price field does not hold a whole number.
    #[error("{field} harus berupa angka bulat, bukan \"{value}\"")]
    InvalidNumber {
        /// The label of the field.
        field: &'static str,
        /// The text that was entered.
        value: String,
    },

    /// A price field is larger than [MAX_RUPIAH] in either direction.
    #[error("{field} di luar batas, maksimal {max} rupiah", max = MAX_RUPIAH)]
    AmountOutOfRange {
        /// The label of the field.
        field: &'static str,
        /// The text that was entered.
        value: String,
    },
}

/// The transaction form exactly as submitted.
///
/// Every field is kept as text so that a blank input can be told apart from a
/// bad one and the form can be shown again with what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionForm {
    /// The sale date, YYYY-MM-DD.
    #[serde(default)]
    pub tanggal: String,
    /// The licence plate.
    #[serde(default)]
    pub nopol: String,
    /// The purchase price in rupiah.
    #[serde(default, rename = "hargaBeli")]
    pub harga_beli: String,
    /// Extra costs in rupiah, may be blank.
    #[serde(default)]
    pub biaya: String,
    /// The sale price in rupiah.
    #[serde(default, rename = "hargaJual")]
    pub harga_jual: String,
}

impl TransactionForm {
    /// Check the required fields and parse the values.
    ///
    /// # Errors
    /// Returns the first [FormError] found, checking the fields in the order
    /// they appear on the form.
    pub fn validate(&self) -> Result<TransactionDraft, FormError> {
        let tanggal = self.tanggal.trim();
        if tanggal.is_empty() {
            return Err(FormError::MissingDate);
        }

        let nopol = self.nopol.trim();
        if nopol.is_empty() {
            return Err(FormError::MissingPlate);
        }

        let harga_beli = self.harga_beli.trim();
        if harga_beli.is_empty() {
            return Err(FormError::MissingPurchasePrice);
        }

        let harga_jual = self.harga_jual.trim();
        if harga_jual.is_empty() {
            return Err(FormError::MissingSalePrice);
        }

        let tanggal = Date::parse(tanggal, DATE_FORMAT)
            .map_err(|_| FormError::InvalidDate(tanggal.to_owned()))?;

        Ok(TransactionDraft {
            tanggal,
            nopol: nopol.to_owned(),
            harga_beli: parse_rupiah("Harga beli", harga_beli)?,
            biaya: parse_rupiah("Biaya", &self.biaya)?,
            harga_jual: parse_rupiah("Harga jual", harga_jual)?,
        })
    }
}

impl From<&Transaction> for TransactionForm {
    fn from(transaction: &Transaction) -> Self {
        Self {
            tanggal: transaction.tanggal.to_string(),
            nopol: transaction.nopol.clone(),
            harga_beli: transaction.harga_beli.to_string(),
            biaya: transaction.biaya.to_string(),
            harga_jual: transaction.harga_jual.to_string(),
        }
    }
}

/// Parse a rupiah amount. Blank text counts as zero.
fn parse_rupiah(field: &'static str, value: &str) -> Result<i64, FormError> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(0);
    }

    let amount: i64 = value.parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_owned(),
    })?;

    if !(-MAX_RUPIAH..=MAX_RUPIAH).contains(&amount) {
        return Err(FormError::AmountOutOfRange {
            field,
            value: value.to_owned(),
        });
    }

    Ok(amount)
}

/// Whether the form creates a new transaction or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// POST to the transactions API.
    Create,
    /// PUT to the API of the given transaction.
    Edit(TransactionID),
}

/// The transaction form. Errors from the server are shown in the alert container
/// so the inputs keep their values.
pub fn transaction_form(mode: FormMode, values: &TransactionForm) -> Markup {
    let (create_endpoint, edit_endpoint, submit_text) = match mode {
        FormMode::Create => (Some(endpoints::TRANSACTIONS_API), None, "Simpan Transaksi"),
        FormMode::Edit(id) => (
            None,
            Some(format_endpoint(endpoints::TRANSACTION, id)),
            "Update Transaksi",
        ),
    };

    html! {
        form
            hx-post=[create_endpoint]
            hx-put=[edit_endpoint]
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full grid gap-4 md:grid-cols-5"
        {
            div
            {
                label for="tanggal" class=(FORM_LABEL_STYLE) { "Tanggal" }

                input
                    name="tanggal"
                    id="tanggal"
                    type="date"
                    value=(values.tanggal)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="nopol" class=(FORM_LABEL_STYLE) { "No Polisi" }

                input
                    name="nopol"
                    id="nopol"
                    type="text"
                    placeholder="B 1234 XYZ"
                    value=(values.nopol)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (rupiah_input("hargaBeli", "Harga Beli", &values.harga_beli, true))
            (rupiah_input("biaya", "Biaya Tambahan", &values.biaya, false))
            (rupiah_input("hargaJual", "Harga Jual", &values.harga_jual, true))

            button
                type="submit"
                id="submit-button"
                tabindex="0"
                class={ "md:col-span-5 " (BUTTON_PRIMARY_STYLE) }
            {
                span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                " " (submit_text)
            }
        }
    }
}

fn rupiah_input(name: &str, label: &str, value: &str, required: bool) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            div class="input-wrapper w-full"
            {
                input
                    name=(name)
                    id=(name)
                    type="number"
                    step="1"
                    min=(-MAX_RUPIAH)
                    max=(MAX_RUPIAH)
                    placeholder="0"
                    value=(value)
                    required[required]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}
