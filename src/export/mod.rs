//! Downloads of the transaction list as a spreadsheet, a PDF or a CSV file.
//!
//! Each writer takes the same flat [ExportRow] list built from the transactions
//! the viewer can see, filtered by the same search as the transactions page.

mod csv_writer;
mod handlers;
mod pdf;
mod spreadsheet;

use time::Date;

use crate::transaction::{Transaction, clamp_rupiah};

pub use csv_writer::write_csv;
pub use handlers::{ExportState, export_csv_endpoint, export_pdf_endpoint, export_xlsx_endpoint};
pub use pdf::write_pdf;
pub use spreadsheet::write_spreadsheet;

/// The column headings shared by every export format.
const HEADERS: [&str; 6] = [
    "Tanggal",
    "No Polisi",
    "Harga Beli",
    "Biaya",
    "Harga Jual",
    "Keuntungan",
];

/// One transaction flattened for a document writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// When the car was sold.
    pub tanggal: Date,
    /// The licence plate.
    pub nopol: String,
    /// The purchase price.
    pub harga_beli: i64,
    /// Extra costs.
    pub biaya: i64,
    /// The sale price.
    pub harga_jual: i64,
    /// The profit on the car.
    pub laba: i64,
}

impl From<&Transaction> for ExportRow {
    fn from(transaction: &Transaction) -> Self {
        Self {
            tanggal: transaction.tanggal,
            nopol: transaction.nopol.clone(),
            harga_beli: transaction.harga_beli,
            biaya: transaction.biaya,
            harga_jual: transaction.harga_jual,
            laba: transaction.profit(),
        }
    }
}

/// Column sums of the money fields, shown as the last row of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Totals {
    harga_beli: i64,
    biaya: i64,
    harga_jual: i64,
    laba: i64,
}

impl Totals {
    fn new(rows: &[ExportRow]) -> Self {
        let sums = rows.iter().fold([0_i128; 4], |sums, row| {
            [
                sums[0] + i128::from(row.harga_beli),
                sums[1] + i128::from(row.biaya),
                sums[2] + i128::from(row.harga_jual),
                sums[3] + i128::from(row.laba),
            ]
        });

        Self {
            harga_beli: clamp_rupiah(sums[0]),
            biaya: clamp_rupiah(sums[1]),
            harga_jual: clamp_rupiah(sums[2]),
            laba: clamp_rupiah(sums[3]),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_rows() -> Vec<ExportRow> {
    use time::macros::date;

    vec![
        ExportRow {
            tanggal: date!(2024 - 01 - 01),
            nopol: "B123XYZ".to_owned(),
            harga_beli: 50_000_000,
            biaya: 2_000_000,
            harga_jual: 60_000_000,
            laba: 8_000_000,
        },
        ExportRow {
            tanggal: date!(2024 - 01 - 05),
            nopol: "D 777 AB".to_owned(),
            harga_beli: 70_000_000,
            biaya: 1_500_000,
            harga_jual: 65_000_000,
            laba: -6_500_000,
        },
    ]
}
