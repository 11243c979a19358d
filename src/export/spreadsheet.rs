use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::{
    Error,
    export::{ExportRow, HEADERS, Totals},
};

const RUPIAH_FORMAT: &str = "\"Rp\" #,##0;[Red]-\"Rp\" #,##0";
const COLUMN_WIDTHS: [f64; 6] = [12.0, 16.0, 18.0, 16.0, 18.0, 18.0];

/// Write `rows` to an Excel workbook with one sheet: a bold header row, one row
/// per transaction and a bold total row.
///
/// # Errors
/// Returns [Error::ExportError] if the workbook could not be written.
pub fn write_spreadsheet(rows: &[ExportRow]) -> Result<Vec<u8>, Error> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    fill_worksheet(worksheet, rows)
        .and_then(|_| workbook.save_to_buffer())
        .map_err(|error| Error::ExportError("Excel", error.to_string()))
}

fn fill_worksheet(worksheet: &mut Worksheet, rows: &[ExportRow]) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    let rupiah = Format::new().set_num_format(RUPIAH_FORMAT);
    let bold_rupiah = Format::new().set_bold().set_num_format(RUPIAH_FORMAT);

    worksheet.set_name("Transaksi")?;

    for (col, (header, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *header, &bold)?;
        worksheet.set_column_width(col, width)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;

        worksheet.write_string(line, 0, row.tanggal.to_string())?;
        worksheet.write_string(line, 1, &row.nopol)?;
        for (col, amount) in [row.harga_beli, row.biaya, row.harga_jual, row.laba]
            .into_iter()
            .enumerate()
        {
            worksheet.write_number_with_format(line, col as u16 + 2, amount as f64, &rupiah)?;
        }
    }

    let totals = Totals::new(rows);
    let total_line = rows.len() as u32 + 1;

    worksheet.write_string_with_format(total_line, 0, "Total", &bold)?;
    for (col, amount) in [totals.harga_beli, totals.biaya, totals.harga_jual, totals.laba]
        .into_iter()
        .enumerate()
    {
        worksheet.write_number_with_format(
            total_line,
            col as u16 + 2,
            amount as f64,
            &bold_rupiah,
        )?;
    }

    worksheet.set_freeze_panes(1, 0)?;

    Ok(())
}
