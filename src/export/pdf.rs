use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::{
    Error,
    export::{ExportRow, HEADERS, Totals},
    html::format_rupiah,
};

// Landscape A4.
const PAGE_WIDTH: Mm = Mm(297.0);
const PAGE_HEIGHT: Mm = Mm(210.0);
const MARGIN: f32 = 15.0;

const TITLE_SIZE: f32 = 16.0;
const TEXT_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 7.0;

/// The left edge of each column in mm. Money columns are right aligned to the
/// left edge of the next column.
const COLUMN_X: [f32; 7] = [MARGIN, 45.0, 85.0, 130.0, 170.0, 215.0, 282.0];

/// Write `rows` as a table on landscape A4 pages under `title`, followed by a
/// total row. The header row is repeated on every page.
///
/// Text is set in the built-in Helvetica faces, which only cover Latin-1.
/// Characters outside that range are printed as `?`.
///
/// # Errors
/// Returns [Error::ExportError] if a font could not be loaded or the document
/// could not be serialised.
pub fn write_pdf(rows: &[ExportRow], title: &str) -> Result<Vec<u8>, Error> {
    let (document, page, layer) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Tabel");
    let regular = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = document
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let mut layer = document.get_page(page).get_layer(layer);
    layer.use_text(latin1(title), TITLE_SIZE, Mm(MARGIN), Mm(PAGE_HEIGHT.0 - MARGIN), &bold);
    let mut y = PAGE_HEIGHT.0 - MARGIN - 2.0 * LINE_HEIGHT;
    write_line(&layer, &HEADERS.map(str::to_owned), y, &bold);

    for row in rows {
        y -= LINE_HEIGHT;

        if y < MARGIN + LINE_HEIGHT {
            let (page, new_layer) = document.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Tabel");
            layer = document.get_page(page).get_layer(new_layer);
            y = PAGE_HEIGHT.0 - MARGIN;
            write_line(&layer, &HEADERS.map(str::to_owned), y, &bold);
            y -= LINE_HEIGHT;
        }

        let cells = [
            row.tanggal.to_string(),
            row.nopol.clone(),
            format_rupiah(row.harga_beli),
            format_rupiah(row.biaya),
            format_rupiah(row.harga_jual),
            format_rupiah(row.laba),
        ];
        write_line(&layer, &cells, y, &regular);
    }

    let totals = Totals::new(rows);
    let cells = [
        "Total".to_owned(),
        String::new(),
        format_rupiah(totals.harga_beli),
        format_rupiah(totals.biaya),
        format_rupiah(totals.harga_jual),
        format_rupiah(totals.laba),
    ];
    write_line(&layer, &cells, y - LINE_HEIGHT * 1.5, &bold);

    document.save_to_bytes().map_err(pdf_error)
}

fn write_line(layer: &PdfLayerReference, cells: &[String; 6], y: f32, font: &IndirectFontRef) {
    for (col, text) in cells.iter().enumerate() {
        let x = if col < 2 {
            COLUMN_X[col]
        } else {
            COLUMN_X[col + 1] - 5.0 - text_width(text, TEXT_SIZE)
        };

        layer.use_text(latin1(text), TEXT_SIZE, Mm(x), Mm(y), font);
    }
}

/// Replace characters the built-in fonts cannot encode with `?`.
fn latin1(text: &str) -> String {
    text.chars()
        .map(|c| if u32::from(c) <= 0xFF { c } else { '?' })
        .collect()
}

/// The width in mm of `text` set in Helvetica at `font_size` points.
///
/// Only the glyphs that appear in formatted amounts are measured exactly,
/// anything else is taken to be as wide as a digit.
fn text_width(text: &str, font_size: f32) -> f32 {
    const POINT_TO_MM: f32 = 0.352_778;

    let em: f32 = text
        .chars()
        .map(|c| match c {
            '.' | ',' | ' ' => 0.278,
            '-' => 0.333,
            'R' => 0.722,
            _ => 0.556,
        })
        .sum();

    em * font_size * POINT_TO_MM
}

fn pdf_error(error: printpdf::Error) -> Error {
    Error::ExportError("PDF", error.to_string())
}

#[cfg(test)]
mod tests {
    use crate::export::{
        pdf::{TEXT_SIZE, latin1, text_width},
        sample_rows, write_pdf,
    };

    #[test]
    fn produces_pdf_document() {
        let bytes = write_pdf(&sample_rows(), "Laporan Transaksi").unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_lists_span_pages() {
        let rows: Vec<_> = sample_rows().into_iter().cycle().take(60).collect();
        let one_page = write_pdf(&sample_rows(), "Laporan").unwrap();

        let many_pages = write_pdf(&rows, "Laporan").unwrap();

        assert!(many_pages.starts_with(b"%PDF"));
        assert!(many_pages.len() > one_page.len());
    }

    #[test]
    fn non_latin_text_is_replaced() {
        assert_eq!(latin1("B 1234 ÄB"), "B 1234 ÄB");
        assert_eq!(latin1("京 1234 AB"), "? 1234 AB");
    }

    #[test]
    fn non_latin_plate_still_produces_pdf() {
        let mut rows = sample_rows();
        rows[0].nopol = "京A 12345".to_owned();

        let bytes = write_pdf(&rows, "Laporan Transaksi 京").unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn wider_amounts_measure_wider() {
        assert!(text_width("Rp 60.000.000", TEXT_SIZE) > text_width("Rp 950", TEXT_SIZE));
        assert_eq!(text_width("", TEXT_SIZE), 0.0);
    }
}
