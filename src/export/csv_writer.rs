use crate::{
    Error,
    export::{ExportRow, HEADERS},
};

/// Write `rows` as CSV with a header row. Amounts are plain integers so the file
/// can be loaded back into a spreadsheet without locale issues.
///
/// # Errors
/// Returns [Error::ExportError] if a record could not be written.
pub fn write_csv(rows: &[ExportRow]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record(HEADERS).map_err(csv_error)?;

    for row in rows {
        writer
            .write_record([
                row.tanggal.to_string(),
                row.nopol.clone(),
                row.harga_beli.to_string(),
                row.biaya.to_string(),
                row.harga_jual.to_string(),
                row.laba.to_string(),
            ])
            .map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::ExportError("CSV", error.to_string()))
}

fn csv_error(error: csv::Error) -> Error {
    Error::ExportError("CSV", error.to_string())
}

#[cfg(test)]
mod tests {
    use crate::export::{sample_rows, write_csv};

    #[test]
    fn writes_header_and_rows() {
        let bytes = write_csv(&sample_rows()).unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Tanggal,No Polisi,Harga Beli,Biaya,Harga Jual,Keuntungan\n\
             2024-01-01,B123XYZ,50000000,2000000,60000000,8000000\n\
             2024-01-05,D 777 AB,70000000,1500000,65000000,-6500000\n"
        );
    }

    #[test]
    fn empty_list_is_header_only() {
        let bytes = write_csv(&[]).unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Tanggal,No Polisi,Harga Beli,Biaya,Harga Jual,Keuntungan\n"
        );
    }
}
