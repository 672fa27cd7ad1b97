use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{Cell, SheetRow};
use crate::error::InvoiceError;

pub fn read_csv(path: &Path) -> Result<Vec<SheetRow>, InvoiceError> {
    let file = File::open(path)?;
    read_csv_from(file)
}

/// 首行作为普通行返回，由读取阶段解释表头；行号取 CSV 记录的起始行
pub fn read_csv_from<R: Read>(input: R) -> Result<Vec<SheetRow>, InvoiceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(input);

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);
        let cells = record.iter().map(Cell::from_text).collect();
        rows.push(SheetRow::new(number, cells));
    }

    tracing::debug!("Read {} CSV rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_file_line_numbers() {
        let data = "Invoice Number,Item Name\nINV-1,Widget\n,\n,Gadget\n";
        let rows = read_csv_from(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[3].number, 4);
        assert!(rows[2].is_blank());
        assert_eq!(rows[3].cell(0), &Cell::Empty);
        assert_eq!(rows[3].cell(1), &Cell::Text("Gadget".into()));
    }

    #[test]
    fn quoted_fields_may_hold_commas() {
        let data = "Address\n\"123 Main St, New York, NY 10001\"\n";
        let rows = read_csv_from(data.as_bytes()).unwrap();
        assert_eq!(rows[1].cell(0).to_text(), "123 Main St, New York, NY 10001");
    }
}
