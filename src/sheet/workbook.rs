use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use super::{Cell, SheetRow};
use crate::error::InvoiceError;

/// 读取工作簿：指定名称的工作表，或第一个工作表
pub fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Vec<SheetRow>, InvoiceError> {
    let mut workbook = open_workbook_auto(path)?;

    let range = match sheet {
        Some(name) => workbook.worksheet_range(name)?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| InvoiceError::EmptyWorkbook(path.to_path_buf()))??,
    };

    // 区域可能不从 A1 开始，行号需加上起始偏移
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let rows: Vec<SheetRow> = range
        .rows()
        .enumerate()
        .map(|(idx, cells)| SheetRow::new(first_row + idx + 1, cells.iter().map(to_cell).collect()))
        .collect();

    tracing::debug!(
        "Read {} rows from worksheet {}",
        rows.len(),
        sheet.unwrap_or("#0")
    );
    Ok(rows)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from_text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        // 公式错误按文本处理，数值列会在校验时报错
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}
