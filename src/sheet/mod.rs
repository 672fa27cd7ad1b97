//! 表格输入：把 xlsx/xls/ods/csv 统一成 [`SheetRow`] 序列，供读取阶段使用。

pub mod csv_source;
pub mod workbook;

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDateTime;
use std::path::Path;

use crate::error::InvoiceError;
use crate::models::amount::{decimal_from_f64, parse_decimal};

pub(crate) static EMPTY_CELL: Cell = Cell::Empty;

/// 单元格
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl Cell {
    /// 空白文本视同空单元格
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(text.to_string())
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) | Cell::Date(_) => false,
        }
    }

    /// 文本形式；整数值的数字不带 `.0` (如发票号 1001)
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Date(dt) => dt.format("%Y-%m-%d").to_string(),
        }
    }

    /// 数值形式：空白为 0，无法解析返回 None
    pub fn to_decimal(&self) -> Option<BigDecimal> {
        match self {
            Cell::Empty => Some(BigDecimal::zero()),
            Cell::Text(s) if s.trim().is_empty() => Some(BigDecimal::zero()),
            Cell::Text(s) => parse_decimal(s),
            Cell::Number(n) => decimal_from_f64(*n),
            Cell::Date(_) => None,
        }
    }
}

/// 一行表格，`number` 为 1 起始的表格行号 (用于报错)
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub number: usize,
    pub cells: Vec<Cell>,
}

impl SheetRow {
    pub fn new(number: usize, cells: Vec<Cell>) -> Self {
        Self { number, cells }
    }

    /// 越界列按空单元格处理
    pub fn cell(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }
}

/// 按扩展名选择读取方式
pub fn load_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<SheetRow>, InvoiceError> {
    if !path.is_file() {
        return Err(InvoiceError::FileNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => csv_source::read_csv(path),
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => workbook::read_workbook(path, sheet),
        _ => Err(InvoiceError::UnsupportedFormat(path.to_path_buf())),
    }
}
