//! 读取阶段：表格行 → 带抬头的明细记录。
//!
//! 发票号非空的行开启新发票 (替换当前抬头)；发票号为空的行沿用当前抬头。
//! 抬头行即使没有商品也输出一条记录，保证每个发票号都成票。
//! 当前抬头只是一个局部 `Option`，整个过程是行序列到记录序列的纯函数。

use bigdecimal::BigDecimal;
use indexmap::IndexMap;

use crate::error::ValidationError;
use crate::models::{InvoiceHeader, LineItemRecord, SheetRecord};
use crate::sheet::{Cell, SheetRow, EMPTY_CELL};

/// 已知列及其表头别名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    InvoiceNumber,
    CustomerName,
    Address,
    Phone,
    Date,
    ItemName,
    Quantity,
    Price,
    TaxPercent,
    DiscountPercent,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::InvoiceNumber,
        Column::CustomerName,
        Column::Address,
        Column::Phone,
        Column::Date,
        Column::ItemName,
        Column::Quantity,
        Column::Price,
        Column::TaxPercent,
        Column::DiscountPercent,
    ];

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::InvoiceNumber => &["invoice number", "invoice no", "invoice #"],
            Column::CustomerName => &["customer name", "customer"],
            Column::Address => &["address"],
            Column::Phone => &["phone number", "phone"],
            Column::Date => &["date", "invoice date"],
            Column::ItemName => &["item name", "item"],
            Column::Quantity => &["quantity", "qty"],
            Column::Price => &["price", "unit price"],
            Column::TaxPercent => &["tax %", "tax"],
            Column::DiscountPercent => &["discount %", "discount"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::InvoiceNumber => "Invoice Number",
            Column::CustomerName => "Customer Name",
            Column::Address => "Address",
            Column::Phone => "Phone Number",
            Column::Date => "Date",
            Column::ItemName => "Item Name",
            Column::Quantity => "Quantity",
            Column::Price => "Price",
            Column::TaxPercent => "Tax %",
            Column::DiscountPercent => "Discount %",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            Column::InvoiceNumber | Column::ItemName | Column::Quantity | Column::Price
        )
    }
}

/// 表头行解析出的列位置
#[derive(Debug, Clone)]
pub struct ColumnMap {
    positions: IndexMap<String, usize>,
}

impl ColumnMap {
    pub fn from_header(row: &SheetRow) -> Result<Self, ValidationError> {
        let mut positions: IndexMap<String, usize> = IndexMap::new();
        for (idx, cell) in row.cells.iter().enumerate() {
            let name = normalize(&cell.to_text());
            if name.is_empty() {
                continue;
            }
            if positions.contains_key(&name) {
                tracing::warn!("Duplicate column '{}' in header row, using the first one", name);
                continue;
            }
            positions.insert(name, idx);
        }

        let map = Self { positions };

        let missing: Vec<&str> = Column::ALL
            .iter()
            .filter(|c| c.is_required() && map.position(**c).is_none())
            .map(|c| c.label())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::new(
                row.number,
                None,
                format!("missing required column(s): {}", missing.join(", ")),
            ));
        }

        Ok(map)
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        column
            .aliases()
            .iter()
            .find_map(|alias| self.positions.get(*alias).copied())
    }

    pub fn cell<'a>(&self, row: &'a SheetRow, column: Column) -> &'a Cell {
        match self.position(column) {
            Some(idx) => row.cell(idx),
            None => &EMPTY_CELL,
        }
    }

    fn text(&self, row: &SheetRow, column: Column) -> String {
        self.cell(row, column).to_text()
    }

    fn number(
        &self,
        row: &SheetRow,
        column: Column,
        invoice: Option<&str>,
    ) -> Result<BigDecimal, ValidationError> {
        let cell = self.cell(row, column);
        cell.to_decimal().ok_or_else(|| {
            ValidationError::new(
                row.number,
                invoice,
                format!("{} is not a number: {:?}", column.label(), cell.to_text()),
            )
        })
    }

    /// 从发票首行解析抬头，税率/折扣留空为 0
    pub fn parse_header(&self, row: &SheetRow) -> Result<InvoiceHeader, ValidationError> {
        let invoice_number = self.text(row, Column::InvoiceNumber);
        let tax_percent = self.number(row, Column::TaxPercent, Some(&invoice_number))?;
        let discount_percent = self.number(row, Column::DiscountPercent, Some(&invoice_number))?;

        Ok(InvoiceHeader {
            invoice_number,
            customer_name: self.text(row, Column::CustomerName),
            address: self.text(row, Column::Address),
            phone: self.text(row, Column::Phone),
            date: self.text(row, Column::Date),
            tax_percent,
            discount_percent,
        })
    }

    pub fn parse_item(
        &self,
        row: &SheetRow,
        invoice: Option<&str>,
    ) -> Result<LineItemRecord, ValidationError> {
        Ok(LineItemRecord {
            item_name: self.text(row, Column::ItemName),
            quantity: self.number(row, Column::Quantity, invoice)?,
            unit_price: self.number(row, Column::Price, invoice)?,
        })
    }
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 读取全部记录；首行为表头。遇到第一处校验错误即返回
pub fn read_records(rows: &[SheetRow]) -> Result<Vec<SheetRecord>, ValidationError> {
    let Some((header, body)) = rows.split_first() else {
        tracing::warn!("Spreadsheet is empty");
        return Ok(Vec::new());
    };
    let columns = ColumnMap::from_header(header)?;

    // 当前抬头：None 表示尚未遇到发票号
    let mut current: Option<(usize, InvoiceHeader)> = None;
    let mut records = Vec::new();

    for row in body {
        if row.is_blank() {
            continue;
        }

        let starts_invoice = !columns.cell(row, Column::InvoiceNumber).is_blank();
        if starts_invoice {
            let header = columns.parse_header(row)?;
            tracing::debug!("Row {}: invoice {} starts", row.number, header.invoice_number);
            current = Some((row.number, header));
        }
        let has_item = !columns.cell(row, Column::ItemName).is_blank();

        let Some((header_row, header)) = &current else {
            if !has_item {
                tracing::warn!("Row {}: no invoice number or item name, skipped", row.number);
                continue;
            }
            return Err(ValidationError::new(
                row.number,
                None,
                "item row has no invoice number above it",
            ));
        };

        let item = if has_item {
            Some(columns.parse_item(row, Some(&header.invoice_number))?)
        } else if starts_invoice {
            tracing::warn!(
                "Row {}: invoice {} has no item name, it opens an invoice without items",
                row.number,
                header.invoice_number
            );
            None
        } else {
            tracing::warn!("Row {}: no item name, skipped", row.number);
            continue;
        };

        records.push(SheetRecord {
            header_row: *header_row,
            header: header.clone(),
            item,
        });
    }

    tracing::info!(
        "Read {} record(s) from {} data row(s)",
        records.len(),
        body.len()
    );
    Ok(records)
}
