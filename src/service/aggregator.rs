use indexmap::IndexMap;

use crate::models::{Invoice, SheetRecord};

/// 按位置把连续记录归入发票，保持首次出现顺序
///
/// 只比较 `header_row`：后面再次出现的相同发票号会成为新的发票，不与前面合并。
/// 没有明细的抬头也开启一张发票。
pub fn aggregate<I>(records: I) -> Vec<Invoice>
where
    I: IntoIterator<Item = SheetRecord>,
{
    let mut invoices: Vec<Invoice> = Vec::new();

    for record in records {
        let opens_invoice = invoices
            .last()
            .map_or(true, |current| current.header_row != record.header_row);
        if opens_invoice {
            invoices.push(Invoice::new(record.header_row, record.header));
        }
        if let (Some(item), Some(current)) = (record.item, invoices.last_mut()) {
            current.add_item(item);
        }
    }

    tracing::info!("Grouped line items into {} invoice(s)", invoices.len());
    invoices
}

/// 出现多次的发票号及次数 (同名输出文件会互相覆盖)
pub fn duplicate_numbers(invoices: &[Invoice]) -> IndexMap<&str, usize> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for invoice in invoices {
        *counts.entry(invoice.invoice_number()).or_insert(0) += 1;
    }
    counts.retain(|_, count| *count > 1);
    counts
}
