use bigdecimal::{BigDecimal, Zero};
use serde::Serialize;

use super::amount::percent_of;
use super::record::{InvoiceHeader, LineItemRecord, SheetRecord};

/// 发票：一个抬头 + 按行顺序排列的明细
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    pub header_row: usize,
    pub header: InvoiceHeader,
    pub items: Vec<LineItemRecord>,
}

impl Invoice {
    pub fn new(header_row: usize, header: InvoiceHeader) -> Self {
        Self {
            header_row,
            header,
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: LineItemRecord) {
        self.items.push(item);
    }

    pub fn invoice_number(&self) -> &str {
        &self.header.invoice_number
    }

    /// 汇总金额始终由抬头和明细重新计算
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::compute(
            &self.items,
            &self.header.discount_percent,
            &self.header.tax_percent,
        )
    }

    /// 还原为读取阶段的记录序列，重新聚合应得到相同的发票
    pub fn to_records(&self) -> Vec<SheetRecord> {
        if self.items.is_empty() {
            return vec![SheetRecord {
                header_row: self.header_row,
                header: self.header.clone(),
                item: None,
            }];
        }
        self.items
            .iter()
            .map(|item| SheetRecord {
                header_row: self.header_row,
                header: self.header.clone(),
                item: Some(item.clone()),
            })
            .collect()
    }
}

/// 发票汇总 (未舍入)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: BigDecimal,
    pub discount_amount: BigDecimal,
    pub taxable_amount: BigDecimal,
    pub tax_amount: BigDecimal,
    pub total: BigDecimal,
}

impl InvoiceTotals {
    /// 先折扣后计税
    pub fn compute(
        items: &[LineItemRecord],
        discount_percent: &BigDecimal,
        tax_percent: &BigDecimal,
    ) -> Self {
        let subtotal = items
            .iter()
            .fold(BigDecimal::zero(), |acc, item| acc + item.line_total());
        let discount_amount = percent_of(&subtotal, discount_percent);
        let taxable_amount = &subtotal - &discount_amount;
        let tax_amount = percent_of(&taxable_amount, tax_percent);
        let total = &taxable_amount + &tax_amount;

        Self {
            subtotal,
            discount_amount,
            taxable_amount,
            tax_amount,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn invoice(tax: &str, discount: &str, items: &[(&str, &str, &str)]) -> Invoice {
        let mut header = InvoiceHeader::new("INV-001");
        header.tax_percent = dec(tax);
        header.discount_percent = dec(discount);
        let mut invoice = Invoice::new(2, header);
        for (name, qty, price) in items {
            invoice.add_item(LineItemRecord::new(*name, dec(qty), dec(price)));
        }
        invoice
    }

    #[test]
    fn single_item_with_tax_only() {
        let totals = invoice("8.5", "0", &[("Laptop Computer", "1", "1200")]).totals();
        assert_eq!(totals.subtotal, dec("1200.00"));
        assert_eq!(totals.discount_amount, dec("0"));
        assert_eq!(totals.tax_amount, dec("102.00"));
        assert_eq!(totals.total, dec("1302.00"));
    }

    #[test]
    fn discount_applies_before_tax() {
        let totals = invoice(
            "10",
            "10",
            &[("Wireless Mouse", "40", "150"), ("Office Desk", "1", "500")],
        )
        .totals();
        assert_eq!(totals.subtotal, dec("6500.00"));
        assert_eq!(totals.discount_amount, dec("650.00"));
        assert_eq!(totals.taxable_amount, dec("5850.00"));
        assert_eq!(totals.tax_amount, dec("585.00"));
        assert_eq!(totals.total, dec("6435.00"));
    }

    #[test]
    fn decimal_prices_do_not_drift() {
        let totals = invoice("0", "0", &[("USB-C Cable", "3", "0.1")]).totals();
        assert_eq!(totals.total, dec("0.3"));
    }

    #[test]
    fn empty_invoice_totals_zero() {
        let totals = invoice("10", "5", &[]).totals();
        assert!(totals.total.is_zero());
    }

    #[test]
    fn to_records_keeps_row_order() {
        let inv = invoice("0", "0", &[("B", "1", "1"), ("A", "2", "2")]);
        let names: Vec<_> = inv
            .to_records()
            .into_iter()
            .filter_map(|r| r.item.map(|i| i.item_name))
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn empty_invoice_keeps_one_record() {
        let records = invoice("0", "0", &[]).to_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].header.invoice_number, "INV-001");
        assert_eq!(records[0].item, None);
    }
}
