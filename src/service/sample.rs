//! 示例数据：按固定规则生成一份可直接读取的发票表格 (CSV)。
//!
//! 每张发票 1~3 条明细，只有首行带抬头，其余行抬头留空。
//! 不使用随机数，同样的参数总是得到同样的文件。

use chrono::{Duration, NaiveDate};
use std::io::Write;
use std::path::Path;

use crate::error::InvoiceError;

pub const SAMPLE_INVOICES: usize = 200;

const HEADER: [&str; 10] = [
    "Invoice Number",
    "Customer Name",
    "Address",
    "Phone Number",
    "Date",
    "Item Name",
    "Quantity",
    "Price",
    "Tax %",
    "Discount %",
];

const CUSTOMERS: [&str; 12] = [
    "John Smith",
    "Sarah Johnson",
    "Tech Solutions Inc",
    "Mike Davis",
    "Global Systems Ltd",
    "Jennifer Martinez",
    "ABC Corporation",
    "Innovation Labs",
    "Digital Partners LLC",
    "Enterprise Group",
    "Cloud Services Co",
    "Matthew Robinson",
];

const ADDRESSES: [&str; 6] = [
    "123 Main St, New York, NY 10001",
    "456 Oak Avenue, Los Angeles, CA 90001",
    "789 Business Blvd, Suite 100, Chicago, IL 60601",
    "321 Elm Street, Houston, TX 77001",
    "654 Pine Road, Phoenix, AZ 85001",
    "987 Maple Drive, Philadelphia, PA 19019",
];

const ITEMS: [&str; 16] = [
    "Laptop Computer",
    "Wireless Mouse",
    "USB-C Cable",
    "Office Desk",
    "Office Chair",
    "Web Development Service",
    "SEO Optimization",
    "Monitor 27\"",
    "Docking Station",
    "Standing Desk",
    "Router",
    "Consulting Services",
    "Software License",
    "Technical Support",
    "Security Audit",
    "Mobile App Development",
];

const DISCOUNTS: [u32; 5] = [0, 5, 10, 15, 20];

/// 生成 `invoices` 张发票的数据行 (不含表头)，日期从 `today` 往前最多 90 天
pub fn sample_rows(invoices: usize, today: NaiveDate) -> Vec<[String; 10]> {
    let mut rows = Vec::new();

    for n in 1..=invoices {
        let item_count = 1 + n % 3;
        for i in 0..item_count {
            let seed = n * 31 + i * 17;
            let item = ITEMS[seed % ITEMS.len()].to_string();
            let quantity = (1 + seed % 50).to_string();
            let cents = 5_000 + (seed * 7_919) % 495_000;
            let price = format!("{}.{:02}", cents / 100, cents % 100);

            let row = if i == 0 {
                let date = today - Duration::days((n * 13 % 91) as i64);
                [
                    format!("INV-{n:03}"),
                    CUSTOMERS[n % CUSTOMERS.len()].to_string(),
                    ADDRESSES[n % ADDRESSES.len()].to_string(),
                    format!("+1-555-{:04}", 1000 + (n * 389) % 9000),
                    date.format("%Y-%m-%d").to_string(),
                    item,
                    quantity,
                    price,
                    format!("{}.{}", 5 + n % 5, n % 10),
                    DISCOUNTS[n % DISCOUNTS.len()].to_string(),
                ]
            } else {
                [
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    item,
                    quantity,
                    price,
                    String::new(),
                    String::new(),
                ]
            };
            rows.push(row);
        }
    }

    rows
}

pub fn write_sample<W: Write>(writer: W, invoices: usize, today: NaiveDate) -> Result<usize, InvoiceError> {
    let rows = sample_rows(invoices, today);
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for row in &rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(rows.len())
}

/// 写出示例文件，只支持 `.csv`
pub fn write_sample_file(path: &Path, invoices: usize, today: NaiveDate) -> Result<usize, InvoiceError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(InvoiceError::UnsupportedFormat(path.to_path_buf()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let rows = write_sample(std::fs::File::create(path)?, invoices, today)?;
    tracing::info!(
        "Sample data written to {}: {} invoice(s), {} row(s)",
        path.display(),
        invoices,
        rows
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{aggregate, read_records};
    use crate::sheet::csv_source::read_csv_from;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn sample_reads_back_as_invoices() {
        let mut out = Vec::new();
        let rows = write_sample(&mut out, 12, today()).unwrap();

        let sheet = read_csv_from(out.as_slice()).unwrap();
        assert_eq!(sheet.len(), rows + 1);

        let invoices = aggregate(read_records(&sheet).unwrap());
        assert_eq!(invoices.len(), 12);
        assert_eq!(invoices[0].invoice_number(), "INV-001");
        assert_eq!(invoices[11].invoice_number(), "INV-012");
        for invoice in &invoices {
            assert!((1..=3).contains(&invoice.items.len()));
            assert!(!invoice.header.customer_name.is_empty());
        }
    }

    #[test]
    fn only_first_row_of_an_invoice_carries_the_header() {
        let rows = sample_rows(3, today());
        // INV-001: 2 条, INV-002: 3 条, INV-003: 1 条
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0][0], "INV-001");
        assert!(rows[1][0].is_empty() && rows[1][8].is_empty());
        assert_eq!(rows[2][0], "INV-002");
        assert_eq!(rows[5][0], "INV-003");
    }

    #[test]
    fn dates_stay_within_ninety_days() {
        for row in sample_rows(50, today()).iter().filter(|r| !r[4].is_empty()) {
            let date = NaiveDate::parse_from_str(&row[4], "%Y-%m-%d").unwrap();
            assert!(date <= today());
            assert!(today() - date <= Duration::days(90));
        }
    }

    #[test]
    fn sample_file_must_be_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let err = write_sample_file(&tmp.path().join("sample.xlsx"), 3, today()).unwrap_err();
        assert!(matches!(err, InvoiceError::UnsupportedFormat(_)));

        let path = tmp.path().join("data/sample.csv");
        let rows = write_sample_file(&path, 3, today()).unwrap();
        assert_eq!(rows, 6);
        assert!(path.is_file());
    }
}
