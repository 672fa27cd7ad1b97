use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use invoice_forge::models::amount::round_money;
use invoice_forge::service::summary;
use invoice_forge::{AppConfig, DirectorySink, InvoiceError, InvoiceGenerator, MemorySink};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_invoices.csv")
}

fn generator(config: AppConfig) -> InvoiceGenerator {
    let at = NaiveDate::from_ymd_opt(2024, 6, 30)
        .unwrap()
        .and_hms_opt(17, 45, 0)
        .unwrap();
    InvoiceGenerator::with_timestamp(config, at)
}

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

#[test]
fn sample_sheet_groups_and_totals() {
    let invoices = generator(AppConfig::default())
        .load_invoices(&fixture(), None)
        .unwrap();

    let numbers: Vec<&str> = invoices.iter().map(|i| i.invoice_number()).collect();
    assert_eq!(numbers, vec!["INV-001", "INV-002", "INV-003", "INV-002"]);

    let first = invoices[0].totals();
    assert_eq!(round_money(&first.subtotal), dec("1200.00"));
    assert_eq!(round_money(&first.total), dec("1302.00"));

    let second = invoices[1].totals();
    assert_eq!(invoices[1].items.len(), 2);
    assert_eq!(second.subtotal, dec("6500"));
    assert_eq!(second.discount_amount, dec("650"));
    assert_eq!(second.taxable_amount, dec("5850"));
    assert_eq!(second.tax_amount, dec("585"));
    assert_eq!(second.total, dec("6435"));

    // 空白行被跳过，后续明细仍归 INV-003
    assert_eq!(invoices[2].items.len(), 2);
    assert_eq!(invoices[2].totals().total, dec("1373.50"));

    // 重复的 INV-002 单独成票
    assert_eq!(invoices[3].header.customer_name, "Global Systems Ltd");
    assert_eq!(round_money(&invoices[3].totals().total), dec("611.29"));
}

#[test]
fn duplicate_numbers_share_one_output_file() {
    let generator = generator(AppConfig::default());
    let mut sink = MemorySink::new();
    let report = generator.process_file(&fixture(), None, &mut sink).unwrap();

    assert!(report.is_success());
    assert_eq!(report.generated.len(), 4);
    let files: Vec<&str> = sink.files.keys().map(String::as_str).collect();
    assert_eq!(
        files,
        vec!["Invoice_INV-001.pdf", "Invoice_INV-002.pdf", "Invoice_INV-003.pdf"]
    );
    for bytes in sink.files.values() {
        assert!(bytes.starts_with(b"%PDF-"));
    }
}

#[test]
fn writes_pdfs_and_summary_to_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let config = AppConfig {
        output_folder: tmp.path().join("generated_invoices"),
        ..AppConfig::default()
    };
    let generator = generator(config);
    let mut sink = DirectorySink::create(&generator.config().output_folder).unwrap();
    let report = generator.process_file(&fixture(), None, &mut sink).unwrap();

    let out = tmp.path().join("generated_invoices");
    assert!(out.join("Invoice_INV-001.pdf").is_file());
    assert!(out.join("Invoice_INV-003.pdf").is_file());

    let summary_path = tmp.path().join("reports/summary.csv");
    summary::write_summary_file(&summary_path, &report).unwrap();
    let text = fs::read_to_string(&summary_path).unwrap();
    assert_eq!(text.lines().count(), 5);
    assert!(text.contains("INV-002,Tech Solutions Inc,2,6500.00,650.00,585.00,6435.00,"));
}

#[test]
fn orphan_rows_abort_before_rendering() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("orphan.csv");
    fs::write(
        &input,
        "Invoice Number,Customer Name,Item Name,Quantity,Price\n,,Stray Item,1,10\nINV-1,A,Item,1,10\n",
    )
    .unwrap();

    let mut sink = MemorySink::new();
    let err = generator(AppConfig::default())
        .process_file(&input, None, &mut sink)
        .unwrap_err();

    match err {
        InvoiceError::Validation(v) => {
            assert_eq!(v.row, 2);
            assert!(v.message.contains("no invoice number"));
        }
        other => panic!("expected validation error, got {other}"),
    }
    assert!(sink.files.is_empty());
}

#[test]
fn unsupported_extension_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("invoices.txt");
    fs::write(&input, "Invoice Number\n").unwrap();

    let err = generator(AppConfig::default())
        .load_invoices(&input, None)
        .unwrap_err();
    assert!(matches!(err, InvoiceError::UnsupportedFormat(_)));
}
