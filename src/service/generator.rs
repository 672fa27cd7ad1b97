use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::InvoiceError;
use crate::models::{Invoice, InvoiceTotals};
use crate::render::{self, InvoiceRenderer, InvoiceSink};
use crate::service::{aggregator, reader};
use crate::sheet;

/// 成功生成的发票
#[derive(Debug, Clone)]
pub struct GeneratedInvoice {
    pub invoice_number: String,
    pub customer_name: String,
    pub item_count: usize,
    pub totals: InvoiceTotals,
    pub path: PathBuf,
}

/// 渲染失败的发票
#[derive(Debug)]
pub struct FailedInvoice {
    pub invoice_number: String,
    pub header_row: usize,
    pub error: InvoiceError,
}

/// 一次批处理的结果
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub generated: Vec<GeneratedInvoice>,
    pub failed: Vec<FailedInvoice>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 发票生成服务：读取 → 聚合 → 逐张渲染
pub struct InvoiceGenerator {
    renderer: InvoiceRenderer,
}

impl InvoiceGenerator {
    pub fn new(config: AppConfig) -> Self {
        Self::with_timestamp(config, Local::now().naive_local())
    }

    /// 固定生成时间 (页脚时间戳、缺省日期)
    pub fn with_timestamp(config: AppConfig, generated_at: NaiveDateTime) -> Self {
        Self {
            renderer: InvoiceRenderer::new(config, generated_at),
        }
    }

    pub fn config(&self) -> &AppConfig {
        self.renderer.config()
    }

    /// 读取表格并聚合为发票；任何校验错误终止整批
    pub fn load_invoices(&self, input: &Path, sheet_name: Option<&str>) -> Result<Vec<Invoice>, InvoiceError> {
        tracing::info!("Reading invoice data from: {}", input.display());
        let rows = sheet::load_rows(input, sheet_name)?;
        let records = reader::read_records(&rows)?;
        let invoices = aggregator::aggregate(records);

        for (number, count) in aggregator::duplicate_numbers(&invoices) {
            tracing::warn!(
                "Invoice number {} appears {} times; later output overwrites {}",
                number,
                count,
                render::file_name(number)
            );
        }

        Ok(invoices)
    }

    /// 逐张渲染。单张失败记录下来继续处理后面的发票
    pub fn generate(&self, invoices: &[Invoice], sink: &mut dyn InvoiceSink) -> GenerationReport {
        let total = invoices.len();
        let mut report = GenerationReport::default();

        for (idx, invoice) in invoices.iter().enumerate() {
            let number = invoice.invoice_number();
            tracing::info!("Generating invoice {}/{}: {}", idx + 1, total, number);

            // 汇总必须在渲染前完成
            let totals = invoice.totals();
            match self.renderer.render(invoice, sink) {
                Ok(path) => {
                    tracing::info!("Created: {}", path.display());
                    report.generated.push(GeneratedInvoice {
                        invoice_number: number.to_string(),
                        customer_name: invoice.header.customer_name.clone(),
                        item_count: invoice.items.len(),
                        totals,
                        path,
                    });
                }
                Err(error) => {
                    tracing::error!("Invoice {} (row {}) failed: {}", number, invoice.header_row, error);
                    report.failed.push(FailedInvoice {
                        invoice_number: number.to_string(),
                        header_row: invoice.header_row,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            "Generated {} invoice(s), {} failed",
            report.generated.len(),
            report.failed.len()
        );
        report
    }

    pub fn process_file(
        &self,
        input: &Path,
        sheet_name: Option<&str>,
        sink: &mut dyn InvoiceSink,
    ) -> Result<GenerationReport, InvoiceError> {
        let invoices = self.load_invoices(input, sheet_name)?;
        tracing::info!("Found {} invoice(s) to generate", invoices.len());
        Ok(self.generate(&invoices, sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvoiceHeader, LineItemRecord};
    use crate::render::MemorySink;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::io;

    fn generator(config: AppConfig) -> InvoiceGenerator {
        let at = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        InvoiceGenerator::with_timestamp(config, at)
    }

    fn invoice(row: usize, number: &str) -> Invoice {
        let mut invoice = Invoice::new(row, InvoiceHeader::new(number));
        invoice.add_item(LineItemRecord::new("Consulting Services", BigDecimal::from(2), BigDecimal::from(75)));
        invoice
    }

    /// 写第二个文件时失败
    struct FlakySink {
        inner: MemorySink,
        writes: usize,
    }

    impl InvoiceSink for FlakySink {
        fn write(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
            self.writes += 1;
            if self.writes == 2 {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.inner.write(file_name, bytes)
        }
    }

    #[test]
    fn one_failure_does_not_stop_the_batch() {
        let invoices = vec![invoice(2, "INV-001"), invoice(3, "INV-002"), invoice(4, "INV-003")];
        let mut sink = FlakySink {
            inner: MemorySink::new(),
            writes: 0,
        };

        let report = generator(AppConfig::default()).generate(&invoices, &mut sink);

        assert!(!report.is_success());
        assert_eq!(report.generated.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].invoice_number, "INV-002");
        assert_eq!(report.failed[0].header_row, 3);
        assert!(sink.inner.get("Invoice_INV-001.pdf").is_some());
        assert!(sink.inner.get("Invoice_INV-003.pdf").is_some());
    }

    #[test]
    fn report_carries_totals() {
        let mut sink = MemorySink::new();
        let report = generator(AppConfig::default()).generate(&[invoice(2, "INV-010")], &mut sink);

        assert!(report.is_success());
        let generated = &report.generated[0];
        assert_eq!(generated.item_count, 1);
        assert_eq!(generated.totals.total, BigDecimal::from(150));
        assert_eq!(generated.path, PathBuf::from("Invoice_INV-010.pdf"));
    }

    #[test]
    fn missing_input_is_reported() {
        let err = generator(AppConfig::default())
            .load_invoices(Path::new("nowhere/invoices.xlsx"), None)
            .unwrap_err();
        assert!(matches!(err, InvoiceError::FileNotFound(_)));
    }
}
