pub mod layout;
pub mod pdf;
pub mod sink;

pub use layout::{layout_invoice, Layout};
pub use sink::{DirectorySink, InvoiceSink, MemorySink};

use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::{InvoiceError, RenderError};
use crate::models::Invoice;

/// `Invoice_<发票号>.pdf`；发票号中的路径分隔符等字符替换为 `_`
pub fn file_name(invoice_number: &str) -> String {
    let safe: String = invoice_number
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("Invoice_{}.pdf", safe)
}

/// 发票渲染器：配置在构造时固定
pub struct InvoiceRenderer {
    config: AppConfig,
    generated_at: NaiveDateTime,
}

impl InvoiceRenderer {
    pub fn new(config: AppConfig, generated_at: NaiveDateTime) -> Self {
        Self {
            config,
            generated_at,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn layout(&self, invoice: &Invoice) -> Layout {
        layout_invoice(invoice, &self.config, self.generated_at)
    }

    /// 生成并写出一张发票
    pub fn render(&self, invoice: &Invoice, sink: &mut dyn InvoiceSink) -> Result<PathBuf, InvoiceError> {
        let number = invoice.invoice_number();
        let wrap = |source: RenderError| InvoiceError::Render {
            invoice: number.to_string(),
            source,
        };

        let bytes = pdf::paint(&self.layout(invoice)).map_err(wrap)?;
        let path = sink
            .write(&file_name(number), &bytes)
            .map_err(|e| wrap(RenderError::Io(e)))?;

        tracing::debug!("Invoice {} rendered ({} bytes)", number, bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvoiceHeader, LineItemRecord};
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn renderer(config: AppConfig) -> InvoiceRenderer {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        InvoiceRenderer::new(config, at)
    }

    fn invoice(number: &str) -> Invoice {
        let mut invoice = Invoice::new(2, InvoiceHeader::new(number));
        invoice.add_item(LineItemRecord::new("Logo Design", BigDecimal::from(1), BigDecimal::from(500)));
        invoice
    }

    #[test]
    fn file_names_follow_invoice_numbers() {
        assert_eq!(file_name("INV-002"), "Invoice_INV-002.pdf");
        assert_eq!(file_name("2024/07 #3"), "Invoice_2024_07__3.pdf");
        assert_eq!(file_name("../etc"), "Invoice_.._etc.pdf");
    }

    #[test]
    fn renders_into_the_sink() {
        let mut sink = MemorySink::new();
        let path = renderer(AppConfig::default())
            .render(&invoice("INV-001"), &mut sink)
            .unwrap();

        assert_eq!(path, PathBuf::from("Invoice_INV-001.pdf"));
        let bytes = sink.get("Invoice_INV-001.pdf").unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn render_errors_name_the_invoice() {
        let config = AppConfig {
            logo_path: Some(PathBuf::from("missing/logo.png")),
            ..AppConfig::default()
        };
        let mut sink = MemorySink::new();
        let err = renderer(config).render(&invoice("INV-009"), &mut sink).unwrap_err();

        match err {
            InvoiceError::Render { invoice, source: RenderError::LogoNotFound(_) } => {
                assert_eq!(invoice, "INV-009")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(sink.files.is_empty());
    }
}
