//! 批处理汇总导出：生成结果的 CSV (每张发票一行)，以及试运行时的 JSON 预览。

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::error::InvoiceError;
use crate::models::amount::round_money;
use crate::models::{Invoice, InvoiceTotals};
use crate::service::generator::GenerationReport;

/// 试运行预览：发票本身 + 汇总金额
#[derive(Debug, Serialize)]
pub struct InvoicePreview<'a> {
    #[serde(flatten)]
    pub invoice: &'a Invoice,
    pub totals: InvoiceTotals,
}

impl<'a> From<&'a Invoice> for InvoicePreview<'a> {
    fn from(invoice: &'a Invoice) -> Self {
        Self {
            invoice,
            totals: invoice.totals(),
        }
    }
}

/// 以 JSON 数组输出全部发票，不渲染任何 PDF
pub fn write_preview_json<W: Write>(writer: W, invoices: &[Invoice]) -> Result<(), InvoiceError> {
    let previews: Vec<InvoicePreview<'_>> = invoices.iter().map(InvoicePreview::from).collect();
    serde_json::to_writer_pretty(writer, &previews)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    invoice_number: &'a str,
    customer_name: &'a str,
    items: usize,
    subtotal: String,
    discount: String,
    tax: String,
    total: String,
    file: String,
}

pub fn write_summary<W: Write>(writer: W, report: &GenerationReport) -> Result<(), InvoiceError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for generated in &report.generated {
        let totals = &generated.totals;
        csv_writer.serialize(SummaryRow {
            invoice_number: &generated.invoice_number,
            customer_name: &generated.customer_name,
            items: generated.item_count,
            subtotal: round_money(&totals.subtotal).to_string(),
            discount: round_money(&totals.discount_amount).to_string(),
            tax: round_money(&totals.tax_amount).to_string(),
            total: round_money(&totals.total).to_string(),
            file: generated.path.display().to_string(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_summary_file(path: &Path, report: &GenerationReport) -> Result<(), InvoiceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_summary(file, report)?;
    tracing::info!("Summary written to {}", path.display());
    Ok(())
}
