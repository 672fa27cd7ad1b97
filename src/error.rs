use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 行级校验错误：指明出错的表格行号，以及（已知时）所属发票号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub row: usize,
    pub invoice: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(row: usize, invoice: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            row,
            invoice: invoice.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.invoice {
            Some(invoice) => write!(f, "row {} (invoice {}): {}", self.row, invoice, self.message),
            None => write!(f, "row {}: {}", self.row, self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// 单张发票渲染失败的原因
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("logo file not found: {}", .0.display())]
    LogoNotFound(PathBuf),

    #[error("cannot decode logo {}: {source}", .path.display())]
    Logo {
        path: PathBuf,
        #[source]
        source: printpdf::image_crate::ImageError,
    },

    #[error("pdf error: {0}")]
    Pdf(String),

    #[error("cannot write output: {0}")]
    Io(#[from] std::io::Error),
}

/// 批处理错误
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("unsupported input format: {} (expected .xlsx, .xlsm, .xls, .ods or .csv)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("workbook has no worksheets: {}", .0.display())]
    EmptyWorkbook(PathBuf),

    #[error("validation failed at {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to render invoice {invoice}: {source}")]
    Render {
        invoice: String,
        #[source]
        source: RenderError,
    },

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
