pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod service;
pub mod sheet;

pub use config::AppConfig;
pub use error::{InvoiceError, RenderError, ValidationError};
pub use render::{DirectorySink, InvoiceRenderer, InvoiceSink, MemorySink};
pub use service::{GenerationReport, InvoiceGenerator};
