pub mod aggregator;
pub mod generator;
pub mod reader;
pub mod sample;
pub mod summary;

pub use aggregator::aggregate;
pub use generator::{GenerationReport, InvoiceGenerator};
pub use reader::read_records;
