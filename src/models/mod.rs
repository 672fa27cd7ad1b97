pub mod amount;
pub mod invoice;
pub mod record;

pub use invoice::{Invoice, InvoiceTotals};
pub use record::{InvoiceHeader, LineItemRecord, SheetRecord};
