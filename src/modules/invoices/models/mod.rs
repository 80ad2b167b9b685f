mod invoice;

pub use invoice::InvoiceDocument;
