pub mod amount_words;
pub mod invoice_renderer;

pub use amount_words::{amount_to_words, Language};
pub use invoice_renderer::InvoiceRenderer;
