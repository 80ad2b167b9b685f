pub mod controllers;
pub mod models;
pub mod services;

pub use models::InvoiceDocument;
pub use services::{amount_to_words, InvoiceRenderer, Language};
