pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{SmsRecord, SmsStatus};
pub use repositories::SmsRepository;
pub use services::{
    apportion, build_records, GenerationSummary, MockSmsGenerator, StatusMix, TimeWindow,
};
