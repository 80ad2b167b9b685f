pub mod apportion;
pub mod mock_generator;

pub use apportion::apportion;
pub use mock_generator::{
    build_records, GenerationSummary, MockSmsGenerator, StatusMix, TimeWindow,
};
