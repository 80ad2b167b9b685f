mod summary_controller;

pub use summary_controller::SummaryController;
