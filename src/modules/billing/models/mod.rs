mod monthly_summary;

pub use monthly_summary::MonthlySummary;
