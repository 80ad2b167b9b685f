mod billing_aggregator;

pub use billing_aggregator::BillingAggregator;
