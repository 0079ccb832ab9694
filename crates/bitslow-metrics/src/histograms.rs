use metrics::{describe_histogram, histogram};
use std::time::Duration;

/// Initialize histogram descriptions
pub fn init() {
    describe_histogram!(
        "bitslow_mint_attempts",
        "Random candidates sampled per successful mint"
    );
    describe_histogram!(
        "bitslow_db_query_duration_seconds",
        "Time spent in database calls per API operation"
    );
}

/// Record number of candidates drawn for a mint
pub fn mint_attempts(attempts: u32) {
    histogram!("bitslow_mint_attempts").record(f64::from(attempts));
}

/// Record database time for an API operation
pub fn db_query_duration(duration: Duration, operation: &'static str) {
    histogram!("bitslow_db_query_duration_seconds", "operation" => operation)
        .record(duration.as_secs_f64());
}
