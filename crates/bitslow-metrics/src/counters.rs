use metrics::{counter, describe_counter};

/// Initialize counter descriptions
pub fn init() {
    describe_counter!(
        "bitslow_registrations_total",
        "Total number of client registrations"
    );
    describe_counter!(
        "bitslow_logins_total",
        "Total number of login attempts by outcome"
    );
    describe_counter!(
        "bitslow_coins_generated_total",
        "Total number of coins minted"
    );
    describe_counter!(
        "bitslow_purchases_total",
        "Total number of coin purchases"
    );
    describe_counter!(
        "bitslow_api_errors_total",
        "Total number of API errors by kind"
    );
}

/// Increment registrations counter
pub fn registrations(count: u64) {
    counter!("bitslow_registrations_total").increment(count);
}

/// Increment logins counter
pub fn logins(count: u64, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("bitslow_logins_total", "outcome" => outcome).increment(count);
}

/// Increment generated coins counter
pub fn coins_generated(count: u64) {
    counter!("bitslow_coins_generated_total").increment(count);
}

/// Increment purchases counter
pub fn purchases(count: u64) {
    counter!("bitslow_purchases_total").increment(count);
}

/// Increment API errors counter
pub fn api_errors(count: u64, kind: &str) {
    counter!("bitslow_api_errors_total", "kind" => kind.to_string()).increment(count);
}
