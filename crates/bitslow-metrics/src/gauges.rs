use metrics::{describe_gauge, gauge};

/// Initialize gauge descriptions
pub fn init() {
    describe_gauge!("bitslow_coins", "Number of coins in the catalog");
    describe_gauge!("bitslow_clients", "Number of registered clients");
}

/// Set coins gauge
pub fn set_coins(count: i64) {
    gauge!("bitslow_coins").set(count as f64);
}

/// Set clients gauge
pub fn set_clients(count: i64) {
    gauge!("bitslow_clients").set(count as f64);
}
