use crate::error::{ExchangeError, Result};
use crate::types::{Components, COMPONENT_RANGE};
use rand::Rng;
use std::collections::HashSet;

/// Number of random triples tried before giving up on a mint
pub const MAX_MINT_ATTEMPTS: u32 = 100;

/// Result of a successful component draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub components: Components,
    /// Number of candidates sampled, including the accepted one
    pub attempts: u32,
}

/// Sample a component triple that is not already in `used`.
///
/// Each component is drawn independently and uniformly from `[0, 100)`.
/// Uniqueness is best-effort: the search stops after [`MAX_MINT_ATTEMPTS`]
/// candidates, and the caller inserts without a uniqueness constraint, so two
/// concurrent mints can still pick the same triple.
pub fn find_unused_components<R: Rng + ?Sized>(
    rng: &mut R,
    used: &HashSet<Components>,
) -> Result<Draw> {
    for attempt in 1..=MAX_MINT_ATTEMPTS {
        let candidate = Components::new(
            rng.gen_range(0..COMPONENT_RANGE),
            rng.gen_range(0..COMPONENT_RANGE),
            rng.gen_range(0..COMPONENT_RANGE),
        );
        if !used.contains(&candidate) {
            return Ok(Draw {
                components: candidate,
                attempts: attempt,
            });
        }
    }

    Err(ExchangeError::CombinationsExhausted {
        attempts: MAX_MINT_ATTEMPTS,
    })
}

/// Validate a mint amount: must be a finite number greater than zero
pub fn validate_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(ExchangeError::InvalidAmount)
    }
}
