use std::collections::BTreeMap;
use std::num::NonZeroU32;

use crate::billing::normalize::customer_key;

pub const DEFAULT_PRICE_PER_UNIT: f64 = 45.0;
pub const DEFAULT_CYCLE_LENGTH_DAYS: NonZeroU32 = match NonZeroU32::new(30) {
    Some(value) => value,
    None => NonZeroU32::MIN,
};
/// Longest billing cycle or scan window accepted, roughly ten years.
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// `days` as a window length, or `None` outside `1..=MAX_WINDOW_DAYS`.
pub fn window_length(days: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(days).filter(|value| value.get() <= MAX_WINDOW_DAYS)
}

/// Flat price per unit with optional per-customer overrides. Overrides are
/// keyed by normalized customer name.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBook {
    default_price: f64,
    overrides: BTreeMap<String, f64>,
}

impl Default for PriceBook {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_PER_UNIT)
    }
}

impl PriceBook {
    pub fn new(default_price: f64) -> Self {
        Self {
            default_price,
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, customer_id: &str, price: f64) -> Self {
        if let Some(key) = customer_key(customer_id) {
            self.overrides.insert(key, price);
        }
        self
    }

    pub fn price_for(&self, customer_id: &str) -> f64 {
        customer_key(customer_id)
            .and_then(|key| self.overrides.get(&key).copied())
            .unwrap_or(self.default_price)
    }
}
