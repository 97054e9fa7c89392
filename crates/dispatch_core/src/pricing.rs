//! Per-class pricing: driver pay rates and customer fares.

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;

/// Rates applied to a single vehicle class.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ClassRates {
    /// Driver pay per active (passenger-carrying) kilometer.
    pub active_pay: f64,
    /// Driver pay per dead (empty) kilometer.
    pub dead_pay: f64,
    /// Customer price per kilometer.
    pub customer_price: f64,
    /// Dead-kilometer ratio assumed when pricing a trip for the customer.
    pub dead_ratio: f64,
}

/// Rates used for any class missing from the table.
pub const FALLBACK_RATES: ClassRates = ClassRates {
    active_pay: 16.0,
    dead_pay: 10.0,
    customer_price: 20.0,
    dead_ratio: 0.40,
};

/// Pricing lookup keyed by vehicle class (1..9).
#[derive(Debug, Clone, Resource)]
pub struct PricingTable {
    rates: BTreeMap<u8, ClassRates>,
}

impl Default for PricingTable {
    fn default() -> Self {
        let mut rates = BTreeMap::new();
        for class in 1..=9u8 {
            let c = class as f64;
            rates.insert(
                class,
                ClassRates {
                    active_pay: 12.0 + 1.5 * c,
                    dead_pay: 8.0 + 0.75 * c,
                    customer_price: 15.0 + 2.0 * c,
                    dead_ratio: 0.40,
                },
            );
        }
        Self { rates }
    }
}

impl PricingTable {
    /// Rates for the given class; unknown classes fall back to [FALLBACK_RATES].
    pub fn rates(&self, class: u8) -> ClassRates {
        self.rates.get(&class).copied().unwrap_or(FALLBACK_RATES)
    }

    /// Whether the class has an explicit row in the table.
    pub fn knows(&self, class: u8) -> bool {
        self.rates.contains_key(&class)
    }

    /// Replace the rates for one class.
    pub fn with_rates(mut self, class: u8, rates: ClassRates) -> Self {
        self.rates.insert(class, rates);
        self
    }
}

/// Customer fare for one trip of `distance_km` priced at the given class rates.
///
/// The customer pays for the trip distance plus the assumed dead-kilometer
/// share: `(d + d * dead_ratio) * customer_price`.
pub fn customer_fare(distance_km: f64, rates: ClassRates) -> f64 {
    (distance_km + distance_km * rates.dead_ratio) * rates.customer_price
}
