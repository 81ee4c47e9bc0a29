//! Seeded substitution of held quantities for privacy and demo display.
//!
//! A substituted quantity depends only on the seed, the instrument identifier
//! and, when known, the instrument's current price. The value of the position
//! (`quantity * price`) then lands inside a configured envelope, so charts keep
//! a plausible shape without revealing real holdings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Version of [`seeded_fraction`]. Bump when the derivation changes, since
/// persisted seeds will then produce different quantities.
pub const HASH_VERSION: u32 = 1;

/// Decimal places kept in substituted quantities.
pub const QUANTITY_DECIMALS: i32 = 4;

/// Quantity range used when no current price is known.
const FALLBACK_QUANTITY_RANGE: (f64, f64) = (10.0, 100.0);

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ValueEnvelope {
    #[serde(default = "ValueEnvelope::default_min")]
    pub min_value: f64,
    #[serde(default = "ValueEnvelope::default_max")]
    pub max_value: f64,
}

impl ValueEnvelope {
    fn default_min() -> f64 {
        1_000.0
    }

    fn default_max() -> f64 {
        10_000.0
    }
}

impl Default for ValueEnvelope {
    fn default() -> Self {
        Self {
            min_value: Self::default_min(),
            max_value: Self::default_max(),
        }
    }
}

/// FNV-1a over the little-endian seed followed by the identifier bytes,
/// finished with the SplitMix64 mixer.
pub fn seeded_hash(seed: u64, identifier: &str) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in seed.to_le_bytes().iter().chain(identifier.as_bytes()) {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    hash = (hash ^ (hash >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    hash = (hash ^ (hash >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    hash ^ (hash >> 31)
}

/// Reproducible fraction in `[0, 1)` for `(seed, identifier)`.
pub fn seeded_fraction(seed: u64, identifier: &str) -> f64 {
    // Top 53 bits fill an f64 mantissa exactly.
    (seeded_hash(seed, identifier) >> 11) as f64 / (1u64 << 53) as f64
}

fn scale() -> f64 {
    10f64.powi(QUANTITY_DECIMALS)
}

fn round_quantity(quantity: f64) -> f64 {
    (quantity * scale()).round() / scale()
}

/// Maps `fraction` onto a quantity whose value at `price` stays inside
/// `envelope`.
pub fn substitute_quantity(fraction: f64, price: Option<f64>, envelope: &ValueEnvelope) -> f64 {
    let (low, high) = match price {
        Some(price) if price > 0.0 => (envelope.min_value / price, envelope.max_value / price),
        _ => FALLBACK_QUANTITY_RANGE,
    };

    // Tighten to the rounding grid so rounding never leaves the envelope.
    let low_q = (low * scale()).ceil() / scale();
    let high_q = (high * scale()).floor() / scale();
    // Envelope narrower than the grid: nearest grid point, never below one step.
    if low_q > high_q {
        return round_quantity(low + fraction * (high - low)).max(1.0 / scale());
    }

    round_quantity(low_q + fraction * (high_q - low_q)).clamp(low_q, high_q)
}

#[derive(Debug)]
struct SeedState {
    seed: u64,
    quantities: HashMap<String, f64>,
}

/// Process-wide quantity substitution keyed by seed.
///
/// Safe to share between concurrent computations. Changing the seed drops
/// every cached quantity; computations already running may still observe
/// quantities derived from the previous seed.
#[derive(Debug)]
pub struct Anonymizer {
    envelope: ValueEnvelope,
    state: RwLock<SeedState>,
}

impl Anonymizer {
    pub fn new(seed: u64, envelope: ValueEnvelope) -> Self {
        debug!(
            "Anonymizing quantities with hash v{HASH_VERSION} into {}..{}",
            envelope.min_value, envelope.max_value
        );
        Self {
            envelope,
            state: RwLock::new(SeedState {
                seed,
                quantities: HashMap::new(),
            }),
        }
    }

    pub fn seed(&self) -> u64 {
        self.state.read().unwrap_or_else(|e| e.into_inner()).seed
    }

    pub fn set_seed(&self, seed: u64) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if state.seed != seed {
            debug!(
                "Anonymization seed changed, dropping {} cached quantities",
                state.quantities.len()
            );
            state.seed = seed;
            state.quantities.clear();
        }
    }

    /// Substituted quantity for `identifier`, cached until the seed changes.
    pub fn quantity(&self, identifier: &str, current_price: Option<f64>) -> f64 {
        let seed = {
            let state = self.state.read().unwrap_or_else(|e| e.into_inner());
            if let Some(quantity) = state.quantities.get(identifier) {
                return *quantity;
            }
            state.seed
        };

        let fraction = seeded_fraction(seed, identifier);
        let quantity = substitute_quantity(fraction, current_price, &self.envelope);
        debug!("Anonymized quantity for {identifier}: {quantity}");

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        // Only cache under the seed the quantity was derived from.
        if state.seed == seed {
            state.quantities.insert(identifier.to_string(), quantity);
        }
        quantity
    }

    pub fn cached_quantities(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .quantities
            .len()
    }
}
