//! Seeded random placement of field items.
//!
//! Placement sits behind [`PlacementRng`] so the controller stays
//! deterministic under test: feed it an [`Lcg`] with a fixed seed and the
//! scatter is reproducible. Overlap between items is deliberately not
//! checked.

use super::{FieldBounds, Item, ItemId, ItemKind, RoundConfig};

/// Source of uniform values in `[0, 1)` used to draw item coordinates.
pub trait PlacementRng {
    fn next_f64(&mut self) -> f64;
}

/// Small linear congruential generator. Same multiplier / increment as the
/// classic Numerical Recipes constants; not crypto secure, plenty for sprite
/// scatter.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from OS / browser entropy.
    #[cfg(feature = "rng")]
    pub fn seed_from_entropy() -> Self {
        let mut buf = [0u8; 8];
        // On failure fall back to the zero seed; the stream is still valid.
        let _ = getrandom::getrandom(&mut buf);
        Self::new(u64::from_le_bytes(buf))
    }
}

impl PlacementRng for Lcg {
    fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // Middle bits have the best distribution for this recurrence.
        ((self.state >> 16) & 0xffff_ffff) as f64 / 4_294_967_296.0
    }
}

/// Batch-create one round's items: carrots first, then bugs, ids sequential
/// from zero. Each coordinate is uniform in `[0, bound - item_size]`; a field
/// smaller than one item clamps the range to zero instead of panicking.
pub fn scatter(
    config: &RoundConfig,
    bounds: FieldBounds,
    rng: &mut impl PlacementRng,
) -> Vec<Item> {
    let max_x = (bounds.width - config.item_size).max(0.0);
    let max_y = (bounds.height - config.item_size).max(0.0);
    let total = (config.carrot_count + config.bug_count) as usize;

    let mut items = Vec::with_capacity(total);
    let mut next_id = 0u32;
    for _ in 0..config.carrot_count {
        items.push(Item {
            id: ItemId(next_id),
            kind: ItemKind::Carrot,
            x: rng.next_f64() * max_x,
            y: rng.next_f64() * max_y,
        });
        next_id += 1;
    }
    for _ in 0..config.bug_count {
        items.push(Item {
            id: ItemId(next_id),
            kind: ItemKind::Bug,
            x: rng.next_f64() * max_x,
            y: rng.next_f64() * max_y,
        });
        next_id += 1;
    }
    items
}
