//! Weighted random tables and "1 in N" rolls.
//!
//! Almost every generator in the Clan rolls against a weighted table
//! (pelt colours, illnesses, interactions). These helpers keep the
//! weighting logic in one place so tables can stay plain slices.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Pick an entry from `(item, weight)` pairs.
///
/// Returns `None` when the table is empty or every weight is zero.
pub fn choose_weighted<'a, T, R: Rng + ?Sized>(table: &'a [(T, u32)], rng: &mut R) -> Option<&'a T> {
    let weights = table.iter().map(|(_, w)| *w);
    let dist = WeightedIndex::new(weights).ok()?;
    Some(&table[dist.sample(rng)].0)
}

/// Same as [`choose_weighted`] but copies the picked value out.
pub fn pick<T: Copy, R: Rng + ?Sized>(table: &[(T, u32)], rng: &mut R) -> Option<T> {
    choose_weighted(table, rng).copied()
}

/// A "1 in n" roll. `n <= 1` always succeeds.
pub fn one_in<R: Rng + ?Sized>(n: u32, rng: &mut R) -> bool {
    n <= 1 || rng.gen_range(0..n) == 0
}

/// Percentage roll, `chance` is clamped to 0..=100.
pub fn percent<R: Rng + ?Sized>(chance: u32, rng: &mut R) -> bool {
    rng.gen_range(0..100) < chance.min(100)
}

/// Uniformly pick one element of a slice.
pub fn pick_uniform<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.gen_range(0..items.len())])
    }
}
