//! Pairwise impact detection
//!
//! Collision passes are two-phase: first the impacting pairs are collected
//! from a snapshot of positions, then responses are applied in order. Neither
//! response kind moves a body, so the snapshot stays valid for the whole
//! pass.

use super::object::SpaceObject;

/// Every unordered index pair `(i, j)` with `i < j`, in insertion order
pub fn unordered_pairs(len: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..len).flat_map(move |i| (i + 1..len).map(move |j| (i, j)))
}

/// Unordered pairs of `objects` that currently overlap
pub fn impacting_pairs(objects: &[SpaceObject]) -> Vec<(usize, usize)> {
    unordered_pairs(objects.len())
        .filter(|&(i, j)| objects[i].impacts(&objects[j]))
        .collect()
}

/// Apply the restitution response to each pair, in the given order
pub fn resolve_pairs(objects: &mut [SpaceObject], pairs: &[(usize, usize)], restitution: f64) {
    for &(i, j) in pairs {
        debug_assert!(i < j);
        let (head, tail) = objects.split_at_mut(j);
        head[i].collide_with(&mut tail[0], restitution);
    }
}

/// Every overlapping `(missile_idx, asteroid_idx)` pair, missile-major
///
/// All pairs are reported. A body may appear in several pairs; callers mark
/// it once and remove it once.
pub fn missile_asteroid_hits(
    missiles: &[SpaceObject],
    asteroids: &[SpaceObject],
) -> Vec<(usize, usize)> {
    missiles
        .iter()
        .enumerate()
        .flat_map(|(mi, missile)| {
            asteroids
                .iter()
                .enumerate()
                .filter(move |(_, asteroid)| missile.impacts(asteroid))
                .map(move |(ai, _)| (mi, ai))
        })
        .collect()
}
