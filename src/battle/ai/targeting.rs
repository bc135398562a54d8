//! Distance ordering of target candidates
//!
//! Candidates are ordered by `(distance, enumeration index)`: two enemies at
//! the same distance both stay in the list and the one enumerated first
//! wins.

use glam::Vec3;
use ordered_float::OrderedFloat;

use crate::battle::units::Combatant;

/// A candidate together with its sort key
#[derive(Debug, Clone, Copy)]
pub struct RankedCandidate<'a> {
    pub unit: &'a Combatant,
    pub distance: f32,
    pub order: usize,
}

/// Order candidates by ascending distance from `origin`, stable on ties
pub fn rank_by_distance<'a, I>(origin: Vec3, candidates: I) -> Vec<RankedCandidate<'a>>
where
    I: IntoIterator<Item = &'a Combatant>,
{
    let mut ranked: Vec<RankedCandidate<'a>> = candidates
        .into_iter()
        .enumerate()
        .map(|(order, unit)| RankedCandidate {
            unit,
            distance: origin.distance(unit.position),
            order,
        })
        .collect();
    ranked.sort_by_key(|c| (OrderedFloat(c.distance), c.order));
    ranked
}

/// Nearest candidate, first enumerated on ties
pub fn nearest<'a, I>(origin: Vec3, candidates: I) -> Option<&'a Combatant>
where
    I: IntoIterator<Item = &'a Combatant>,
{
    rank_by_distance(origin, candidates)
        .first()
        .map(|candidate| candidate.unit)
}
