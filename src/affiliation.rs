//! Consolidation of raw party-membership intervals into continuous tenures.
//!
//! The feed reports one interval per legislative period, so a deputy
//! re-elected three times under the same party shows up as three back-to-back
//! intervals. Consolidation collapses those into a single record while keeping
//! the source intervals around for display.

use std::collections::HashSet;

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::ir::{PartyMembershipInterval, open_end};

/// Largest gap between two same-party intervals that still counts as continuous.
pub const DEFAULT_MERGE_GAP: TimeDelta = TimeDelta::days(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedAffiliation {
    pub party_id: String,
    pub party_name: String,
    pub start: NaiveDateTime,
    #[serde(serialize_with = "open_end::serialize")]
    pub end: NaiveDateTime,
    pub period_count: usize,
    pub source_intervals: Vec<PartyMembershipInterval>,
}

impl MergedAffiliation {
    fn from_interval(interval: &PartyMembershipInterval) -> Self {
        Self {
            party_id: interval.party_id.clone(),
            party_name: interval.party_name.clone(),
            start: interval.start,
            end: interval.end,
            period_count: 1,
            source_intervals: vec![interval.clone()],
        }
    }

    fn absorb(&mut self, interval: &PartyMembershipInterval) {
        self.end = interval.end;
        self.period_count += 1;
        self.source_intervals.push(interval.clone());
    }

    fn accepts(&self, interval: &PartyMembershipInterval, max_gap: TimeDelta) -> bool {
        // Overlaps (negative gaps) merge as well; the feed is not ours to fix.
        self.party_id == interval.party_id
            && interval.start.signed_duration_since(self.end) <= max_gap
    }

    /// Served more than one consecutive period under the same party.
    pub fn is_reelection(&self) -> bool {
        self.period_count > 1
    }
}

pub fn consolidate(intervals: &[PartyMembershipInterval]) -> Vec<MergedAffiliation> {
    consolidate_with_gap(intervals, DEFAULT_MERGE_GAP)
}

pub fn consolidate_with_gap(
    intervals: &[PartyMembershipInterval],
    max_gap: TimeDelta,
) -> Vec<MergedAffiliation> {
    let mut sorted: Vec<&PartyMembershipInterval> = intervals.iter().collect();
    sorted.sort_by_key(|interval| interval.start);

    let mut merged: Vec<MergedAffiliation> = Vec::new();
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if last.accepts(interval, max_gap) => last.absorb(interval),
            _ => merged.push(MergedAffiliation::from_interval(interval)),
        }
    }
    merged
}

pub fn most_recent_first(merged: &[MergedAffiliation]) -> Vec<MergedAffiliation> {
    let mut ordered = merged.to_vec();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));
    ordered
}

/// Parties the legislator came back to after belonging to a different one,
/// in the order the return happened. Expects scan-ordered input.
pub fn returning_parties(merged: &[MergedAffiliation]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut returning = Vec::new();
    for affiliation in merged {
        if !seen.insert(affiliation.party_id.as_str())
            && !returning.contains(&affiliation.party_id)
        {
            returning.push(affiliation.party_id.clone());
        }
    }
    returning
}
