use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::ir::{INDEPENDENT_PARTY_ID, INDEPENDENT_PARTY_NAME, Legislator};
use crate::parties::{Alignment, PartyTable};

use super::PartyGroup;

/// Counts legislators per current party, in order of first encounter.
pub(super) fn group_by_party(
    legislators: &[Legislator],
    parties: &PartyTable,
    now: NaiveDateTime,
) -> Vec<PartyGroup> {
    let mut groups: Vec<PartyGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for legislator in legislators {
        let (party_id, feed_name) = match legislator.current_membership(now) {
            Some(membership) => (membership.party_id.as_str(), membership.party_name.as_str()),
            None => (INDEPENDENT_PARTY_ID, INDEPENDENT_PARTY_NAME),
        };
        if let Some(&slot) = index.get(party_id) {
            groups[slot].seat_count += 1;
            continue;
        }
        index.insert(party_id.to_string(), groups.len());
        groups.push(PartyGroup {
            party_id: party_id.to_string(),
            display_name: parties.display_name_of(party_id, Some(feed_name)),
            color: parties.color_of(party_id).to_string(),
            alignment: parties.alignment_of(party_id),
            seat_count: 1,
        });
    }

    groups
}

/// Left bloc, then center, then the right bloc reversed: the biggest parties
/// of each wing end up at the outer edges.
pub(super) fn order_parties(groups: Vec<PartyGroup>) -> Vec<PartyGroup> {
    let mut left = Vec::new();
    let mut center = Vec::new();
    let mut right = Vec::new();
    for group in groups {
        match group.alignment {
            Alignment::Left => left.push(group),
            Alignment::Center => center.push(group),
            Alignment::Right => right.push(group),
        }
    }
    for bucket in [&mut left, &mut center, &mut right] {
        bucket.sort_by(|a, b| b.seat_count.cmp(&a.seat_count));
    }
    right.reverse();

    let mut ordered = left;
    ordered.extend(center);
    ordered.extend(right);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: &str, alignment: Alignment, seats: usize) -> PartyGroup {
        PartyGroup {
            party_id: id.to_string(),
            display_name: id.to_string(),
            color: "#000000".to_string(),
            alignment,
            seat_count: seats,
        }
    }

    fn ids(groups: &[PartyGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.party_id.as_str()).collect()
    }

    #[test]
    fn wings_put_largest_parties_outside() {
        let ordered = order_parties(vec![
            group("PPD", Alignment::Left, 4),
            group("UDI", Alignment::Right, 9),
            group("PS", Alignment::Left, 7),
            group("DC", Alignment::Center, 3),
            group("EVOP", Alignment::Right, 2),
            group("RN", Alignment::Right, 12),
        ]);
        assert_eq!(ids(&ordered), vec!["PS", "PPD", "DC", "EVOP", "UDI", "RN"]);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let ordered = order_parties(vec![
            group("PH", Alignment::Left, 2),
            group("PC", Alignment::Left, 2),
            group("PDG", Alignment::Center, 1),
            group("IND", Alignment::Center, 1),
        ]);
        assert_eq!(ids(&ordered), vec!["PH", "PC", "PDG", "IND"]);
    }
}
