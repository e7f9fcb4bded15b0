use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Party id used for legislators with no membership covering the reference date.
pub const INDEPENDENT_PARTY_ID: &str = "IND";
pub const INDEPENDENT_PARTY_NAME: &str = "Independiente";

/// End date given to memberships the feed reports without a termination date.
pub const OPEN_END: NaiveDateTime = NaiveDateTime::MAX;

/// Serde adapter writing [`OPEN_END`] as `null` and reading `null` back as it.
pub mod open_end {
    use super::OPEN_END;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(end: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        let value = (*end != OPEN_END).then_some(end);
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        Ok(Option::<NaiveDateTime>::deserialize(deserializer)?.unwrap_or(OPEN_END))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMembershipInterval {
    pub party_id: String,
    pub party_name: String,
    pub start: NaiveDateTime,
    #[serde(with = "open_end")]
    pub end: NaiveDateTime,
}

impl PartyMembershipInterval {
    pub fn new(
        party_id: impl Into<String>,
        party_name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            party_id: party_id.into(),
            party_name: party_name.into(),
            start,
            end,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end == OPEN_END
    }

    /// Inclusive on both ends.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legislator {
    pub id: String,
    pub given_names: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub memberships: Vec<PartyMembershipInterval>,
    pub region: Option<String>,
    pub district: Option<String>,
    pub email: Option<String>,
}

impl Legislator {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_membership(mut self, membership: PartyMembershipInterval) -> Self {
        self.memberships.push(membership);
        self
    }

    pub fn full_name(&self) -> String {
        [
            self.given_names.as_str(),
            self.paternal_surname.as_str(),
            self.maternal_surname.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Membership in force at `at`. Overlapping matches resolve to the one that
    /// started last.
    pub fn current_membership(&self, at: NaiveDateTime) -> Option<&PartyMembershipInterval> {
        self.memberships
            .iter()
            .filter(|membership| membership.contains(at))
            .max_by_key(|membership| membership.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn current_membership_is_inclusive() {
        let legislator = Legislator::new("1").with_membership(PartyMembershipInterval::new(
            "PS",
            "Partido Socialista",
            at(2018, 3, 11),
            at(2022, 3, 10),
        ));
        assert!(legislator.current_membership(at(2018, 3, 11)).is_some());
        assert!(legislator.current_membership(at(2022, 3, 10)).is_some());
        assert!(legislator.current_membership(at(2022, 3, 11)).is_none());
    }

    #[test]
    fn overlapping_memberships_prefer_latest_start() {
        let legislator = Legislator::new("1")
            .with_membership(PartyMembershipInterval::new("RN", "RN", at(2014, 1, 1), OPEN_END))
            .with_membership(PartyMembershipInterval::new(
                "EVOP",
                "Evópoli",
                at(2020, 1, 1),
                at(2026, 1, 1),
            ));
        let current = legislator.current_membership(at(2021, 6, 1)).unwrap();
        assert_eq!(current.party_id, "EVOP");
        assert!(legislator.memberships[0].is_open());
    }

    #[test]
    fn full_name_skips_blank_parts() {
        let mut legislator = Legislator::new("7");
        legislator.given_names = "Camila".to_string();
        legislator.paternal_surname = "Vallejo".to_string();
        assert_eq!(legislator.full_name(), "Camila Vallejo");
    }

    #[test]
    fn open_end_serializes_as_null() {
        let open = PartyMembershipInterval::new("PS", "PS", at(2022, 3, 11), OPEN_END);
        let json = serde_json::to_value(&open).unwrap();
        assert!(json["end"].is_null());
        assert_eq!(json["start"], "2022-03-11T00:00:00");
        let back: PartyMembershipInterval = serde_json::from_value(json).unwrap();
        assert!(back.is_open());

        let closed = PartyMembershipInterval::new("PS", "PS", at(2018, 3, 11), at(2022, 3, 10));
        let json = serde_json::to_value(&closed).unwrap();
        assert_eq!(json["end"], "2022-03-10T00:00:00");
    }
}
