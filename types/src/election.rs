//! Elections, their type tag, and the derived status label.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ElectionId, Jurisdiction, Timestamp};

/// Selects which jurisdiction fields are authoritative for an election.
///
/// Unknown tags coming from source data are kept verbatim in [`ElectionType::Other`];
/// they are matched on the district gate alone (plus the ward filter).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElectionType {
    DistrictPanchayat,
    BlockPanchayat,
    GramaPanchayat,
    Municipality,
    MunicipalCorporation,
    Other(String),
}

impl ElectionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::DistrictPanchayat => "District Panchayat",
            Self::BlockPanchayat => "Block Panchayat",
            Self::GramaPanchayat => "Grama Panchayat",
            Self::Municipality => "Municipality",
            Self::MunicipalCorporation => "Municipal Corporation",
            Self::Other(name) => name,
        }
    }

    /// Whether the election's ward must equal the voter's ward as part of the
    /// type-specific rules (as opposed to the trailing ward filter).
    pub fn requires_ward(&self) -> bool {
        matches!(
            self,
            Self::GramaPanchayat | Self::Municipality | Self::MunicipalCorporation
        )
    }
}

impl From<&str> for ElectionType {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "district panchayat" => Self::DistrictPanchayat,
            "block panchayat" => Self::BlockPanchayat,
            "grama panchayat" => Self::GramaPanchayat,
            "municipality" => Self::Municipality,
            "municipal corporation" => Self::MunicipalCorporation,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl From<String> for ElectionType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ElectionType> for String {
    fn from(t: ElectionType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for ElectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display status of an election. Never persisted; always derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElectionStatus {
    Upcoming,
    Ongoing,
    Paused,
    Completed,
}

impl ElectionStatus {
    /// Derive the status from the four inputs and nothing else.
    ///
    /// Past the end is `Completed` regardless of the activation flag; an
    /// inactive election that has not ended is `Paused` even before it starts.
    pub fn derive(now: Timestamp, start: Timestamp, end: Timestamp, is_active: bool) -> Self {
        if now > end {
            Self::Completed
        } else if !is_active {
            Self::Paused
        } else if now < start {
            Self::Upcoming
        } else {
            Self::Ongoing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Ongoing => "ONGOING",
            Self::Paused => "PAUSED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An election. Created and edited by administrative tooling; read-only here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    pub id: ElectionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub election_type: ElectionType,
    pub jurisdiction: Jurisdiction,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    /// Administrative pause switch, independent of the time window.
    pub is_active: bool,
    /// Gates result visibility.
    #[serde(default)]
    pub is_published: bool,
}

impl Election {
    pub fn status_at(&self, now: Timestamp) -> ElectionStatus {
        ElectionStatus::derive(now, self.starts_at, self.ends_at, self.is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: u64 = 3600;

    fn now() -> Timestamp {
        Timestamp::from_secs(1_750_000_000)
    }

    #[test]
    fn ongoing_inside_window_when_active() {
        let n = now();
        let status = ElectionStatus::derive(n, n.minus_secs(HOUR), n.plus_secs(HOUR), true);
        assert_eq!(status, ElectionStatus::Ongoing);
    }

    #[test]
    fn paused_inside_window_when_inactive() {
        let n = now();
        let status = ElectionStatus::derive(n, n.minus_secs(HOUR), n.plus_secs(HOUR), false);
        assert_eq!(status, ElectionStatus::Paused);
    }

    #[test]
    fn completed_after_end_regardless_of_flag() {
        let n = now();
        for active in [true, false] {
            let status = ElectionStatus::derive(n, n.minus_secs(HOUR), n.minus_secs(1), active);
            assert_eq!(status, ElectionStatus::Completed);
        }
    }

    #[test]
    fn upcoming_before_start_only_when_active() {
        let n = now();
        let start = n.plus_secs(HOUR);
        let end = n.plus_secs(2 * HOUR);
        assert_eq!(ElectionStatus::derive(n, start, end, true), ElectionStatus::Upcoming);
        assert_eq!(ElectionStatus::derive(n, start, end, false), ElectionStatus::Paused);
    }

    #[test]
    fn boundaries_are_inclusive() {
        let n = now();
        assert_eq!(ElectionStatus::derive(n, n, n.plus_secs(1), true), ElectionStatus::Ongoing);
        assert_eq!(ElectionStatus::derive(n, n.minus_secs(1), n, true), ElectionStatus::Ongoing);
    }

    #[test]
    fn election_type_parses_case_insensitively() {
        assert_eq!(ElectionType::from("grama panchayat"), ElectionType::GramaPanchayat);
        assert_eq!(ElectionType::from(" Municipal Corporation "), ElectionType::MunicipalCorporation);
        assert_eq!(
            ElectionType::from("Township"),
            ElectionType::Other("Township".to_string())
        );
    }

    #[test]
    fn election_type_serializes_as_display_name() {
        let json = serde_json::to_string(&ElectionType::BlockPanchayat).unwrap();
        assert_eq!(json, "\"Block Panchayat\"");
        let back: ElectionType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ElectionType::BlockPanchayat);
    }

    #[test]
    fn unknown_type_survives_storage_encoding() {
        let election = Election {
            id: ElectionId::new(9),
            title: "Cooperative Board".into(),
            description: String::new(),
            election_type: ElectionType::Other("Cooperative Society".into()),
            jurisdiction: Jurisdiction::district("Kollam"),
            starts_at: Timestamp::from_secs(100),
            ends_at: Timestamp::from_secs(200),
            is_active: true,
            is_published: false,
        };
        let bytes = bincode::serialize(&election).unwrap();
        let back: Election = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, election);
    }

    #[test]
    fn status_serializes_screaming() {
        let json = serde_json::to_string(&ElectionStatus::Ongoing).unwrap();
        assert_eq!(json, "\"ONGOING\"");
    }
}
