//! The geographic scope shared by voters and elections.

use serde::{Deserialize, Serialize};

/// The (district, block, local-body name, ward) tuple identifying a voter's
/// home or an election's target.
///
/// Fields are stored as entered by the registering administrator; the
/// eligibility matcher is responsible for normalising case and whitespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jurisdiction {
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub block: String,
    #[serde(default)]
    pub local_body_name: String,
    #[serde(default)]
    pub ward: String,
}

impl Jurisdiction {
    pub fn new(
        district: impl Into<String>,
        block: impl Into<String>,
        local_body_name: impl Into<String>,
        ward: impl Into<String>,
    ) -> Self {
        Self {
            district: district.into(),
            block: block.into(),
            local_body_name: local_body_name.into(),
            ward: ward.into(),
        }
    }

    /// A district-only jurisdiction.
    pub fn district(district: impl Into<String>) -> Self {
        Self {
            district: district.into(),
            ..Default::default()
        }
    }
}
