//! Jurisdiction matching.
//!
//! Rules, in order:
//! 1. District must match (case-insensitive, trimmed) for every type.
//! 2. Type-specific fields:
//!    - District Panchayat: nothing further.
//!    - Block Panchayat: block.
//!    - Grama Panchayat: block, local body, ward.
//!    - Municipality / Municipal Corporation: local body, ward.
//!    - unknown types: nothing further.
//! 3. If the election names a ward and the type did not already require
//!    one, the voter's ward must still match.
//!
//! Local bodies match when either name contains the other, ignoring case,
//! so "Thiruvananthapuram Corporation" and "Thiruvananthapuram" match. An
//! empty name is contained in every name, so it matches anything. Wards
//! compare numerically when both sides parse ("07" == "7"), otherwise as
//! trimmed strings.

use evote_types::{ElectionType, Jurisdiction};

fn normalise(s: &str) -> String {
    s.trim().to_lowercase()
}

fn same_name(a: &str, b: &str) -> bool {
    normalise(a) == normalise(b)
}

/// Substring match in either direction, case-insensitive.
pub fn local_body_matches(voter: &str, election: &str) -> bool {
    let (v, e) = (normalise(voter), normalise(election));
    v.contains(&e) || e.contains(&v)
}

/// Numeric equality when both wards parse, trimmed string equality otherwise.
pub fn wards_match(voter: &str, election: &str) -> bool {
    let (v, e) = (voter.trim(), election.trim());
    match (v.parse::<u64>(), e.parse::<u64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => v == e,
    }
}

/// Whether a voter living in `voter` may vote in an election of
/// `election_type` targeting `election`.
pub fn is_eligible(voter: &Jurisdiction, election: &Jurisdiction, election_type: &ElectionType) -> bool {
    if !same_name(&voter.district, &election.district) {
        return false;
    }

    let type_rules = match election_type {
        ElectionType::DistrictPanchayat => true,
        ElectionType::BlockPanchayat => same_name(&voter.block, &election.block),
        ElectionType::GramaPanchayat => {
            same_name(&voter.block, &election.block)
                && local_body_matches(&voter.local_body_name, &election.local_body_name)
                && wards_match(&voter.ward, &election.ward)
        }
        ElectionType::Municipality | ElectionType::MunicipalCorporation => {
            local_body_matches(&voter.local_body_name, &election.local_body_name)
                && wards_match(&voter.ward, &election.ward)
        }
        ElectionType::Other(_) => true,
    };
    if !type_rules {
        return false;
    }

    if !election_type.requires_ward() && !election.ward.trim().is_empty() {
        return wards_match(&voter.ward, &election.ward);
    }
    true
}
