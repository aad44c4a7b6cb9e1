use proptest::prelude::*;

use evote_eligibility::{is_eligible, local_body_matches, wards_match};
use evote_types::{ElectionType, Jurisdiction};

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,12}( [A-Za-z]{1,12})?"
}

fn ward() -> impl Strategy<Value = String> {
    prop_oneof!["[0-9]{1,3}", "[0-9]{1,2}[A-C]"]
}

fn jurisdiction() -> impl Strategy<Value = Jurisdiction> {
    (name(), name(), name(), ward()).prop_map(|(d, b, l, w)| Jurisdiction::new(d, b, l, w))
}

fn election_type() -> impl Strategy<Value = ElectionType> {
    prop_oneof![
        Just(ElectionType::DistrictPanchayat),
        Just(ElectionType::BlockPanchayat),
        Just(ElectionType::GramaPanchayat),
        Just(ElectionType::Municipality),
        Just(ElectionType::MunicipalCorporation),
        name().prop_map(ElectionType::Other),
    ]
}

proptest! {
    /// A voter is always eligible for an election targeting their own jurisdiction.
    #[test]
    fn own_jurisdiction_is_eligible(j in jurisdiction(), t in election_type()) {
        prop_assert!(is_eligible(&j, &j, &t));
    }

    /// Changing the case of any field never changes the outcome.
    #[test]
    fn case_insensitive(v in jurisdiction(), e in jurisdiction(), t in election_type()) {
        let upper = Jurisdiction::new(
            v.district.to_uppercase(),
            v.block.to_uppercase(),
            v.local_body_name.to_uppercase(),
            v.ward.to_uppercase(),
        );
        prop_assert_eq!(is_eligible(&v, &e, &t), is_eligible(&upper, &e, &t));
    }

    /// The district gate applies to every election type.
    #[test]
    fn different_district_is_never_eligible(v in jurisdiction(), e in jurisdiction(), t in election_type()) {
        prop_assume!(v.district.to_lowercase() != e.district.to_lowercase());
        prop_assert!(!is_eligible(&v, &e, &t));
    }

    /// The local-body rule is symmetric.
    #[test]
    fn local_body_symmetric(a in name(), b in name()) {
        prop_assert_eq!(local_body_matches(&a, &b), local_body_matches(&b, &a));
    }

    /// Leading zeros and surrounding whitespace do not affect numeric wards.
    #[test]
    fn ward_padding_is_ignored(n in 0u32..1000, zeros in 0usize..3) {
        let padded = format!(" {}{} ", "0".repeat(zeros), n);
        prop_assert!(wards_match(&padded, &n.to_string()));
    }

    /// Different numeric wards never match.
    #[test]
    fn distinct_numeric_wards_differ(a in 0u32..1000, b in 0u32..1000) {
        prop_assume!(a != b);
        prop_assert!(!wards_match(&a.to_string(), &b.to_string()));
    }
}
