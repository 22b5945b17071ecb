mod common;

use bsm_core::Rational;
use bsm_model::{InteractionTerm, Participant};
use bsm_terms::{EnumerateOpts, TermEnumerator, TermKind, Validator, ValidatorOpts};
use common::{electroweak, q};
use proptest::prelude::*;

fn collect(enumerator: &TermEnumerator<'_>) -> Vec<InteractionTerm> {
    enumerator
        .candidates()
        .collect::<Result<Vec<_>, _>>()
        .expect("enumeration")
}

#[test]
fn slots_are_sorted_by_id_with_plain_first() {
    let registry = electroweak(true);
    let enumerator = TermEnumerator::new(&registry, EnumerateOpts::default());
    let slots: Vec<String> = enumerator.slots().iter().map(Participant::to_string).collect();
    assert_eq!(slots, vec!["H", "H~", "LL", "LL~", "N", "eR", "eR~"]);
}

#[test]
fn electroweak_candidates_come_in_dimension_then_lexicographic_order() {
    let registry = electroweak(false);
    let enumerator = TermEnumerator::new(&registry, EnumerateOpts::default());
    let rendered: Vec<String> = collect(&enumerator).iter().map(|t| t.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "c1 H H~",
            "c2 H LL + h.c.",
            "c3 LL LL~",
            "c4 eR eR~",
            "c5 H H eR + h.c.",
            "c6 H H H~ H~",
            "c7 H LL~ eR + h.c.",
        ]
    );
}

#[test]
fn enumeration_is_reproducible_and_restartable() {
    let registry = electroweak(true);
    let enumerator = TermEnumerator::new(&registry, EnumerateOpts::default());
    let full = collect(&enumerator);
    assert_eq!(full, collect(&enumerator));

    let prefix: Vec<InteractionTerm> = enumerator
        .candidates()
        .take(3)
        .collect::<Result<_, _>>()
        .expect("prefix");
    assert_eq!(prefix.as_slice(), &full[..3]);
}

#[test]
fn oversized_dimension_limits_saturate() {
    let registry = electroweak(true);
    let bounded = EnumerateOpts {
        max_dimension: Rational::from_integer(4),
        max_fields: 2,
        ..EnumerateOpts::default()
    };
    let unbounded = EnumerateOpts {
        max_dimension: Rational::from_integer(i64::MAX),
        ..bounded.clone()
    };
    let expected = collect(&TermEnumerator::new(&registry, bounded));
    assert!(!expected.is_empty());
    assert_eq!(collect(&TermEnumerator::new(&registry, unbounded)), expected);
}

#[test]
fn validation_may_still_reject_enumerated_candidates() {
    let registry = electroweak(false);
    let enumerator = TermEnumerator::new(&registry, EnumerateOpts::default());
    let validator = Validator::new(&registry, ValidatorOpts::default());
    let accepted: Vec<(String, TermKind)> = collect(&enumerator)
        .iter()
        .filter_map(|candidate| validator.validate(candidate).ok())
        .map(|v| (v.term.participant_list(), v.kind))
        .collect();
    assert_eq!(
        accepted,
        vec![
            ("H H~".to_string(), TermKind::ScalarMass),
            ("H H H~ H~".to_string(), TermKind::ScalarPotential),
            ("H LL~ eR".to_string(), TermKind::Yukawa),
        ]
    );
}

#[test]
fn hermitian_duplicates_can_be_kept() {
    let registry = electroweak(false);
    let opts = EnumerateOpts {
        skip_hermitian_duplicates: false,
        ..EnumerateOpts::default()
    };
    let enumerator = TermEnumerator::new(&registry, opts);
    let all = collect(&enumerator);
    assert_eq!(all.len(), 10);
    assert!(all.iter().all(|t| !t.hermitian_conjugate));
    assert!(all.iter().any(|t| t.participant_list() == "H~ LL eR~"));
}

#[test]
fn conjugates_can_be_excluded() {
    let registry = electroweak(false);
    let opts = EnumerateOpts {
        include_conjugates: false,
        ..EnumerateOpts::default()
    };
    let enumerator = TermEnumerator::new(&registry, opts);
    let rendered: Vec<String> = collect(&enumerator)
        .iter()
        .map(InteractionTerm::participant_list)
        .collect();
    assert_eq!(rendered, vec!["H LL", "H H eR"]);
}

#[test]
fn field_count_caps_the_search() {
    let registry = electroweak(false);
    let opts = EnumerateOpts {
        max_fields: 2,
        ..EnumerateOpts::default()
    };
    let enumerator = TermEnumerator::new(&registry, opts);
    assert!(collect(&enumerator).iter().all(|t| t.participants.len() <= 2));
    assert_eq!(collect(&enumerator).len(), 4);
}

#[test]
fn explicit_dimension_overrides_the_options() {
    let registry = electroweak(false);
    let enumerator = TermEnumerator::new(&registry, EnumerateOpts::default());
    let low: Vec<InteractionTerm> = enumerator
        .enumerate(Rational::from_integer(2))
        .collect::<Result<_, _>>()
        .expect("dimension two");
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].participant_list(), "H H~");
    assert_eq!(enumerator.enumerate(Rational::from_integer(0)).count(), 0);
}

proptest! {
    #[test]
    fn candidates_never_exceed_the_dimension_bound(twice in 0i64..11, singlet in any::<bool>()) {
        let registry = electroweak(singlet);
        let bound = q(twice, 2);
        let enumerator = TermEnumerator::new(&registry, EnumerateOpts::default());
        for candidate in enumerator.enumerate(bound) {
            let candidate = candidate.expect("candidate");
            let dimension = candidate.mass_dimension(&registry).expect("dimension");
            prop_assert!(dimension <= bound);
            prop_assert!(candidate.participants.len() >= 2);
        }
    }
}
