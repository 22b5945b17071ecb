mod common;

use bsm_core::{ErrorKind, Rational};
use bsm_model::{Chirality, InteractionTerm, Participant, Particle, SuppressionScale};
use bsm_terms::{validate, validate_batch, TermKind, Validator, ValidatorOpts};
use common::{electroweak, hypercharge_only, q, term};
use proptest::prelude::*;

fn context<'a>(err: &'a bsm_core::ModelError, key: &str) -> Option<&'a str> {
    err.info().context.get(key).map(String::as_str)
}

#[test]
fn balanced_yukawa_is_accepted() {
    let registry = hypercharge_only(q(-1, 1), q(1, 2));
    let accepted = validate(&registry, &term("y", "eL~ eR H"), &ValidatorOpts::default())
        .expect("charges sum to zero");
    assert_eq!(accepted.kind, TermKind::Yukawa);
    assert_eq!(accepted.mass_dimension, Rational::from_integer(4));
}

#[test]
fn unbalanced_yukawa_reports_the_charge_sum() {
    let registry = hypercharge_only(q(-1, 1), q(-1, 2));
    let err = validate(&registry, &term("y", "eL~ eR H"), &ValidatorOpts::default())
        .expect_err("charges sum to -1");
    assert_eq!(err.kind(), ErrorKind::ChargeNotConserved);
    assert_eq!(context(&err, "group"), Some("U1_Y"));
    assert_eq!(context(&err, "computed"), Some("-1"));
    assert_eq!(context(&err, "required"), Some("0"));
    assert_eq!(context(&err, "participants"), Some("eL~ eR H"));
}

#[test]
fn unknown_participants_fail_before_any_check() {
    let registry = electroweak(false);
    let err = validate(&registry, &term("x", "LL X"), &ValidatorOpts::default())
        .expect_err("X is undeclared");
    assert_eq!(err.kind(), ErrorKind::UndefinedReference);
    assert_eq!(context(&err, "participants"), Some("LL X"));
}

#[test]
fn non_singlet_products_violate_gauge_invariance() {
    let registry = electroweak(false);
    let err = validate(&registry, &term("x", "LL eR"), &ValidatorOpts::default())
        .expect_err("doublet times singlet");
    assert_eq!(err.kind(), ErrorKind::GaugeInvarianceViolation);
    assert_eq!(context(&err, "group"), Some("SU2L"));
    assert_eq!(context(&err, "computed"), Some("[1] x [0]"));
}

#[test]
fn lorentz_structure_is_checked_before_dimension_and_charges() {
    let registry = electroweak(false);
    let opts = ValidatorOpts::default();

    let odd = validate(&registry, &term("x", "LL~ LL eR"), &opts).expect_err("three fermions");
    assert_eq!(odd.kind(), ErrorKind::LorentzStructureMismatch);

    let current = validate(&registry, &term("x", "LL~ LL"), &opts).expect_err("bare current");
    assert_eq!(current.kind(), ErrorKind::LorentzStructureMismatch);

    let open = validate(&registry, &term("x", "LL~ LL H H~"), &opts).expect_err("open current");
    assert_eq!(open.kind(), ErrorKind::LorentzStructureMismatch);

    let unconjugated = validate(&registry, &term("x", "LL eR H~"), &opts).expect_err("L-R current");
    assert_eq!(unconjugated.kind(), ErrorKind::LorentzStructureMismatch);

    let scalar = validate(&registry, &term("x", "H' H~"), &opts).expect_err("open derivative");
    assert_eq!(scalar.kind(), ErrorKind::LorentzStructureMismatch);

    let empty = validate(&registry, &InteractionTerm::new("x", Vec::new()), &opts)
        .expect_err("empty term");
    assert_eq!(empty.kind(), ErrorKind::LorentzStructureMismatch);
}

#[test]
fn kinetic_terms_contract_the_derivative() {
    let registry = electroweak(false);
    let opts = ValidatorOpts::default();
    let fermion = validate(&registry, &term("k", "LL~ LL'"), &opts).expect("fermion kinetic");
    assert_eq!(fermion.kind, TermKind::Kinetic);
    assert_eq!(fermion.mass_dimension, Rational::from_integer(4));
    let scalar = validate(&registry, &term("k", "H' H~'"), &opts).expect("scalar kinetic");
    assert_eq!(scalar.kind, TermKind::Kinetic);
}

#[test]
fn standard_yukawa_and_potential_are_classified() {
    let registry = electroweak(false);
    let opts = ValidatorOpts::default();
    let cases = [
        ("ye", "LL~ eR H", TermKind::Yukawa),
        ("mu2", "H H~", TermKind::ScalarMass),
        ("lam", "H H H~ H~", TermKind::ScalarPotential),
    ];
    for (coupling, participants, kind) in cases {
        let accepted = validate(&registry, &term(coupling, participants), &opts)
            .expect(participants);
        assert_eq!(accepted.kind, kind, "{participants}");
    }
}

#[test]
fn dimension_six_needs_a_suppression_scale() {
    let registry = electroweak(false);
    let opts = ValidatorOpts::default();
    let bare = term("c6", "H H H H~ H~ H~");
    let err = validate(&registry, &bare, &opts).expect_err("dimension six");
    assert_eq!(err.kind(), ErrorKind::NonRenormalizableTerm);
    assert_eq!(context(&err, "computed"), Some("6"));
    assert_eq!(context(&err, "required"), Some("<= 4"));

    let suppressed = bare.with_suppression(SuppressionScale {
        symbol: "Lambda".into(),
        value: Some(1.0e4),
    });
    let accepted = validate(&registry, &suppressed, &opts).expect("suppressed operator");
    assert_eq!(accepted.kind, TermKind::Effective);
    assert_eq!(accepted.mass_dimension, Rational::from_integer(6));
}

#[test]
fn conjugation_flips_the_effective_chirality() {
    let mut registry = electroweak(false);
    registry
        .declare(Particle::fermion("nuR", Chirality::Right))
        .expect("nuR");
    let opts = ValidatorOpts::default();

    let majorana = validate(&registry, &term("mN", "nuR nuR"), &opts).expect("majorana mass");
    assert_eq!(majorana.kind, TermKind::FermionMass);
    assert_eq!(majorana.mass_dimension, Rational::from_integer(3));
    validate(&registry, &term("mN", "nuR~ nuR~"), &opts).expect("conjugate majorana mass");

    let current = validate(&registry, &term("x", "nuR~ nuR"), &opts).expect_err("bare current");
    assert_eq!(current.kind(), ErrorKind::LorentzStructureMismatch);
}

#[test]
fn weinberg_operator_is_effective_with_a_suppression_scale() {
    let registry = electroweak(false);
    let opts = ValidatorOpts {
        enforce_global_numbers: false,
        ..ValidatorOpts::default()
    };
    let bare = term("c5", "LL LL H H");
    let err = validate(&registry, &bare, &opts).expect_err("dimension five");
    assert_eq!(err.kind(), ErrorKind::NonRenormalizableTerm);
    assert_eq!(context(&err, "computed"), Some("5"));
    assert_eq!(context(&err, "required"), Some("<= 4"));

    let suppressed = bare.with_suppression(SuppressionScale {
        symbol: "Lambda".into(),
        value: None,
    });
    let accepted = validate(&registry, &suppressed, &opts).expect("weinberg operator");
    assert_eq!(accepted.kind, TermKind::Effective);
    assert_eq!(accepted.mass_dimension, Rational::from_integer(5));
}

#[test]
fn global_numbers_are_enforced_on_request() {
    let registry = electroweak(true);
    let strict = ValidatorOpts::default();
    let neutrino = validate(&registry, &term("yn", "LL~ H~ N"), &strict).expect("neutrino yukawa");
    assert_eq!(neutrino.kind, TermKind::Yukawa);

    let err = validate(&registry, &term("mN", "N N"), &strict).expect_err("lepton number");
    assert_eq!(err.kind(), ErrorKind::ChargeNotConserved);
    assert_eq!(context(&err, "quantum_number"), Some("LeptonNumber"));
    assert_eq!(context(&err, "computed"), Some("2"));

    let relaxed = ValidatorOpts {
        enforce_global_numbers: false,
        ..ValidatorOpts::default()
    };
    let majorana = validate(&registry, &term("mN", "N N"), &relaxed).expect("majorana mass");
    assert_eq!(majorana.kind, TermKind::FermionMass);
}

#[test]
fn validated_terms_serialize_with_string_dimensions() {
    let registry = electroweak(false);
    let accepted = validate(&registry, &term("ye", "LL~ eR H"), &ValidatorOpts::default())
        .expect("yukawa");
    let value = serde_json::to_value(&accepted).expect("serialize");
    assert_eq!(value["kind"], "yukawa");
    assert_eq!(value["mass_dimension"], "4");
    assert_eq!(value["term"]["participants"][0]["particle"], "LL");
}

#[test]
fn batch_results_follow_input_order() {
    let registry = electroweak(true);
    let terms = vec![
        term("a", "LL~ eR H"),
        term("b", "LL eR"),
        term("c", "H H~"),
        term("d", "N N"),
        term("e", "LL~ LL eR"),
        term("f", "H H H~ H~"),
    ];
    let opts = ValidatorOpts::default();
    let parallel = validate_batch(&registry, &terms, &opts, 4).expect("pool");
    let validator = Validator::new(&registry, opts.clone());
    let sequential: Vec<_> = terms.iter().map(|t| validator.validate(t)).collect();
    assert_eq!(parallel, sequential);
    let accepted: Vec<bool> = parallel.iter().map(Result::is_ok).collect();
    assert_eq!(accepted, vec![true, false, true, false, false, true]);
}

fn participant_strategy() -> impl Strategy<Value = Participant> {
    (
        prop::sample::select(vec!["LL", "eR", "H", "N", "X"]),
        any::<bool>(),
        0u32..2,
    )
        .prop_map(|(name, conjugate, derivatives)| {
            let mut participant = if conjugate {
                Participant::conjugated(name)
            } else {
                Participant::plain(name)
            };
            participant.role.derivatives = derivatives;
            participant
        })
}

proptest! {
    #[test]
    fn validation_is_idempotent(participants in prop::collection::vec(participant_strategy(), 0..5)) {
        let registry = electroweak(true);
        let validator = Validator::new(&registry, ValidatorOpts::default());
        let candidate = InteractionTerm::new("g", participants);
        let first = validator.validate(&candidate);
        let second = validator.validate(&candidate);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn overflowing_charge_sums_are_reported() {
    let mut registry = bsm_model::FieldRegistry::new();
    registry
        .declare_group(bsm_group::GaugeGroup::new("U1X", bsm_group::GroupFamily::Abelian))
        .expect("U1X");
    registry
        .declare(Particle::scalar("phi").with_charge("U1X", Rational::from_integer(i64::MAX)))
        .expect("phi");
    let err = validate(&registry, &term("m", "phi phi"), &ValidatorOpts::default())
        .expect_err("charge sum leaves the i64 range");
    assert_eq!(err.kind(), ErrorKind::InvalidRepresentation);
    assert_eq!(err.code(), "rational-overflow");
}
