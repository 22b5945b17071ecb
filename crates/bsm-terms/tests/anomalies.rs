mod common;

use bsm_core::Rational;
use bsm_terms::check_anomalies;
use common::{electroweak, q, standard_model};

#[test]
fn one_standard_family_is_anomaly_free() {
    let registry = standard_model(1, None);
    let report = check_anomalies(&registry).expect("report");
    assert!(report.is_anomaly_free(), "{}", report.summary());
    let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "SU3C^3",
            "U1Y^3",
            "U1Y-grav^2",
            "SU3C^2-U1Y",
            "SU2L^2-U1Y",
            "Witten(SU2L)",
        ]
    );
    assert_eq!(report.entry("Witten(SU2L)").expect("witten").value, Rational::from_integer(4));
}

#[test]
fn generations_scale_every_coefficient() {
    let registry = standard_model(3, None);
    let report = check_anomalies(&registry).expect("report");
    assert!(report.is_anomaly_free());
    assert_eq!(report.entry("Witten(SU2L)").expect("witten").value, Rational::from_integer(12));
}

#[test]
fn leptons_alone_are_anomalous() {
    let registry = electroweak(true);
    let report = check_anomalies(&registry).expect("report");
    assert!(!report.is_anomaly_free());
    let failing: Vec<&str> = report.failures().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(failing, vec!["U1Y^3", "SU2L^2-U1Y", "Witten(SU2L)"]);
    assert!(report.entry("U1Y-grav^2").expect("gravity").cancelled);
    assert_eq!(report.entry("U1Y^3").expect("cubic").value, Rational::from_integer(3) / 4);
    assert_eq!(report.entry("SU2L^2-U1Y").expect("mixed").value, q(-1, 4));
}

#[test]
fn gauged_b_minus_l_needs_right_handed_neutrinos() {
    let without = check_anomalies(&standard_model(1, Some(false))).expect("report");
    let failing: Vec<&str> = without.failures().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(failing, vec!["U1BL^3", "U1BL-grav^2"]);
    assert_eq!(without.entry("U1BL^3").expect("cubic").value, q(-1, 1));
    assert!(without.entry("U1Y^2-U1BL").expect("mixed").cancelled);
    assert!(without.entry("U1BL^2-U1Y").expect("mixed").cancelled);

    let with = check_anomalies(&standard_model(1, Some(true))).expect("report");
    assert!(with.is_anomaly_free(), "{}", with.summary());
}

#[test]
fn report_serializes_values_as_strings() {
    let report = check_anomalies(&electroweak(false)).expect("report");
    let value = serde_json::to_value(&report).expect("serialize");
    assert_eq!(value["entries"][0]["name"], "U1Y^3");
    assert_eq!(value["entries"][0]["value"], "3/4");
    assert_eq!(value["entries"][0]["cancelled"], false);
}

#[test]
fn overflowing_coefficients_are_reported() {
    let mut registry = bsm_model::FieldRegistry::new();
    registry
        .declare_group(bsm_group::GaugeGroup::new("U1X", bsm_group::GroupFamily::Abelian))
        .expect("U1X");
    registry
        .declare(
            bsm_model::Particle::fermion("chi", bsm_model::Chirality::Left)
                .with_charge("U1X", Rational::from_integer(1 << 40)),
        )
        .expect("chi");
    let err = check_anomalies(&registry).expect_err("q^3 leaves the i64 range");
    assert_eq!(err.kind(), bsm_core::ErrorKind::InvalidRepresentation);
    assert_eq!(err.code(), "rational-overflow");
}
