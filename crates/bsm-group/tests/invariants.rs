use bsm_core::Rational;
use bsm_group::{anomaly_coefficient, dynkin_index, quadratic_casimir, Irrep, IrrepInvariants};

#[test]
fn quadratic_casimirs() {
    assert_eq!(quadratic_casimir(&Irrep::fundamental(2)), Rational::new(3, 4));
    assert_eq!(quadratic_casimir(&Irrep::fundamental(3)), Rational::new(4, 3));
    assert_eq!(quadratic_casimir(&Irrep::adjoint(3)), Rational::from_integer(3));
    assert_eq!(quadratic_casimir(&Irrep::adjoint(5)), Rational::from_integer(5));
}

#[test]
fn dynkin_indices() {
    assert_eq!(dynkin_index(&Irrep::fundamental(2)).expect("2"), Rational::new(1, 2));
    assert_eq!(dynkin_index(&Irrep::fundamental(5)).expect("5"), Rational::new(1, 2));
    assert_eq!(dynkin_index(&Irrep::adjoint(3)).expect("8"), Rational::from_integer(3));
    assert_eq!(dynkin_index(&Irrep::Dynkin(vec![0, 1, 0, 0])).expect("10"), Rational::new(3, 2));
}

#[test]
fn cubic_anomalies() {
    assert_eq!(anomaly_coefficient(&Irrep::fundamental(3)).expect("3"), Rational::from_integer(1));
    assert_eq!(anomaly_coefficient(&Irrep::antifundamental(3)).expect("3bar"), Rational::from_integer(-1));
    assert_eq!(anomaly_coefficient(&Irrep::Dynkin(vec![2, 0])).expect("6"), Rational::from_integer(7));
    assert_eq!(anomaly_coefficient(&Irrep::adjoint(3)).expect("8"), Rational::from_integer(0));
    assert_eq!(anomaly_coefficient(&Irrep::fundamental(2)).expect("2"), Rational::from_integer(0));
    // 5bar + 10 of SU(5) cancels
    let five_bar = anomaly_coefficient(&Irrep::antifundamental(5)).expect("5bar");
    let ten = anomaly_coefficient(&Irrep::Dynkin(vec![0, 1, 0, 0])).expect("10");
    assert_eq!(five_bar + ten, Rational::from_integer(0));
}

#[test]
fn abelian_invariants_are_powers_of_charge() {
    let invariants = IrrepInvariants::of(&Irrep::charge(Rational::new(-1, 2))).expect("charge");
    assert_eq!(invariants.dimension, 1);
    assert_eq!(invariants.casimir, Rational::new(1, 4));
    assert_eq!(invariants.anomaly, Rational::new(-1, 8));
}
