use bsm_core::errors::{ErrorInfo, ErrorKind, ModelError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("participants", "eL, eR~, H")
        .with_context("group", "U1Y")
}

#[test]
fn charge_error_surface() {
    let err = ModelError::ChargeNotConserved(
        sample_info("charge-sum", "charges do not cancel").with_context("computed", "1"),
    );
    assert_eq!(err.kind(), ErrorKind::ChargeNotConserved);
    assert_eq!(err.code(), "charge-sum");
    assert_eq!(err.info().context.get("computed").map(String::as_str), Some("1"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = ModelError::GaugeInvarianceViolation(
        sample_info("no-singlet", "term is not a singlet").with_hint("add a conjugate"),
    );
    let text = err.to_string();
    assert!(text.starts_with("gauge invariance violation: term is not a singlet"));
    assert!(text.contains("group=U1Y"));
    assert!(text.contains("hint: add a conjugate"));
}

#[test]
fn errors_round_trip_through_json() {
    let err = ModelError::RegistryFrozen(sample_info("frozen", "registry is frozen"));
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["kind"], "RegistryFrozen");
    assert_eq!(json["detail"]["code"], "frozen");
    let decoded: ModelError = serde_json::from_value(json).expect("deserialize");
    assert_eq!(decoded, err);
}

#[test]
fn every_kind_is_reported() {
    let cases = [
        (ModelError::UnknownGroupFamily(sample_info("a", "a")), ErrorKind::UnknownGroupFamily),
        (ModelError::InvalidRepresentation(sample_info("a", "a")), ErrorKind::InvalidRepresentation),
        (ModelError::DuplicateDefinition(sample_info("a", "a")), ErrorKind::DuplicateDefinition),
        (ModelError::InconsistentMultiplet(sample_info("a", "a")), ErrorKind::InconsistentMultiplet),
        (ModelError::UndefinedReference(sample_info("a", "a")), ErrorKind::UndefinedReference),
        (ModelError::NoInvariantDirection(sample_info("a", "a")), ErrorKind::NoInvariantDirection),
        (ModelError::LorentzStructureMismatch(sample_info("a", "a")), ErrorKind::LorentzStructureMismatch),
        (ModelError::NonRenormalizableTerm(sample_info("a", "a")), ErrorKind::NonRenormalizableTerm),
        (ModelError::EmptyModel(sample_info("a", "a")), ErrorKind::EmptyModel),
        (ModelError::Config(sample_info("a", "a")), ErrorKind::Config),
    ];
    for (err, kind) in cases {
        assert_eq!(err.kind(), kind);
    }
}
