use std::collections::BTreeSet;

use bsm_core::ErrorKind;
use bsm_group::{act, weight_states, GeneratorKind, GroupFamily, Irrep, TensorModule};

fn kinds(n: u32) -> Vec<GeneratorKind> {
    GroupFamily::SpecialUnitary { n }.generator_kinds()
}

fn everything(module: &TensorModule) -> Vec<usize> {
    (0..module.basis().len()).collect()
}

#[test]
fn realisations_have_the_weyl_dimension_and_weights() {
    let irreps = [
        Irrep::fundamental(2),
        Irrep::adjoint(2),
        Irrep::fundamental(3),
        Irrep::antifundamental(3),
        Irrep::adjoint(3),
        Irrep::Dynkin(vec![2, 0]),
        Irrep::adjoint(5),
    ];
    for irrep in irreps {
        let module = TensorModule::new(&irrep).expect("module");
        assert_eq!(
            module.basis().len() as u64,
            irrep.dimension().expect("dimension"),
            "{irrep}"
        );
        let contents: BTreeSet<Vec<u32>> =
            module.basis().iter().map(|v| v.content.clone()).collect();
        let expected: BTreeSet<Vec<u32>> =
            weight_states(&irrep).expect("weights").into_iter().collect();
        assert_eq!(contents, expected, "{irrep}");
    }
}

#[test]
fn octet_keeps_one_direction_under_su2_times_u1() {
    let module = TensorModule::new(&Irrep::adjoint(3)).expect("octet");
    let all = kinds(3);
    let unbroken = [all[0], all[1], all[2], all[7]];
    let kernel = module
        .invariant_subspace(&everything(&module), &unbroken)
        .expect("kernel");
    assert_eq!(kernel.len(), 1);

    let direction = &kernel[0];
    assert!(direction.keys().all(|word| {
        let mut sorted = word.clone();
        sorted.sort_unstable();
        sorted == vec![1, 2, 3]
    }));
    for kind in unbroken {
        assert!(act(kind, 3, direction).expect("act").is_empty(), "{kind:?}");
    }
    assert!(!act(all[3], 3, direction).expect("act").is_empty());
}

#[test]
fn full_invariance_needs_a_singlet() {
    let octet = TensorModule::new(&Irrep::adjoint(3)).expect("octet");
    assert!(octet
        .invariant_subspace(&everything(&octet), &kinds(3))
        .expect("kernel")
        .is_empty());

    let singlet = TensorModule::new(&Irrep::Dynkin(vec![0, 0])).expect("singlet");
    assert_eq!(
        singlet
            .invariant_subspace(&everything(&singlet), &kinds(3))
            .expect("kernel")
            .len(),
        1
    );

    let doublet = TensorModule::new(&Irrep::fundamental(2)).expect("doublet");
    let off_diagonal = &kinds(2)[..2];
    assert!(doublet
        .invariant_subspace(&everything(&doublet), off_diagonal)
        .expect("kernel")
        .is_empty());
}

#[test]
fn charges_have_no_tensor_realisation() {
    let err = TensorModule::new(&Irrep::charge(bsm_core::Rational::new(1, 2)))
        .expect_err("abelian");
    assert_eq!(err.kind(), ErrorKind::InvalidRepresentation);
    assert_eq!(err.code(), "generator-family");
}
