use bsm_group::{decompose, GaugeGroup, GroupAlgebra, GroupFamily, Irrep};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_fusion(c: &mut Criterion) {
    let su3 = GroupFamily::SpecialUnitary { n: 3 };
    let adjoint = Irrep::adjoint(3);
    c.bench_function("su3_adjoint_squared", |b| {
        b.iter(|| decompose(su3, black_box(&adjoint), black_box(&adjoint)).expect("fusion"));
    });

    let mut algebra = GroupAlgebra::new();
    let group = algebra
        .declare_group(GaugeGroup::new("SU5", GroupFamily::SpecialUnitary { n: 5 }))
        .expect("declare");
    let reps = vec![
        Irrep::Dynkin(vec![0, 1, 0, 0]),
        Irrep::Dynkin(vec![0, 1, 0, 0]),
        Irrep::antifundamental(5),
        Irrep::antifundamental(5),
    ];
    c.bench_function("su5_singlet_memoised", |b| {
        b.iter(|| algebra.contains_singlet(&group, black_box(&reps)).expect("singlet"));
    });
}

criterion_group!(benches, bench_fusion);
criterion_main!(benches);
