use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;

use hf_network::ConstraintMatrixBuilder;
use hf_network::RelaxationEngine;
use hf_structure::PairSpace;
use hf_structure::MIN_LOOP;

// tRNA-Phe (yeast), 76 nt.
const TRNA: &str = "GCGGAUUUAGCUCAGUUGGGAGAGCGCCAGACUGAAGAUCUGGAGGUCCUGUGUUCGAUCCACAGAAUUCGCACCA";

pub fn relaxation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Relaxation");

    let space = PairSpace::new(TRNA.len(), MIN_LOOP).unwrap();
    group.bench_function("Build the coupling matrix (76 nt).", |b| {
        b.iter(|| {
            let _ = ConstraintMatrixBuilder::new(&space).build();
        });
    });

    let net = RelaxationEngine::try_from(TRNA).unwrap();
    group.bench_function("Relax for 20 epochs (76 nt).", |b| {
        b.iter(|| {
            let mut net = net.clone();
            net.relax(20);
        });
    });
}

criterion_group!(benches, relaxation);
criterion_main!(benches);
