//! witness calculation benchmarks
//!
//! Usage:
//!   cargo bench -p zeratul-witness                 # everything
//!   cargo bench -p zeratul-witness -- calculate    # engine only
//!   cargo bench -p zeratul-witness -- export       # json export only

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigInt;
use zeratul_witness::{
    circuits::Multiplier3, FieldArithmetic, Fr, Inputs, Witness, WitnessCalculator, WitnessConfig,
};

fn inputs() -> Inputs {
    let mut inputs = Inputs::new();
    inputs.insert(
        "in".into(),
        vec![BigInt::from(2), BigInt::from(3), BigInt::from(5)],
    );
    inputs
}

fn bench_calculate(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate");
    let inputs = inputs();

    let sequential = WitnessCalculator::<Fr>::new(Multiplier3::new(), WitnessConfig::sequential());
    group.bench_function(BenchmarkId::new("multiplier3", "sequential"), |b| {
        b.iter(|| black_box(sequential.calculate(black_box(&inputs)).unwrap()))
    });

    let parallel = WitnessCalculator::<Fr>::new(Multiplier3::parallel(), WitnessConfig::parallel());
    group.bench_function(BenchmarkId::new("multiplier3", "parallel"), |b| {
        b.iter(|| black_box(parallel.calculate(black_box(&inputs)).unwrap()))
    });

    let json = r#"{"in": ["2", "3", "5"]}"#;
    group.bench_function(BenchmarkId::new("multiplier3", "json"), |b| {
        b.iter(|| black_box(sequential.calculate_json(black_box(json)).unwrap()))
    });

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for log_size in [10usize, 14, 16] {
        let size = 1 << log_size;
        let witness = Witness::from_values(
            (0..size as u64)
                .map(|i| Fr::negate(&Fr::from_u64(i)))
                .collect::<Vec<_>>(),
        );
        group.bench_function(BenchmarkId::new("json", format!("2^{}", log_size)), |b| {
            b.iter(|| black_box(witness.to_json()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_calculate, bench_export);
criterion_main!(benches);
