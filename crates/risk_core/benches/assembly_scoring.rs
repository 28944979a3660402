use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use vitalrisk_core::forest::{Node, Tree};
use vitalrisk_core::linear::LINEAR_ROWS;
use vitalrisk_core::{
    assemble_features, BiologicalSex, FeatureIndex, ForestModel, HealthSnapshot, LinearModel,
    Scorer,
};

const SNAPSHOT_COUNT: usize = 256;

fn linear_model() -> LinearModel {
    let weights = (0..LINEAR_ROWS)
        .map(|row| {
            let base = row as f64 * 0.001;
            vec![base, base * 1.5, -base]
        })
        .collect();
    LinearModel::new(vec![0.0, 1.0, 2.0], weights)
}

fn forest_model() -> ForestModel {
    let trees = (0..32)
        .map(|idx| {
            Tree::new(vec![
                Node::split(FeatureIndex::Bmi.index(), 25.0 + idx as f64 * 0.25, 1, 2),
                Node::leaf(0.0),
                Node::split(FeatureIndex::Age.index(), 45.0, 3, 4),
                Node::leaf(1.0),
                Node::leaf(2.0),
            ])
        })
        .collect();
    ForestModel::new(trees)
}

fn generate_snapshots(count: usize) -> Vec<HealthSnapshot> {
    (0..count)
        .map(|idx| HealthSnapshot {
            bmi: Some(18.0 + (idx % 30) as f64),
            age: if idx % 3 == 0 { None } else { Some(20.0 + (idx % 60) as f64) },
            high_bp: Some((idx % 2) as f64),
            gen_hlth: Some(1.0 + (idx % 5) as f64),
            sex: Some(if idx % 2 == 0 {
                BiologicalSex::Male
            } else {
                BiologicalSex::Female
            }),
            ..HealthSnapshot::default()
        })
        .collect()
}

fn benchmark_assembly_and_scoring(c: &mut Criterion) {
    let snapshots = generate_snapshots(SNAPSHOT_COUNT);
    let linear = linear_model();
    let forest = forest_model();

    let mut group = c.benchmark_group("assembly_scoring");
    group.throughput(Throughput::Elements(SNAPSHOT_COUNT as u64));
    group.bench_function("assemble_256_snapshots", |b| {
        b.iter(|| {
            for snapshot in &snapshots {
                criterion::black_box(assemble_features(snapshot));
            }
        });
    });
    group.bench_function("linear_score_256_snapshots", |b| {
        b.iter(|| {
            for snapshot in &snapshots {
                let features = assemble_features(snapshot);
                criterion::black_box(linear.score(&features).ok());
            }
        });
    });
    group.bench_function("forest_score_256_snapshots", |b| {
        b.iter(|| {
            for snapshot in &snapshots {
                let features = assemble_features(snapshot);
                criterion::black_box(forest.score(&features).ok());
            }
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_assembly_and_scoring);
criterion_main!(benches);
