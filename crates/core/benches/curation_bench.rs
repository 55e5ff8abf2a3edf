use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use skucurate_core::decision::{CurationDecisionEngine, CurationParams};
use skucurate_core::model::AliasGroup;
use skucurate_core::pipeline::PipelineBuilder;
use skucurate_core::ranking::token_sort_ratio;

const VARIANTS: &[&str] = &[
    "Wireless Keyboard Black",
    "wireless keybord black",
    "black wireless keyboard",
    "Wireles Keyboard - Black",
    "keyboard wireless blk",
    "TechFlow Wireless Keyboard (Black)",
];

fn make_groups(n: usize) -> Vec<AliasGroup> {
    (0..n)
        .map(|i| {
            let aliases = (0..8)
                .map(|j| format!("{} {}", VARIANTS[(i + j) % VARIANTS.len()], if j % 3 == 0 { "usb" } else { "" }))
                .collect();
            AliasGroup::new(format!("SKU{:05}", i), aliases).unwrap()
        })
        .collect()
}

fn bench_token_sort_ratio(c: &mut Criterion) {
    c.bench_function("token_sort_ratio", |b| {
        b.iter(|| {
            black_box(token_sort_ratio(
                black_box("black keyboard wireless usb"),
                black_box("keyboard wireless"),
            ))
        });
    });
}

fn bench_single_group(c: &mut Criterion) {
    let engine = CurationDecisionEngine::new(CurationParams::default()).unwrap();
    let group = make_groups(1).remove(0);

    c.bench_function("curate_group_8_aliases", |b| {
        b.iter(|| black_box(engine.curate(black_box(&group))));
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(1_000));

    let groups = make_groups(1_000);
    let pipeline = PipelineBuilder::new().build().unwrap();
    group.bench_function("1k_groups", |b| {
        b.iter(|| black_box(pipeline.curate_all(&groups)));
    });

    let single = PipelineBuilder::new().num_threads(1).build().unwrap();
    group.bench_function("1k_groups_single_thread", |b| {
        b.iter(|| black_box(single.curate_all(&groups)));
    });

    group.finish();
}

criterion_group!(benches, bench_token_sort_ratio, bench_single_group, bench_pipeline);
criterion_main!(benches);
