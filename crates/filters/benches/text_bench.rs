use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use skucurate_filters::text_preprocessing::TextNormalizer;

fn bench_alias_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("alias_normalization");

    let sample_aliases = vec![
        "TechFlow Wireless Keyboard Black",
        "tf wireless keybord black",
        "wireless keyboard - black (TF)",
        "Brand new techflow keyboard wireless black!!!",
        "   USB-C   cable   2m\t\twhite   ",
        "café crème mug 350ml",
    ];

    group.throughput(Throughput::Elements(sample_aliases.len() as u64));
    group.bench_function("normalize", |b| {
        let normalizer = TextNormalizer::curation();
        b.iter(|| {
            for alias in &sample_aliases {
                black_box(normalizer.normalize(alias));
            }
        });
    });

    group.bench_function("tokens", |b| {
        let normalizer = TextNormalizer::curation();
        b.iter(|| {
            for alias in &sample_aliases {
                black_box(normalizer.tokens(alias));
            }
        });
    });

    group.bench_function("tokens_folding", |b| {
        let normalizer = TextNormalizer::folding();
        b.iter(|| {
            for alias in &sample_aliases {
                black_box(normalizer.tokens(alias));
            }
        });
    });

    group.finish();
}

fn bench_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_reuse");

    let aliases: Vec<String> = (0..1000)
        .map(|i| format!("Wireless Keyboard model {} black - pack of {}", i, i % 12))
        .collect();

    group.throughput(Throughput::Elements(aliases.len() as u64));
    group.bench_function("with_reuse", |b| {
        let normalizer = TextNormalizer::curation();
        let mut buffer = String::new();
        b.iter(|| {
            for alias in &aliases {
                normalizer.normalize_into(alias, &mut buffer);
                black_box(&buffer);
            }
        });
    });

    group.bench_function("without_reuse", |b| {
        let normalizer = TextNormalizer::curation();
        b.iter(|| {
            for alias in &aliases {
                black_box(normalizer.normalize(alias));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_alias_normalization, bench_reuse);
criterion_main!(benches);
