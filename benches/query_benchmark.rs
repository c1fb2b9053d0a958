use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;

use quarkdex::core::clock::ManualClock;
use quarkdex::core::config::Config;
use quarkdex::core::types::{CollectionMeta, Question, QuizCollection};
use quarkdex::index::global::build_global_index;
use quarkdex::index::image_index::ImageIndex;
use quarkdex::query::QueryLimits;
use quarkdex::query::sampler::sample;
use quarkdex::storage::image_catalog::ImageCatalog;
use quarkdex::{ImageEngine, ImageSearch};

fn image_engine() -> ImageEngine {
    let config = Config::default();
    ImageEngine::new(
        ImageCatalog::new(&config.image_primary_base, &config.image_cdn_base),
        QueryLimits::for_images(&config),
        config.image_cache_ttl,
        Arc::new(ManualClock::new(0)),
    )
}

/// Synthetic collections of `size` questions each
fn collections(count: usize, size: u64) -> Vec<Arc<QuizCollection>> {
    (0..count)
        .map(|c| {
            Arc::new(QuizCollection {
                id: format!("collection-{}", c),
                title: format!("Collection {}", c),
                description: String::new(),
                declared_total: size,
                questions_per_collection: 10,
                questions: (1..=size)
                    .map(|id| Question {
                        id,
                        question: format!("Question {} of collection {}?", id, c),
                        options: Vec::new(),
                        correct_answer: None,
                    })
                    .collect(),
                meta: CollectionMeta { file_size: 0, last_modified: None },
            })
        })
        .collect()
}

fn bench_image_index_build(c: &mut Criterion) {
    let config = Config::default();
    let catalog = ImageCatalog::new(&config.image_primary_base, &config.image_cdn_base);
    let structure = catalog.structure(Utc::now());

    c.bench_function("image_index_build", |b| {
        b.iter(|| black_box(ImageIndex::build(&catalog, &structure).unwrap()));
    });
}

fn bench_image_search(c: &mut Criterion) {
    let engine = image_engine();
    // warm the cache so only the scan is measured
    engine.index().unwrap();

    let mut group = c.benchmark_group("image_search");
    for term in ["cat", "corgi", "white person 7"] {
        group.bench_with_input(BenchmarkId::from_parameter(term), &term, |b, &term| {
            let search = ImageSearch::new(term);
            b.iter(|| black_box(engine.search(&search).unwrap()));
        });
    }
    group.finish();
}

fn bench_global_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("global_index_build");
    for count in [10, 100, 500] {
        let input = collections(count, 50);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| black_box(build_global_index(input)));
        });
    }
    group.finish();
}

fn bench_sample(c: &mut Criterion) {
    let pool: Vec<u64> = (0..10_000).collect();
    let mut rng = StdRng::seed_from_u64(7);

    let mut group = c.benchmark_group("random_sample");
    for count in [1, 10, 20] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| black_box(sample(pool.iter().collect(), count, &mut rng)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_image_index_build,
    bench_image_search,
    bench_global_index_build,
    bench_sample
);
criterion_main!(benches);
