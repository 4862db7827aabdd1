use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use playerpulse::prelude::*;
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn synthetic_players(n: usize) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let genres = ["Action", "RPG", "Strategy", "Sports"];
    let difficulties = ["Easy", "Medium", "Hard"];

    let mut playtime = Vec::with_capacity(n);
    let mut sessions = Vec::with_capacity(n);
    let mut level = Vec::with_capacity(n);
    let mut genre = Vec::with_capacity(n);
    let mut difficulty = Vec::with_capacity(n);
    let mut engagement = Vec::with_capacity(n);

    for i in 0..n {
        let low = i % 3 == 0;
        playtime.push(if low {
            rng.gen_range(0.5..6.0)
        } else {
            rng.gen_range(8.0..30.0)
        });
        sessions.push(if low {
            rng.gen_range(1.0..5.0)
        } else {
            rng.gen_range(6.0..20.0)
        });
        level.push(rng.gen_range(1..100) as f64);
        genre.push(genres.choose(&mut rng).unwrap().to_string());
        difficulty.push(difficulties.choose(&mut rng).unwrap().to_string());
        engagement.push(if low { "Low".to_string() } else { "High".to_string() });
    }

    df!(
        "PlayTimeHours" => playtime,
        "SessionsPerWeek" => sessions,
        "PlayerLevel" => level,
        "GameGenre" => genre,
        "GameDifficulty" => difficulty,
        "EngagementLevel" => engagement,
    )
    .unwrap()
}

fn bench_config() -> AnalysisConfig {
    let schema = FeatureSchema::new(
        vec![
            "PlayTimeHours".to_string(),
            "SessionsPerWeek".to_string(),
            "PlayerLevel".to_string(),
        ],
        vec!["GameGenre".to_string(), "GameDifficulty".to_string()],
        LabelRule::default(),
    )
    .unwrap();
    AnalysisConfig::new(schema)
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn_analysis");
    group.sample_size(10);

    for n_rows in [1000, 5000, 10000].iter() {
        let df = synthetic_players(*n_rows);
        let config = bench_config();

        group.bench_with_input(BenchmarkId::new("run", n_rows), &df, |b, df| {
            b.iter(|| run_churn_analysis(black_box(df), &config).unwrap())
        });
    }

    group.finish();
}

fn bench_preprocessing(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocessing");

    for n_rows in [1000, 10000].iter() {
        let df = synthetic_players(*n_rows);
        let schema = bench_config().schema;

        group.bench_with_input(BenchmarkId::new("fit_transform", n_rows), &df, |b, df| {
            b.iter(|| {
                let mut pipeline = FeaturePipeline::new(schema.clone());
                pipeline.fit_transform(black_box(df)).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_analysis, bench_preprocessing);
criterion_main!(benches);
