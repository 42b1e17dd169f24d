use activity_deck::models::{Activity, PreferenceMap};
use activity_deck::services::selector::select_next;
use activity_deck::services::RecentHistory;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const CATEGORIES: &[&str] = &[
    "exercise",
    "food",
    "social",
    "creative",
    "recovery",
    "productivity",
    "learning",
];

fn catalog(size: usize) -> Vec<Activity> {
    (0..size)
        .map(|i| Activity {
            id: format!("act-{}", i),
            category: CATEGORIES[i % CATEGORIES.len()].to_string(),
            title: format!("Activity {}", i),
            description: String::new(),
            duration_minutes: 20,
            energy_level: 3,
            location_type: None,
            image_url: None,
        })
        .collect()
}

fn benchmark_select_next(c: &mut Criterion) {
    let prefs: PreferenceMap = CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, cat)| (*cat, 0.3 + 0.1 * i as f64))
        .collect();

    // A typical hosted catalog, and one well past it
    let small = catalog(200);
    let large = catalog(5_000);

    // Full history window of recently seen cards
    let history: RecentHistory = (0..20).map(|i| format!("act-{}", i * 3)).collect();

    let mut group = c.benchmark_group("select_next");

    group.bench_function("catalog_200", |b| {
        b.iter(|| select_next(black_box(&small), &history, &prefs, black_box(18)))
    });

    group.bench_function("catalog_5000", |b| {
        b.iter(|| select_next(black_box(&large), &history, &prefs, black_box(7)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_select_next);
criterion_main!(benches);
