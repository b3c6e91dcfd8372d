use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;
use std::time::Duration;
use wordcount_pipeline::{count_words, PipelineConfig};

fn sample_text(lines: usize) -> String {
    let vocab = [
        "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "pack", "my", "box",
        "with", "five", "dozen", "liquor", "jugs",
    ];
    let mut state = 0x9E3779B97F4A7C15u64;
    let mut out = String::new();
    for _ in 0..lines {
        for _ in 0..8 {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            out.push_str(vocab[(state >> 33) as usize % vocab.len()]);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

fn benchmark_single_worker(c: &mut Criterion) {
    let text = sample_text(10_000);
    c.bench_function("count_10k_lines_1_worker", |b| {
        b.iter(|| {
            let config = PipelineConfig {
                batch_size: 2_000,
                workers: 1,
                stripes: 1,
            };
            let counts =
                count_words(Cursor::new(black_box(text.as_bytes().to_vec())), config).unwrap();
            black_box(counts);
        });
    });
}

fn benchmark_parallel_workers(c: &mut Criterion) {
    let text = sample_text(10_000);
    let workers = num_cpus::get().max(1);
    c.bench_function("count_10k_lines_all_workers", |b| {
        b.iter(|| {
            let config = PipelineConfig {
                batch_size: 2_000,
                workers,
                stripes: workers,
            };
            let counts =
                count_words(Cursor::new(black_box(text.as_bytes().to_vec())), config).unwrap();
            black_box(counts);
        });
    });
}

fn benchmark_stripe_counts(c: &mut Criterion) {
    let text = sample_text(10_000);
    let workers = num_cpus::get().max(1);
    for stripes in [1, workers, workers * 4] {
        c.bench_function(&format!("count_10k_lines_{stripes}_stripes"), |b| {
            b.iter(|| {
                let config = PipelineConfig {
                    batch_size: 2_000,
                    workers,
                    stripes,
                };
                let counts =
                    count_words(Cursor::new(black_box(text.as_bytes().to_vec())), config).unwrap();
                black_box(counts);
            });
        });
    }
}

criterion_group!(
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(10));
    targets = benchmark_single_worker, benchmark_parallel_workers, benchmark_stripe_counts
);
criterion_main!(benches);
