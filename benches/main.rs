use beanmon::render::compose;
use beanmon::stats::{CoreCounters, MemorySnapshot, count_cpu_rows, parse_cpu_rows, parse_meminfo};
use beanmon::usage::{compute_all, compute_usage};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

/// 构造一个含 `cores` 个核心的 /proc/stat 文本
fn create_stat_content(cores: usize) -> String {
    let mut content = String::with_capacity(64 * (cores + 4));
    content.push_str("cpu  4705 356 584 3699 23 23 0 0 0 0\n");
    for i in 0..cores {
        content.push_str(&format!(
            "cpu{i} {} 356 {} 3699 23 23 0 0 0 0\n",
            1000 + i,
            500 + i
        ));
    }
    content.push_str("intr 114930548 113199788 3 0 5 263 0 4\nctxt 1990473\nbtime 1062191376\n");
    content
}

fn bench_stat_parsing(c: &mut Criterion) {
    let content = create_stat_content(64);

    c.bench_function("count_cpu_rows_64", |b| {
        b.iter(|| black_box(count_cpu_rows(black_box(&content))))
    });

    c.bench_function("parse_cpu_rows_64", |b| {
        b.iter(|| black_box(parse_cpu_rows(black_box(&content), 64)))
    });
}

fn bench_meminfo_parsing(c: &mut Criterion) {
    let content = "MemTotal:       16314060 kB\nMemFree:         2097152 kB\nMemAvailable:    9000000 kB\nBuffers:          300000 kB\nCached:          4194304 kB\nSwapCached:            0 kB\nActive:          5000000 kB\n";

    c.bench_function("parse_meminfo", |b| {
        b.iter(|| black_box(parse_meminfo(black_box(content))))
    });
}

fn bench_usage(c: &mut Criterion) {
    let prev = CoreCounters::new(100, 0, 50, 850);
    let curr = CoreCounters::new(150, 0, 80, 870);

    c.bench_function("compute_usage", |b| {
        b.iter(|| black_box(compute_usage(black_box(&prev), black_box(&curr))))
    });

    let prev_all = vec![prev; 64];
    let curr_all = vec![curr; 64];
    c.bench_function("compute_all_64", |b| {
        b.iter(|| black_box(compute_all(black_box(&prev_all), black_box(&curr_all))))
    });
}

fn bench_compose(c: &mut Criterion) {
    let usages: Vec<u8> = (0..64).map(|i| (i * 3 % 101) as u8).collect();
    let memory = MemorySnapshot {
        free_mib: 2048,
        cached_mib: 4096,
    };

    c.bench_function("compose_64", |b| {
        b.iter(|| black_box(compose(black_box(&usages), &memory, "/ 42GiB", 152)))
    });
}

criterion_group!(
    benches,
    bench_stat_parsing,
    bench_meminfo_parsing,
    bench_usage,
    bench_compose
);
criterion_main!(benches);
