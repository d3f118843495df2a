#![allow(missing_docs)]

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tasklist_core::{
    PageRequest, Priority, SortField, StatusFilter, Task, TaskId, ViewParams, compute_view,
};
use time::macros::{date, datetime};
use time::Duration;

fn build_tasks(count: usize) -> Vec<Task> {
    (1..=count)
        .map(|n| {
            let raw = i64::try_from(n).unwrap_or(i64::MAX);
            Task {
                id: TaskId::new(raw).unwrap_or_else(|| unreachable!("ids start at 1")),
                title: format!("task {:05}", (n * 7919) % count.max(1)),
                description: String::new(),
                priority: Priority::ALL[n % Priority::ALL.len()],
                due_date: date!(2024 - 01 - 01) + Duration::days(raw % 365),
                status: n % 3 == 0,
                deleted_at: None,
                created_at: datetime!(2024-01-01 0:00 UTC),
                updated_at: datetime!(2024-01-01 0:00 UTC),
            }
        })
        .collect()
}

fn compute_view_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_view");
    for &count in &[100usize, 1_000, 10_000] {
        let tasks = build_tasks(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &tasks, |b, tasks| {
            b.iter_batched(
                || {
                    let mut params = ViewParams::default()
                        .with_search("task")
                        .with_status(StatusFilter::Pending)
                        .toggle_sort(SortField::Title);
                    // Filter setters reset to page 1.
                    params.page = PageRequest::new(2, 20).unwrap_or_default();
                    params
                },
                |params| {
                    black_box(compute_view(tasks, &params).total_filtered);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, compute_view_benchmark);
criterion_main!(benches);
