//! Patch Engine Benchmarks
//!
//! Measures path parsing, single-operation application on groups of growing size, and
//! a full patch round trip through the Group service.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use scim_directory::patch::{PathExpression, apply};
use scim_directory::resolver::NoopResolver;
use scim_directory::resource::{Group, Member, User};
use scim_directory::service::{Directory, ResourceService};
use scim_directory::storage::InMemoryStorage;
use scim_directory::{PatchOperation, PatchRequest, ServiceConfig};
use serde_json::json;
use tokio::runtime::Runtime;

fn group_with_members(size: usize) -> Group {
    let mut group = Group::new("Benchmark");
    group.members = (0..size)
        .map(|i| Member::new(format!("member-{}", i)).with_display(format!("user{}", i)))
        .collect();
    group
}

fn bench_path_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_parsing");

    for (name, path) in [
        ("attribute", "displayName"),
        ("sub_attribute", "name.givenName"),
        ("filtered", r#"members[value eq "2819c223-7f76-453a-919d-413861904646"]"#),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| PathExpression::parse(black_box(Some(path)), &["members"]))
        });
    }

    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("apply_operation");

    for size in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(size as u64));
        let base = group_with_members(size);

        let add = PatchOperation::add(Some("members"), json!({"value": "new-member"}));
        group.bench_with_input(BenchmarkId::new("add_member", size), &base, |b, base| {
            b.iter(|| runtime.block_on(apply(base.clone(), black_box(&add), &NoopResolver)))
        });

        let remove = PatchOperation::remove(&format!("members[value eq \"member-{}\"]", size / 2));
        group.bench_with_input(BenchmarkId::new("filtered_remove", size), &base, |b, base| {
            b.iter(|| runtime.block_on(apply(base.clone(), black_box(&remove), &NoopResolver)))
        });
    }

    group.finish();
}

fn bench_service_patch(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let directory = Directory::new(InMemoryStorage::new(), ServiceConfig::default());

    let (group_id, user_id) = runtime.block_on(async {
        let user = directory
            .users()
            .create(User::new("bench@example.com"))
            .await
            .expect("create user");
        let group = directory
            .groups()
            .create(group_with_members(100))
            .await
            .expect("create group");
        (group.id.unwrap_or_default(), user.id.unwrap_or_default())
    });

    let request = PatchRequest::new(vec![
        PatchOperation::add(Some("members"), json!({"value": user_id})),
        PatchOperation::remove(&format!("members[value eq \"{}\"]", user_id)),
    ]);

    c.bench_function("service_patch_add_remove", |b| {
        b.iter(|| {
            runtime
                .block_on(directory.groups().patch(&group_id, black_box(&request)))
                .expect("patch")
        })
    });
}

criterion_group!(benches, bench_path_parsing, bench_apply, bench_service_patch);
criterion_main!(benches);
