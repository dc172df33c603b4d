use criterion::{criterion_group, criterion_main, Criterion};
use godot_gateway::gateway::params::normalize_keys;
use godot_gateway::gateway::path::validate;
use serde_json::json;
use std::hint::black_box;

fn bench_validate(c: &mut Criterion) {
    let accepted = "/home/user/projects/game/scenes/levels/world_01/main.tscn";
    let rejected = "/home/user/projects/game/%252E%252e/%252e%252e/etc/passwd";

    c.bench_function("path_validate_accepted", |b| {
        b.iter(|| black_box(validate(black_box(accepted))));
    });

    c.bench_function("path_validate_rejected_encoded", |b| {
        b.iter(|| black_box(validate(black_box(rejected))));
    });
}

fn bench_normalize_keys(c: &mut Criterion) {
    let params = json!({
        "scenePath": "res://main.tscn",
        "parentNodePath": "root/World",
        "nodeProperties": {
            "zIndex": 3,
            "textureFilter": 1,
            "childNodes": [{"nodeName": "A"}, {"nodeName": "B"}]
        }
    });

    c.bench_function("normalize_keys_nested", |b| {
        b.iter(|| black_box(normalize_keys(black_box(params.clone()))));
    });
}

criterion_group!(benches, bench_validate, bench_normalize_keys);
criterion_main!(benches);
