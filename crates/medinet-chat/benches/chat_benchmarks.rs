//! Benchmarks for the per-turn hot paths: payload normalization and inline
//! markdown rendering.
//!
//! Both run once per AI turn on the UI thread, so they should stay well
//! under a millisecond for realistic payloads.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use medinet_chat::{normalize, render_message};
use serde_json::{json, Value};

/// A webhook answer with the payload serialized inside `output`, the shape
/// most assistants return.
fn generate_wrapped_payload(index: usize) -> Value {
    let inner = json!({
        "message": format!(
            "Here are **{} hospitals** that match your request:\n\
             • **Gleneagles** ★★★★★ *Cardiology*\n\
             • **Pantai** ★★★★☆ *Orthopedics*\n\
             • **Sunway** ★★★★ *Oncology*",
            index % 10 + 1
        ),
        "actions": [
            {"label": "Heart hospitals", "type": "hospital", "query": "heart surgery", "filters": {"specialty": "Cardiology"}},
            {"label": "Top doctors", "type": "doctor", "query": "cardiologist", "filters": {"minRating": 4.5}},
            {"label": "Compare packages", "type": "tool_call", "target": "compare_packages", "parameters": {"ref": index}},
            {"label": "Open hospitals", "type": "navigate", "target": "hospitals"}
        ]
    });
    json!([{ "output": inner.to_string() }])
}

fn generate_message(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            format!(
                "• **Hospital {}** rated ★★★★☆ for *cardiology*, {} doctors available",
                i,
                i * 3
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_normalize(c: &mut Criterion) {
    let payloads: Vec<Value> = (0..100).map(generate_wrapped_payload).collect();
    let plain = json!({"message": "Hello! How can I help you today?"});
    let garbage = json!({"output": "{not json at all"});

    let mut group = c.benchmark_group("normalize");
    group.sample_size(200);
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("wrapped_batch_payload", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let reply = normalize(black_box(&payloads[idx % payloads.len()]));
            idx += 1;
            reply
        });
    });

    group.bench_function("plain_message", |b| {
        b.iter(|| normalize(black_box(&plain)));
    });

    // Fallback path: parse failure, raw text kept
    group.bench_function("unparseable_output", |b| {
        b.iter(|| normalize(black_box(&garbage)));
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let short = generate_message(4);
    let long = generate_message(50);

    let mut group = c.benchmark_group("render_message");
    group.sample_size(200);

    group.bench_function("four_lines", |b| {
        b.iter(|| render_message(black_box(&short)));
    });

    group.bench_function("fifty_lines", |b| {
        b.iter(|| render_message(black_box(&long)));
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_render);
criterion_main!(benches);
