use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_serpent::{from_str, read_str, to_string, to_string_pretty, Value};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Clone)]
struct NestedData {
    id: u32,
    metadata: Metadata,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn nested(size: u32) -> Vec<NestedData> {
    (0..size)
        .map(|i| NestedData {
            id: i,
            metadata: Metadata {
                created: "2024-01-01T00:00:00Z".to_string(),
                updated: "2024-06-30T12:00:00Z".to_string(),
                version: i % 7,
            },
            tags: vec!["alpha".to_string(), format!("tag-{}", i)],
        })
        .collect()
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    c.bench_function("serialize_simple_struct", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
}

fn benchmark_deserialize_simple(c: &mut Criterion) {
    let text = "# serpent utf-8 python3.2\n{'__class__':'User','id':123,'name':'Alice','email':'alice@example.com','active':True}";

    c.bench_function("deserialize_simple_struct", |b| {
        b.iter(|| from_str::<User>(black_box(text)))
    });
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");

    for size in [10, 50, 100, 500].iter() {
        let data = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&data)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_array");

    for size in [10, 50, 100, 500].iter() {
        let text = to_string(&products(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| from_str::<Vec<Product>>(black_box(&text)))
        });
    }
    group.finish();
}

fn benchmark_nested(c: &mut Criterion) {
    let data = nested(100);
    let compact = to_string(&data).unwrap();
    let pretty = to_string_pretty(&data).unwrap();

    c.bench_function("serialize_nested", |b| b.iter(|| to_string(black_box(&data))));
    c.bench_function("serialize_nested_pretty", |b| {
        b.iter(|| to_string_pretty(black_box(&data)))
    });
    c.bench_function("deserialize_nested", |b| {
        b.iter(|| from_str::<Vec<NestedData>>(black_box(&compact)))
    });
    c.bench_function("deserialize_nested_pretty", |b| {
        b.iter(|| from_str::<Vec<NestedData>>(black_box(&pretty)))
    });
}

fn benchmark_string_escaping(c: &mut Criterion) {
    let plain = "a".repeat(1024);
    let escaped = "it's \"quoted\"\n\té😀 ".repeat(64);
    let escaped_text = to_string(&escaped).unwrap();

    c.bench_function("serialize_plain_string", |b| {
        b.iter(|| to_string(black_box(&plain)))
    });
    c.bench_function("serialize_escaped_string", |b| {
        b.iter(|| to_string(black_box(&escaped)))
    });
    c.bench_function("read_escaped_string", |b| {
        b.iter(|| read_str(black_box(&escaped_text)))
    });
}

fn benchmark_dynamic_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_value");

    for size in [100, 1000].iter() {
        let numbers: Vec<(i64, f64)> = (0..*size).map(|i| (i, i as f64 * 0.5)).collect();
        let text = to_string(&numbers).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| read_str(black_box(&text)))
        });
    }
    group.finish();

    let value = read_str(&to_string(&nested(100)).unwrap()).unwrap();
    c.bench_function("write_value_tree", |b| {
        b.iter(|| to_string(black_box::<&Value>(&value)))
    });
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let data = products(100);
    let mut group = c.benchmark_group("serpent_vs_json");

    group.bench_function("serpent_serialize", |b| b.iter(|| to_string(black_box(&data))));
    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&data)))
    });

    let serpent_text = to_string(&data).unwrap();
    let json_text = serde_json::to_string(&data).unwrap();
    group.bench_function("serpent_deserialize", |b| {
        b.iter(|| from_str::<Vec<Product>>(black_box(&serpent_text)))
    });
    group.bench_function("json_deserialize", |b| {
        b.iter(|| serde_json::from_str::<Vec<Product>>(black_box(&json_text)))
    });
    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let data = nested(20);

    c.bench_function("roundtrip_nested", |b| {
        b.iter(|| {
            let text = to_string(black_box(&data)).unwrap();
            from_str::<Vec<NestedData>>(&text).unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_deserialize_simple,
    benchmark_serialize_array,
    benchmark_deserialize_array,
    benchmark_nested,
    benchmark_string_escaping,
    benchmark_dynamic_values,
    benchmark_comparison_with_json,
    benchmark_roundtrip
);
criterion_main!(benches);
