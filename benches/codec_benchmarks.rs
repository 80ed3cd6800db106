use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use graphbinary::{
    from_bytes, to_bytes, Bytecode, Cursor, Edge, ElementRef, Reader, TypeRegistry, Value, Vertex,
    VertexProperty, Writer,
};

fn traversal(steps: usize) -> Value {
    let mut bc = Bytecode::new();
    bc.add_source("withStrategies", Vec::<Value>::new());
    bc.add_step("V", Vec::<Value>::new());
    for i in 0..steps {
        bc.add_step("has", [Value::from("person"), Value::from("age"), Value::Int(i as i32)]);
        bc.add_step("out", [Value::from("knows")]);
    }
    bc.add_step("values", [Value::from("name")]);
    Value::Bytecode(bc)
}

fn nested_list(depth: usize) -> Value {
    let mut v = Value::List((0..8).map(Value::Long).collect());
    for _ in 0..depth {
        v = Value::List(vec![v.clone(), Value::from("leaf"), v]);
    }
    v
}

fn string_map(n: usize) -> Value {
    Value::Map(
        (0..n)
            .map(|i| (Value::String(format!("key{i}")), Value::Double(i as f64 * 0.5)))
            .collect(),
    )
}

fn bench_encode_bytecode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_bytecode");
    for steps in [1usize, 16, 128] {
        let v = traversal(steps);
        group.bench_with_input(BenchmarkId::from_parameter(steps), &v, |b, v| {
            let registry = TypeRegistry::global();
            b.iter(|| {
                let mut w = Writer::new(registry);
                let out = w.encode(black_box(v)).unwrap();
                black_box(out.len());
            })
        });
    }
    group.finish();
}

fn bench_decode_bytecode(c: &mut Criterion) {
    let bytes = to_bytes(&traversal(128)).unwrap();
    let mut group = c.benchmark_group("decode_bytecode");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("128 steps", |b| {
        let registry = TypeRegistry::global();
        b.iter(|| {
            let mut r = Reader::new(registry);
            let v = r.decode(&mut Cursor::new(black_box(&bytes))).unwrap();
            black_box(v);
        })
    });
    group.finish();
}

fn bench_nested_list(c: &mut Criterion) {
    let v = nested_list(6);
    let bytes = to_bytes(&v).unwrap();
    c.bench_function("nested list encode", |b| {
        b.iter(|| black_box(to_bytes(black_box(&v)).unwrap()))
    });
    c.bench_function("nested list decode", |b| {
        b.iter(|| black_box(from_bytes(black_box(&bytes)).unwrap()))
    });
}

fn bench_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("map");
    for n in [10usize, 1_000] {
        let v = string_map(n);
        let bytes = to_bytes(&v).unwrap();
        group.bench_with_input(BenchmarkId::new("encode", n), &v, |b, v| {
            b.iter(|| black_box(to_bytes(black_box(v)).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("decode", n), &bytes, |b, bytes| {
            b.iter(|| black_box(from_bytes(black_box(bytes)).unwrap()))
        });
    }
    group.finish();
}

fn bench_graph_elements(c: &mut Criterion) {
    let vertex = Value::Vertex(
        Vertex::new(Value::Long(1), "person")
            .with_property(VertexProperty::new(Value::Long(10), "name", "marko")),
    );
    let edge = Value::Edge(Edge::new(
        Value::Int(7),
        "knows",
        ElementRef::new(Value::Long(1), "person"),
        ElementRef::new(Value::Long(2), "software"),
    ));
    let v = Value::List(vec![vertex, edge]);
    c.bench_function("graph elements encode", |b| {
        b.iter(|| black_box(to_bytes(black_box(&v)).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_encode_bytecode,
    bench_decode_bytecode,
    bench_nested_list,
    bench_map,
    bench_graph_elements
);
criterion_main!(benches);
