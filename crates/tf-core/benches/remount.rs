use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tf_core::{DType, TensorField};

fn bench_remount(c: &mut Criterion) {
    let mut field = TensorField::seeded(vec![256, 256], 42);
    let float = field.mount("/inference/nlp/precise").unwrap();
    let byte = field.mount("/models/vision/realtime").unwrap();

    c.bench_function("remount float32 -> uint8 (64k)", |b| {
        b.iter(|| black_box(float.data.convert(DType::Uint8)))
    });
    c.bench_function("remount uint8 -> uint16 (64k)", |b| {
        b.iter(|| black_box(byte.data.convert(DType::Uint16)))
    });
    c.bench_function("remount via field", |b| {
        b.iter(|| black_box(field.remount(&float, "/audio/classify").unwrap()))
    });
}

criterion_group!(benches, bench_remount);
criterion_main!(benches);
