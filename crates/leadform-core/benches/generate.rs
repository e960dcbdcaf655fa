//! Document generation benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use leadform_core::{
    ConnectionSettings, FieldDefinition, FieldType, FormConfig, FormGenerator, LayoutAssignment,
    ServiceDefinition,
};

fn service(fields: usize) -> ServiceDefinition {
    let types = FieldType::ALL;
    ServiceDefinition::new(
        "bench",
        (0..fields)
            .map(|i| {
                let field_type = types[i % types.len()];
                FieldDefinition::new(format!("field_{i}"), format!("Field {i}"), field_type)
                    .with_options(["One", "Two", "Three"])
            })
            .collect(),
    )
}

fn bench_generate(c: &mut Criterion) {
    let generator =
        FormGenerator::new(ConnectionSettings::new("https://db.example.com", "anon-key").unwrap()).unwrap();

    let small = service(5);
    let single = FormConfig::new("bench", "tenant");
    c.bench_function("generate_single_step_5", |b| {
        b.iter(|| generator.generate(black_box(&small), black_box(&single)).unwrap())
    });

    let large = service(60);
    let mut multi = FormConfig::new("bench", "tenant");
    multi.multi_step = true;
    multi.consent.privacy_enabled = true;
    multi.consent.terms_enabled = true;
    for (i, field) in large.fields.iter().enumerate() {
        multi.assign(field.name.clone(), LayoutAssignment::on_step(i as u32 / 10 + 1));
    }
    c.bench_function("generate_multi_step_60", |b| {
        b.iter(|| generator.generate(black_box(&large), black_box(&multi)).unwrap())
    });
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
