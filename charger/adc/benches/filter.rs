use charger_adc::ChargeFilter;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_filter(c: &mut Criterion) {
    let mut filter: ChargeFilter<32> = ChargeFilter::new(61);
    for _ in 0..32 {
        filter.new_data(800);
    }
    let mut sample = 800u16;

    c.bench_function("filter_new_data", |b| {
        b.iter(|| {
            sample = if sample >= 900 { 800 } else { sample + 1 };
            filter.new_data(black_box(sample))
        })
    });
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
