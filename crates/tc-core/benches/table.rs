use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tc_core::signal::{Signal, encode};
use tc_core::table::{BuildOptions, TableWidth, build_table_with};
use tc_core::variant::us_tty;

fn bench_encode(c: &mut Criterion) {
    let signals: Vec<Signal> = (0u8..32).map(Signal::unfold).collect();
    c.bench_function("encode_32_signals", |b| {
        b.iter(|| {
            signals
                .iter()
                .map(|s| encode(black_box(s), true, false))
                .fold(0u8, |acc, v| acc ^ v)
        });
    });
}

fn bench_build(c: &mut Criterion) {
    let Ok(variant) = us_tty() else {
        return;
    };
    let wide = BuildOptions {
        width: TableWidth::Byte,
        ..variant.options
    };

    c.bench_function("build_ustty_128", |b| {
        b.iter(|| black_box(variant.build()));
    });
    c.bench_function("build_ustty_256", |b| {
        b.iter(|| {
            black_box(build_table_with(
                &wide,
                &variant.letters,
                &variant.figures,
                &variant.both,
            ))
        });
    });
}

criterion_group!(benches, bench_encode, bench_build);
criterion_main!(benches);
