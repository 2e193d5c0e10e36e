use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use pairs_core::*;
use std::hint::black_box;

fn wide_config(size: Coord) -> GameConfig {
    let glyphs: String = ('\u{4e00}'..).take(usize::from(size) * usize::from(size) / 2).collect();
    GameConfig::new(size, Alphabet::new(&glyphs).unwrap()).unwrap()
}

fn play_perfect_round(layout: &AnswerLayout) -> u32 {
    let mut engine = PlayEngine::new(layout.clone());
    for (pos, _) in layout.iter() {
        if engine.is_flipped(pos) {
            continue;
        }
        let partner = layout.partner_of(pos).unwrap();
        engine.flip_card(pos).unwrap();
        engine.flip_card(partner).unwrap();
        engine.resolve_match().unwrap();
    }
    engine.move_count()
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for size in [4, 8, 16] {
        let config = wide_config(size);
        group.bench_function(format!("{size}x{size}"), |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                black_box(RandomBoardGenerator::new(seed).generate(&config).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("perfect_round");
    for size in [4, 8] {
        let config = wide_config(size);
        group.bench_function(format!("{size}x{size}"), |b| {
            b.iter_batched(
                || RandomBoardGenerator::new(7).generate(&config).unwrap(),
                |layout| black_box(play_perfect_round(&layout)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_round);
criterion_main!(benches);
