use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tute_core::model::card::Card;
use tute_core::model::player::Seat;
use tute_core::{ChoiceContext, EngineConfig, TuteEngine};

fn play_round(players: usize, habanero: bool, seed: u64) -> u32 {
    let config = EngineConfig::new(players, habanero);
    let Ok(mut engine) = TuteEngine::with_seed(&config, seed) else {
        return 0;
    };
    if engine.deal(Seat::new(0)).is_err() {
        return 0;
    }
    let mut chooser = |ctx: &ChoiceContext<'_>| -> Card { ctx.hand[ctx.legal[0]] };
    while let Some(seat) = engine.current_player().filter(|_| !engine.is_round_over()) {
        if engine.play_turn(seat, &mut chooser).is_err() {
            break;
        }
    }
    engine.round_scores().totals().iter().sum()
}

fn round_throughput_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_throughput");
    for players in 2..=4 {
        for habanero in [true, false] {
            let name = format!("players_{players}_habanero_{habanero}");
            group.bench_function(name, |b| {
                let mut seed = 0u64;
                b.iter(|| {
                    seed = seed.wrapping_add(1);
                    black_box(play_round(players, habanero, seed))
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, round_throughput_bench);
criterion_main!(benches);
