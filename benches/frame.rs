use criterion::{criterion_group, criterion_main, Criterion, black_box};

use shoreline::audio::SilentBackend;
use shoreline::fire::{EmberConfig, EmberPool};
use shoreline::scene::{FrameScheduler, LogRenderer, SceneConfig};

fn scheduler() -> FrameScheduler<SilentBackend, LogRenderer> {
    let mut config = SceneConfig::default();
    config.fire.embers.seed = Some(1);
    config.audio.seed = Some(1);
    let mut s = FrameScheduler::new(config, SilentBackend::default(), LogRenderer::new())
        .expect("default config is valid");
    s.start();
    s.start_audio();
    s
}

fn bench_tick_day(c: &mut Criterion) {
    let mut s = scheduler();
    c.bench_function("scheduler_tick_day", |b| {
        b.iter(|| {
            s.tick(black_box(1.0 / 60.0));
        });
    });
}

fn bench_tick_night(c: &mut Criterion) {
    let mut s = scheduler();
    s.toggle_day_night();
    // settle sky and fire so the ember pool is live
    for _ in 0..300 {
        s.tick(1.0 / 60.0);
    }
    c.bench_function("scheduler_tick_night", |b| {
        b.iter(|| {
            s.tick(black_box(1.0 / 60.0));
        });
    });
}

fn bench_ember_update(c: &mut Criterion) {
    let mut pool = EmberPool::new(EmberConfig {
        seed: Some(1),
        ..Default::default()
    });
    let mut t = 0.0f32;
    c.bench_function("ember_update_48", |b| {
        b.iter(|| {
            t += 1.0 / 60.0;
            pool.update(black_box(1.0 / 60.0), t);
        });
    });
}

fn bench_ember_update_large(c: &mut Criterion) {
    let mut pool = EmberPool::new(EmberConfig {
        count: 4096,
        seed: Some(1),
        ..Default::default()
    });
    let mut t = 0.0f32;
    c.bench_function("ember_update_4096", |b| {
        b.iter(|| {
            t += 1.0 / 60.0;
            pool.update(black_box(1.0 / 60.0), t);
        });
    });
}

criterion_group!(
    benches,
    bench_tick_day,
    bench_tick_night,
    bench_ember_update,
    bench_ember_update_large,
);
criterion_main!(benches);
