use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_tiles::core::{Container, Host, HostSurface, SurfaceProbe};
use tui_tiles::input::{InputParams, InputUnifier, KeyDown, PointerEvent};
use tui_tiles::term::{encode_diff_into, FrameBuffer, MemoryBackend, Presenter, TileRenderer};
use tui_tiles::types::Drawable;
use tui_tiles::GameConfig;

fn probe(width: f64, height: f64) -> Rc<dyn SurfaceProbe> {
    Rc::new(Host::new(width, height))
}

fn bench_render_frame(c: &mut Criterion) {
    let config = GameConfig::default();
    let mut renderer: TileRenderer = TileRenderer::new(
        config.renderer.clone(),
        Container::new(HostSurface::Viewport, probe(160.0, 96.0)),
        &mut MemoryBackend::new(),
    )
    .unwrap();
    let world = config.map.placed_tiles();
    let mut drawables: Vec<Drawable<'_>> =
        world.iter().map(|&(pos, tile)| Drawable::new(tile, pos)).collect();
    drawables.push(Drawable::new(&config.map.player.sprite, config.map.player.position));

    c.bench_function("render_default_map", |b| {
        b.iter(|| {
            renderer.render(black_box(&drawables), black_box((0, 0)));
        })
    });
}

fn bench_compose(c: &mut Criterion) {
    let config = GameConfig::default();
    let mut renderer: TileRenderer = TileRenderer::new(
        config.renderer.clone(),
        Container::new(HostSurface::Viewport, probe(160.0, 96.0)),
        &mut MemoryBackend::new(),
    )
    .unwrap();
    renderer.render(&[], (0, 0));
    let presenter = Presenter::default();
    let mut fb = FrameBuffer::new(160, 48);

    c.bench_function("compose_160x48", |b| {
        b.iter(|| {
            presenter.compose_into(renderer.context(), &renderer.placement(), &mut fb);
        })
    });
}

fn bench_encode_diff(c: &mut Criterion) {
    let presenter = Presenter::default();
    let config = GameConfig::default();
    let mut renderer: TileRenderer = TileRenderer::new(
        config.renderer.clone(),
        Container::new(HostSurface::Viewport, probe(160.0, 96.0)),
        &mut MemoryBackend::new(),
    )
    .unwrap();
    let prev = FrameBuffer::new(160, 48);
    renderer.render(&[], (0, 0));
    let next = presenter.compose(renderer.context(), &renderer.placement(), 160, 48);
    let mut out = Vec::with_capacity(1 << 20);

    c.bench_function("encode_diff_full_change", |b| {
        b.iter(|| {
            out.clear();
            encode_diff_into(&mut out, black_box(&prev), black_box(&next)).unwrap();
        })
    });
}

fn bench_swipe(c: &mut Criterion) {
    let mut unifier = InputUnifier::new(
        InputParams::default(),
        Container::new(HostSurface::Viewport, probe(500.0, 500.0)),
    );
    let mut t = 0u64;

    c.bench_function("swipe_gesture", |b| {
        b.iter(|| {
            t += 1000;
            unifier.handle_pointer(PointerEvent::down(100.0, 100.0, t));
            black_box(unifier.handle_pointer(PointerEvent::moved(100.0, 160.0, t + 10)));
            unifier.handle_pointer(PointerEvent::up(100.0, 160.0, t + 20));
        })
    });

    let key = KeyDown::repeat("ArrowLeft", 0);
    c.bench_function("key_repeat_lookup", |b| {
        b.iter(|| black_box(unifier.handle_key(black_box(&key))))
    });
}

criterion_group!(
    benches,
    bench_render_frame,
    bench_compose,
    bench_encode_diff,
    bench_swipe
);
criterion_main!(benches);
