use std::alloc::{GlobalAlloc, Layout, System};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tui_tiles::core::{Container, Host, HostSurface, SurfaceProbe};
use tui_tiles::term::{FrameBuffer, MemoryBackend, Presenter, TileRenderer};
use tui_tiles::types::Drawable;
use tui_tiles::GameConfig;

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn render_and_compose_are_allocation_free_after_warmup() {
    let config = GameConfig::default();
    let host: Rc<dyn SurfaceProbe> = Rc::new(Host::new(80.0, 46.0));
    let mut renderer: TileRenderer = TileRenderer::new(
        config.renderer.clone(),
        Container::new(HostSurface::Viewport, host),
        &mut MemoryBackend::new(),
    )
    .unwrap();
    let presenter = Presenter::default();
    let mut fb = FrameBuffer::new(80, 24);

    let world = config.map.placed_tiles();
    let mut drawables: Vec<Drawable<'_>> = Vec::with_capacity(world.len() + 1);
    let mut frame = |player: (i32, i32)| {
        drawables.clear();
        drawables.extend(world.iter().map(|&(pos, tile)| Drawable::new(tile, pos)));
        drawables.push(Drawable::new(&config.map.player.sprite, player));
        renderer.render(&drawables, (player.0 - 6, player.1 - 4));
        presenter.compose_into(renderer.context(), &renderer.placement(), &mut fb);
    };

    // Warm-up.
    frame((2, 1));

    let allocs = with_alloc_counting(|| {
        for i in 0..20 {
            frame((2 + i % 10, 1 + i % 5));
        }
    });

    assert_eq!(allocs, 0);
}
