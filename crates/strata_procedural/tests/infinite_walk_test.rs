//! # Infinite Walk Integration Test
//!
//! Proves a camera can pan forever in both directions, with ground under
//! every column and one view buffer reused for the whole trip.

use strata_procedural::{BlockTable, Camera, World, WorldSeed};

/// Screen the walk renders to.
const SCREEN: (u32, u32) = (640, 360);

/// Returns true if some column cell in `[-64, 64)` is grass.
fn has_surface(world: &mut World, x: i32) -> bool {
    let grass = world.palette().grass;
    (-64..64).any(|y| world.get_block(x, y) == grass)
}

/// Test: Walk 2,000 blocks east with a following camera.
#[test]
fn test_walk_east_2000_blocks() {
    let mut world = World::new(WorldSeed::new(42.0), BlockTable::standard()).unwrap();
    let mut camera = Camera::default();

    for step in 0..2_000 {
        camera.set((f64::from(step), 0.0));
        let rect = camera.visible_blocks(SCREEN.0, SCREEN.1);
        let window = world.view_rect(rect).unwrap();

        let (ax, ay) = window.alignment_offset();
        assert!((0..16).contains(&ax) && (0..16).contains(&ay));
        assert!(window.get_world(rect.start.0, rect.start.1).is_some());
        assert!(window.get_world(rect.end.0 - 1, rect.end.1 - 1).is_some());

        if step % 100 == 0 {
            assert!(has_surface(&mut world, step), "No surface at x={step}");
        }
    }

    let stats = world.stats();
    println!("Loaded chunks: {}", stats.chunks_loaded);
    println!("Buffer reallocations: {}", stats.view.reallocations);

    assert_eq!(stats.view.views_assembled, 2_000);
    // Buffer shape depends on the rectangle's extent only
    assert_eq!(stats.view.reallocations, 1);
}

/// Test: Walk west into negative coordinates.
#[test]
fn test_walk_west_into_negatives() {
    let mut world = World::new(WorldSeed::DEVELOPMENT, BlockTable::standard()).unwrap();

    for x in (-3_000..0).rev().step_by(37) {
        assert!(has_surface(&mut world, x), "No surface at x={x}");
    }
    assert!(world.chunk_count() > 0);
}

/// Test: Eased camera movement only ever asks for valid rectangles.
#[test]
fn test_eased_camera_walk() {
    let mut world = World::new(WorldSeed::new(-8.75), BlockTable::standard()).unwrap();
    let mut camera = Camera::default();
    camera.move_to((-500.0, 40.0));

    for _ in 0..300 {
        camera.update();
        let rect = camera.visible_blocks(SCREEN.0, SCREEN.1);
        let window = world.view_rect(rect).unwrap();

        let (px, py) = camera.position_in(&window);
        assert!(px >= 0.0 && px < f64::from(u32::try_from(window.width()).unwrap()));
        assert!(py >= 0.0 && py < f64::from(u32::try_from(window.height()).unwrap()));
    }
    assert!(camera.pos.0 < -400.0);
}

/// Test: Revisiting explored ground generates nothing new.
#[test]
fn test_return_trip_reuses_chunks() {
    let mut world = World::new(WorldSeed::new(7.0), BlockTable::standard()).unwrap();

    for x in (0..1_000).step_by(16) {
        world.view((x, -32), (x + 40, 32)).unwrap();
    }
    let explored = world.chunk_count();
    let generated = world.stats().store.chunks_generated;

    for x in (0..960).rev().step_by(16) {
        world.view((x, -32), (x + 40, 32)).unwrap();
    }
    assert_eq!(world.chunk_count(), explored);
    assert_eq!(world.stats().store.chunks_generated, generated);
}
