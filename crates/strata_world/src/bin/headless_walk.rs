//! # Headless Walk
//!
//! Drives a player through the world without rendering:
//!
//! 1. Fall onto the starting platform
//! 2. Walk right across several chunks, jumping when blocked
//! 3. Mine the block in front, then place it back
//! 4. Step onto a portal and enter the alternate world
//!
//! Pass a TOML config path as the first argument to override defaults.

use std::time::Instant;

use strata_world::{
    BlockKind, CollisionQuery, KinematicBody, MiningSession, Tool, World, WorldConfig,
    WorldResult, CHUNK_SIZE,
};

const DT: f32 = 1.0 / 60.0;
const PLAYER_SIZE: f32 = 64.0;
const WALK_TICKS: u32 = 600;

fn main() -> WorldResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => WorldConfig::from_toml_file(path)?,
        None => WorldConfig::default(),
    };
    let block_size = config.block_size as f32;
    let render_distance = config.render_distance;

    println!("=== STRATA HEADLESS WALK ===");
    println!("seed: {:#x}", config.seed);

    let mut world = World::new(config.clone());
    let start = Instant::now();
    world.update_rendered_chunks(0.0, 0.0, render_distance);
    println!(
        "initial window: {} chunks in {:?}",
        world.chunk_count(),
        start.elapsed()
    );

    // =========================================================================
    // STEP 1: Fall onto the platform
    // =========================================================================
    let mut player = KinematicBody::new(
        block_size,
        -PLAYER_SIZE * 2.0,
        PLAYER_SIZE,
        PLAYER_SIZE,
        config.motion,
    );
    for _ in 0..240 {
        player.step(&world, DT);
        if player.is_grounded() {
            break;
        }
    }
    println!(
        "landed: {} at ({:.1}, {:.1})",
        player.is_grounded(),
        player.x,
        player.y
    );

    // =========================================================================
    // STEP 2: Walk right
    // =========================================================================
    let mut jumps = 0;
    let mut generated = 0;
    let mut evicted = 0;
    for _ in 0..WALK_TICKS {
        player.walk(1.0, DT);
        let outcome = player.step(&world, DT);
        if outcome.hit_wall && player.jump() {
            jumps += 1;
        }
        let update = world.update_rendered_chunks(player.x, player.y, render_distance);
        generated += update.generated;
        evicted += update.evicted;
    }
    let chunks_crossed = (player.x / (block_size * CHUNK_SIZE as f32)).floor();
    println!(
        "walked to x = {:.1} ({chunks_crossed} chunks), {jumps} jumps, {generated} generated, {evicted} evicted",
        player.x
    );

    // =========================================================================
    // STEP 3: Mine and place
    // =========================================================================
    let feet_x = ((player.x + player.width / 2.0) / block_size).floor() as i32;
    let below_y = (player.bottom() / block_size).floor() as i32;
    match MiningSession::start(&world, player.x, player.y, feet_x, below_y, Tool::WoodDrill) {
        Some(mut session) => {
            let mut seconds = 0.0;
            while !session.tick(DT) {
                seconds += DT;
            }
            let kind = session.kind();
            match session.finish(&mut world) {
                Some(block) => println!("mined {} in {seconds:.2}s", block.kind),
                None => println!("mining {kind} failed"),
            }
            let placed =
                world.place_block_within_reach(player.x, player.y, feet_x, below_y, kind);
            println!("placed it back: {placed}");
        }
        None => println!("nothing minable under the player"),
    }

    // =========================================================================
    // STEP 4: Portal
    // =========================================================================
    let portal_x = feet_x + 2;
    let portal_y = (player.y / block_size).floor() as i32;
    world.set_block_at(portal_x, portal_y, BlockKind::Portal);
    player.x = portal_x as f32 * block_size;
    if world.check_portal_collision(player.x, player.y, player.width, player.height) {
        let (x, y) = world.enter_alternate_world(player.height);
        player.place_at(x, y);
        for _ in 0..240 {
            player.step(&world, DT);
            world.update_rendered_chunks(player.x, player.y, render_distance);
            if player.is_grounded() {
                break;
            }
        }
        let stats = world.stats();
        println!(
            "alternate world: {:?}, {} chunks, {} blocks, player grounded at y = {:.1}",
            stats.mode, stats.resident_chunks, stats.total_blocks, player.y
        );
    }

    println!("done in {:?}", start.elapsed());
    Ok(())
}
