//! Split-screen demo.
//!
//! ```bash
//! cargo run --release -- --players 4 --map pillars
//! ```
//!
//! Arrow keys drive player 1 (Alt + ←/→ strafes), the others spin in place.
//! Tab toggles the overview map, K knocks out the next living opponent.

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, bail};
use clap::Parser;
use glam::Vec2;
use hecs::Entity;
use log::{LevelFilter, info};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use splitcast::{
    config::RenderConfig,
    engine::{
        DirectionalTextures, FrameRenderer, MAX_PLAYERS, Rect, ViewMode, WallTextures, overview,
    },
    renderer::{RendererExt, Rgba, Software},
    sim::{DT, Facing, PlayerSprites, Position, Scene, StickTextures, TicRunner},
    world::{EMPTY, Texture, TextureBank, TextureId, TileGrid, Viewpoint, maps},
};

#[derive(Parser, Debug)]
#[command(version, about = "Split-screen tile-world raycaster demo")]
struct Args {
    /// Local players sharing the screen.
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=4))]
    players: u8,

    /// Built-in map: pillars | big-empty
    #[arg(short, long, default_value = "pillars")]
    map: String,

    /// TOML render config; defaults are used for missing keys.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start on the top-down map instead of the 3D views.
    #[arg(long)]
    overview: bool,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,
}

const MOVE_SPEED: f32 = 150.0; // world units / second
const TURN_SPEED: f32 = 120.0; // degrees / second
const IDLE_SPIN: f32 = 20.0; // degrees / second for players 2..4
const SPRITE_SIZE: usize = 64;
const OVERVIEW_SCALE: f32 = 24.0;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    TermLogger::init(
        if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        ConfigBuilder::default()
            .set_time_level(LevelFilter::Trace)
            .build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading render config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    let grid = maps::by_name(&args.map).with_context(|| {
        format!(
            "unknown map `{}` (available: {})",
            args.map,
            maps::NAMES.join(", ")
        )
    })?;

    let mut bank = TextureBank::default_with_checker();
    let assets = DemoAssets::build(&mut bank, config.wall_texture_size as usize)?;

    let mut scene = Scene::new(grid, config.tile_size);
    populate(&mut scene, &assets, args.players)?;

    let mut frame = FrameRenderer::new(config.clone(), assets.walls)?;
    let mut sw = Software::default();
    let (w, h) = (config.screen_width as usize, config.screen_height as usize);

    let mut win = Window::new("splitcast", w, h, WindowOptions::default())?;
    win.set_target_fps(60);
    info!(
        "{} player(s) on `{}`, {}x{}, {} rays",
        args.players,
        args.map,
        w,
        h,
        config.effective_ray_count()
    );

    let mode = if args.players == 1 {
        ViewMode::FullScreen { slot: 1 }
    } else {
        ViewMode::Split
    };
    let mut show_overview = args.overview;
    let mut tics = TicRunner::new();

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        if win.is_key_pressed(Key::Tab, KeyRepeat::No) {
            show_overview = !show_overview;
        }
        if win.is_key_pressed(Key::K, KeyRepeat::No) {
            knock_out_next(&mut scene, &assets);
        }
        let input = Input::read(&win);

        /* simulation phase: finishes before any viewport renders */
        tics.pump(|| step(&mut scene, input));

        /* render phase */
        let mut shown = Ok(());
        if show_overview {
            let cmds = overview::draw_overview(&scene, &config, OVERVIEW_SCALE);
            sw.draw_frame(w, h, &cmds, &bank, |fb, w, h| {
                shown = win.update_with_buffer(fb, w, h);
            });
        } else {
            frame.draw(&scene, mode, &bank, &mut sw, |fb, w, h| {
                shown = win.update_with_buffer(fb, w, h);
            })?;
        }
        shown?;

        acc_time += t0.elapsed();
        acc_frames += 1;
        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!("avg frame: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

/* ───────────────────────────── input ─────────────────────────────── */

#[derive(Clone, Copy, Debug, Default)]
struct Input {
    forward: f32, // –1 … +1
    strafe: f32,  // –1 … +1 (left / right)
    turn: f32,    // –1 … +1 (left / right)
}

impl Input {
    fn read(win: &Window) -> Self {
        let mut i = Input::default();
        if win.is_key_down(Key::Up) {
            i.forward += 1.0;
        }
        if win.is_key_down(Key::Down) {
            i.forward -= 1.0;
        }
        let alt = win.is_key_down(Key::LeftAlt) || win.is_key_down(Key::RightAlt);
        let axis = if alt { &mut i.strafe } else { &mut i.turn };
        if win.is_key_down(Key::Left) {
            *axis -= 1.0;
        }
        if win.is_key_down(Key::Right) {
            *axis += 1.0;
        }
        i
    }
}

/* ─────────────────────────── simulation ──────────────────────────── */

/// One fixed tic: player 1 follows the keys, everyone else idles.
fn step(scene: &mut Scene, input: Input) {
    let tile = scene.tile_size();
    for (entity, player) in scene.players() {
        if !player.alive {
            continue;
        }
        let Some(mut vp) = scene.viewpoint(entity) else {
            continue;
        };
        if player.slot == 1 {
            vp.turn(input.turn * TURN_SPEED * DT);
            let from = vp.pos();
            vp.step(input.forward * MOVE_SPEED * DT, input.strafe * MOVE_SPEED * DT);
            if blocked(scene.grid(), vp.pos(), tile) {
                vp = Viewpoint::new(from, vp.facing_degrees());
            }
        } else {
            vp.turn(IDLE_SPIN * DT);
        }
        set_pose(scene, entity, &vp);
    }
}

fn blocked(grid: &TileGrid, pos: Vec2, tile: f32) -> bool {
    match grid.world_to_grid(pos, tile) {
        Some((x, y)) => grid.is_wall(x as i64, y as i64),
        None => true,
    }
}

fn set_pose(scene: &mut Scene, entity: Entity, vp: &Viewpoint) {
    let world = scene.world_mut();
    if let Ok(mut pos) = world.get::<&mut Position>(entity) {
        pos.0 = vp.pos();
    }
    if let Ok(mut facing) = world.get::<&mut Facing>(entity) {
        facing.0 = vp.facing_degrees();
    }
}

fn knock_out_next(scene: &mut Scene, assets: &DemoAssets) {
    let Some((victim, player)) = scene
        .players()
        .into_iter()
        .find(|(_, p)| p.slot != 1 && p.alive)
    else {
        return;
    };
    if scene.kill_player(victim, assets.grave, assets.frame).is_some() {
        info!("player {} is out", player.slot);
        if let Some(p1) = scene.player(1) {
            scene.add_score(p1, 100);
        }
    }
}

/* ───────────────────────────── scene ─────────────────────────────── */

fn populate(scene: &mut Scene, assets: &DemoAssets, players: u8) -> anyhow::Result<()> {
    if players > MAX_PLAYERS {
        bail!("at most {MAX_PLAYERS} players");
    }
    for slot in 1..=players {
        let facing = f32::from(slot - 1) * 90.0;
        let sprites = PlayerSprites {
            textures: assets.player,
            frame: assets.frame,
        };
        scene
            .spawn_player_at_start(slot, facing, sprites)
            .with_context(|| format!("map has no spawn tile for player {slot}"))?;
    }

    // a few props on open cells near the map centre
    let (cx, cy) = (scene.grid().width() / 2, scene.grid().height() / 2);
    let tile = scene.tile_size();
    let mut open = (0..scene.grid().height())
        .flat_map(|y| (0..scene.grid().width()).map(move |x| (x, y)))
        .filter(|&(x, y)| scene.grid().tile_at(x as i64, y as i64) == Some(EMPTY))
        .collect::<Vec<_>>();
    open.sort_by_key(|&(x, y)| x.abs_diff(cx) + y.abs_diff(cy));

    let mut cells = open.into_iter();
    for sticks in [1, 3, 5] {
        if let Some((x, y)) = cells.next() {
            scene.spawn_dynamite(
                TileGrid::cell_center(x, y, tile),
                sticks,
                assets.sticks,
                assets.frame,
            );
        }
    }
    if let Some((x, y)) = cells.next() {
        scene.spawn_pickup(TileGrid::cell_center(x, y, tile), assets.pickup, assets.frame);
    }
    let blast: Vec<_> = cells.by_ref().take(3).collect();
    if !blast.is_empty() {
        scene.spawn_explosion(blast, assets.explosion, assets.frame);
    }
    Ok(())
}

/* ──────────────────────────── textures ───────────────────────────── */

struct DemoAssets {
    walls: WallTextures,
    player: DirectionalTextures,
    sticks: StickTextures,
    explosion: TextureId,
    pickup: TextureId,
    grave: TextureId,
    frame: Rect,
}

impl DemoAssets {
    fn build(bank: &mut TextureBank, wall_size: usize) -> anyhow::Result<Self> {
        let n = SPRITE_SIZE;
        let mut add = |name: &str, tex: Texture| {
            bank.insert(name, tex)
                .with_context(|| format!("registering texture {name}"))
        };

        let walls = WallTextures {
            soft: add(
                "SOFTWALL",
                Texture::bricks("SOFTWALL", wall_size, 8, 0xFF_B5651D, 0xFF_5C3A1E),
            )?,
            hard: add(
                "HARDWALL",
                Texture::bricks("HARDWALL", wall_size, 4, 0xFF_707070, 0xFF_303030),
            )?,
        };

        let body = 0xFF_6B4226;
        let player = DirectionalTextures {
            front: add("MOLE_F", figure("MOLE_F", n, body, Some(0.5)))?,
            side_front: add("MOLE_SF", figure("MOLE_SF", n, body, Some(0.7)))?,
            side: add("MOLE_S", figure("MOLE_S", n, body, Some(0.85)))?,
            side_back: add("MOLE_SB", figure("MOLE_SB", n, 0xFF_5A3820, Some(0.9)))?,
            back: add("MOLE_B", figure("MOLE_B", n, 0xFF_5A3820, None))?,
        };

        let sticks = StickTextures {
            one: add("DYN1", figure("DYN1", n, 0xFF_D02020, None))?,
            three: add("DYN3", figure("DYN3", n, 0xFF_E04040, Some(0.3)))?,
            five: add("DYN5", figure("DYN5", n, 0xFF_F06060, Some(0.5)))?,
        };

        Ok(Self {
            walls,
            player,
            sticks,
            explosion: add("BLAST", figure("BLAST", n, 0xFF_FFB000, Some(0.5)))?,
            pickup: add("PICKUP", figure("PICKUP", n, 0xFF_20C0F0, None))?,
            grave: add("GRAVE", figure("GRAVE", n, 0xFF_A0A0A0, Some(0.5)))?,
            frame: Rect::new(0.0, 0.0, n as f32, n as f32),
        })
    }
}

/// Disc of `body` on a transparent square, with an optional white mark at
/// horizontal position `mark` (0..1) so facing views can be told apart.
fn figure(name: &str, size: usize, body: Rgba, mark: Option<f32>) -> Texture {
    let r = size as f32 * 0.5;
    let mut pixels = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let d = Vec2::new(x as f32 + 0.5 - r, y as f32 + 0.5 - r);
            let px = if d.length() > r {
                0x00_000000
            } else if mark.is_some_and(|m| {
                (x as f32 - m * size as f32).abs() < size as f32 * 0.08 && y < size / 3
            }) {
                0xFF_FFFFFF
            } else {
                body
            };
            pixels.push(px);
        }
    }
    Texture {
        name: name.to_string(),
        w: size,
        h: size,
        pixels,
    }
}
