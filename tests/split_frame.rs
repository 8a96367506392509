use glam::vec2;
use splitcast::{
    config::RenderConfig,
    engine::{DirectionalTextures, FrameRenderer, Rect, SplitLayout, ViewMode, WallTextures},
    renderer::{DrawCommand, RendererExt, Software},
    sim::{PlayerSprites, Scene, StickTextures},
    world::{Texture, TextureBank, maps},
};

const EPS: f32 = 1e-3;

struct Fixture {
    bank: TextureBank,
    scene: Scene,
    frame: FrameRenderer,
    config: RenderConfig,
}

fn fixture(players: u8) -> Fixture {
    let config = RenderConfig {
        screen_width: 320,
        screen_height: 200,
        ..RenderConfig::default()
    };

    let mut bank = TextureBank::default_with_checker();
    let size = config.wall_texture_size as usize;
    let soft = bank
        .insert("SOFT", Texture::bricks("SOFT", size, 8, 0xFF_B04020, 0xFF_402010))
        .unwrap();
    let hard = bank
        .insert("HARD", Texture::solid("HARD", size, size, 0xFF_606060))
        .unwrap();
    let mole = bank
        .insert("MOLE", Texture::solid("MOLE", 8, 8, 0xFF_00FF00))
        .unwrap();
    let dyn_tex = bank
        .insert("DYN", Texture::solid("DYN", 8, 8, 0xFF_FF0000))
        .unwrap();

    let frame_rect = Rect::new(0.0, 0.0, 8.0, 8.0);
    let mut scene = Scene::new(maps::pillars(), config.tile_size);
    let sprites = PlayerSprites {
        textures: DirectionalTextures {
            front: mole,
            back: mole,
            side: mole,
            side_front: mole,
            side_back: mole,
        },
        frame: frame_rect,
    };
    for slot in 1..=players {
        scene
            .spawn_player_at_start(slot, f32::from(slot) * 45.0, sprites)
            .unwrap();
    }
    let p1 = scene.grid().spawn_point(1, config.tile_size).unwrap();
    scene.spawn_dynamite(
        p1 + vec2(config.tile_size, 0.0),
        5,
        StickTextures {
            one: dyn_tex,
            three: dyn_tex,
            five: dyn_tex,
        },
        frame_rect,
    );

    let frame = FrameRenderer::new(config.clone(), WallTextures { soft, hard }).unwrap();
    Fixture {
        bank,
        scene,
        frame,
        config,
    }
}

/// Split the command list at each score line: one chunk per viewport.
fn per_viewport(cmds: &[DrawCommand]) -> Vec<&[DrawCommand]> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in cmds.iter().enumerate() {
        if matches!(c, DrawCommand::Text { .. }) {
            out.push(&cmds[start..=i]);
            start = i + 1;
        }
    }
    out
}

#[test]
fn four_way_frame_stays_inside_each_quadrant() {
    let mut fx = fixture(4);
    let cmds = fx.frame.build(&fx.scene, ViewMode::Split).unwrap();
    let layout = SplitLayout::new(4, 320.0, 200.0).unwrap();

    let chunks = per_viewport(&cmds);
    assert_eq!(chunks.len(), 4);

    for (chunk, vp) in chunks.iter().zip(layout.viewports()) {
        let region = vp.region;
        let mut blits = 0;
        for c in *chunk {
            if let DrawCommand::Blit { target, source, .. } = c {
                blits += 1;
                assert!(target.x >= region.x - EPS, "{target:?} left of {region:?}");
                assert!(target.right() <= region.right() + EPS);
                assert!(target.y >= region.y - EPS);
                assert!(target.bottom() <= region.bottom() + EPS);
                assert!(source.w > 0.0 && source.h > 0.0);
            }
        }
        assert!(blits > 0, "viewport {} drew nothing", vp.index);
        assert!(matches!(
            chunk.last(),
            Some(DrawCommand::Text { text, .. }) if text == "Score: 0"
        ));
    }

    // split lines close the frame
    let lines: Vec<_> = cmds[cmds.len() - 2..].to_vec();
    assert!(lines.iter().all(|c| matches!(
        c,
        DrawCommand::Fill { color, .. } if *color == fx.config.split_line_color
    )));
}

#[test]
fn four_way_frame_rasterises() {
    let mut fx = fixture(4);
    let mut sw = Software::default();
    let mut seen = (0, 0);
    fx.frame
        .draw(&fx.scene, ViewMode::Split, &fx.bank, &mut sw, |fb, w, h| {
            assert_eq!(fb.len(), w * h);
            seen = (w, h);
        })
        .unwrap();
    assert_eq!(seen, (320, 200));

    // centre cross is the split line colour
    assert_eq!(sw.pixel(160, 50), Some(fx.config.split_line_color));
    assert_eq!(sw.pixel(80, 100), Some(fx.config.split_line_color));
    // something textured landed in every quadrant
    for (x0, y0) in [(0, 0), (160, 0), (0, 100), (160, 100)] {
        let painted = (y0 + 5..y0 + 95)
            .flat_map(|y| (x0 + 5..x0 + 155).map(move |x| (x, y)))
            .filter_map(|(x, y)| sw.pixel(x, y))
            .any(|px| px != fx.config.sky_color && px != fx.config.floor_color);
        assert!(painted, "quadrant at ({x0}, {y0}) has no walls");
    }
}

#[test]
fn every_viewpoint_sees_the_same_snapshot() {
    let mut fx = fixture(2);
    let first = fx.frame.build(&fx.scene, ViewMode::Split).unwrap();
    let again = fx.frame.build(&fx.scene, ViewMode::Split).unwrap();
    assert_eq!(first, again);

    // knock a wall out between frames: the next frame changes, as a whole
    let grid = fx.scene.grid();
    let (w, h) = (grid.width(), grid.height());
    let soft = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .find(|&(x, y)| grid.tile_at(x as i64, y as i64) == Some(1))
        .unwrap();
    assert!(fx.scene.grid_mut().destroy_wall(soft.0, soft.1));
    let after = fx.frame.build(&fx.scene, ViewMode::Split).unwrap();
    assert_eq!(per_viewport(&after).len(), 2);
}

#[test]
fn single_player_full_screen() {
    let mut fx = fixture(1);
    let cmds = fx
        .frame
        .build(&fx.scene, ViewMode::FullScreen { slot: 1 })
        .unwrap();
    assert_eq!(
        cmds[0],
        DrawCommand::Fill {
            rect: Rect::new(0.0, 0.0, 320.0, 100.0),
            color: fx.config.sky_color,
        }
    );
    assert!(matches!(cmds.last(), Some(DrawCommand::Text { .. })));
    // the lit bundle one tile ahead of player 1 is in view
    let red = fx.bank.id("DYN").unwrap();
    let sees_dynamite = cmds
        .iter()
        .any(|c| matches!(c, DrawCommand::Blit { texture, .. } if *texture == red));
    // player 1 faces 45°; the bundle sits due east, inside the 90° cone
    assert!(sees_dynamite);
}
