#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a Gridstalk session from map and
//! initialization documents and runs a short scripted demonstration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use gridstalk_core::{Direction, Event, GridVec, TileOffset};
use gridstalk_loader::load_boot_data;
use gridstalk_rendering::{GridPresentation, Scene, SpritePresentation};
use gridstalk_system_session::{FrameIntents, Session};
use gridstalk_world::{query, World};

const DEMO_SEED: u64 = 0x6d61_7073;
const DEMO_FRAME: Duration = Duration::from_millis(100);
const TILE_LENGTH: f32 = 32.0;

/// Entry point for the Gridstalk command-line interface.
fn main() -> Result<()> {
    let mut args = std::env::args_os().skip(1);
    let (Some(map_path), Some(init_path)) = (args.next(), args.next()) else {
        bail!("usage: gridstalk-cli <map.json> <initialization.json>");
    };
    let map_path = PathBuf::from(map_path);
    let init_path = PathBuf::from(init_path);

    let boot = load_boot_data(&map_path, &init_path)
        .with_context(|| format!("loading {} + {}", map_path.display(), init_path.display()))?;

    let mut session = Session::new(World::new(), DEMO_SEED);
    let boot_events = session.boot(boot.into_commands());

    println!("{}", query::welcome_banner(session.world()));
    println!(
        "grid {side}x{side}, {opponents} opponent(s), {items} field item(s)",
        side = query::bounds(session.world()).get(),
        opponents = query::opponent_view(session.world()).into_vec().len(),
        items = query::field_items(session.world()).len(),
    );
    report_events(0, &boot_events);

    for (frame, intents) in demo_script().into_iter().enumerate() {
        if session.is_game_over() {
            break;
        }
        let events = session.frame(intents, DEMO_FRAME);
        report_events(frame + 1, &events);
    }

    let scene = compose_scene(session.world());
    println!(
        "scene: {} sprite(s), game over: {}",
        1 + scene.opponents.len() + scene.items.len(),
        scene.game_over,
    );

    Ok(())
}

fn demo_script() -> Vec<FrameIntents> {
    vec![
        FrameIntents {
            step: Some(Direction::Right),
            ..FrameIntents::default()
        },
        FrameIntents {
            pickup_or_drop: true,
            ..FrameIntents::default()
        },
        FrameIntents {
            advance_opponents: true,
            ..FrameIntents::default()
        },
        FrameIntents {
            step: Some(Direction::Up),
            advance_opponents: true,
            ..FrameIntents::default()
        },
    ]
}

fn report_events(frame: usize, events: &[Event]) {
    for event in events {
        match event {
            Event::PlayerMoved { from, to } => {
                println!("[{frame}] player {:?} -> {:?}", from, to);
            }
            Event::OpponentAdvanced { opponent, from, to } => {
                println!(
                    "[{frame}] opponent {} {:?} -> {:?}",
                    opponent.get(),
                    from,
                    to
                );
            }
            Event::ItemPickedUp { item, cell } => {
                println!("[{frame}] picked up item {} at {:?}", item.get(), cell);
            }
            Event::ItemDropped { item, cell } => {
                println!("[{frame}] dropped item {} at {:?}", item.get(), cell);
            }
            Event::GameEnded { cell } => {
                println!("[{frame}] game over at {:?}", cell);
            }
            _ => {}
        }
    }
}

fn compose_scene(world: &World) -> Scene {
    let player = query::player_view(world);
    Scene {
        grid: GridPresentation::new(query::bounds(world).get(), TILE_LENGTH),
        player: SpritePresentation::from_entity(
            player.cell,
            player.facing,
            player.displacement,
            player.sprite.clone(),
            TILE_LENGTH,
        ),
        opponents: query::opponent_view(world)
            .iter()
            .map(|opponent| {
                SpritePresentation::from_entity(
                    opponent.cell,
                    opponent.facing,
                    opponent.displacement,
                    opponent.sprite.clone(),
                    TILE_LENGTH,
                )
            })
            .collect(),
        items: query::field_items(world)
            .into_iter()
            .map(|item| {
                SpritePresentation::from_entity(
                    item.cell,
                    GridVec::ZERO,
                    TileOffset::ZERO,
                    item.sprite,
                    TILE_LENGTH,
                )
            })
            .collect(),
        pack: player
            .pack
            .into_iter()
            .map(|item| {
                SpritePresentation::from_entity(
                    item.cell,
                    GridVec::ZERO,
                    TileOffset::ZERO,
                    item.sprite,
                    TILE_LENGTH,
                )
            })
            .collect(),
        game_over: query::game_over(world),
    }
}
