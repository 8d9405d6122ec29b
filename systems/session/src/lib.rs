#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestrator that drives one running game.
//!
//! A session owns the authoritative world and the pursuit system and applies
//! each frame's edge-triggered intents in a fixed order: player move, then
//! pickup/drop, then opponent chase steps, then the displacement tick. The
//! world itself enforces the terminal game-over gate, so orchestration stays
//! a thin deterministic sequencing layer.

use std::time::Duration;

use gridstalk_core::{Command, Direction, Event};
use gridstalk_system_pursuit::Pursuit;
use gridstalk_world::{self as world, query, World};

/// Edge-triggered intents gathered by an input adapter for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameIntents {
    /// At most one directional move resolved this frame.
    pub step: Option<Direction>,
    /// Whether the pickup/drop action fired this frame.
    pub pickup_or_drop: bool,
    /// Whether the advance-opponents action fired this frame.
    pub advance_opponents: bool,
}

/// Owns the world and sequences one tick per frame.
#[derive(Debug)]
pub struct Session {
    world: World,
    pursuit: Pursuit,
}

impl Session {
    /// Creates a session around a booted world, seeding the chase tie-break.
    #[must_use]
    pub fn new(world: World, seed: u64) -> Self {
        Self {
            world,
            pursuit: Pursuit::with_seed(seed),
        }
    }

    /// Applies a boot command batch, returning the events it produced.
    pub fn boot(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    /// Runs one frame: the fixed tick order over the provided intents.
    pub fn frame(&mut self, intents: FrameIntents, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();

        if let Some(direction) = intents.step {
            world::apply(
                &mut self.world,
                Command::MovePlayer {
                    step: direction.step(),
                },
                &mut events,
            );
        }

        if intents.pickup_or_drop {
            world::apply(&mut self.world, Command::PickupOrDrop, &mut events);
        }

        if intents.advance_opponents {
            let player = query::player_view(&self.world);
            let opponents = query::opponent_view(&self.world);
            let mut commands = Vec::new();
            self.pursuit.handle(&player, &opponents, &mut commands);
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        events
    }

    /// Read-only access to the owned world for queries and rendering.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Reports whether the session reached its terminal state.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::game_over(&self.world)
    }
}
