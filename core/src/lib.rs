#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridstalk engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::ops::Add;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Gridstalk.";

/// Location of a single grid cell expressed as signed tile coordinates.
///
/// Coordinates are signed because the move validator only rejects targets at
/// or beyond the upper bound; cells below the origin remain representable.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridVec {
    /// Horizontal tile component.
    pub x: i32,
    /// Vertical tile component.
    pub y: i32,
}

impl GridVec {
    /// The zero vector.
    pub const ZERO: GridVec = GridVec::new(0, 0);

    /// Creates a new grid vector from its components.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the unit vector of per-axis signs.
    #[must_use]
    pub const fn signum_step(self) -> Self {
        Self {
            x: self.x.signum(),
            y: self.y.signum(),
        }
    }

    /// Reports whether both components are zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl Add for GridVec {
    type Output = GridVec;

    fn add(self, other: GridVec) -> GridVec {
        GridVec::new(self.x + other.x, self.y + other.y)
    }
}

/// Side length of the square grid measured in whole tiles.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridBounds(u32);

impl GridBounds {
    /// Creates a new bounds wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the side length in tiles.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the coordinate lies at or beyond the upper bound on
    /// either axis. Coordinates below zero are deliberately not flagged.
    #[must_use]
    pub fn exceeds(&self, position: GridVec) -> bool {
        let limit = i64::from(self.0);
        i64::from(position.x) >= limit || i64::from(position.y) >= limit
    }
}

/// Directional intents exposed to input adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward increasing row indices.
    Up,
    /// Movement toward decreasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Unit step associated with the directional intent.
    #[must_use]
    pub const fn step(self) -> GridVec {
        match self {
            Self::Up => GridVec::new(0, 1),
            Self::Down => GridVec::new(0, -1),
            Self::Left => GridVec::new(-1, 0),
            Self::Right => GridVec::new(1, 0),
        }
    }
}

/// Health carried by an entity.
///
/// Present for the eventual combat extension; no core rule mutates it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Health(i32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric health value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

/// Remaining visual tween magnitude per axis, measured in tiles.
///
/// Components are nonnegative magnitudes; the sign opposite the motion is
/// reconstructed from the owning entity's facing by the presentation layer.
/// The offset never influences collision or logical position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TileOffset {
    /// Horizontal tween magnitude in tiles.
    pub x: f32,
    /// Vertical tween magnitude in tiles.
    pub y: f32,
}

impl TileOffset {
    /// An offset with both axes settled.
    pub const ZERO: TileOffset = TileOffset::new(0.0, 0.0);

    /// Creates a new offset from per-axis magnitudes.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// One full tile owed along the axes the provided step moved.
    #[must_use]
    pub fn owed_for_step(step: GridVec) -> Self {
        Self {
            x: step.x.unsigned_abs() as f32,
            y: step.y.unsigned_abs() as f32,
        }
    }

    /// Returns the offset after `elapsed_seconds` of decay at the provided
    /// rate, floored at zero on each axis.
    #[must_use]
    pub fn decayed(self, elapsed_seconds: f32, seconds_per_tile: f32) -> Self {
        if seconds_per_tile <= 0.0 {
            return self;
        }
        let delta = elapsed_seconds / seconds_per_tile;
        Self {
            x: (self.x - delta).max(0.0),
            y: (self.y - delta).max(0.0),
        }
    }

    /// Reports whether both axes have fully settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Unique identifier assigned to an opponent.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct OpponentId(u32);

impl OpponentId {
    /// Creates a new opponent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a field item.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One static collision/visual plane of the map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Whether nonzero cells in this layer block movement.
    pub collidable: bool,
    /// Flat occupancy grid of `bounds * bounds` cells; nonzero means occupied.
    ///
    /// Indexing convention, preserved for bundled map assets:
    /// `index = (bounds * bounds - 1) - y * bounds + x`.
    pub cells: Vec<u32>,
}

/// Load-boundary record describing one entity to spawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Initial grid cell.
    pub position: GridVec,
    /// Initial facing used for sprite selection.
    pub facing: GridVec,
    /// Carried health value.
    pub health: Health,
    /// Seconds required to visually cross one tile.
    pub seconds_per_tile: f32,
    /// Whether other actors can share this entity's cell.
    pub collidable: bool,
    /// Asset reference consumed only by rendering backends.
    pub sprite: String,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's square grid and static collision layers.
    ConfigureGrid {
        /// Side length of the grid measured in tiles.
        bounds: GridBounds,
        /// Static layers in draw order.
        layers: Vec<LayerSpec>,
    },
    /// Places the player into the world.
    SpawnPlayer {
        /// Initial player record.
        descriptor: EntityDescriptor,
    },
    /// Adds one opponent to the world.
    SpawnOpponent {
        /// Initial opponent record.
        descriptor: EntityDescriptor,
    },
    /// Lays one item on the field.
    SpawnItem {
        /// Initial item record.
        descriptor: EntityDescriptor,
    },
    /// Requests a single-step player move.
    MovePlayer {
        /// Unit step the player attempts.
        step: GridVec,
    },
    /// Requests the player's pickup-or-drop action.
    PickupOrDrop,
    /// Requests that an opponent advance a single chase step.
    StepOpponent {
        /// Identifier of the opponent attempting to move.
        opponent: OpponentId,
        /// Unit step the opponent attempts.
        step: GridVec,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Real time elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the grid and static layers were configured.
    GridConfigured {
        /// Side length of the configured grid.
        bounds: GridBounds,
    },
    /// Confirms that the player entered the world.
    PlayerSpawned {
        /// Cell the player occupies after spawning.
        cell: GridVec,
    },
    /// Confirms that an opponent entered the world.
    OpponentSpawned {
        /// Identifier assigned to the opponent.
        opponent: OpponentId,
        /// Cell the opponent occupies after spawning.
        cell: GridVec,
    },
    /// Confirms that an item was laid on the field.
    ItemSpawned {
        /// Identifier assigned to the item.
        item: ItemId,
        /// Cell the item occupies after spawning.
        cell: GridVec,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: GridVec,
        /// Cell the player occupies after the move.
        to: GridVec,
    },
    /// Confirms that an opponent advanced one chase step.
    OpponentAdvanced {
        /// Identifier of the opponent that advanced.
        opponent: OpponentId,
        /// Cell the opponent occupied before moving.
        from: GridVec,
        /// Cell the opponent occupies after the move.
        to: GridVec,
    },
    /// Confirms that a field item moved into the player's pack.
    ItemPickedUp {
        /// Identifier of the item that was picked up.
        item: ItemId,
        /// Cell the item was lifted from.
        cell: GridVec,
    },
    /// Confirms that a pack item was laid back on the field.
    ItemDropped {
        /// Identifier of the item that was dropped.
        item: ItemId,
        /// Cell the item now occupies.
        cell: GridVec,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of real time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces the terminal game-over transition. Emitted exactly once.
    GameEnded {
        /// Cell where an opponent caught the player.
        cell: GridVec,
    },
}
