#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Gridstalk.
//!
//! The world owns every mutable simulation value: the static collision
//! layers, the player, the opponents, the field items, and the terminal
//! game-over flag. Adapters and systems mutate it exclusively through
//! [`apply`] and observe it exclusively through [`query`].

use gridstalk_core::{
    Command, EntityDescriptor, Event, GridBounds, GridVec, Health, ItemId, LayerSpec, OpponentId,
    TileOffset, WELCOME_BANNER,
};

const DEFAULT_GRID_SIDE: u32 = 16;
const DEFAULT_SECONDS_PER_TILE: f32 = 0.25;

/// Represents the authoritative Gridstalk world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    bounds: GridBounds,
    layers: Vec<Layer>,
    player: Player,
    opponents: Vec<Opponent>,
    items: Vec<Item>,
    game_over: bool,
    next_opponent_id: u32,
    next_item_id: u32,
}

impl World {
    /// Creates a new Gridstalk world ready for configuration and spawning.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            bounds: GridBounds::new(DEFAULT_GRID_SIDE),
            layers: Vec::new(),
            player: Player::from_descriptor(&default_player_descriptor()),
            opponents: Vec::new(),
            items: Vec::new(),
            game_over: false,
            next_opponent_id: 0,
            next_item_id: 0,
        }
    }

    /// Decides whether an actor may occupy `target`.
    ///
    /// The check runs against the pre-move snapshot: grid upper bounds,
    /// collidable static layers, field items (unless ignored), the player's
    /// cell, and every opponent's cell. Cells below the origin carry no
    /// lower-bound rejection.
    fn is_valid_move(&self, target: GridVec, ignore_item_collision: bool) -> bool {
        if self.bounds.exceeds(target) {
            return false;
        }

        for layer in &self.layers {
            if layer.blocks(target, self.bounds) {
                return false;
            }
        }

        // Inverted polarity preserved from the shipped map assets: an item
        // whose collidable flag is OFF is the one that blocks.
        if !ignore_item_collision
            && self
                .items
                .iter()
                .any(|item| !item.collidable && item.position == target)
        {
            return false;
        }

        if target == self.player.position {
            return false;
        }

        if self
            .opponents
            .iter()
            .any(|opponent| opponent.position == target)
        {
            return false;
        }

        true
    }

    fn pickup_or_drop(&mut self, out_events: &mut Vec<Event>) {
        let cell = self.player.position;

        // Forward scan; the last coincident item wins the pickup.
        let mut picked: Option<usize> = None;
        for (index, item) in self.items.iter().enumerate() {
            if item.position == cell {
                picked = Some(index);
            }
        }

        if let Some(index) = picked {
            let item = self.items.swap_remove(index);
            out_events.push(Event::ItemPickedUp {
                item: item.id,
                cell,
            });
            self.player.pack.push(item);
            return;
        }

        if self.player.pack.is_empty() {
            return;
        }

        let mut item = self.player.pack.swap_remove(0);
        item.position = cell;
        out_events.push(Event::ItemDropped {
            item: item.id,
            cell,
        });
        self.items.push(item);
    }

    fn advance_displacements(&mut self, elapsed_seconds: f32) {
        self.player.displacement = self
            .player
            .displacement
            .decayed(elapsed_seconds, self.player.seconds_per_tile);
        for opponent in &mut self.opponents {
            opponent.displacement = opponent
                .displacement
                .decayed(elapsed_seconds, opponent.seconds_per_tile);
        }
    }

    fn player_caught(&self) -> Option<GridVec> {
        self.opponents
            .iter()
            .find(|opponent| opponent.position == self.player.position)
            .map(|opponent| opponent.position)
    }

    fn evaluate_game_over(&mut self, out_events: &mut Vec<Event>) {
        if self.game_over {
            return;
        }
        if let Some(cell) = self.player_caught() {
            self.game_over = true;
            out_events.push(Event::GameEnded { cell });
        }
    }

    fn opponent_index(&self, opponent: OpponentId) -> Option<usize> {
        self.opponents.iter().position(|entry| entry.id == opponent)
    }

    fn allocate_opponent_id(&mut self) -> OpponentId {
        let id = OpponentId::new(self.next_opponent_id);
        self.next_opponent_id = self.next_opponent_id.saturating_add(1);
        id
    }

    fn allocate_item_id(&mut self) -> ItemId {
        let id = ItemId::new(self.next_item_id);
        self.next_item_id = self.next_item_id.saturating_add(1);
        id
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { bounds, layers } => {
            world.bounds = bounds;
            world.layers = layers.into_iter().map(Layer::from_spec).collect();
            out_events.push(Event::GridConfigured { bounds });
        }
        Command::SpawnPlayer { descriptor } => {
            world.player = Player::from_descriptor(&descriptor);
            out_events.push(Event::PlayerSpawned {
                cell: world.player.position,
            });
            world.evaluate_game_over(out_events);
        }
        Command::SpawnOpponent { descriptor } => {
            let id = world.allocate_opponent_id();
            let opponent = Opponent::from_descriptor(id, &descriptor);
            out_events.push(Event::OpponentSpawned {
                opponent: id,
                cell: opponent.position,
            });
            world.opponents.push(opponent);
            world.evaluate_game_over(out_events);
        }
        Command::SpawnItem { descriptor } => {
            let id = world.allocate_item_id();
            let item = Item::from_descriptor(id, &descriptor);
            out_events.push(Event::ItemSpawned {
                item: id,
                cell: item.position,
            });
            world.items.push(item);
        }
        Command::MovePlayer { step } => {
            if world.game_over {
                return;
            }
            let from = world.player.position;
            let target = from + step;
            if !world.is_valid_move(target, false) {
                return;
            }
            commit_step(
                &mut world.player.position,
                &mut world.player.facing,
                &mut world.player.displacement,
                step,
            );
            out_events.push(Event::PlayerMoved { from, to: target });
            world.evaluate_game_over(out_events);
        }
        Command::PickupOrDrop => {
            if world.game_over {
                return;
            }
            world.pickup_or_drop(out_events);
        }
        Command::StepOpponent { opponent, step } => {
            if world.game_over {
                return;
            }
            let Some(index) = world.opponent_index(opponent) else {
                return;
            };
            let from = world.opponents[index].position;
            let target = from + step;
            if !world.is_valid_move(target, true) {
                return;
            }
            let entry = &mut world.opponents[index];
            commit_step(
                &mut entry.position,
                &mut entry.facing,
                &mut entry.displacement,
                step,
            );
            out_events.push(Event::OpponentAdvanced {
                opponent,
                from,
                to: target,
            });
            world.evaluate_game_over(out_events);
        }
        Command::Tick { dt } => {
            world.advance_displacements(dt.as_secs_f32());
            out_events.push(Event::TimeAdvanced { dt });
            world.evaluate_game_over(out_events);
        }
    }
}

fn commit_step(
    position: &mut GridVec,
    facing: &mut GridVec,
    displacement: &mut TileOffset,
    step: GridVec,
) {
    *position = *position + step;
    *facing = step;
    *displacement = TileOffset::owed_for_step(step);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use gridstalk_core::{GridBounds, GridVec, Health, ItemId, OpponentId, TileOffset};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Side length of the configured square grid.
    #[must_use]
    pub fn bounds(world: &World) -> GridBounds {
        world.bounds
    }

    /// Reports whether the terminal game-over state has been entered.
    #[must_use]
    pub fn game_over(world: &World) -> bool {
        world.game_over
    }

    /// Decides whether an actor may occupy `target` in the current snapshot.
    ///
    /// Pure predicate with no side effects; see the move validator rules on
    /// the world itself.
    #[must_use]
    pub fn is_valid_move(world: &World, target: GridVec, ignore_item_collision: bool) -> bool {
        world.is_valid_move(target, ignore_item_collision)
    }

    /// Captures a read-only snapshot of the player.
    #[must_use]
    pub fn player_view(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.position,
            facing: world.player.facing,
            health: world.player.health,
            displacement: world.player.displacement,
            seconds_per_tile: world.player.seconds_per_tile,
            sprite: world.player.sprite.clone(),
            pack: world.player.pack.iter().map(item_snapshot).collect(),
        }
    }

    /// Captures a read-only view of the opponents in deterministic order.
    #[must_use]
    pub fn opponent_view(world: &World) -> OpponentView {
        let mut snapshots: Vec<OpponentSnapshot> = world
            .opponents
            .iter()
            .map(|opponent| OpponentSnapshot {
                id: opponent.id,
                cell: opponent.position,
                facing: opponent.facing,
                health: opponent.health,
                displacement: opponent.displacement,
                seconds_per_tile: opponent.seconds_per_tile,
                sprite: opponent.sprite.clone(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        OpponentView { snapshots }
    }

    /// Enumerates the items currently lying on the field.
    #[must_use]
    pub fn field_items(world: &World) -> Vec<ItemSnapshot> {
        world.items.iter().map(item_snapshot).collect()
    }

    fn item_snapshot(item: &super::Item) -> ItemSnapshot {
        ItemSnapshot {
            id: item.id,
            cell: item.position,
            collidable: item.collidable,
            sprite: item.sprite.clone(),
        }
    }

    /// Read-only snapshot describing the player.
    #[derive(Clone, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Grid cell currently occupied by the player.
        pub cell: GridVec,
        /// Last nonzero movement direction.
        pub facing: GridVec,
        /// Carried health value.
        pub health: Health,
        /// Remaining visual tween magnitude.
        pub displacement: TileOffset,
        /// Seconds required to visually cross one tile.
        pub seconds_per_tile: f32,
        /// Asset reference consumed by rendering backends.
        pub sprite: String,
        /// Items carried by the player in pack order.
        pub pack: Vec<ItemSnapshot>,
    }

    /// Read-only view describing all opponents.
    #[derive(Clone, Debug, Default)]
    pub struct OpponentView {
        snapshots: Vec<OpponentSnapshot>,
    }

    impl OpponentView {
        /// Iterator over the captured opponent snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &OpponentSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<OpponentSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single opponent's state.
    #[derive(Clone, Debug, PartialEq)]
    pub struct OpponentSnapshot {
        /// Unique identifier assigned to the opponent.
        pub id: OpponentId,
        /// Grid cell currently occupied by the opponent.
        pub cell: GridVec,
        /// Last nonzero movement direction.
        pub facing: GridVec,
        /// Carried health value.
        pub health: Health,
        /// Remaining visual tween magnitude.
        pub displacement: TileOffset,
        /// Seconds required to visually cross one tile.
        pub seconds_per_tile: f32,
        /// Asset reference consumed by rendering backends.
        pub sprite: String,
    }

    /// Immutable representation of a single item's state.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct ItemSnapshot {
        /// Unique identifier assigned to the item.
        pub id: ItemId,
        /// Grid cell the item occupies (last field cell while packed).
        pub cell: GridVec,
        /// Collision flag carried from the map assets. An item blocks the
        /// player's movement when this flag is OFF.
        pub collidable: bool,
        /// Asset reference consumed by rendering backends.
        pub sprite: String,
    }
}

#[derive(Clone, Debug)]
struct Layer {
    collidable: bool,
    cells: Vec<u32>,
}

impl Layer {
    fn from_spec(spec: LayerSpec) -> Self {
        Self {
            collidable: spec.collidable,
            cells: spec.cells,
        }
    }

    fn blocks(&self, position: GridVec, bounds: GridBounds) -> bool {
        if !self.collidable {
            return false;
        }
        match layer_index(position, bounds) {
            Some(index) => self.cells.get(index).map_or(false, |value| *value > 0),
            None => false,
        }
    }
}

/// Maps a grid position onto the flat layer slice.
///
/// The bundled map assets use a Y-flipped, 1-based-from-end row-major
/// convention: `index = (bounds * bounds - 1) - y * bounds + x`. Indices that
/// land outside the slice (negative rows, the `y = 0` row, out-of-range
/// columns) resolve to `None` and are treated as unobstructed.
fn layer_index(position: GridVec, bounds: GridBounds) -> Option<usize> {
    let side = i64::from(bounds.get());
    let raw = side * side - 1 - i64::from(position.y) * side + i64::from(position.x);
    usize::try_from(raw).ok()
}

#[derive(Clone, Debug)]
struct Player {
    position: GridVec,
    facing: GridVec,
    health: Health,
    seconds_per_tile: f32,
    displacement: TileOffset,
    sprite: String,
    pack: Vec<Item>,
}

impl Player {
    fn from_descriptor(descriptor: &EntityDescriptor) -> Self {
        Self {
            position: descriptor.position,
            facing: descriptor.facing,
            health: descriptor.health,
            seconds_per_tile: descriptor.seconds_per_tile,
            displacement: TileOffset::ZERO,
            sprite: descriptor.sprite.clone(),
            pack: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
struct Opponent {
    id: OpponentId,
    position: GridVec,
    facing: GridVec,
    health: Health,
    seconds_per_tile: f32,
    displacement: TileOffset,
    sprite: String,
}

impl Opponent {
    fn from_descriptor(id: OpponentId, descriptor: &EntityDescriptor) -> Self {
        Self {
            id,
            position: descriptor.position,
            facing: descriptor.facing,
            health: descriptor.health,
            seconds_per_tile: descriptor.seconds_per_tile,
            displacement: TileOffset::ZERO,
            sprite: descriptor.sprite.clone(),
        }
    }
}

#[derive(Clone, Debug)]
struct Item {
    id: ItemId,
    position: GridVec,
    collidable: bool,
    sprite: String,
}

impl Item {
    fn from_descriptor(id: ItemId, descriptor: &EntityDescriptor) -> Self {
        Self {
            id,
            position: descriptor.position,
            collidable: descriptor.collidable,
            sprite: descriptor.sprite.clone(),
        }
    }
}

fn default_player_descriptor() -> EntityDescriptor {
    EntityDescriptor {
        position: GridVec::ZERO,
        facing: GridVec::new(0, -1),
        health: Health::new(1),
        seconds_per_tile: DEFAULT_SECONDS_PER_TILE,
        collidable: true,
        sprite: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn descriptor_at(position: GridVec) -> EntityDescriptor {
        EntityDescriptor {
            position,
            facing: GridVec::new(0, -1),
            health: Health::new(3),
            seconds_per_tile: 0.5,
            collidable: true,
            sprite: "sprites/test.png".to_owned(),
        }
    }

    fn item_descriptor_at(position: GridVec, collidable: bool) -> EntityDescriptor {
        EntityDescriptor {
            collidable,
            ..descriptor_at(position)
        }
    }

    fn world_with_player_at(position: GridVec) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnPlayer {
                descriptor: descriptor_at(position),
            },
            &mut events,
        );
        world
    }

    fn spawn_opponent(world: &mut World, position: GridVec) -> OpponentId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnOpponent {
                descriptor: descriptor_at(position),
            },
            &mut events,
        );
        match events
            .iter()
            .find_map(|event| match event {
                Event::OpponentSpawned { opponent, .. } => Some(*opponent),
                _ => None,
            }) {
            Some(id) => id,
            None => panic!("expected opponent spawn event"),
        }
    }

    fn spawn_item(world: &mut World, position: GridVec, collidable: bool) {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnItem {
                descriptor: item_descriptor_at(position, collidable),
            },
            &mut events,
        );
    }

    #[test]
    fn validator_rejects_targets_at_or_beyond_bounds() {
        let world = world_with_player_at(GridVec::new(5, 5));
        assert!(!query::is_valid_move(&world, GridVec::new(16, 3), false));
        assert!(!query::is_valid_move(&world, GridVec::new(3, 16), false));
        assert!(!query::is_valid_move(&world, GridVec::new(20, 20), true));
        assert!(query::is_valid_move(&world, GridVec::new(15, 15), false));
    }

    #[test]
    fn validator_accepts_negative_targets_on_open_ground() {
        // Only the upper bound is checked; cells below the origin are
        // reachable from (0,0) and accepted on an empty map.
        let world = world_with_player_at(GridVec::new(5, 5));
        assert!(query::is_valid_move(&world, GridVec::new(-1, 0), false));
        assert!(query::is_valid_move(&world, GridVec::new(0, -1), false));
    }

    #[test]
    fn validator_rejects_cells_blocked_by_collidable_layers() {
        let mut world = world_with_player_at(GridVec::new(5, 5));
        let bounds = GridBounds::new(16);
        let cell_count = (bounds.get() * bounds.get()) as usize;
        let target = GridVec::new(3, 3);
        let index = layer_index(target, bounds).expect("target maps into the layer");

        let mut blocked = vec![0; cell_count];
        blocked[index] = 7;
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureGrid {
                bounds,
                layers: vec![
                    LayerSpec {
                        collidable: false,
                        cells: blocked.clone(),
                    },
                    LayerSpec {
                        collidable: true,
                        cells: blocked,
                    },
                ],
            },
            &mut events,
        );

        assert!(!query::is_valid_move(&world, target, false));
        assert!(query::is_valid_move(&world, GridVec::new(4, 3), false));
    }

    #[test]
    fn layer_lookups_outside_the_slice_do_not_block() {
        let mut world = world_with_player_at(GridVec::new(5, 5));
        let bounds = GridBounds::new(16);
        let cell_count = (bounds.get() * bounds.get()) as usize;
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureGrid {
                bounds,
                layers: vec![LayerSpec {
                    collidable: true,
                    cells: vec![9; cell_count],
                }],
            },
            &mut events,
        );

        // Under the 1-based-from-end convention the y = 0 row and negative
        // rows land outside the slice; both resolve to unobstructed.
        assert!(query::is_valid_move(&world, GridVec::new(1, 0), false));
        assert!(query::is_valid_move(&world, GridVec::new(0, -2), false));
    }

    #[test]
    fn validator_rejects_occupied_cells() {
        let mut world = world_with_player_at(GridVec::new(5, 5));
        let _ = spawn_opponent(&mut world, GridVec::new(8, 8));

        assert!(!query::is_valid_move(&world, GridVec::new(5, 5), false));
        assert!(!query::is_valid_move(&world, GridVec::new(8, 8), true));
        assert!(query::is_valid_move(&world, GridVec::new(9, 9), false));
    }

    #[test]
    fn items_with_collision_off_block_the_player_but_not_opponents() {
        // The shipped assets invert the flag: collidable = false blocks.
        let mut world = world_with_player_at(GridVec::new(3, 2));
        spawn_item(&mut world, GridVec::new(3, 3), false);
        spawn_item(&mut world, GridVec::new(4, 4), true);

        assert!(!query::is_valid_move(&world, GridVec::new(3, 3), false));
        assert!(query::is_valid_move(&world, GridVec::new(3, 3), true));
        assert!(query::is_valid_move(&world, GridVec::new(4, 4), false));

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                step: GridVec::new(0, 1),
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::player_view(&world).cell, GridVec::new(3, 2));
    }

    #[test]
    fn accepted_move_updates_position_facing_and_displacement() {
        let mut world = world_with_player_at(GridVec::new(5, 5));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                step: GridVec::new(1, 0),
            },
            &mut events,
        );

        let player = query::player_view(&world);
        assert_eq!(player.cell, GridVec::new(6, 5));
        assert_eq!(player.facing, GridVec::new(1, 0));
        assert_eq!(player.displacement, TileOffset::new(1.0, 0.0));
        assert_eq!(
            events,
            vec![Event::PlayerMoved {
                from: GridVec::new(5, 5),
                to: GridVec::new(6, 5),
            }]
        );
    }

    #[test]
    fn rejected_move_is_a_complete_no_op() {
        let mut world = world_with_player_at(GridVec::new(15, 15));
        let before = query::player_view(&world);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                step: GridVec::new(1, 0),
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert_eq!(query::player_view(&world), before);
    }

    #[test]
    fn opponent_step_is_validated_and_committed() {
        let mut world = world_with_player_at(GridVec::new(5, 5));
        let id = spawn_opponent(&mut world, GridVec::new(5, 8));

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StepOpponent {
                opponent: id,
                step: GridVec::new(0, -1),
            },
            &mut events,
        );

        let opponents = query::opponent_view(&world).into_vec();
        assert_eq!(opponents.len(), 1);
        assert_eq!(opponents[0].cell, GridVec::new(5, 7));
        assert_eq!(opponents[0].facing, GridVec::new(0, -1));
        assert_eq!(opponents[0].displacement, TileOffset::new(0.0, 1.0));
    }

    #[test]
    fn opponent_cannot_step_onto_player_or_other_opponent() {
        let mut world = world_with_player_at(GridVec::new(5, 5));
        let chaser = spawn_opponent(&mut world, GridVec::new(5, 6));
        let _ = spawn_opponent(&mut world, GridVec::new(5, 7));

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StepOpponent {
                opponent: chaser,
                step: GridVec::new(0, -1),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::StepOpponent {
                opponent: chaser,
                step: GridVec::new(0, 1),
            },
            &mut events,
        );

        assert!(events.is_empty());
        let opponents = query::opponent_view(&world).into_vec();
        assert_eq!(opponents[0].cell, GridVec::new(5, 6));
    }

    #[test]
    fn displacement_decays_toward_zero_every_tick() {
        let mut world = world_with_player_at(GridVec::new(5, 5));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                step: GridVec::new(0, 1),
            },
            &mut events,
        );

        // seconds_per_tile is 0.5, so 0.25s removes half a tile.
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
            &mut events,
        );
        let halfway = query::player_view(&world).displacement;
        assert!((halfway.y - 0.5).abs() < 1e-6);
        assert_eq!(halfway.x, 0.0);

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(5),
            },
            &mut events,
        );
        assert!(query::player_view(&world).displacement.is_settled());
    }

    #[test]
    fn pickup_prefers_last_coincident_item_and_conserves_items() {
        let mut world = world_with_player_at(GridVec::new(2, 2));
        spawn_item(&mut world, GridVec::new(2, 2), true);
        spawn_item(&mut world, GridVec::new(2, 2), true);
        spawn_item(&mut world, GridVec::new(7, 7), true);

        let mut events = Vec::new();
        apply(&mut world, Command::PickupOrDrop, &mut events);

        let player = query::player_view(&world);
        let field = query::field_items(&world);
        assert_eq!(player.pack.len(), 1);
        assert_eq!(field.len(), 2);
        // Forward scan: the later spawn at the player's cell wins.
        assert_eq!(player.pack[0].id, ItemId::new(1));
        assert_eq!(
            events,
            vec![Event::ItemPickedUp {
                item: ItemId::new(1),
                cell: GridVec::new(2, 2),
            }]
        );
    }

    #[test]
    fn drop_places_first_pack_item_at_player_cell() {
        let mut world = world_with_player_at(GridVec::new(2, 2));
        spawn_item(&mut world, GridVec::new(2, 2), true);
        spawn_item(&mut world, GridVec::new(2, 2), true);

        let mut events = Vec::new();
        apply(&mut world, Command::PickupOrDrop, &mut events);
        apply(&mut world, Command::PickupOrDrop, &mut events);
        assert_eq!(query::player_view(&world).pack.len(), 2);
        assert!(query::field_items(&world).is_empty());

        // Move to an empty cell and drop: the first pack item lands there.
        apply(
            &mut world,
            Command::MovePlayer {
                step: GridVec::new(1, 0),
            },
            &mut events,
        );
        let first_in_pack = query::player_view(&world).pack[0].id;
        events.clear();
        apply(&mut world, Command::PickupOrDrop, &mut events);

        let field = query::field_items(&world);
        assert_eq!(field.len(), 1);
        assert_eq!(field[0].id, first_in_pack);
        assert_eq!(field[0].cell, GridVec::new(3, 2));
        assert_eq!(query::player_view(&world).pack.len(), 1);
        assert_eq!(
            events,
            vec![Event::ItemDropped {
                item: first_in_pack,
                cell: GridVec::new(3, 2),
            }]
        );
    }

    #[test]
    fn pickup_on_empty_cell_with_empty_pack_is_a_no_op() {
        let mut world = world_with_player_at(GridVec::new(2, 2));
        let mut events = Vec::new();
        apply(&mut world, Command::PickupOrDrop, &mut events);
        assert!(events.is_empty());
        assert!(query::field_items(&world).is_empty());
        assert!(query::player_view(&world).pack.is_empty());
    }

    #[test]
    fn game_over_fires_once_and_freezes_positions() {
        let mut world = world_with_player_at(GridVec::new(4, 4));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnOpponent {
                descriptor: descriptor_at(GridVec::new(4, 4)),
            },
            &mut events,
        );

        assert!(query::game_over(&world));
        assert_eq!(
            events.last(),
            Some(&Event::GameEnded {
                cell: GridVec::new(4, 4),
            })
        );

        // Further movement and inventory commands are ignored.
        events.clear();
        apply(
            &mut world,
            Command::MovePlayer {
                step: GridVec::new(1, 0),
            },
            &mut events,
        );
        apply(&mut world, Command::PickupOrDrop, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::player_view(&world).cell, GridVec::new(4, 4));

        // Rendering-only ticks continue without re-announcing the ending.
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(16),
            }]
        );
    }
}
