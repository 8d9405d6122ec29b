#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering and input contracts for Gridstalk adapters.
//!
//! Windowing backends implement [`RenderingBackend`] and hand each frame's
//! elapsed time and edge-triggered input back to the simulation. Everything
//! here is read-only presentation data; backends never mutate world state.

use anyhow::Result as AnyResult;
use glam::Vec2;
use gridstalk_core::{Direction, GridVec, TileOffset};
use std::time::Duration;

/// Input snapshot gathered by an adapter before updating the scene.
///
/// Every field is edge-triggered: it reports at most one press per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Directional move detected this frame, if any.
    pub direction: Option<Direction>,
    /// Whether the pickup/drop key fired this frame.
    pub pickup_or_drop: bool,
    /// Whether the advance-opponents key fired this frame.
    pub advance_opponents: bool,
}

/// Describes the square tile grid that backends draw beneath the sprites.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Side length of the grid measured in tiles.
    pub side: u32,
    /// Side length of a single square tile in pixels.
    pub tile_length: f32,
}

impl GridPresentation {
    /// Creates a new grid descriptor.
    #[must_use]
    pub const fn new(side: u32, tile_length: f32) -> Self {
        Self { side, tile_length }
    }

    /// Total side length of the rendered grid in pixels.
    #[must_use]
    pub fn pixel_side(&self) -> f32 {
        self.side as f32 * self.tile_length
    }
}

/// One sprite positioned on the grid with its tween offset applied.
#[derive(Clone, Debug, PartialEq)]
pub struct SpritePresentation {
    /// Grid cell that logically contains the sprite.
    pub cell: GridVec,
    /// Draw offset in pixels, already scaled and signed for the backend.
    pub offset: Vec2,
    /// Asset reference naming the sprite image.
    pub sprite: String,
}

impl SpritePresentation {
    /// Builds a sprite descriptor from an entity's logical state.
    ///
    /// The displacement holds nonnegative per-axis magnitudes; the draw
    /// offset points opposite the facing so the sprite trails the logical
    /// cell and settles onto it as the magnitude decays.
    #[must_use]
    pub fn from_entity(
        cell: GridVec,
        facing: GridVec,
        displacement: TileOffset,
        sprite: String,
        tile_length: f32,
    ) -> Self {
        Self {
            cell,
            offset: tween_offset(facing, displacement, tile_length),
            sprite,
        }
    }
}

/// Computes the pixel draw offset for a decaying displacement.
#[must_use]
pub fn tween_offset(facing: GridVec, displacement: TileOffset, tile_length: f32) -> Vec2 {
    Vec2::new(
        -(facing.x as f32) * displacement.x * tile_length,
        -(facing.y as f32) * displacement.y * tile_length,
    )
}

/// Scene description combining the grid and every visible sprite.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid composing the play area.
    pub grid: GridPresentation,
    /// Player sprite descriptor.
    pub player: SpritePresentation,
    /// Opponent sprites in deterministic order.
    pub opponents: Vec<SpritePresentation>,
    /// Field item sprites in field order.
    pub items: Vec<SpritePresentation>,
    /// Pack sprites shown while the pack overlay is open.
    pub pack: Vec<SpritePresentation>,
    /// Whether the terminal game-over overlay should be drawn.
    pub game_over: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Gridstalk scenes.
pub trait RenderingBackend {
    /// Runs the backend until it is requested to exit.
    ///
    /// The `update_scene` closure receives the frame delta and the input
    /// gathered by the adapter, and may rebuild the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_offset_points_opposite_the_motion() {
        // Facing right with a full tile owed draws one tile to the left.
        let offset = tween_offset(GridVec::new(1, 0), TileOffset::new(1.0, 0.0), 32.0);
        assert_eq!(offset, Vec2::new(-32.0, 0.0));

        let offset = tween_offset(GridVec::new(0, -1), TileOffset::new(0.0, 0.5), 32.0);
        assert_eq!(offset, Vec2::new(0.0, 16.0));
    }

    #[test]
    fn settled_displacement_draws_on_the_cell() {
        let offset = tween_offset(GridVec::new(1, 0), TileOffset::ZERO, 32.0);
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn sprite_presentation_scales_offsets_by_tile_length() {
        let sprite = SpritePresentation::from_entity(
            GridVec::new(4, 7),
            GridVec::new(0, 1),
            TileOffset::new(0.0, 0.25),
            "sprites/hero.png".to_owned(),
            32.0,
        );
        assert_eq!(sprite.cell, GridVec::new(4, 7));
        assert_eq!(sprite.offset, Vec2::new(0.0, -8.0));
    }

    #[test]
    fn grid_presentation_reports_pixel_dimensions() {
        let grid = GridPresentation::new(16, 32.0);
        assert_eq!(grid.pixel_side(), 512.0);
    }
}
