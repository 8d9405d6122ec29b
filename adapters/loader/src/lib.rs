#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Load-time adapter that converts map and initialization documents into a
//! boot command batch.
//!
//! The schema structs mirror the external file layout (a Tiled-flavoured map
//! export plus a game initialization document) and never leak past this
//! boundary: parsing happens once, validation happens once, and the output
//! is a plain [`Command`] batch for the world to apply. Load failures are
//! fatal by design; the core never recovers from malformed input.

use std::fs;
use std::path::Path;

use gridstalk_core::{Command, EntityDescriptor, GridBounds, GridVec, Health, LayerSpec};
use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced while loading the map or initialization documents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A document could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the unreadable document.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A document could not be parsed as JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the malformed document.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The map declares a non-square or zero-sized grid.
    #[error("map height must be positive (received {height})")]
    InvalidHeight {
        /// Height declared by the map document.
        height: i64,
    },
    /// A layer's data length disagrees with the declared grid size.
    #[error("layer {name:?} holds {actual} cells, expected {expected}")]
    LayerSize {
        /// Name of the offending layer.
        name: String,
        /// Cell count the layer actually holds.
        actual: usize,
        /// Cell count implied by the map height.
        expected: usize,
    },
}

/// Parsed, validated boot data ready to hand to a session.
#[derive(Debug)]
pub struct BootData {
    commands: Vec<Command>,
    bounds: GridBounds,
}

impl BootData {
    /// Consumes the boot data, yielding the command batch in apply order.
    #[must_use]
    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    /// Side length of the grid declared by the map document.
    #[must_use]
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }
}

/// Loads both documents from disk and assembles the boot command batch.
pub fn load_boot_data(map_path: &Path, init_path: &Path) -> Result<BootData, LoadError> {
    let map = read_document::<MapDocument>(map_path)?;
    let init = read_document::<InitDocument>(init_path)?;
    assemble(map, init)
}

/// Assembles boot data from already-parsed documents. Exposed for tests and
/// embedded fixtures.
pub fn from_documents(map_json: &str, init_json: &str) -> Result<BootData, LoadError> {
    let map: MapDocument = serde_json::from_str(map_json).map_err(|source| LoadError::Parse {
        path: "<map document>".to_owned(),
        source,
    })?;
    let init: InitDocument =
        serde_json::from_str(init_json).map_err(|source| LoadError::Parse {
            path: "<init document>".to_owned(),
            source,
        })?;
    assemble(map, init)
}

fn read_document<T>(path: &Path) -> Result<T, LoadError>
where
    T: for<'de> Deserialize<'de>,
{
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn assemble(map: MapDocument, init: InitDocument) -> Result<BootData, LoadError> {
    if map.height <= 0 {
        return Err(LoadError::InvalidHeight { height: map.height });
    }
    let side = map.height as u32;
    let bounds = GridBounds::new(side);
    let expected = (side as usize) * (side as usize);

    let mut layers = Vec::with_capacity(map.layers.len());
    for layer in map.layers {
        if layer.data.len() != expected {
            return Err(LoadError::LayerSize {
                name: layer.name,
                actual: layer.data.len(),
                expected,
            });
        }
        layers.push(LayerSpec {
            collidable: layer.properties.collision,
            cells: layer.data,
        });
    }

    let mut commands = vec![Command::ConfigureGrid { bounds, layers }];
    commands.push(Command::SpawnPlayer {
        descriptor: init.player.into_descriptor(),
    });
    for opponent in init.zombies {
        commands.push(Command::SpawnOpponent {
            descriptor: opponent.into_descriptor(),
        });
    }
    for item in init.fielditems {
        commands.push(Command::SpawnItem {
            descriptor: item.into_descriptor(),
        });
    }

    Ok(BootData { commands, bounds })
}

#[derive(Debug, Deserialize)]
struct MapDocument {
    height: i64,
    #[serde(default)]
    layers: Vec<LayerDocument>,
}

#[derive(Debug, Deserialize)]
struct LayerDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    properties: PropertyDocument,
}

// The documents also carry a "Pickupable" property; the simulation never
// consults it, so the schema lets serde skip it as an unknown field.
#[derive(Debug, Default, Deserialize)]
struct PropertyDocument {
    #[serde(rename = "Collision", default)]
    collision: bool,
}

#[derive(Debug, Deserialize)]
struct InitDocument {
    player: EntityDocument,
    #[serde(default)]
    zombies: Vec<EntityDocument>,
    #[serde(default)]
    fielditems: Vec<EntityDocument>,
}

#[derive(Debug, Deserialize)]
struct EntityDocument {
    #[serde(default)]
    pos: VecDocument,
    #[serde(default)]
    facing: VecDocument,
    #[serde(default)]
    health: i32,
    #[serde(default = "default_seconds_per_tile")]
    secondspertile: f32,
    #[serde(default)]
    spritepath: String,
    #[serde(default)]
    properties: PropertyDocument,
}

impl EntityDocument {
    fn into_descriptor(self) -> EntityDescriptor {
        EntityDescriptor {
            position: GridVec::new(self.pos.x, self.pos.y),
            facing: GridVec::new(self.facing.x, self.facing.y),
            health: Health::new(self.health),
            seconds_per_tile: self.secondspertile,
            // The collision flag passes through unchanged; the validator
            // applies the inverted blocking polarity for field items.
            collidable: self.properties.collision,
            sprite: self.spritepath,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct VecDocument {
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
}

fn default_seconds_per_tile() -> f32 {
    0.25
}
