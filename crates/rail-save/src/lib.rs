//! `rail-save` — JSON persistence for the railsim [`World`].
//!
//! The document is a flat object, `{ meta, tiles, signals, areas, exits,
//! trains }`, of plain records.  Loading is tolerant record by record: a
//! malformed entry is logged with `log::warn!` and skipped, and everything
//! already restored stays.  Only a document that does not parse at all, or
//! one without a `meta` section, is rejected outright.

mod error;
mod record;


pub use error::{SaveError, SaveResult};

use serde_json::Value;

use rail_core::WorldTime;
use rail_world::World;

use crate::record::{
    AreaRecord, ExitRecord, MetaRecord, SaveDocument, SignalRecord, TileRecord, TrainRecord,
};

/// Serialize the world into a pretty-printed JSON document.
///
/// Trains that are not physically on the grid (scheduled but not yet spawned,
/// or already departed) are not part of the snapshot.
pub fn save_world(world: &World) -> SaveResult<String> {
    let document = SaveDocument {
        meta: MetaRecord {
            time: world.current_time().total_seconds(),
        },
        tiles: world.track_tiles().iter().map(TileRecord::capture).collect(),
        signals: world.signals().iter().map(SignalRecord::capture).collect(),
        areas: world.track_areas().iter().map(AreaRecord::capture).collect(),
        exits: world.exits().iter().map(ExitRecord::capture).collect(),
        trains: world
            .trains()
            .iter()
            .filter(|train| train.timetable.is_present_in_world())
            .map(TrainRecord::capture)
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Rebuild a world from a document produced by [`save_world`].
pub fn load_world(text: &str) -> SaveResult<World> {
    let document: Value = serde_json::from_str(text)?;
    let meta = document.get("meta").ok_or(SaveError::MissingMeta)?;
    let meta: MetaRecord = serde_json::from_value(meta.clone())?;

    let mut world = World::new();
    world.override_time(WorldTime::from_seconds(meta.time));

    for (index, value) in records(&document, "tiles").iter().enumerate() {
        match parse::<TileRecord>(value).and_then(TileRecord::restore) {
            Ok(tile) => world.overwrite_tile(tile),
            Err(reason) => log::warn!("skipping tile record {index}: {reason}"),
        }
    }
    for (index, value) in records(&document, "signals").iter().enumerate() {
        match parse::<SignalRecord>(value).and_then(SignalRecord::restore) {
            Ok(signal) => world.overwrite_signal(signal),
            Err(reason) => log::warn!("skipping signal record {index}: {reason}"),
        }
    }
    for (index, value) in records(&document, "areas").iter().enumerate() {
        match parse::<AreaRecord>(value) {
            Ok(area) => {
                world.add_track_area(area.restore());
            }
            Err(reason) => log::warn!("skipping area record {index}: {reason}"),
        }
    }
    for (index, value) in records(&document, "exits").iter().enumerate() {
        match parse::<ExitRecord>(value).and_then(ExitRecord::restore) {
            Ok(exit) => world.add_exit(exit),
            Err(reason) => log::warn!("skipping exit record {index}: {reason}"),
        }
    }
    for (index, value) in records(&document, "trains").iter().enumerate() {
        match parse::<TrainRecord>(value).and_then(TrainRecord::restore) {
            Ok(train) => world.add_train_unchecked(train),
            Err(reason) => log::warn!("skipping train record {index}: {reason}"),
        }
    }

    Ok(world)
}

fn records<'a>(document: &'a Value, section: &str) -> &'a [Value] {
    document
        .get(section)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn parse<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T, String> {
    serde_json::from_value(value.clone()).map_err(|e| e.to_string())
}
