//! The train-motion integrator and occupancy propagation.
//!
//! # Design
//!
//! [`move_along_track`] is the shared walking primitive: it is used both to
//! actually advance a train (with a border callback that enforces signals)
//! and to walk *backward* along a train's length to find the track it covers.
//! Keeping one walker for both keeps the two views of the geometry in
//! lockstep.
//!
//! Occupancy is recomputed from scratch every tick: the world clears all
//! `Occupied` segments, then each train re-marks the segments under it and
//! [`flood_fill_occupied`] propagates the state along the active path until a
//! signal (a track-circuit breaker) or an already-occupied tile is reached.

use rail_core::diag::Diagnostics;
use rail_core::{TileCoord, TrackDirection, WorldTime};
use rail_net::{Exit, SignalLocation, SignalSet, SignalState, TileGrid, TrackArea, TrackState};

use crate::observer::WorldObserver;
use crate::timetable::TimetableState;
use crate::train::Train;
use crate::world::WorldConfig;

/// Distance from a tile edge below which the walker attempts the crossing.
const BOUNDARY_EPSILON: f32 = 1.0e-5;

/// Hard cap on flood-fill iterations.  Track graphs may contain loops; the
/// already-occupied short-circuit handles them, and this cap backstops any
/// pathological topology.
const FLOOD_FILL_ITERATION_CAP: usize = 1000;

/// A movable position on the track: a tile, a direction of travel, and a
/// sub-tile offset in `[-1, 1]` (−1 = just entered, 0 = center, +1 = edge).
#[derive(Copy, Clone, Debug)]
pub(crate) struct TrackCursor {
    pub tile: TileCoord,
    pub direction: TrackDirection,
    pub offset_in_tile: f32,
}

/// Advance `cursor` along the track by up to `max_distance`.
///
/// * `on_tile_border(from, to)` is called before every tile crossing; return
///   `false` to refuse it (the cursor stops exactly at the boundary and no
///   further budget is spent).
/// * `on_tile_segment(tile, direction)` is called for every half-segment the
///   cursor traverses, including the initial partial one.
///
/// Returns the distance actually traveled (`<= max_distance`; less only when
/// blocked at a border or stopped at a dead end / world edge).
///
/// # Panics
/// Panics if the cursor sits on a path inconsistent with the tile's selected
/// switch position — that means the world state is corrupted.
pub(crate) fn move_along_track<B, S>(
    grid: &TileGrid,
    cursor: &mut TrackCursor,
    max_distance: f32,
    mut on_tile_border: B,
    mut on_tile_segment: S,
) -> f32
where
    B: FnMut(TileCoord, TileCoord) -> bool,
    S: FnMut(TileCoord, TrackDirection),
{
    let mut remaining = max_distance;
    while remaining > 0.0 {
        let Some(tile) = grid.get(cursor.tile) else {
            break;
        };

        // Motion toward the tile center from behind.  The negated offset is
        // the fraction of the half-tile still to cover.
        if cursor.offset_in_tile < 0.0 {
            on_tile_segment(cursor.tile, cursor.direction.opposite());

            let half_length = cursor.direction.half_tile_length();
            let to_center = -cursor.offset_in_tile * half_length;
            if to_center >= remaining {
                cursor.offset_in_tile += remaining / half_length;
                remaining = 0.0;
                debug_assert!(cursor.offset_in_tile <= 0.0);
            } else {
                remaining -= to_center;
                cursor.offset_in_tile = 0.0;
            }
        }

        // Crossing the center: pick the outgoing direction from the tile's
        // selected path.  While approaching the center the travel direction
        // is the opposite of the half-segment being occupied.
        if cursor.offset_in_tile == 0.0 {
            if tile.connected_directions.is_dead_end() {
                break;
            }

            let selected = tile.valid_paths()[tile.selected_path as usize];
            assert!(
                selected.intersects(cursor.direction.opposite()),
                "path at {} is inconsistent with the selected switch position",
                cursor.tile
            );
            cursor.direction = selected & !cursor.direction.opposite();
        }

        // Motion away from the center toward the far edge.
        if cursor.offset_in_tile >= 0.0 {
            on_tile_segment(cursor.tile, cursor.direction);

            let half_length = cursor.direction.half_tile_length();
            let to_edge = (1.0 - cursor.offset_in_tile) * half_length;
            if to_edge > remaining {
                cursor.offset_in_tile += remaining / half_length;
                remaining = 0.0;
                debug_assert!(cursor.offset_in_tile <= 1.0);
            } else {
                remaining -= to_edge;
                cursor.offset_in_tile = 1.0;
            }
        }

        // Cross into the neighbor once the edge is reached.
        if (cursor.offset_in_tile - 1.0).abs() < BOUNDARY_EPSILON {
            let next = cursor.tile.offset(cursor.direction);
            if grid.get(next).is_none() {
                break; // edge of the world
            }
            if !on_tile_border(cursor.tile, next) {
                break;
            }
            cursor.tile = next;
            cursor.offset_in_tile = -1.0;
        }
    }

    debug_assert!(remaining >= 0.0);
    max_distance - remaining
}

/// Mark `segment` on the tile at `start` as `Occupied` and propagate the
/// state along active paths across signal-free boundaries.
///
/// Explicit stack, bounded iteration: both are deliberate guards against
/// cyclic track graphs and must stay.
pub(crate) fn flood_fill_occupied(
    grid: &mut TileGrid,
    signals: &SignalSet,
    start: TileCoord,
    segment: TrackDirection,
) {
    let Some(start_slot) = grid.slot(start) else {
        return;
    };

    let mut stack = vec![(start_slot, segment)];
    let mut budget = FLOOD_FILL_ITERATION_CAP;
    while budget > 0 {
        budget -= 1;
        let Some((slot, direction)) = stack.pop() else {
            break;
        };

        // A tile with any occupied segment was already processed; expanding
        // it again would loop forever on circular track.
        let tile = grid.by_slot_mut(slot);
        if tile.has_any(TrackState::Occupied) {
            continue;
        }

        // The segment we arrived on is always occupied.
        tile.set_state(direction, TrackState::Occupied);

        // Only the active path conducts the track circuit further.
        let active = tile.valid_paths()[tile.selected_path as usize];
        if !active.intersects(direction) {
            continue;
        }
        let coord = tile.coord;

        for path_direction in active.existing() {
            grid.by_slot_mut(slot)
                .set_state(path_direction, TrackState::Occupied);

            let neighbor = coord.offset(path_direction);
            let Some(neighbor_slot) = grid.slot(neighbor) else {
                continue;
            };
            // Signals break the track circuit in either orientation.
            if !signals.has_boundary(coord, neighbor) {
                stack.push((neighbor_slot, path_direction.opposite()));
            }
        }
    }
}

// ── Per-train update ──────────────────────────────────────────────────────────

/// Everything a single train update needs from the world, borrowed field by
/// field so trains can be iterated mutably alongside.
pub(crate) struct TrainUpdateContext<'a> {
    pub grid: &'a mut TileGrid,
    pub signals: &'a mut SignalSet,
    pub areas: &'a [TrackArea],
    pub exits: &'a [Exit],
    pub config: &'a WorldConfig,
    pub now: WorldTime,
    pub diag: &'a dyn Diagnostics,
}

pub(crate) fn update_train(
    ctx: &mut TrainUpdateContext<'_>,
    train: &mut Train,
    delta_time: f32,
    observer: &mut dyn WorldObserver,
) {
    if !train.timetable.is_present_in_world() {
        return;
    }

    // Dwell at the platform until the timetable allows departure.
    if !train.is_moving && train.timetable.state() == TimetableState::StoppedAtDestination {
        train.timetable.update(delta_time);
        if train.timetable.should_depart(ctx.now) {
            let area_name = train
                .current_area
                .and_then(|index| ctx.areas.get(index))
                .map(|area| area.name.clone())
                .unwrap_or_default();
            train.timetable.just_departed(&area_name, ctx.now);
            train.is_moving = true;
            observer.on_train_departed(&train.id, &area_name, ctx.now);
            ctx.diag
                .info(&format!("train {} departed from {}", train.id, area_name));
        }
    }

    if train.is_moving {
        move_train_forward(ctx, train, delta_time, observer);
    }

    // A train that just left the world stops occupying track.
    if !train.timetable.is_present_in_world() {
        return;
    }

    // Walk backward along the train's length and mark everything under it.
    let mut cursor = TrackCursor {
        tile: train.tile,
        direction: train.direction.opposite(),
        offset_in_tile: -train.offset_in_tile,
    };
    let mut covered: Vec<(TileCoord, TrackDirection)> = Vec::new();
    move_along_track(
        ctx.grid,
        &mut cursor,
        train.length,
        // Signals were already enforced on the way forward.
        |_, _| true,
        |tile, segment| covered.push((tile, segment)),
    );
    for (tile, segment) in covered {
        flood_fill_occupied(ctx.grid, ctx.signals, tile, segment);
    }
}

fn move_train_forward(
    ctx: &mut TrainUpdateContext<'_>,
    train: &mut Train,
    delta_time: f32,
    observer: &mut dyn WorldObserver,
) {
    let distance = ctx.config.train_speed * delta_time;

    let mut cursor = TrackCursor {
        tile: train.tile,
        direction: train.direction,
        offset_in_tile: train.offset_in_tile,
    };

    let mut current_area = train.current_area;
    let mut arrived_at: Option<usize> = None;
    let mut passed_signals: Vec<SignalLocation> = Vec::new();
    let mut entered_areas: Vec<usize> = Vec::new();
    let mut left_areas: Vec<usize> = Vec::new();

    {
        let signals = &mut *ctx.signals;
        let areas = ctx.areas;
        let timetable = &train.timetable;

        move_along_track(
            ctx.grid,
            &mut cursor,
            distance,
            |from, to| {
                let location = SignalLocation::new(from, to);

                // A signal facing us must show Clear.
                if let Some(signal) = signals.get(location) {
                    if !signal.state.permits_passage() {
                        return false;
                    }
                }

                // Halt at a stopping boundary of the preferred track.
                if timetable.state() == TimetableState::MovingToDestination {
                    for (index, area) in areas.iter().enumerate() {
                        if area.is_stopping_point(from, to) && timetable.should_stop(&area.name) {
                            arrived_at = Some(index);
                            return false;
                        }
                    }
                }

                // Clearance is a single-use permission: consume it.
                if let Some(signal) = signals.get_mut(location) {
                    signal.state = SignalState::Danger;
                    passed_signals.push(location);
                }

                for (index, area) in areas.iter().enumerate() {
                    if area.is_entry(from, to) {
                        current_area = Some(index);
                        entered_areas.push(index);
                    }
                    if area.is_departure(from, to) {
                        if current_area == Some(index) {
                            current_area = None;
                        }
                        left_areas.push(index);
                    }
                }

                true
            },
            // Occupancy is handled by the backward pass.
            |_, _| {},
        );
    }

    train.tile = cursor.tile;
    train.direction = cursor.direction;
    train.offset_in_tile = cursor.offset_in_tile;
    train.current_area = current_area;

    for location in passed_signals {
        observer.on_signal_passed(&train.id, location);
    }
    for index in entered_areas {
        let name = &ctx.areas[index].name;
        observer.on_area_entered(&train.id, name);
        ctx.diag
            .info(&format!("train {} entered track area {}", train.id, name));
    }
    for index in left_areas {
        let name = &ctx.areas[index].name;
        observer.on_area_left(&train.id, name);
        ctx.diag
            .info(&format!("head of train {} left track area {}", train.id, name));
    }

    if let Some(index) = arrived_at {
        let name = ctx.areas[index].name.clone();
        train.current_area = Some(index);
        train.is_moving = false;
        train.timetable.just_arrived(&name, ctx.now);
        observer.on_train_arrived(&train.id, &name, ctx.now);
        ctx.diag
            .info(&format!("train {} arrived at {}", train.id, name));
    }

    // Leaving the world through the timetabled exit.
    if train.timetable.state() == TimetableState::MovingToExit {
        let at_leave_exit = ctx
            .exits
            .iter()
            .any(|exit| exit.name == train.timetable.leave_location() && exit.location == train.tile);
        if at_leave_exit {
            train.is_moving = false;
            train.timetable.just_left(ctx.now);
            observer.on_train_left(&train.id, ctx.now);
            ctx.diag.info(&format!("train {} left the world", train.id));
        }
    }
}
