//! Placement
//!
//! The single routine allowed to move an occupant. It updates the grid cell
//! and the entity's `Position` together.

use bevy_ecs::prelude::*;

use crate::components::entity::{Agent, Block, Position};
use crate::components::grid::{Coord, Occupant, OccupancyGrid};
use crate::error::SimError;
use crate::SimRng;

/// Place `entity` at `target` (or a random free tile when `None`).
///
/// An occupied target is relocated to a free tile only if `relocate` is set;
/// otherwise the grid error is returned and nothing changes.
pub fn place_entity(
    world: &mut World,
    entity: Entity,
    target: Option<Coord>,
    relocate: bool,
) -> Result<Coord, SimError> {
    let occupant = if world.get::<Agent>(entity).is_some() {
        Occupant::agent(entity)
    } else if world.get::<Block>(entity).is_some() {
        Occupant::block(entity)
    } else {
        return Err(SimError::missing::<Agent>(entity));
    };

    let from = world
        .get::<Position>(entity)
        .ok_or_else(|| SimError::missing::<Position>(entity))?
        .coord();

    let placed = world.resource_scope(|world, mut rng: Mut<SimRng>| {
        world
            .resource_mut::<OccupancyGrid>()
            .place(occupant, from, target, relocate, &mut rng.0)
    })?;

    if let Some(mut position) = world.get_mut::<Position>(entity) {
        position.0 = Some(placed);
    }
    Ok(placed)
}

/// True when every positioned entity and the grid point at each other
pub fn occupancy_is_consistent(world: &World) -> bool {
    let grid = world.resource::<OccupancyGrid>();

    let mut positioned = 0;
    for entity_ref in world.iter_entities() {
        let Some(coord) = entity_ref.get::<Position>().and_then(|p| p.coord()) else {
            continue;
        };
        positioned += 1;
        if grid.occupant_at(coord).map(|o| o.entity) != Some(entity_ref.id()) {
            return false;
        }
    }

    positioned == grid.occupied_count()
}
