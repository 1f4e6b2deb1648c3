//! Occupancy Grid
//!
//! The authoritative owner of spatial exclusivity: a width×height surface
//! mapping each coordinate to at most one dynamic occupant, layered over a
//! static ground of tiles.

use bevy_ecs::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// A grid address. Signed so that `position + delta` may step off the edge
/// and be rejected by bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, delta: Delta) -> Self {
        Self::new(self.x + delta.dx, self.y + delta.dy)
    }

    /// Relative step from `self` to `other`
    pub fn delta_to(self, other: Coord) -> Delta {
        Delta::new(other.x - self.x, other.y - self.y)
    }

    pub fn to_array(self) -> [i32; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Relative unit step between neighbouring coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
}

impl Delta {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn to_array(self) -> [i32; 2] {
        [self.dx, self.dy]
    }
}

/// The eight Chebyshev neighbours, origin excluded
pub const NEIGHBOR_DELTAS: [Delta; 8] = [
    Delta::new(-1, -1),
    Delta::new(-1, 0),
    Delta::new(-1, 1),
    Delta::new(0, -1),
    Delta::new(0, 1),
    Delta::new(1, -1),
    Delta::new(1, 0),
    Delta::new(1, 1),
];

/// What sort of dynamic occupant holds a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupantClass {
    Agent,
    Block,
}

/// Back-pointer stored in a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub entity: Entity,
    pub class: OccupantClass,
}

impl Occupant {
    pub fn agent(entity: Entity) -> Self {
        Self {
            entity,
            class: OccupantClass::Agent,
        }
    }

    pub fn block(entity: Entity) -> Self {
        Self {
            entity,
            class: OccupantClass::Block,
        }
    }

    pub fn is_agent(&self) -> bool {
        self.class == OccupantClass::Agent
    }
}

/// Static ground marker, one per coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub position: Coord,
}

/// Resource: occupancy of every coordinate plus the ground layer
#[derive(Resource, Debug, Clone)]
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    /// Row-major, index = y * width + x
    cells: Vec<Option<Occupant>>,
    ground: Vec<Tile>,
}

impl OccupancyGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let area = width as usize * height as usize;
        let mut ground = Vec::with_capacity(area);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                ground.push(Tile {
                    position: Coord::new(x, y),
                });
            }
        }

        Self {
            width,
            height,
            cells: vec![None; area],
            ground,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && (coord.x as u32) < self.width && (coord.y as u32) < self.height
    }

    #[inline]
    fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    /// False outside the grid; otherwise true iff no occupant is registered
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.index(coord).map_or(false, |i| self.cells[i].is_none())
    }

    pub fn occupant_at(&self, coord: Coord) -> Option<Occupant> {
        self.index(coord).and_then(|i| self.cells[i])
    }

    pub fn has_agent(&self, coord: Coord) -> bool {
        self.occupant_at(coord).map_or(false, |o| o.is_agent())
    }

    pub fn tile_at(&self, coord: Coord) -> Option<&Tile> {
        self.index(coord).map(|i| &self.ground[i])
    }

    pub fn ground(&self) -> &[Tile] {
        &self.ground
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Bind `occupant` to a cell.
    ///
    /// Without a target a free tile is searched for. An occupied target falls
    /// back to the search only when `relocate` is set. On success the cell at
    /// `from` is vacated first if it still points at this occupant, so the
    /// caller only has to store the returned coordinate.
    pub fn place<R: Rng + ?Sized>(
        &mut self,
        occupant: Occupant,
        from: Option<Coord>,
        target: Option<Coord>,
        relocate: bool,
        rng: &mut R,
    ) -> Result<Coord, GridError> {
        let destination = match target {
            None => self.find_free_tile(rng)?,
            Some(coord) if self.is_empty(coord) => coord,
            Some(_) if relocate => self.find_free_tile(rng)?,
            Some(coord) if self.contains(coord) => return Err(GridError::Occupied(coord)),
            Some(coord) => return Err(GridError::OutOfBounds(coord)),
        };

        if let Some(old) = from.and_then(|c| self.index(c)) {
            if self.cells[old].map(|o| o.entity) == Some(occupant.entity) {
                self.cells[old] = None;
            }
        }

        let index = self
            .index(destination)
            .ok_or(GridError::OutOfBounds(destination))?;
        self.cells[index] = Some(occupant);
        Ok(destination)
    }

    /// Random start, then a row-major scan that wraps around the grid.
    ///
    /// Near-full grids favour tiles that follow the random draw in scan
    /// order.
    pub fn find_free_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Coord, GridError> {
        if self.cells.is_empty() {
            return Err(GridError::Full);
        }
        let x = rng.gen_range(0..self.width) as i32;
        let y = rng.gen_range(0..self.height) as i32;
        self.scan_from(Coord::new(x, y)).map(|(coord, _)| coord)
    }

    /// Scan forward from `start`; returns the free coordinate and the number
    /// of cells probed.
    pub(crate) fn scan_from(&self, start: Coord) -> Result<(Coord, usize), GridError> {
        if !self.contains(start) {
            return Err(GridError::OutOfBounds(start));
        }

        let (width, height) = (self.width as i32, self.height as i32);
        let mut current = start;
        let mut probes = 1;
        loop {
            if self.is_empty(current) {
                return Ok((current, probes));
            }
            current.x = (current.x + 1) % width;
            if current.x == 0 {
                current.y = (current.y + 1) % height;
            }
            if current == start {
                return Err(GridError::Full);
            }
            probes += 1;
        }
    }

    /// In-bounds empty neighbours, lazily enumerated
    pub fn adjacent_empty(&self, origin: Coord) -> impl Iterator<Item = Coord> + '_ {
        NEIGHBOR_DELTAS
            .iter()
            .map(move |d| origin.offset(*d))
            .filter(move |c| self.is_empty(*c))
    }

    /// Neighbours holding an agent
    pub fn adjacent_occupied_by_agent(&self, origin: Coord) -> impl Iterator<Item = Coord> + '_ {
        NEIGHBOR_DELTAS
            .iter()
            .map(move |d| origin.offset(*d))
            .filter(move |c| self.has_agent(*c))
    }
}

/// Read-only capability handed to behavior policies
#[derive(Clone, Copy)]
pub struct GridView<'a> {
    grid: &'a OccupancyGrid,
}

impl<'a> GridView<'a> {
    pub fn new(grid: &'a OccupancyGrid) -> Self {
        Self { grid }
    }

    pub fn is_empty(&self, coord: Coord) -> bool {
        self.grid.is_empty(coord)
    }

    pub fn has_agent(&self, coord: Coord) -> bool {
        self.grid.has_agent(coord)
    }

    /// Deltas from `domain` that land on an empty tile
    pub fn possible_moves(&self, origin: Coord, domain: &[Delta]) -> Vec<Delta> {
        self.grid
            .adjacent_empty(origin)
            .map(|c| origin.delta_to(c))
            .filter(|d| domain.contains(d))
            .collect()
    }

    /// Deltas from `domain` that land on another agent
    pub fn possible_bites(&self, origin: Coord, domain: &[Delta]) -> Vec<Delta> {
        self.grid
            .adjacent_occupied_by_agent(origin)
            .map(|c| origin.delta_to(c))
            .filter(|d| domain.contains(d))
            .collect()
    }
}
