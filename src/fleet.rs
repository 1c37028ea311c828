//! Fleet model and placement validation
//!
//! A `FleetTemplate` fixes, per squadron key, how many ships of which
//! length every fleet must carry. Clients submit a `CandidateFleet`;
//! `validate_placement` checks it against the template and the board and
//! returns a fully placed `Fleet` or the first rule it broke. Validation
//! never touches an existing fleet: the caller swaps the result in only
//! on success.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::board::{Axis, Board, Cell};
use crate::error::PlacementError;
use crate::types::SquadronKey;

/// Fixed shape of one squadron kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadronSpec {
    pub name: String,
    pub required_length: usize,
    pub required_count: usize,
}

impl SquadronSpec {
    pub fn new(name: impl Into<String>, required_length: usize, required_count: usize) -> Self {
        Self {
            name: name.into(),
            required_length,
            required_count,
        }
    }
}

/// Squadron template shared by every fleet in the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FleetTemplate(BTreeMap<SquadronKey, SquadronSpec>);

impl FleetTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a squadron kind under `key`
    pub fn with_squadron(mut self, key: impl Into<SquadronKey>, spec: SquadronSpec) -> Self {
        self.0.insert(key.into(), spec);
        self
    }

    pub fn get(&self, key: &str) -> Option<&SquadronSpec> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SquadronKey, &SquadronSpec)> {
        self.0.iter()
    }

    /// Cells a complete fleet occupies
    pub fn total_cells(&self) -> usize {
        self.0
            .values()
            .map(|spec| spec.required_length * spec.required_count)
            .sum()
    }
}

/// Client-asserted placement: squadron key to a list of ship cell lists
pub type CandidateFleet = BTreeMap<SquadronKey, Vec<Vec<Cell>>>;

/// A placed ship
///
/// `cells` shrinks as the ship is hit; `adjacent_cells` is fixed at
/// placement time and revealed when the ship sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    pub cells: Vec<Cell>,
    pub adjacent_cells: Vec<Cell>,
}

impl Ship {
    /// Build a ship from a client cell list
    ///
    /// The list must be a straight run of consecutive cells in either
    /// direction, entirely on the board.
    fn from_cells(key: &str, cells: Vec<Cell>, board: &Board) -> Result<Self, PlacementError> {
        if let Some(cell) = cells.iter().find(|cell| !board.contains(**cell)) {
            debug!("Ship cell {} outside {}x{} board", cell, board.width, board.height);
            return Err(PlacementError::OutOfBounds);
        }
        let Some(&start) = cells.iter().min() else {
            return Err(PlacementError::NotContiguous(key.to_string()));
        };
        let axis = run_axis(&cells).ok_or_else(|| PlacementError::NotContiguous(key.to_string()))?;
        let adjacent_cells = board.adjacent_cells(start, axis, cells.len())?;
        Ok(Self {
            cells,
            adjacent_cells,
        })
    }

    pub fn is_sunk(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Axis of a straight run whose consecutive entries differ by exactly one
/// step, increasing or decreasing. Single cells count as horizontal.
fn run_axis(cells: &[Cell]) -> Option<Axis> {
    if cells.len() < 2 {
        return Some(Axis::Horizontal);
    }
    let (first, second) = (cells[0], cells[1]);
    let (axis, forward) = if first.row == second.row {
        (Axis::Horizontal, second.column > first.column)
    } else if first.column == second.column {
        (Axis::Vertical, second.row > first.row)
    } else {
        return None;
    };

    let consecutive = cells.windows(2).all(|pair| {
        let (a, b) = if forward { (pair[0], pair[1]) } else { (pair[1], pair[0]) };
        match axis {
            Axis::Horizontal => a.row == b.row && a.column + 1 == b.column,
            Axis::Vertical => a.column == b.column && a.row + 1 == b.row,
        }
    });
    consecutive.then_some(axis)
}

/// One squadron: its template plus the ships still afloat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squadron {
    pub spec: SquadronSpec,
    pub ships: Vec<Ship>,
}

impl Squadron {
    pub fn placed_count(&self) -> usize {
        self.ships.len()
    }
}

/// A player's squadrons keyed by squadron key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fleet {
    pub(crate) squadrons: BTreeMap<SquadronKey, Squadron>,
}

impl Fleet {
    /// Fleet with every template squadron and no ships placed
    pub fn empty(template: &FleetTemplate) -> Self {
        let squadrons = template
            .iter()
            .map(|(key, spec)| {
                (
                    key.clone(),
                    Squadron {
                        spec: spec.clone(),
                        ships: Vec::new(),
                    },
                )
            })
            .collect();
        Self { squadrons }
    }

    pub fn squadron(&self, key: &str) -> Option<&Squadron> {
        self.squadrons.get(key)
    }

    /// Every squadron carries its required number of ships
    pub fn is_complete(&self) -> bool {
        self.squadrons
            .values()
            .all(|squadron| squadron.placed_count() == squadron.spec.required_count)
    }

    /// No ship left in any squadron
    pub fn is_obliterated(&self) -> bool {
        self.squadrons.values().all(|squadron| squadron.ships.is_empty())
    }

    /// Cells still occupied across the whole fleet
    pub fn occupied_cells(&self) -> usize {
        self.squadrons
            .values()
            .flat_map(|squadron| &squadron.ships)
            .map(|ship| ship.cells.len())
            .sum()
    }

    pub fn ships(&self) -> impl Iterator<Item = (&SquadronKey, &Ship)> {
        self.squadrons
            .iter()
            .flat_map(|(key, squadron)| squadron.ships.iter().map(move |ship| (key, ship)))
    }
}

/// Validate a candidate placement against the template and board
///
/// Checks, in order: no unknown squadrons; ship count and length per
/// squadron; each ship a straight contiguous on-board run; no two ships
/// sharing a cell; no ship occupying another ship's adjacency buffer.
pub fn validate_placement(
    template: &FleetTemplate,
    candidate: CandidateFleet,
    board: &Board,
) -> Result<Fleet, PlacementError> {
    if let Some(key) = candidate.keys().find(|key| template.get(key).is_none()) {
        return Err(PlacementError::UnknownSquadron(key.clone()));
    }

    let mut candidate = candidate;
    let mut fleet = Fleet::empty(template);
    for (key, squadron) in fleet.squadrons.iter_mut() {
        let spec = &squadron.spec;
        let ships = candidate.remove(key).unwrap_or_default();
        if ships.len() != spec.required_count {
            return Err(PlacementError::ShipCount {
                key: key.clone(),
                expected: spec.required_count,
                actual: ships.len(),
            });
        }
        for cells in ships {
            if cells.len() != spec.required_length {
                return Err(PlacementError::ShipLength {
                    key: key.clone(),
                    expected: spec.required_length,
                    actual: cells.len(),
                });
            }
            squadron.ships.push(Ship::from_cells(key, cells, board)?);
        }
    }

    check_spacing(&fleet)?;
    Ok(fleet)
}

/// Reject overlapping ships and ships inside another ship's buffer
fn check_spacing(fleet: &Fleet) -> Result<(), PlacementError> {
    let ships: Vec<&Ship> = fleet.ships().map(|(_, ship)| ship).collect();

    let mut owners: HashMap<Cell, usize> = HashMap::new();
    for (index, ship) in ships.iter().enumerate() {
        for &cell in &ship.cells {
            if owners.insert(cell, index).is_some() {
                return Err(PlacementError::Overlap(cell));
            }
        }
    }

    for (index, ship) in ships.iter().enumerate() {
        for cell in &ship.adjacent_cells {
            if owners.get(cell).is_some_and(|owner| *owner != index) {
                return Err(PlacementError::Touching(*cell));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;

    pub(crate) fn destroyers() -> Arc<FleetTemplate> {
        Arc::new(FleetTemplate::new().with_squadron("destroyer", SquadronSpec::new("Destroyer", 2, 2)))
    }

    pub(crate) fn horizontal(row: usize, column: usize, length: usize) -> Vec<Cell> {
        (column..column + length).map(|c| Cell::new(row, c)).collect()
    }

    fn candidate(key: &str, ships: Vec<Vec<Cell>>) -> CandidateFleet {
        CandidateFleet::from([(key.to_string(), ships)])
    }

    const BOARD: Board = Board::new(10, 10);

    #[test]
    fn test_empty_fleet_mirrors_template() {
        let fleet = Fleet::empty(&destroyers());
        let squadron = fleet.squadron("destroyer").unwrap();
        assert_eq!(squadron.placed_count(), 0);
        assert_eq!(squadron.spec.required_count, 2);
        assert!(!fleet.is_complete());
        assert!(fleet.is_obliterated());
    }

    #[test]
    fn test_two_destroyers_pass() {
        let fleet = validate_placement(
            &destroyers(),
            candidate("destroyer", vec![horizontal(0, 0, 2), horizontal(5, 5, 2)]),
            &BOARD,
        )
        .unwrap();

        assert!(fleet.is_complete());
        assert_eq!(fleet.occupied_cells(), destroyers().total_cells());
        assert!(fleet
            .ships()
            .all(|(_, ship)| !ship.adjacent_cells.is_empty()));
    }

    #[test]
    fn test_one_destroyer_fails_count() {
        let err = validate_placement(&destroyers(), candidate("destroyer", vec![horizontal(0, 0, 2)]), &BOARD)
            .unwrap_err();
        assert_eq!(
            err,
            PlacementError::ShipCount {
                key: "destroyer".to_string(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_three_cell_destroyer_fails_length() {
        let err = validate_placement(
            &destroyers(),
            candidate("destroyer", vec![horizontal(0, 0, 3), horizontal(5, 5, 2)]),
            &BOARD,
        )
        .unwrap_err();
        assert!(matches!(err, PlacementError::ShipLength { expected: 2, actual: 3, .. }));
    }

    #[test]
    fn test_missing_and_unknown_squadrons() {
        let err = validate_placement(&destroyers(), CandidateFleet::new(), &BOARD).unwrap_err();
        assert!(matches!(err, PlacementError::ShipCount { actual: 0, .. }));

        let mut fleet = candidate("destroyer", vec![horizontal(0, 0, 2), horizontal(5, 5, 2)]);
        fleet.insert("submarine".to_string(), vec![]);
        let err = validate_placement(&destroyers(), fleet, &BOARD).unwrap_err();
        assert_eq!(err, PlacementError::UnknownSquadron("submarine".to_string()));
    }

    #[test]
    fn test_touching_ship_rejected_and_distant_ship_accepted() {
        let first = vec![Cell::new(3, 4), Cell::new(3, 5)];

        let touching = validate_placement(
            &destroyers(),
            candidate("destroyer", vec![first.clone(), vec![Cell::new(2, 4), Cell::new(2, 3)]]),
            &BOARD,
        );
        assert!(matches!(touching, Err(PlacementError::Touching(_))));

        let diagonal = validate_placement(
            &destroyers(),
            candidate("destroyer", vec![first.clone(), vec![Cell::new(2, 6), Cell::new(1, 6)]]),
            &BOARD,
        );
        assert!(matches!(diagonal, Err(PlacementError::Touching(_))));

        let distant = validate_placement(
            &destroyers(),
            candidate("destroyer", vec![first, vec![Cell::new(5, 4), Cell::new(5, 5)]]),
            &BOARD,
        );
        assert!(distant.is_ok());
    }

    #[test]
    fn test_overlap_rejected() {
        let err = validate_placement(
            &destroyers(),
            candidate("destroyer", vec![horizontal(3, 4, 2), vec![Cell::new(3, 5), Cell::new(4, 5)]]),
            &BOARD,
        )
        .unwrap_err();
        assert_eq!(err, PlacementError::Overlap(Cell::new(3, 5)));
    }

    #[test]
    fn test_geometry_rejections() {
        let gapped = vec![Cell::new(0, 0), Cell::new(0, 2)];
        let bent = vec![Cell::new(0, 0), Cell::new(1, 1)];
        let repeated = vec![Cell::new(0, 0), Cell::new(0, 0)];
        for ship in [gapped, bent, repeated] {
            let err = validate_placement(
                &destroyers(),
                candidate("destroyer", vec![ship, horizontal(5, 5, 2)]),
                &BOARD,
            )
            .unwrap_err();
            assert_eq!(err, PlacementError::NotContiguous("destroyer".to_string()));
        }

        let off_board = validate_placement(
            &destroyers(),
            candidate("destroyer", vec![horizontal(0, 9, 2), horizontal(5, 5, 2)]),
            &BOARD,
        );
        assert_eq!(off_board, Err(PlacementError::OutOfBounds));
    }

    #[test]
    fn test_decreasing_runs_accepted() {
        let fleet = validate_placement(
            &destroyers(),
            candidate(
                "destroyer",
                vec![
                    vec![Cell::new(0, 1), Cell::new(0, 0)],
                    vec![Cell::new(6, 7), Cell::new(5, 7)],
                ],
            ),
            &BOARD,
        )
        .unwrap();
        assert_eq!(fleet.occupied_cells(), 4);
    }

    #[test]
    fn test_template_serializes_camel_case() {
        let json = serde_json::to_value(&*destroyers()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "destroyer": {"name": "Destroyer", "requiredLength": 2, "requiredCount": 2}
            })
        );
    }

    fn cruisers_and_scouts() -> FleetTemplate {
        FleetTemplate::new()
            .with_squadron("cruiser", SquadronSpec::new("Cruiser", 3, 2))
            .with_squadron("scout", SquadronSpec::new("Scout", 1, 2))
    }

    fn straight(vertical: bool, row: usize, column: usize, length: usize, board: &Board) -> Vec<Cell> {
        if vertical {
            let row = row.min(board.height - length);
            (row..row + length).map(|r| Cell::new(r, column)).collect()
        } else {
            let column = column.min(board.width - length);
            (column..column + length).map(|c| Cell::new(row, c)).collect()
        }
    }

    /// Two cells from different ships may neither share a square nor touch,
    /// diagonals included
    fn well_spaced(ships: &[Vec<Cell>]) -> bool {
        ships.iter().enumerate().all(|(i, ship)| {
            ships[i + 1..].iter().all(|other| {
                ship.iter().all(|a| {
                    other
                        .iter()
                        .all(|b| a.row.abs_diff(b.row).max(a.column.abs_diff(b.column)) > 1)
                })
            })
        })
    }

    #[test]
    fn test_diagonal_touch_across_squadrons_rejected() {
        let board = Board::new(6, 6);
        let far_ships = |scout: Cell| {
            CandidateFleet::from([
                (
                    "cruiser".to_string(),
                    vec![horizontal(0, 0, 3), straight(true, 3, 5, 3, &board)],
                ),
                ("scout".to_string(), vec![vec![scout], vec![Cell::new(5, 0)]]),
            ])
        };

        // (1, 3) sits diagonally off the cruiser's bow at (0, 2)
        assert_eq!(
            validate_placement(&cruisers_and_scouts(), far_ships(Cell::new(1, 3)), &board).unwrap_err(),
            PlacementError::Touching(Cell::new(1, 3))
        );
        assert!(validate_placement(&cruisers_and_scouts(), far_ships(Cell::new(2, 3)), &board).is_ok());
    }

    proptest! {
        #[test]
        fn placement_accepts_exactly_well_spaced_fleets(
            runs in prop::collection::vec((any::<bool>(), 0usize..6, 0usize..6), 4)
        ) {
            let board = Board::new(6, 6);
            let ships: Vec<Vec<Cell>> = runs
                .iter()
                .enumerate()
                .map(|(i, &(vertical, row, column))| {
                    let length = if i < 2 { 3 } else { 1 };
                    straight(vertical, row, column, length, &board)
                })
                .collect();
            let candidate = CandidateFleet::from([
                ("cruiser".to_string(), ships[..2].to_vec()),
                ("scout".to_string(), ships[2..].to_vec()),
            ]);

            let result = validate_placement(&cruisers_and_scouts(), candidate, &board);
            prop_assert_eq!(result.is_ok(), well_spaced(&ships), "ships {:?}", ships);
            if let Err(e) = result {
                prop_assert!(
                    matches!(e, PlacementError::Overlap(_) | PlacementError::Touching(_)),
                    "unexpected rejection {:?}",
                    e
                );
            }
        }
    }
}
