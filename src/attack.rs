//! Attack resolution
//!
//! Removes the attacked cell from whichever ship holds it and reports
//! miss, hit, sunk or obliterated. A removed cell is gone for good, so a
//! repeated attack on it resolves as a miss.

use serde::Serialize;

use crate::board::Cell;
use crate::fleet::Fleet;
use crate::types::SquadronKey;

/// Outcome of one attack, sent to both attacker and defender
///
/// `ship_key` is present iff `hit`; `adjacent_cells` iff `sunk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackResult {
    pub hit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_key: Option<SquadronKey>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sunk: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub obliterated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjacent_cells: Option<Vec<Cell>>,
}

impl AttackResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            ship_key: None,
            sunk: false,
            obliterated: false,
            adjacent_cells: None,
        }
    }

    pub fn hit(ship_key: SquadronKey) -> Self {
        Self {
            hit: true,
            ship_key: Some(ship_key),
            ..Self::miss()
        }
    }

    pub fn sunk(ship_key: SquadronKey, adjacent_cells: Vec<Cell>, obliterated: bool) -> Self {
        Self {
            hit: true,
            ship_key: Some(ship_key),
            sunk: true,
            obliterated,
            adjacent_cells: Some(adjacent_cells),
        }
    }
}

impl Fleet {
    /// Resolve an attack on `cell`
    ///
    /// Squadrons are scanned in key order and ships in placement order;
    /// the first ship holding the cell takes the hit. At most one cell is
    /// removed per call.
    pub fn attack(&mut self, cell: Cell) -> AttackResult {
        let found = self.squadrons.iter_mut().find_map(|(key, squadron)| {
            squadron
                .ships
                .iter()
                .position(|ship| ship.cells.contains(&cell))
                .map(|index| (key.clone(), squadron, index))
        });
        let Some((key, squadron, index)) = found else {
            return AttackResult::miss();
        };

        let ship = &mut squadron.ships[index];
        ship.cells.retain(|occupied| *occupied != cell);
        if !ship.is_sunk() {
            return AttackResult::hit(key);
        }

        let wreck = squadron.ships.remove(index);
        let obliterated = self.is_obliterated();
        AttackResult::sunk(key, wreck.adjacent_cells, obliterated)
    }
}
