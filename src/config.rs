//! Game configuration
//!
//! Board dimensions and the squadron template every fleet is validated
//! against. Defaults follow the classic web game: a 9×9 board and two
//! ships each of lengths 5 down to 1.

use std::env;
use std::sync::Arc;

use crate::board::Board;
use crate::error::ConfigError;
use crate::fleet::{FleetTemplate, SquadronSpec};

/// Environment variable overriding the board width
pub const WIDTH_VAR: &str = "BATTLESHIPS_BOARD_WIDTH";

/// Environment variable overriding the board height
pub const HEIGHT_VAR: &str = "BATTLESHIPS_BOARD_HEIGHT";

const DEFAULT_SIZE: usize = 9;

/// Static game setup shared by all sessions
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub board: Board,
    pub template: Arc<FleetTemplate>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let template = (1..=5).fold(FleetTemplate::new(), |template, length| {
            let key = format!("{length}-block-ship");
            template.with_squadron(key.clone(), SquadronSpec::new(key, length, 2))
        });
        Self {
            board: Board::new(DEFAULT_SIZE, DEFAULT_SIZE),
            template: Arc::new(template),
        }
    }
}

impl GameConfig {
    /// Build from the defaults with board size overrides from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(width) = dimension(&lookup, WIDTH_VAR)? {
            config.board.width = width;
        }
        if let Some(height) = dimension(&lookup, HEIGHT_VAR)? {
            config.board.height = height;
        }
        Ok(config)
    }
}

fn dimension(
    lookup: &impl Fn(&'static str) -> Option<String>,
    name: &'static str,
) -> Result<Option<usize>, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    match value.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(Some(size)),
        _ => Err(ConfigError::InvalidDimension { name, value }),
    }
}
