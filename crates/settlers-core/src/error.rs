//! Error type shared by board setup and command handling.

use crate::board::{PlayerId, VertexId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building a board or applying commands
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("{pool} pool holds {found} entries but the board needs {expected}")]
    CountMismatch {
        pool: String,
        expected: usize,
        found: usize,
    },

    #[error("no valid dice number layout found in {attempts} attempts")]
    SetupInfeasible { attempts: u32 },

    #[error("cannot place a road between {from} and {to}")]
    InvalidPlacement { from: VertexId, to: VertexId },

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
}

pub type Result<T> = std::result::Result<T, GameError>;
