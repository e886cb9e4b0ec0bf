//! Settlers - a four-player hex board game rules engine
//!
//! This crate provides the core game logic, including:
//! - Axial coordinate lattice for hex centres and corners
//! - Board topology generation and random tile/number layout
//! - Legal placement queries driven by road network reachability
//! - Turn engine with dice, production and building costs
//!
//! # Architecture
//!
//! The engine is platform-agnostic and synchronous. It can be compiled to:
//! - Native Rust for server-side game hosting
//! - WebAssembly for an in-browser client (feature `wasm`)
//!
//! # Modules
//!
//! - [`hex`]: Axial lattice coordinates
//! - [`grid`]: Board topology generation
//! - [`setup`]: Tile and dice number assignment
//! - [`board`]: Cell arena, buildings and roads
//! - [`rules`]: Legal settlement/city/road placements
//! - [`game`]: Game state and turn engine
//! - [`snapshot`]: Client-facing state view

pub mod actions;
pub mod board;
pub mod error;
pub mod game;
pub mod grid;
pub mod hex;
pub mod player;
pub mod rules;
pub mod setup;
pub mod snapshot;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{ActionReport, Command, CommandOutcome};
pub use board::{
    Board, HexCell, HexId, PlayerId, Resource, Road, TileType, VertexBuilding, VertexCell, VertexId,
};
pub use error::{GameError, Result};
pub use game::GameState;
pub use grid::HexGridGenerator;
pub use hex::HexCoord;
pub use player::{Player, ResourceHand};
pub use setup::ResourceAssigner;
pub use snapshot::BoardSnapshot;
