//! Shared types, error model, and configuration for WiseWays.
//!
//! This crate is the foundation depended on by all other WiseWays crates.
//! It provides:
//! - The unified error type, [`WiseWaysError`]
//! - Domain types ([`Node`], [`Link`], [`Room`], [`GraphSnapshot`])
//! - Configuration ([`AppConfig`], [`LinkConfig`], [`RoomConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, LinkConfig, LinkingConfig, ParticipantPolicy, RoomConfig, RoomsConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, WiseWaysError};
pub use types::{
    Dimension, EMBEDDING_DIM, GraphSnapshot, Link, LinkId, Need, Node, NodeId, Participant,
    QuestionStatus, RelationType, Room, RoomId, RoomStatus, pair_key,
};
