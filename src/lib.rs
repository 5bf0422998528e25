//! # Heuristic Connect Four
//!
//! Connect Four against a single-ply heuristic computer opponent, played in
//! the terminal. Features a ratatui front end with drop animations, a terminal
//! bell for sound, and win/loss statistics persisted as JSON.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, player, rules, snapshots
//! - [`ai`]: Agent trait and the heuristic move policy
//! - [`controller`]: Turn sequencing with injected collaborators
//! - [`audio`]: Sound cues and sinks
//! - [`stats`]: Win/loss statistics stores
//! - [`ui`]: Terminal UI: game view, drop animation
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod audio;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod stats;
pub mod ui;
