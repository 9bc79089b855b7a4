//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (faction, health, facing, spawn anchor)
//! - combatant: боевой state (combo counter, action lock, hurt reaction, attack anchor)
//! - player: player collaborator marker (Player)

pub mod actor;
pub mod combatant;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use combatant::*;
pub use player::*;
