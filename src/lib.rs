//! Skirmish Core - default unit AI and dropped-item physics for tactical battles

pub mod battle;
pub mod core;
