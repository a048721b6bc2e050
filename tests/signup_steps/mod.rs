//! Step definitions for signup BDD scenarios.

pub mod given;
pub mod when;
pub mod world;
