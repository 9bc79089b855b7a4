//! Shared helpers: stateless геометрия/facing + aliveness census

pub mod census;
pub mod geometry;
