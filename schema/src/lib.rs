// Suimon Arena Schema - Shared type definitions
// This crate contains the core enums and data shapes that are shared between
// the arena crate, its catalog data files and any host application.

// Re-export the main types
pub use element_types::*;
pub use move_types::*;
pub use species_data::*;

pub mod element_types;
pub mod move_types;
pub mod species_data;
