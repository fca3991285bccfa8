//! Persistence for player records.
//!
//! Records are the only state shared between concurrent battles. Callers
//! serialize writers per player; implementations only guarantee that a
//! single `save_all` lands as a whole.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, RepositoryResult};
pub use file::JsonFilePlayerRepo;
pub use memory::InMemoryPlayerRepo;
pub use traits::PlayerRepository;
