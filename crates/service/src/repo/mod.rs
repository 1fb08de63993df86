//! Repository implementations: Postgres via sea-orm, and an in-process store.

pub mod memory;
pub mod seaorm;

pub use memory::MemoryStore;
pub use seaorm::SeaOrmStore;
