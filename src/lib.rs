mod destroyable;
pub mod error;
pub mod events;
pub mod game;
pub mod model;

pub use destroyable::Destroyable;
pub use error::StorageError;
