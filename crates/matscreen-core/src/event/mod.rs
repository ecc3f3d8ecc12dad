//! Eventos de ejecución de la cadena y trait EventStore.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{ChainEvent, ChainEventKind};
