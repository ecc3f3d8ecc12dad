use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{ChainEvent, ChainEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, run_id: Uuid, kind: ChainEventKind) -> ChainEvent;
    /// Eventos de una ejecución, orden ascendente por seq.
    fn list(&self, run_id: Uuid) -> Vec<ChainEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: HashMap<Uuid, Vec<ChainEvent>>,
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, run_id: Uuid, kind: ChainEventKind) -> ChainEvent {
        let events = self.inner.entry(run_id).or_default();
        let ev = ChainEvent { seq: events.len() as u64, run_id, kind, ts: Utc::now() };
        events.push(ev.clone());
        ev
    }

    fn list(&self, run_id: Uuid) -> Vec<ChainEvent> {
        self.inner.get(&run_id).cloned().unwrap_or_default()
    }
}
