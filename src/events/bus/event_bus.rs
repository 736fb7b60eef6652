// src/events/bus/event_bus.rs
//
// In-process bus for catalog events.
//
// Handlers run on the emitting thread, in subscription order. Every
// emission is recorded, with or without listeners.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::events::types::DomainEvent;

type Handler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// One recorded emission
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

#[derive(Default)]
struct Shared {
    handlers: RwLock<HashMap<TypeId, Vec<Handler>>>,
    emitted: RwLock<Vec<EventLogEntry>>,
}

/// Catalog event bus; clones share handlers and the emission log
#[derive(Clone, Default)]
pub struct EventBus {
    shared: Arc<Shared>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let handler: Handler = Box::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });

        write(&self.shared.handlers)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(handler);
    }

    /// Record `event` and hand it to its handlers. A panicking handler is
    /// logged and the remaining ones still run.
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let handlers = read(&self.shared.handlers);
        let listeners = handlers.get(&TypeId::of::<E>()).map(Vec::as_slice).unwrap_or(&[]);

        log::debug!(
            "Event {} ({}) -> {} handlers",
            event.event_type(),
            event.event_id(),
            listeners.len()
        );

        write(&self.shared.emitted).push(EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count: listeners.len(),
        });

        for handler in listeners {
            if catch_unwind(AssertUnwindSafe(|| handler(&event as &dyn Any))).is_err() {
                log::error!("A {} handler panicked", event.event_type());
            }
        }
    }

    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        read(&self.shared.emitted).clone()
    }

    pub fn clear_event_log(&self) {
        write(&self.shared.emitted).clear();
    }

    pub fn subscriber_count<E: 'static>(&self) -> usize {
        read(&self.shared.handlers)
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::catalog_events::{EpisodesReconciled, TitleLoaded};
    use std::sync::Mutex;

    #[test]
    fn test_handlers_see_reconciliation_in_subscription_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for listener in ["cli", "stats"] {
            let seen = Arc::clone(&seen);
            bus.subscribe::<EpisodesReconciled, _>(move |event| {
                seen.lock().unwrap().push((listener, event.episode_count));
            });
        }

        bus.emit(EpisodesReconciled::new(1512, Some("Kodik".to_string()), 12, 2));

        assert_eq!(*seen.lock().unwrap(), vec![("cli", 12), ("stats", 12)]);
    }

    #[test]
    fn test_log_records_events_without_listeners() {
        let bus = EventBus::new();
        bus.subscribe::<TitleLoaded, _>(|_| {});

        bus.emit(TitleLoaded::new(1, "Cowboy Bebop".to_string()));
        bus.emit(EpisodesReconciled::new(1, None, 0, 0));

        let log = bus.get_event_log();
        assert_eq!(log.len(), 2);
        assert_eq!((log[0].event_type.as_str(), log[0].handler_count), ("TitleLoaded", 1));
        assert_eq!((log[1].event_type.as_str(), log[1].handler_count), ("EpisodesReconciled", 0));

        bus.clear_event_log();
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_panicking_listener_does_not_silence_others() {
        let bus = EventBus::new();
        let titles = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe::<TitleLoaded, _>(|event| panic!("cannot render {}", event.title));
        let sink = Arc::clone(&titles);
        bus.subscribe::<TitleLoaded, _>(move |event| sink.lock().unwrap().push(event.title.clone()));

        bus.emit(TitleLoaded::new(2, "Mushishi".to_string()));
        bus.emit(TitleLoaded::new(3, "Trigun".to_string()));

        assert_eq!(*titles.lock().unwrap(), vec!["Mushishi", "Trigun"]);
    }

    #[test]
    fn test_clones_share_handlers_and_log() {
        let bus = EventBus::new();
        let service_side = bus.clone();

        bus.subscribe::<TitleLoaded, _>(|_| {});
        service_side.emit(TitleLoaded::new(4, "Kino".to_string()));

        assert_eq!(service_side.subscriber_count::<TitleLoaded>(), 1);
        assert_eq!(service_side.subscriber_count::<EpisodesReconciled>(), 0);
        assert_eq!(bus.get_event_log().len(), 1);
    }
}
