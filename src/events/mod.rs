// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: EventHandler is INTERNAL and must NOT be exported

// ============================================================================
// EVENT INFRASTRUCTURE
// ============================================================================

pub mod bus;
pub mod types;

// ============================================================================
// CATALOG EVENTS
// ============================================================================

pub mod catalog_events;

// ============================================================================
// PUBLIC EXPORTS - Event Types and Bus Only
// ============================================================================

pub use types::DomainEvent;

pub use catalog_events::{EpisodesReconciled, TitleLoaded};

pub use bus::{EventBus, EventLogEntry};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
