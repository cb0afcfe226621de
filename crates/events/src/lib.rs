//! Domain events for stock movements.
//!
//! Events are facts produced by aggregates; envelopes add the stream metadata
//! a ledger or outbox needs to order and de-duplicate them.

pub mod envelope;
pub mod event;

pub use envelope::EventEnvelope;
pub use event::Event;
