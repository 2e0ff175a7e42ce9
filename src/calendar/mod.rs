pub mod event;
pub mod persist;
pub mod projection;
pub mod query;
pub mod store;

pub use event::{CalendarEvent, EventDraft, EventType, ValidationError};
pub use projection::{NextEventSummary, Projection};
pub use query::WeekStart;
pub use store::{EventStore, StoreChange};
