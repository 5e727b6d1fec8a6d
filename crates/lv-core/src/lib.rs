//! Core functionality for the logbook viewer
//!
//! This crate provides the UI-independent building blocks shared by the data
//! and view layers: the notification bus, debounced execution, range selector
//! semantics, pagination and viewer configuration.

pub mod config;
pub mod debounce;
pub mod events;
pub mod pagination;
pub mod range;

// Re-export commonly used types
pub use config::{ConfigError, SortSpec, ViewerConfig};
pub use debounce::{schedule, Debouncer, ScheduledTask, DEFAULT_QUIET_WINDOW};
pub use events::{handler_for, Event, EventBus, EventHandler};
pub use pagination::{PageSummary, Pager, DEFAULT_PAGE_WINDOW};
pub use range::{DistanceRange, RangeSelector, SliderScale, YearRange};
