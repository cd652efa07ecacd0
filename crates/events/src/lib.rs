//! Campus notification channel.
//!
//! Every async operation of the console reports through here:
//!
//! - [`NotificationBus`]: fan-out of [`Notification`]s over
//!   `tokio::sync::broadcast`.
//! - [`Operation`]: returned by [`NotificationBus::begin`]; owes exactly one
//!   terminal message.
//! - [`NotificationLogger`]: mirrors the bus into the tracing log.

pub mod bus;
pub mod lifecycle;
pub mod logger;

pub use bus::{Notification, NotificationBus, NotificationKind, OperationId};
pub use lifecycle::{LifecycleMessages, Operation};
pub use logger::NotificationLogger;
