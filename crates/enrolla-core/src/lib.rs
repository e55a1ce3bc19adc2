//! Core systems for Enrolla.
//!
//! This crate provides the foundational components of the Enrolla booking
//! engine:
//!
//! - **Signal/Slot System**: Type-safe notification between the engine and
//!   its host (step changes, validation failures, completed bookings)
//! - **Timers**: A one-shot deadline queue used to model the simulated
//!   submission latency
//! - **Logging targets**: `tracing` target constants for filtering
//!
//! Everything here is domain-free; the booking semantics live in the
//! `enrolla` crate.
//!
//! # Signal/Slot Example
//!
//! ```
//! use enrolla_core::Signal;
//!
//! // Create a signal that notifies when a step changes
//! let step_changed = Signal::<usize>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = step_changed.connect(|step| {
//!     println!("Now on step {}", step);
//! });
//!
//! // Emit the signal
//! step_changed.emit(2);
//!
//! // Disconnect when done
//! step_changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use enrolla_core::TimerQueue;
//! use std::time::{Duration, Instant};
//!
//! let mut timers = TimerQueue::new();
//! let id = timers.start(Duration::from_millis(800));
//!
//! // The host drives the queue from its event loop; expired timers are
//! // returned in fire order.
//! let fired = timers.process_expired_at(Instant::now() + Duration::from_secs(1));
//! assert_eq!(fired, vec![id]);
//! ```

mod error;
pub mod logging;
pub mod signal;
mod timer;

pub use error::{CoreError, Result, TimerError};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{TimerId, TimerQueue};
