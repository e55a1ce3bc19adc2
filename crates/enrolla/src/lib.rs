//! Enrolla: a headless booking-flow engine for course marketing sites.
//!
//! Enrolla owns the interaction logic a booking page keeps reinventing:
//!
//! - **Wizard state machine**: a linear multi-step form with per-step
//!   validation, backward navigation that never blocks, and a simulated
//!   submission latency guarded by a generation token
//! - **Overlay / focus controller**: focus-trapped panels with stack
//!   discipline, scroll locking, and focus restoration on close
//! - **Summary projection**: the read-only confirmation view of a booking,
//!   omitting rows the user never filled in
//! - **Catalog**: the static course list, with the consolidated
//!   search/filter view behind every browse surface
//! - **Surrounding concerns**: prefill echo, calendar-invite generation,
//!   contextual-help placement
//!
//! The engine is headless: it drives any host that implements
//! [`surface::FormSurface`], from a real DOM binding to the bundled
//! [`surface::MemorySurface`]. All state transitions happen on discrete
//! host events; the only timer is the submission latency, pumped by the
//! host's event loop.
//!
//! # A booking, end to end
//!
//! ```
//! use enrolla::catalog::Catalog;
//! use enrolla::surface::{FormSurface, MemorySurface};
//! use enrolla::wizard::{BookingWizard, WizardConfig};
//! use std::time::{Duration, Instant};
//!
//! // A host page: one overlay panel with three step containers.
//! let mut surface = MemorySurface::new();
//! surface
//!     .add_container("page", None)
//!     .add_container("booking-panel", None)
//!     .add_container("booking-step-1", Some("booking-panel"))
//!     .add_container("booking-step-2", Some("booking-panel"))
//!     .add_container("booking-step-3", Some("booking-panel"))
//!     .add_container("booking-busy", Some("booking-panel"))
//!     .add_container("booking-confirmation", None);
//! surface.add_control("page", "book-now");
//! surface.add_control("booking-step-1", "name");
//! surface.add_control("booking-step-2", "email");
//! surface.add_control("booking-step-2", "phone");
//! surface.add_control("booking-step-3", "notes");
//! surface.add_control("booking-panel", "confirm-booking");
//! surface.set_visible("booking-panel", false);
//! surface.set_visible("booking-confirmation", false);
//!
//! let catalog = Catalog::from_json_str(r#"{
//!     "courses": [{
//!         "id": "api-design", "title": "RESTful API Design",
//!         "instructor": "Aisha Patel", "category": "engineering",
//!         "start_date": "2026-01-08", "duration_days": 2,
//!         "price_cents": 79900, "capacity": 20, "remaining": 18,
//!         "summary": ""
//!     }]
//! }"#).unwrap();
//!
//! let mut wizard =
//!     BookingWizard::new(WizardConfig::standard().with_latency(Duration::from_millis(1)));
//! wizard.open(&mut surface, catalog.get("api-design").unwrap()).unwrap();
//! wizard.settle(&mut surface);
//!
//! surface.set_field_value("name", "Ada Lovelace");
//! assert!(wizard.advance(&mut surface));
//! surface.set_field_value("email", "ada@example.com");
//! assert!(wizard.advance(&mut surface));
//!
//! assert!(wizard.submit(&mut surface));
//! wizard.pump_at(&mut surface, Instant::now() + Duration::from_secs(1));
//! assert!(surface.is_visible("booking-confirmation"));
//! ```

pub mod calendar;
pub mod catalog;
mod error;
pub mod focus;
pub mod help;
pub mod overlay;
pub mod prefill;
pub mod surface;
pub mod wizard;

pub mod prelude;

pub use error::{Error, Result};
