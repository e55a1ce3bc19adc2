//! Prelude module for Enrolla.
//!
//! This module re-exports the most commonly used types for convenient
//! importing:
//!
//! ```ignore
//! use enrolla::prelude::*;
//! ```

// ============================================================================
// Catalog
// ============================================================================

pub use crate::catalog::{Catalog, CatalogView, Course, DateRange, PriceBand};

// ============================================================================
// Wizard
// ============================================================================

pub use crate::wizard::{
    BookingBackend, BookingRecord, BookingWizard, FieldKind, FieldSpec, Intent, StepReport,
    StepSpec, SummaryRow, WizardConfig, WizardPhase,
};

// ============================================================================
// Surface and Overlays
// ============================================================================

pub use crate::focus::FocusRing;
pub use crate::overlay::{OverlayHandle, OverlayStack};
pub use crate::surface::{FormSurface, MemorySurface};

// ============================================================================
// Surrounding Concerns
// ============================================================================

pub use crate::calendar::CalendarInvite;
pub use crate::prefill::PrefillEcho;

// ============================================================================
// Errors and Core Re-exports
// ============================================================================

pub use crate::{Error, Result};
pub use enrolla_core::{Signal, TimerQueue};
