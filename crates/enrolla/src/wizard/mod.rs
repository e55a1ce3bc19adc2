//! The multi-step booking wizard.
//!
//! [`BookingWizard`] owns one booking attempt: which step is active, the
//! field values accumulated so far, and the course being booked. Forward
//! navigation is gated by synchronous per-step validation; backward
//! navigation never is. Submission runs through a [`BookingBackend`] after a
//! simulated latency, guarded by a generation token so a cancelled wizard
//! can never be resurrected by a late completion.
//!
//! # Phases
//!
//! ```text
//! Closed -> Step(1) -> Step(2) -> ... -> Step(N) -> Submitting -> Completed
//!              ^                           |
//!              +------- cancel() ----------+   (from any Step or Submitting)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use enrolla::wizard::{BookingWizard, WizardConfig};
//!
//! let mut wizard = BookingWizard::new(WizardConfig::standard());
//! wizard.step_changed.connect(|(step, title)| {
//!     println!("Step {}: {}", step, title);
//! });
//!
//! wizard.open(&mut surface, course)?;
//! wizard.settle(&mut surface);
//! // ...host routes advance/retreat/submit/cancel intents...
//! ```

mod fields;
pub mod summary;

pub use fields::{FieldError, FieldKind, FieldOutcome, FieldSpec, StepReport};
pub use summary::SummaryRow;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use enrolla_core::{Signal, TimerId, TimerQueue};

use crate::catalog::Course;
use crate::error::{Error, Result};
use crate::focus::FocusRing;
use crate::overlay::OverlayStack;
use crate::surface::FormSurface;

/// Seconds a user is assumed to spend per remaining step.
const SECONDS_PER_STEP: u64 = 45;

// ============================================================================
// Configuration
// ============================================================================

/// One step of the wizard.
#[derive(Debug, Clone)]
pub struct StepSpec {
    /// Human-readable step title, used for progress and announcements.
    pub title: String,
    /// Container name of the step's panel on the surface.
    pub container: String,
    /// Inputs collected by this step.
    pub fields: Vec<FieldSpec>,
}

impl StepSpec {
    /// Create a step with no fields.
    pub fn new(title: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            container: container.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field using the builder pattern.
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }
}

/// Wizard configuration: panels, controls, steps, and simulated latency.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Overlay container holding the whole wizard.
    pub panel: String,
    /// Container shown once a booking completes.
    pub confirmation_panel: String,
    /// The submit trigger control, disabled while submitting.
    pub submit_control: String,
    /// Busy indicator container shown while submitting.
    pub busy_indicator: String,
    /// Ordered steps.
    pub steps: Vec<StepSpec>,
    /// Simulated latency between submission and completion.
    pub latency: Duration,
}

impl WizardConfig {
    /// The standard three-step booking flow.
    pub fn standard() -> Self {
        Self {
            panel: "booking-panel".to_string(),
            confirmation_panel: "booking-confirmation".to_string(),
            submit_control: "confirm-booking".to_string(),
            busy_indicator: "booking-busy".to_string(),
            steps: vec![
                StepSpec::new("Your Info", "booking-step-1")
                    .with_field(FieldSpec::new("name", "Name", FieldKind::FullName)),
                StepSpec::new("Contact", "booking-step-2")
                    .with_field(FieldSpec::new("email", "Email", FieldKind::Email))
                    .with_field(FieldSpec::new("phone", "Phone", FieldKind::Phone)),
                StepSpec::new("Confirm", "booking-step-3")
                    .with_field(FieldSpec::new("notes", "Notes", FieldKind::Optional)),
            ],
            latency: Duration::from_millis(1500),
        }
    }

    /// Override the simulated latency using the builder pattern.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

// ============================================================================
// Phases and records
// ============================================================================

/// The wizard's lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardPhase {
    /// No booking attempt in progress.
    #[default]
    Closed,
    /// Collecting input on a step (1-based).
    Step(usize),
    /// Submission in flight (simulated latency running).
    Submitting,
    /// Booking confirmed.
    Completed,
}

/// A completed booking, handed to [`BookingWizard::submitted`] consumers.
#[derive(Debug, Clone)]
pub struct BookingRecord {
    /// The booked course.
    pub course: Course,
    /// Collected field values by name, in step/field declaration order.
    pub fields: Vec<(String, String)>,
    /// The confirmation projection (course rows plus non-empty fields).
    pub rows: Vec<SummaryRow>,
}

impl BookingRecord {
    /// Look up a collected field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Named user intents the host's event wiring maps onto the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Validate the current step and move forward.
    Advance,
    /// Move backward without validation.
    Retreat,
    /// Validate the final step and submit.
    Submit,
    /// Abandon the booking attempt.
    Cancel,
    /// Cycle the focus trap (`true` for Shift+Tab).
    Tab { backward: bool },
    /// Close the overlay unconditionally.
    Escape,
    /// A field lost focus or changed; revalidate just that field.
    FieldChanged(String),
}

// ============================================================================
// Backend seam
// ============================================================================

/// Where completed bookings go.
///
/// The engine ships with [`SimulatedBackend`]; a host with a real API swaps
/// in its own implementation without touching the state machine. A failure
/// returns the wizard to the final step with the message surfaced through
/// [`BookingWizard::submit_failed`].
pub trait BookingBackend: Send {
    /// Accept or reject a booking. The record is already validated.
    fn submit(&mut self, record: &BookingRecord) -> std::result::Result<(), String>;
}

/// The no-op backend: every booking succeeds after the configured latency.
#[derive(Debug, Default)]
pub struct SimulatedBackend;

impl BookingBackend for SimulatedBackend {
    fn submit(&mut self, _record: &BookingRecord) -> std::result::Result<(), String> {
        Ok(())
    }
}

// ============================================================================
// BookingWizard
// ============================================================================

/// In-flight submission bookkeeping.
#[derive(Debug, Clone, Copy)]
struct PendingSubmit {
    timer: TimerId,
    /// Generation token captured at submit time; stale completions no-op.
    token: u64,
}

/// The booking wizard state machine.
///
/// # Signals
///
/// - [`step_changed`](Self::step_changed) `(step, title)`: emitted on every
///   step transition, matching the screen-reader announcement
/// - [`validation_failed`](Self::validation_failed): emitted when a forward
///   transition is blocked, with every failing field
/// - [`submitted`](Self::submitted): emitted once a booking completes, with
///   the full record
/// - [`submit_failed`](Self::submit_failed): emitted when the backend
///   rejects a booking
/// - [`completed`](Self::completed): emitted after `submitted`
/// - [`cancelled`](Self::cancelled): emitted when the attempt is abandoned
pub struct BookingWizard {
    config: WizardConfig,
    phase: WizardPhase,
    course: Option<Course>,
    fields: HashMap<String, String>,
    overlays: OverlayStack,
    timers: TimerQueue,
    /// Bumped on every `open()`; mints the submission token.
    generation: u64,
    pending: Option<PendingSubmit>,
    backend: Box<dyn BookingBackend>,

    /// Emitted on every step transition with `(step, title)`.
    pub step_changed: Signal<(usize, String)>,
    /// Emitted when forward navigation is blocked by validation.
    pub validation_failed: Signal<StepReport>,
    /// Emitted when a booking completes successfully.
    pub submitted: Signal<BookingRecord>,
    /// Emitted when the backend rejects a booking.
    pub submit_failed: Signal<String>,
    /// Emitted after `submitted`, once the confirmation panel is up.
    pub completed: Signal<()>,
    /// Emitted when the attempt is abandoned.
    pub cancelled: Signal<()>,
}

impl BookingWizard {
    /// Create a wizard with the simulated backend.
    pub fn new(config: WizardConfig) -> Self {
        Self::with_backend(config, Box::new(SimulatedBackend))
    }

    /// Create a wizard with a custom backend.
    pub fn with_backend(config: WizardConfig, backend: Box<dyn BookingBackend>) -> Self {
        Self {
            config,
            phase: WizardPhase::Closed,
            course: None,
            fields: HashMap::new(),
            overlays: OverlayStack::new(),
            timers: TimerQueue::new(),
            generation: 0,
            pending: None,
            backend,
            step_changed: Signal::new(),
            validation_failed: Signal::new(),
            submitted: Signal::new(),
            submit_failed: Signal::new(),
            completed: Signal::new(),
            cancelled: Signal::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current phase.
    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    /// The active step (1-based), if on one.
    pub fn current_step(&self) -> Option<usize> {
        match self.phase {
            WizardPhase::Step(step) => Some(step),
            _ => None,
        }
    }

    /// Total number of steps.
    pub fn step_count(&self) -> usize {
        self.config.steps.len()
    }

    /// The course being booked, if the wizard is open.
    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    /// A collected field value.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The step title for a 1-based step index.
    pub fn step_title(&self, step: usize) -> Option<&str> {
        self.config.steps.get(step - 1).map(|s| s.title.as_str())
    }

    /// Progress through the wizard as a percentage.
    pub fn progress_percent(&self) -> f32 {
        match self.phase {
            WizardPhase::Step(step) => {
                (step as f32 / self.config.steps.len().max(1) as f32) * 100.0
            }
            WizardPhase::Submitting | WizardPhase::Completed => 100.0,
            WizardPhase::Closed => 0.0,
        }
    }

    /// Remaining-time hint, e.g. `About 2 min remaining`.
    pub fn time_estimate_text(&self) -> Option<String> {
        let step = self.current_step()?;
        let remaining = (self.step_count().saturating_sub(step) as u64) * SECONDS_PER_STEP;
        Some(if remaining > 60 {
            format!("About {} min remaining", remaining.div_ceil(60))
        } else {
            format!("About {remaining} seconds remaining")
        })
    }

    /// The read-only summary projection for the current attempt.
    ///
    /// Empty until a course is selected; the final step renders this.
    pub fn summary(&self) -> Vec<SummaryRow> {
        match &self.course {
            Some(course) => summary::project(course, &self.config.steps, &self.fields),
            None => Vec::new(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open the wizard for a course.
    ///
    /// Refuses (no state transition, no overlay) when the course is sold
    /// out. Opening while already open abandons the previous attempt first,
    /// exactly as selecting a new course does.
    pub fn open<S: FormSurface + ?Sized>(&mut self, surface: &mut S, course: &Course) -> Result<()> {
        if course.is_sold_out() {
            tracing::info!(course = %course.id, "open refused: sold out");
            return Err(Error::SoldOut {
                id: course.id.clone(),
            });
        }

        if self.phase != WizardPhase::Closed && self.phase != WizardPhase::Completed {
            self.reset(surface);
        }

        self.generation += 1;
        self.fields.clear();
        self.pending = None;
        self.course = Some(course.clone());
        self.phase = WizardPhase::Step(1);

        surface.set_visible(&self.config.confirmation_panel, false);
        self.overlays.open(surface, &self.config.panel);
        self.show_only_step(surface, 1);
        self.announce_step(surface, 1);

        tracing::debug!(course = %course.id, generation = self.generation, "wizard opened");
        Ok(())
    }

    /// Run the deferred focus pass after the host has laid the panel out.
    pub fn settle<S: FormSurface + ?Sized>(&mut self, surface: &mut S) {
        self.overlays.settle(surface);
    }

    /// Route a named intent to the matching transition.
    ///
    /// Returns that transition's own result: whether navigation happened,
    /// whether the tab keypress was consumed, or whether the revalidated
    /// field passed.
    pub fn dispatch<S: FormSurface + ?Sized>(&mut self, surface: &mut S, intent: Intent) -> bool {
        match intent {
            Intent::Advance => self.advance(surface),
            Intent::Retreat => self.retreat(surface),
            Intent::Submit => self.submit(surface),
            Intent::Cancel | Intent::Escape => self.cancel(surface),
            Intent::Tab { backward } => self.overlays.handle_tab(surface, backward),
            Intent::FieldChanged(name) => self.revalidate_field(surface, &name),
        }
    }

    /// Validate the current step and move forward.
    ///
    /// On failure the step does not change: every failing field is
    /// annotated, focus moves to the first one, and
    /// [`validation_failed`](Self::validation_failed) fires.
    pub fn advance<S: FormSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let WizardPhase::Step(step) = self.phase else {
            return false;
        };

        if !self.run_validation(surface, step) {
            return false;
        }
        self.persist_step(surface, step);

        if step >= self.config.steps.len() {
            // Already on the last step; submission is a separate intent.
            return false;
        }

        self.phase = WizardPhase::Step(step + 1);
        self.transition_panels(surface, step, step + 1);
        true
    }

    /// Move backward one step. Never validates, never blocked.
    pub fn retreat<S: FormSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let WizardPhase::Step(step) = self.phase else {
            return false;
        };
        if step <= 1 {
            return false;
        }

        self.persist_step(surface, step);
        self.phase = WizardPhase::Step(step - 1);
        self.transition_panels(surface, step, step - 1);
        true
    }

    /// Re-validate the final step and start submission.
    ///
    /// On success the wizard enters `Submitting`: the trigger control is
    /// disabled, the busy indicator shown, and completion arrives through
    /// [`pump`](Self::pump) after the configured latency.
    pub fn submit<S: FormSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let last = self.config.steps.len();
        if self.phase != WizardPhase::Step(last) {
            return false;
        }

        if !self.run_validation(surface, last) {
            return false;
        }
        self.persist_step(surface, last);

        self.phase = WizardPhase::Submitting;
        if !surface.set_enabled(&self.config.submit_control, false) {
            tracing::warn!(control = %self.config.submit_control, "submit control missing");
        }
        surface.set_visible(&self.config.busy_indicator, true);

        let timer = self.timers.start(self.config.latency);
        self.pending = Some(PendingSubmit {
            timer,
            token: self.generation,
        });
        tracing::debug!(?timer, token = self.generation, "submission started");
        true
    }

    /// Abandon the current attempt.
    ///
    /// Valid from any step and from `Submitting`; the pending completion is
    /// invalidated by the generation token rather than cancelled, so a late
    /// timer fire cannot resurrect the wizard.
    pub fn cancel<S: FormSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        match self.phase {
            WizardPhase::Closed | WizardPhase::Completed => false,
            WizardPhase::Step(_) | WizardPhase::Submitting => {
                self.reset(surface);
                self.cancelled.emit(());
                true
            }
        }
    }

    /// Drive pending submission timers, completing any that are due.
    pub fn pump<S: FormSurface + ?Sized>(&mut self, surface: &mut S) {
        self.pump_at(surface, Instant::now());
    }

    /// [`pump`](Self::pump) against an explicit clock, for deterministic tests.
    pub fn pump_at<S: FormSurface + ?Sized>(&mut self, surface: &mut S, now: Instant) {
        for timer in self.timers.process_expired_at(now) {
            self.on_timer(surface, timer);
        }
    }

    /// Time until the next pending timer, for hosts scheduling their pump.
    pub fn time_until_next_timer(&mut self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    // =========================================================================
    // Internal transitions
    // =========================================================================

    fn on_timer<S: FormSurface + ?Sized>(&mut self, surface: &mut S, timer: TimerId) {
        let Some(pending) = self.pending else {
            tracing::debug!(?timer, "timer fired with no pending submission, ignoring");
            return;
        };
        if pending.timer != timer {
            tracing::debug!(?timer, "unrelated timer fired, ignoring");
            return;
        }
        if pending.token != self.generation || self.phase != WizardPhase::Submitting {
            // The wizard was cancelled or reopened while the submission
            // latency ran; the completion is stale and must not apply.
            tracing::debug!(
                stale_token = pending.token,
                generation = self.generation,
                "stale submission completion ignored"
            );
            self.pending = None;
            return;
        }
        self.pending = None;

        let record = self.build_record();
        match self.backend.submit(&record) {
            Ok(()) => self.complete(surface, record),
            Err(message) => self.fail_submission(surface, message),
        }
    }

    fn complete<S: FormSurface + ?Sized>(&mut self, surface: &mut S, record: BookingRecord) {
        surface.set_visible(&self.config.busy_indicator, false);
        surface.set_enabled(&self.config.submit_control, true);

        // The confirmation replaces the wizard; closing the overlay hands
        // focus back to the page.
        self.overlays.close(surface, &self.config.panel);
        surface.set_visible(&self.config.confirmation_panel, true);

        self.phase = WizardPhase::Completed;
        self.course = None;
        self.fields.clear();

        tracing::info!(course = %record.course.id, "booking completed");
        self.submitted.emit(record);
        self.completed.emit(());
    }

    fn fail_submission<S: FormSurface + ?Sized>(&mut self, surface: &mut S, message: String) {
        surface.set_visible(&self.config.busy_indicator, false);
        surface.set_enabled(&self.config.submit_control, true);
        self.phase = WizardPhase::Step(self.config.steps.len());

        tracing::warn!(%message, "booking submission failed");
        self.submit_failed.emit(message);
    }

    fn reset<S: FormSurface + ?Sized>(&mut self, surface: &mut S) {
        surface.set_visible(&self.config.busy_indicator, false);
        surface.set_enabled(&self.config.submit_control, true);
        if self.overlays.is_open(&self.config.panel) {
            self.overlays.close(surface, &self.config.panel);
        }

        self.phase = WizardPhase::Closed;
        self.course = None;
        self.fields.clear();
        self.pending = None;
    }

    /// Validate every field of a step, annotating all of them.
    ///
    /// Returns `true` when the step passes. On failure focus moves to the
    /// first failing field in declaration order.
    fn run_validation<S: FormSurface + ?Sized>(&mut self, surface: &mut S, step: usize) -> bool {
        let Some(spec) = self.config.steps.get(step - 1) else {
            return false;
        };

        let mut report = StepReport::valid();
        for field in &spec.fields {
            let Some(value) = surface.field_value(&field.name) else {
                tracing::warn!(field = %field.name, "field control missing, skipping validation");
                continue;
            };
            let outcome = field.kind.validate(&value);
            surface.set_field_error(&field.name, outcome.message.as_deref());
            if let Some(message) = outcome.message {
                report.add_error(&field.name, message);
            }
        }

        if report.is_valid() {
            return true;
        }

        if let Some(first) = report.first_invalid() {
            surface.focus(first);
        }
        self.validation_failed.emit(report);
        false
    }

    /// Revalidate one field of the current step (blur/input wiring).
    fn revalidate_field<S: FormSurface + ?Sized>(&mut self, surface: &mut S, name: &str) -> bool {
        let Some(step) = self.current_step() else {
            return false;
        };
        let Some(field) = self.config.steps[step - 1]
            .fields
            .iter()
            .find(|f| f.name == name)
        else {
            return false;
        };

        let Some(value) = surface.field_value(name) else {
            return false;
        };
        let outcome = field.kind.validate(&value);
        surface.set_field_error(name, outcome.message.as_deref());
        outcome.valid
    }

    /// Copy a step's current surface values into the accumulated fields.
    fn persist_step<S: FormSurface + ?Sized>(&mut self, surface: &mut S, step: usize) {
        let Some(spec) = self.config.steps.get(step - 1) else {
            return;
        };
        for field in &spec.fields {
            match surface.field_value(&field.name) {
                Some(value) => {
                    self.fields
                        .insert(field.name.clone(), value.trim().to_string());
                }
                None => {
                    tracing::warn!(field = %field.name, "field control missing, value not kept");
                }
            }
        }
    }

    fn transition_panels<S: FormSurface + ?Sized>(&mut self, surface: &mut S, from: usize, to: usize) {
        if let Some(spec) = self.config.steps.get(from - 1) {
            surface.set_visible(&spec.container, false);
        }
        if let Some(spec) = self.config.steps.get(to - 1) {
            surface.set_visible(&spec.container, true);
        }
        self.announce_step(surface, to);
        self.focus_first_in_step(surface, to);
    }

    fn show_only_step<S: FormSurface + ?Sized>(&mut self, surface: &mut S, step: usize) {
        for (i, spec) in self.config.steps.iter().enumerate() {
            surface.set_visible(&spec.container, i + 1 == step);
        }
    }

    fn focus_first_in_step<S: FormSurface + ?Sized>(&mut self, surface: &mut S, step: usize) {
        let Some(spec) = self.config.steps.get(step - 1) else {
            return;
        };
        let ring = FocusRing::capture(surface, &spec.container);
        if let Some(first) = ring.first() {
            surface.focus(first);
        }
    }

    fn announce_step<S: FormSurface + ?Sized>(&mut self, surface: &mut S, step: usize) {
        let total = self.config.steps.len();
        let title = self
            .step_title(step)
            .unwrap_or_default()
            .to_string();
        surface.announce(&format!("Step {step} of {total}: {title}"));
        self.step_changed.emit((step, title));
    }

    fn build_record(&self) -> BookingRecord {
        let course = self.course.clone().expect("submitting without a course");
        let mut fields = Vec::new();
        for step in &self.config.steps {
            for field in &step.fields {
                if let Some(value) = self.fields.get(&field.name) {
                    fields.push((field.name.clone(), value.clone()));
                }
            }
        }
        let rows = summary::project(&course, &self.config.steps, &self.fields);
        BookingRecord {
            course,
            fields,
            rows,
        }
    }
}

impl std::fmt::Debug for BookingWizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingWizard")
            .field("phase", &self.phase)
            .field("course", &self.course.as_ref().map(|c| c.id.as_str()))
            .field("fields", &self.fields)
            .field("generation", &self.generation)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_fixtures::sample_catalog;
    use crate::surface::MemorySurface;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn booking_surface() -> MemorySurface {
        let mut s = MemorySurface::new();
        s.add_container("page", None)
            .add_container("booking-panel", None)
            .add_container("booking-step-1", Some("booking-panel"))
            .add_container("booking-step-2", Some("booking-panel"))
            .add_container("booking-step-3", Some("booking-panel"))
            .add_container("booking-busy", Some("booking-panel"))
            .add_container("booking-confirmation", None);
        s.add_control("page", "book-now");
        s.add_control("booking-step-1", "name");
        s.add_control("booking-step-2", "email")
            .add_control("booking-step-2", "phone");
        s.add_control("booking-step-3", "notes");
        s.add_control("booking-panel", "back-button")
            .add_control("booking-panel", "next-button")
            .add_control("booking-panel", "confirm-booking");
        s.set_visible("booking-panel", false);
        s.set_visible("booking-busy", false);
        s.set_visible("booking-confirmation", false);
        s
    }

    fn wizard() -> BookingWizard {
        BookingWizard::new(WizardConfig::standard().with_latency(Duration::from_secs(2)))
    }

    /// Drive a freshly opened wizard to the last step with valid values.
    fn fill_to_last_step(wizard: &mut BookingWizard, s: &mut MemorySurface) {
        s.set_field_value("name", "Ada Lovelace");
        assert!(wizard.advance(s));
        s.set_field_value("email", "ada@example.com");
        assert!(wizard.advance(s));
    }

    #[test]
    fn test_open_refuses_sold_out_course() {
        let catalog = sample_catalog();
        let sold_out = catalog.get("ux-research").unwrap();
        let mut s = booking_surface();
        let mut wizard = wizard();

        let err = wizard.open(&mut s, sold_out).unwrap_err();
        assert!(matches!(err, Error::SoldOut { .. }));
        assert_eq!(wizard.phase(), WizardPhase::Closed);
        assert!(!s.is_visible("booking-panel"));
        assert!(!s.is_scroll_locked());
    }

    #[test]
    fn test_open_starts_at_step_one_and_announces() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        s.focus("book-now");
        let mut wizard = wizard();

        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();
        assert_eq!(wizard.phase(), WizardPhase::Step(1));
        assert!(s.is_visible("booking-step-1"));
        assert!(!s.is_visible("booking-step-2"));
        assert!(s.is_scroll_locked());
        assert_eq!(s.last_announcement(), Some("Step 1 of 3: Your Info"));

        wizard.settle(&mut s);
        assert_eq!(s.focused().as_deref(), Some("name"));
    }

    #[test]
    fn test_advance_blocked_by_validation() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();

        let failures = Arc::new(AtomicUsize::new(0));
        let failures_clone = failures.clone();
        wizard.validation_failed.connect(move |report| {
            assert_eq!(report.errors().len(), 1);
            failures_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!wizard.advance(&mut s));
        assert_eq!(wizard.phase(), WizardPhase::Step(1));
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert_eq!(s.focused().as_deref(), Some("name"));
        assert!(s.field_error("name").unwrap().contains("enter your name"));
    }

    #[test]
    fn test_advance_moves_one_step_at_a_time() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();

        let steps_seen = Arc::new(Mutex::new(Vec::new()));
        let steps_clone = steps_seen.clone();
        wizard.step_changed.connect(move |(step, title)| {
            steps_clone.lock().unwrap().push((*step, title.clone()));
        });

        s.set_field_value("name", "Ada Lovelace");
        assert!(wizard.advance(&mut s));
        assert_eq!(wizard.phase(), WizardPhase::Step(2));

        s.set_field_value("email", "ada@example.com");
        assert!(wizard.advance(&mut s));
        assert_eq!(wizard.phase(), WizardPhase::Step(3));

        // Advancing past the last step is not a transition.
        assert!(!wizard.advance(&mut s));
        assert_eq!(wizard.phase(), WizardPhase::Step(3));

        assert_eq!(
            *steps_seen.lock().unwrap(),
            vec![(2, "Contact".to_string()), (3, "Confirm".to_string())]
        );
    }

    #[test]
    fn test_every_failing_field_is_annotated() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();

        s.set_field_value("name", "Ada Lovelace");
        wizard.advance(&mut s);

        // Email empty, phone garbage: both reported, focus on the first.
        s.set_field_value("phone", "call me maybe");
        assert!(!wizard.advance(&mut s));
        assert!(s.field_error("email").unwrap().contains("need your email"));
        assert!(s.field_error("phone").unwrap().contains("valid phone number"));
        assert_eq!(s.focused().as_deref(), Some("email"));
    }

    #[test]
    fn test_email_format_gate() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();
        s.set_field_value("name", "Ada Lovelace");
        wizard.advance(&mut s);

        s.set_field_value("email", "not-an-email");
        assert!(!wizard.advance(&mut s));
        assert!(s.field_error("email").unwrap().contains("email format"));

        s.set_field_value("email", "a@b.co");
        assert!(wizard.advance(&mut s));
        assert_eq!(wizard.phase(), WizardPhase::Step(3));
    }

    #[test]
    fn test_retreat_then_advance_round_trips_fields() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();

        s.set_field_value("name", "Ada Lovelace");
        wizard.advance(&mut s);
        s.set_field_value("email", "ada@example.com");
        s.set_field_value("phone", "+1 555-123-4567");

        assert!(wizard.retreat(&mut s));
        assert_eq!(wizard.phase(), WizardPhase::Step(1));
        assert!(wizard.advance(&mut s));
        assert_eq!(wizard.phase(), WizardPhase::Step(2));

        assert_eq!(wizard.field("name"), Some("Ada Lovelace"));
        assert_eq!(wizard.field("email"), Some("ada@example.com"));
        assert_eq!(wizard.field("phone"), Some("+1 555-123-4567"));

        // Backward navigation from the first step is refused.
        wizard.retreat(&mut s);
        assert!(!wizard.retreat(&mut s));
    }

    #[test]
    fn test_submit_transitions_through_submitting_to_completed() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        s.focus("book-now");
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();
        fill_to_last_step(&mut wizard, &mut s);
        s.set_field_value("notes", "Invoice to HQ");

        let record_cell: Arc<Mutex<Option<BookingRecord>>> = Arc::new(Mutex::new(None));
        let record_clone = record_cell.clone();
        wizard.submitted.connect(move |record| {
            *record_clone.lock().unwrap() = Some(record.clone());
        });
        let completions = Arc::new(AtomicUsize::new(0));
        let completions_clone = completions.clone();
        wizard.completed.connect(move |()| {
            completions_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(wizard.submit(&mut s));
        assert_eq!(wizard.phase(), WizardPhase::Submitting);
        assert!(!s.is_enabled("confirm-booking"));
        assert!(s.is_visible("booking-busy"));
        assert_eq!(completions.load(Ordering::SeqCst), 0);

        // Before the latency elapses, nothing completes.
        wizard.pump_at(&mut s, Instant::now());
        assert_eq!(wizard.phase(), WizardPhase::Submitting);

        wizard.pump_at(&mut s, Instant::now() + Duration::from_secs(10));
        assert_eq!(wizard.phase(), WizardPhase::Completed);
        assert_eq!(completions.load(Ordering::SeqCst), 1);
        assert!(s.is_visible("booking-confirmation"));
        assert!(!s.is_visible("booking-panel"));
        // Focus returned to the invoking control.
        assert_eq!(s.focused().as_deref(), Some("book-now"));

        let record = record_cell.lock().unwrap().clone().unwrap();
        assert_eq!(record.course.id, "design-systems");
        assert_eq!(record.field("name"), Some("Ada Lovelace"));
        assert_eq!(record.field("email"), Some("ada@example.com"));
        assert_eq!(record.field("notes"), Some("Invoice to HQ"));
        // Projection holds exactly the non-empty collected fields.
        let labels: Vec<_> = record.rows.iter().map(|r| r.label.as_str()).collect();
        assert!(labels.contains(&"Name") && labels.contains(&"Notes"));
        assert!(!labels.contains(&"Phone"));
    }

    #[test]
    fn test_cancel_during_submitting_invalidates_completion() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();
        fill_to_last_step(&mut wizard, &mut s);

        let completions = Arc::new(AtomicUsize::new(0));
        let completions_clone = completions.clone();
        wizard.completed.connect(move |()| {
            completions_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(wizard.submit(&mut s));
        assert!(wizard.cancel(&mut s));
        assert_eq!(wizard.phase(), WizardPhase::Closed);

        // The latency timer still fires, but the completion is stale.
        wizard.pump_at(&mut s, Instant::now() + Duration::from_secs(10));
        assert_eq!(wizard.phase(), WizardPhase::Closed);
        assert_eq!(completions.load(Ordering::SeqCst), 0);
        assert!(!s.is_visible("booking-confirmation"));
    }

    #[test]
    fn test_stale_completion_cannot_leak_into_a_new_attempt() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();
        fill_to_last_step(&mut wizard, &mut s);
        wizard.submit(&mut s);
        wizard.cancel(&mut s);

        // A new attempt for another course is underway when the old timer
        // fires; it must stay untouched on step 1.
        wizard.open(&mut s, catalog.get("api-design").unwrap()).unwrap();
        wizard.pump_at(&mut s, Instant::now() + Duration::from_secs(10));
        assert_eq!(wizard.phase(), WizardPhase::Step(1));
        assert_eq!(wizard.course().unwrap().id, "api-design");
    }

    #[test]
    fn test_cancel_discards_state_and_restores_focus() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        s.focus("book-now");
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();
        s.set_field_value("name", "Ada Lovelace");
        wizard.advance(&mut s);

        let cancellations = Arc::new(AtomicUsize::new(0));
        let cancellations_clone = cancellations.clone();
        wizard.cancelled.connect(move |()| {
            cancellations_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(wizard.cancel(&mut s));
        assert_eq!(wizard.phase(), WizardPhase::Closed);
        assert!(wizard.course().is_none());
        assert_eq!(wizard.field("name"), None);
        assert!(!s.is_visible("booking-panel"));
        assert!(!s.is_scroll_locked());
        assert_eq!(s.focused().as_deref(), Some("book-now"));
        assert_eq!(cancellations.load(Ordering::SeqCst), 1);

        // Cancel is a no-op once closed.
        assert!(!wizard.cancel(&mut s));
    }

    #[test]
    fn test_failing_backend_returns_to_last_step() {
        struct RejectingBackend;
        impl BookingBackend for RejectingBackend {
            fn submit(&mut self, _: &BookingRecord) -> std::result::Result<(), String> {
                Err("No seats left on the waitlist".to_string())
            }
        }

        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = BookingWizard::with_backend(
            WizardConfig::standard().with_latency(Duration::from_millis(10)),
            Box::new(RejectingBackend),
        );
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();
        fill_to_last_step(&mut wizard, &mut s);

        let messages = Arc::new(Mutex::new(Vec::new()));
        let messages_clone = messages.clone();
        wizard.submit_failed.connect(move |message| {
            messages_clone.lock().unwrap().push(message.clone());
        });

        wizard.submit(&mut s);
        wizard.pump_at(&mut s, Instant::now() + Duration::from_secs(1));

        assert_eq!(wizard.phase(), WizardPhase::Step(3));
        assert!(s.is_enabled("confirm-booking"));
        assert!(!s.is_visible("booking-busy"));
        assert!(s.is_visible("booking-panel"));
        assert_eq!(
            *messages.lock().unwrap(),
            vec!["No seats left on the waitlist".to_string()]
        );
    }

    #[test]
    fn test_dispatch_routes_intents() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();
        wizard.settle(&mut s);

        // Live per-field validation on blur.
        s.set_field_value("name", "A");
        assert!(!wizard.dispatch(&mut s, Intent::FieldChanged("name".to_string())));
        assert!(s.field_error("name").unwrap().contains("at least 2 characters"));
        s.set_field_value("name", "Ada Lovelace");
        assert!(wizard.dispatch(&mut s, Intent::FieldChanged("name".to_string())));
        assert_eq!(s.field_error("name"), None);

        // Tab cycling stays inside the overlay.
        assert!(wizard.dispatch(&mut s, Intent::Tab { backward: false }));
        assert_eq!(s.focused().as_deref(), Some("back-button"));
        assert!(wizard.dispatch(&mut s, Intent::Tab { backward: true }));
        assert_eq!(s.focused().as_deref(), Some("name"));

        // Escape cancels unconditionally.
        assert!(wizard.dispatch(&mut s, Intent::Escape));
        assert_eq!(wizard.phase(), WizardPhase::Closed);
    }

    #[test]
    fn test_progress_and_time_estimate() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = wizard();
        assert_eq!(wizard.progress_percent(), 0.0);
        assert_eq!(wizard.time_estimate_text(), None);

        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();
        assert!((wizard.progress_percent() - 100.0 / 3.0).abs() < 0.01);
        assert_eq!(
            wizard.time_estimate_text().as_deref(),
            Some("About 2 min remaining")
        );

        s.set_field_value("name", "Ada Lovelace");
        wizard.advance(&mut s);
        assert_eq!(
            wizard.time_estimate_text().as_deref(),
            Some("About 45 seconds remaining")
        );

        s.set_field_value("email", "ada@example.com");
        wizard.advance(&mut s);
        assert_eq!(wizard.progress_percent(), 100.0);
        assert_eq!(
            wizard.time_estimate_text().as_deref(),
            Some("About 0 seconds remaining")
        );
    }

    #[test]
    fn test_summary_available_on_last_step() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();
        fill_to_last_step(&mut wizard, &mut s);

        let rows = wizard.summary();
        assert_eq!(rows[0].label, "Course");
        assert_eq!(rows[0].value, "Design Systems Fundamentals");
        assert!(rows.iter().any(|r| r.label == "Email" && r.value == "ada@example.com"));
        // Untouched optional fields produce no row.
        assert!(rows.iter().all(|r| r.label != "Notes"));
    }

    #[test]
    fn test_reopening_discards_previous_attempt() {
        let catalog = sample_catalog();
        let mut s = booking_surface();
        let mut wizard = wizard();
        wizard.open(&mut s, catalog.get("design-systems").unwrap()).unwrap();
        s.set_field_value("name", "Ada Lovelace");
        wizard.advance(&mut s);

        wizard.open(&mut s, catalog.get("api-design").unwrap()).unwrap();
        assert_eq!(wizard.phase(), WizardPhase::Step(1));
        assert_eq!(wizard.course().unwrap().id, "api-design");
        assert_eq!(wizard.field("name"), None);
        assert!(s.is_visible("booking-step-1"));
        assert!(!s.is_visible("booking-step-2"));
    }
}
