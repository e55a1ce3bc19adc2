//! Logging facilities for Enrolla.
//!
//! Enrolla uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in the host application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // Host code...
//! }
//! ```
//!
//! The constants in [`targets`] can be used with `tracing` filter directives
//! to select individual subsystems, e.g. `enrolla_core::timer=trace`.

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "enrolla_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "enrolla_core::signal";
    /// Timer queue target.
    pub const TIMER: &str = "enrolla_core::timer";
}
