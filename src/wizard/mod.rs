//! Onboarding wizard — the step-progression state machine.
//!
//! A wizard session accumulates a [`Record`] across four steps. The
//! sequencer in [`state`] decides which step comes next and when forward
//! navigation is permitted; the [`store::FormStore`] owns one session's
//! Record and cursor and applies those decisions. Presentation concerns
//! stay out: this module only exposes the data and the rules.

pub mod model;
pub mod routes;
pub mod state;
pub mod store;

pub use model::{Record, Resource, Role};
pub use routes::{WizardRouteState, wizard_routes};
pub use state::WizardStep;
pub use store::{FormStore, Snapshot};
