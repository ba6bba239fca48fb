//! Client-side profile-completion wizard.
//!
//! - [`step`] -- the three fixed steps and their render contract.
//! - [`draft`] -- partial form values accumulated across steps.
//! - [`state`] -- the [`Wizard`] state machine (advance, retreat, submit).
//! - [`geo`] -- best-effort background coordinate lookup.
//! - [`client`] -- the completion request, behind [`CompletionClient`].
//! - [`notification`] -- toasts raised by submission outcomes.

pub mod client;
pub mod config;
pub mod draft;
pub mod error;
pub mod geo;
pub mod notification;
pub mod state;
pub mod step;

pub use client::{CompletionClient, CompletionResponse, HttpCompletionClient};
pub use config::WizardConfig;
pub use draft::{FieldValue, FormDraft, InterestOption};
pub use error::WizardError;
pub use geo::GeoHint;
pub use notification::{Notification, NotificationVariant};
pub use state::{Phase, Wizard};
pub use step::{StepStatus, StepView, WizardStep};
