//! The wizard state machine.
//!
//! ```text
//!   Step 1 --advance--> Step 2 --advance--> Step 3 --begin_submit--> in flight
//!          <--retreat--        <--retreat--                            |
//!                                          ^--------settle(Err)--------+
//!                                                     settle(Ok) --> Submitted
//! ```
//!
//! Values entered on the active step are held apart from the merged values
//! of completed steps. Leaving a step forward merges exactly the fields it
//! owns. Leaving it backward stashes its edits unvalidated; they are loaded
//! again, ahead of any merged value, when the step is next reached.

use std::collections::{BTreeMap, BTreeSet};

use matcha_core::completion::CompletionPayload;
use matcha_core::schema::Field;

use crate::client::{CompletionClient, CompletionResponse};
use crate::draft::{FieldValue, FormDraft};
use crate::error::WizardError;
use crate::geo::GeoHint;
use crate::notification::Notification;
use crate::step::{StepView, WizardStep, STEPS};

pub const SUCCESS_DESCRIPTION: &str = "Profile completed successfully";
pub const FAILURE_DESCRIPTION: &str = "Failed to complete profile";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    /// A completion request is in flight.
    Submitting,
    /// Terminal: the profile was accepted and the wizard reset.
    Submitted,
}

#[derive(Debug)]
pub struct Wizard {
    index: usize,
    merged: FormDraft,
    pending: FormDraft,
    /// Edits of steps left backward, not validated.
    stashed: FormDraft,
    stashed_fields: BTreeSet<Field>,
    touched: BTreeSet<Field>,
    errors: BTreeMap<Field, String>,
    phase: Phase,
    geo: GeoHint,
    notifications: Vec<Notification>,
}

impl Wizard {
    pub fn new(geo: GeoHint) -> Self {
        Self {
            index: 0,
            merged: FormDraft::default(),
            pending: FormDraft::default(),
            stashed: FormDraft::default(),
            stashed_fields: BTreeSet::new(),
            touched: BTreeSet::new(),
            errors: BTreeMap::new(),
            phase: Phase::Editing,
            geo,
            notifications: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_step(&self) -> WizardStep {
        STEPS[self.index]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Render contract for the progress indicator.
    pub fn steps(&self) -> Vec<StepView> {
        STEPS.iter().map(|s| s.view(self.index)).collect()
    }

    /// Values merged from completed steps.
    pub fn values(&self) -> &FormDraft {
        &self.merged
    }

    /// Values of the active step, not yet merged.
    pub fn pending(&self) -> &FormDraft {
        &self.pending
    }

    /// Errors of the active step, keyed by field.
    pub fn errors(&self) -> &BTreeMap<Field, String> {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Drain queued notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Set a field of the active step and re-validate the fields touched
    /// so far.
    pub fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), WizardError> {
        if self.phase == Phase::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        let step = self.current_step();
        if !step.owns(field) {
            return Err(WizardError::FieldNotInStep(field));
        }
        self.pending.set(field, value)?;
        self.touched.insert(field);

        self.errors = match step.validate(&self.pending) {
            Ok(()) => BTreeMap::new(),
            Err(errors) => errors
                .into_iter()
                .filter(|(f, _)| self.touched.contains(f))
                .collect(),
        };
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Validate the active step, merge its fields and move forward.
    pub fn advance(&mut self) -> Result<(), WizardError> {
        self.ensure_idle()?;
        let step = self.current_step();
        if step.is_last() {
            return Err(WizardError::WrongStep);
        }
        self.check_step(step)?;
        self.merge(step);
        self.index += 1;
        self.load_pending();
        Ok(())
    }

    /// Move back one step, keeping merged values and stashing the edits of
    /// the step being left.
    pub fn retreat(&mut self) -> Result<(), WizardError> {
        self.ensure_idle()?;
        if self.index == 0 {
            return Err(WizardError::AtFirstStep);
        }
        let leaving = self.current_step();
        self.stash(leaving);
        self.index -= 1;
        self.load_pending();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Validate and merge the last step, then build the request body.
    ///
    /// Unset coordinates are filled from the geolocation hint if it has
    /// resolved; otherwise they stay unset. The wizard is in flight until
    /// [`settle`](Self::settle) is called.
    pub fn begin_submit(&mut self) -> Result<CompletionPayload, WizardError> {
        self.ensure_idle()?;
        let step = self.current_step();
        if !step.is_last() {
            return Err(WizardError::WrongStep);
        }
        self.check_step(step)?;
        self.merge(step);

        let mut payload = self.merged.to_payload();
        if let Some(hint) = self.geo.get() {
            payload.latitude = payload.latitude.or(Some(hint.latitude));
            payload.longitude = payload.longitude.or(Some(hint.longitude));
        }

        self.phase = Phase::Submitting;
        Ok(payload)
    }

    /// Apply the outcome of the in-flight request.
    ///
    /// Success queues a notification and resets to the terminal state.
    /// Failure queues a destructive notification and leaves the wizard on
    /// the last step with its data.
    pub fn settle(
        &mut self,
        outcome: Result<CompletionResponse, WizardError>,
    ) -> Result<(), WizardError> {
        if self.phase != Phase::Submitting {
            return Err(WizardError::NotSubmitting);
        }
        match outcome {
            Ok(response) if response.success => {
                self.notifications.push(Notification::success(SUCCESS_DESCRIPTION));
                self.reset();
                self.phase = Phase::Submitted;
            }
            Ok(response) => {
                tracing::warn!(message = %response.message, "Profile completion not accepted");
                self.fail();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile completion failed");
                self.fail();
            }
        }
        Ok(())
    }

    /// [`begin_submit`](Self::begin_submit), send, then
    /// [`settle`](Self::settle). Returns the request error, if any, after
    /// the wizard has settled.
    pub async fn submit<C: CompletionClient>(&mut self, client: &C) -> Result<(), WizardError> {
        let payload = self.begin_submit()?;
        let outcome = client.complete(&payload).await;
        let failure = outcome.as_ref().err().cloned();
        self.settle(outcome)?;
        failure.map_or(Ok(()), Err)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_idle(&self) -> Result<(), WizardError> {
        match self.phase {
            Phase::Editing => Ok(()),
            Phase::Submitting => Err(WizardError::SubmissionInFlight),
            Phase::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    /// Validate every field of `step`, surfacing all of its errors.
    fn check_step(&mut self, step: WizardStep) -> Result<(), WizardError> {
        self.touched.extend(step.fields().iter().copied());
        match step.validate(&self.pending) {
            Ok(()) => {
                self.errors.clear();
                Ok(())
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(WizardError::InvalidStep(errors))
            }
        }
    }

    fn merge(&mut self, step: WizardStep) {
        for field in step.fields() {
            self.merged.copy_field(&self.pending, *field);
        }
    }

    fn stash(&mut self, step: WizardStep) {
        for field in step.fields() {
            self.stashed.copy_field(&self.pending, *field);
            self.stashed_fields.insert(*field);
        }
    }

    /// Seed the active step's pending values, stashed edits first, then
    /// merged values.
    fn load_pending(&mut self) {
        let step = self.current_step();
        self.pending = FormDraft::default();
        for field in step.fields() {
            if self.stashed_fields.remove(field) {
                self.pending.copy_field(&self.stashed, *field);
            } else {
                self.pending.copy_field(&self.merged, *field);
            }
        }
        self.touched.clear();
        self.errors.clear();
    }

    fn fail(&mut self) {
        self.notifications.push(Notification::failure(FAILURE_DESCRIPTION));
        self.phase = Phase::Editing;
    }

    fn reset(&mut self) {
        self.index = 0;
        self.merged = FormDraft::default();
        self.pending = FormDraft::default();
        self.stashed = FormDraft::default();
        self.stashed_fields.clear();
        self.touched.clear();
        self.errors.clear();
    }
}
