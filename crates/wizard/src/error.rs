use std::collections::BTreeMap;

use matcha_core::schema::Field;

/// Why a wizard transition or submission was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    /// The active step failed validation. Messages are keyed by field.
    #[error("step is invalid")]
    InvalidStep(BTreeMap<Field, String>),

    /// The field is not part of the active step.
    #[error("{0:?} is not part of the current step")]
    FieldNotInStep(Field),

    /// The value does not fit the field (e.g. a number for `city`).
    #[error("wrong value type for {0:?}")]
    WrongValueType(Field),

    #[error("already at the first step")]
    AtFirstStep,

    /// Advance was requested on the last step, or submit on an earlier one.
    #[error("not allowed at this step")]
    WrongStep,

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("no submission is in flight")]
    NotSubmitting,

    #[error("the profile has already been submitted")]
    AlreadySubmitted,

    /// Transport failure talking to the API.
    #[error("request failed: {0}")]
    Request(String),

    /// The API answered with a failure status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}
