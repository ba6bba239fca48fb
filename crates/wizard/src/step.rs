//! The three wizard steps.

use std::collections::BTreeMap;

use matcha_core::schema::{field_messages, Field};
use serde::Serialize;
use validator::Validate;

use crate::draft::FormDraft;

/// One step of the wizard, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WizardStep {
    PersonalInfo,
    AddressAndPhotos,
    Interests,
}

/// Every step, in order.
pub const STEPS: [WizardStep; 3] = [
    WizardStep::PersonalInfo,
    WizardStep::AddressAndPhotos,
    WizardStep::Interests,
];

/// Progress of a step relative to the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Complete,
    Current,
    Upcoming,
}

/// What a progress indicator needs to draw one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub id: &'static str,
    pub name: &'static str,
    pub fields: &'static [Field],
    pub status: StepStatus,
}

impl WizardStep {
    pub fn index(self) -> usize {
        match self {
            Self::PersonalInfo => 0,
            Self::AddressAndPhotos => 1,
            Self::Interests => 2,
        }
    }

    pub fn at(index: usize) -> Option<Self> {
        STEPS.get(index).copied()
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::PersonalInfo => "Step 1",
            Self::AddressAndPhotos => "Step 2",
            Self::Interests => "Step 3",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::PersonalInfo => "Personal information",
            Self::AddressAndPhotos => "Add your location and photos",
            Self::Interests => "Add your interests",
        }
    }

    /// Fields owned by this step. Only these are merged when it is left.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::PersonalInfo => &[Field::ProfilePicture, Field::Biography, Field::Preferences],
            Self::AddressAndPhotos => &[
                Field::City,
                Field::Country,
                Field::Pictures,
                Field::Latitude,
                Field::Longitude,
            ],
            Self::Interests => &[Field::Interests],
        }
    }

    pub fn owns(self, field: Field) -> bool {
        self.fields().contains(&field)
    }

    pub fn is_last(self) -> bool {
        self.index() == STEPS.len() - 1
    }

    /// Validate this step's subset of `draft`, returning field-scoped messages.
    pub fn validate(self, draft: &FormDraft) -> Result<(), BTreeMap<Field, String>> {
        let result = match self {
            Self::PersonalInfo => draft.personal_info().validate(),
            Self::AddressAndPhotos => draft.address_info().validate(),
            Self::Interests => draft.interests_info().validate(),
        };
        result.map_err(|errors| {
            field_messages(&errors)
                .into_iter()
                .filter_map(|(name, message)| Some((Field::from_name(&name)?, message)))
                .collect()
        })
    }

    pub fn view(self, active: usize) -> StepView {
        let status = match self.index() {
            i if i < active => StepStatus::Complete,
            i if i == active => StepStatus::Current,
            _ => StepStatus::Upcoming,
        };
        StepView {
            id: self.id(),
            name: self.name(),
            fields: self.fields(),
            status,
        }
    }
}
