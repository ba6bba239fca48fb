//! The profile-completion payload and its server-side gate.
//!
//! [`CompletionPayload`] is the raw, possibly incomplete request body.
//! [`CompletionPayload::validate`] runs the authoritative checks in a fixed
//! order and yields a [`ValidatedCompletion`] that is safe to upload and
//! persist:
//!
//! 1. presence of every required field (one aggregate error),
//! 2. preference membership,
//! 3. interest membership (every unknown tag reported at once),
//! 4. length, cardinality and image rules from the step schemas.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::geo::Coordinates;
use crate::image::ImageSource;
use crate::interests::{dedup_interests, find_invalid_interests, InterestVocabulary};
use crate::media::MediaError;
use crate::preference::{InvalidPreference, Preference};
use crate::schema::{summarize, AddressInfo, Field, InterestsInfo, PersonalInfo, REQUIRED_FIELDS};
use crate::store::StoreError;
use crate::types::UserId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Every way a completion can fail, grouped by who can fix it.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// One or more required fields were absent or blank.
    #[error("All fields are required")]
    MissingFields(Vec<Field>),

    #[error("invalid preference")]
    InvalidPreference(#[from] InvalidPreference),

    /// Tags outside the vocabulary, in submission order.
    #[error("Invalid interests")]
    InvalidInterests(Vec<String>),

    /// Bounds, cardinality or image-format violations.
    #[error("{0}")]
    Validation(String),

    /// The media host refused or could not be reached.
    #[error("media upload failed: {0}")]
    Upload(#[source] MediaError),

    /// The authenticated user has no row to complete.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// Anything raised while the transaction was open.
    #[error("persistence failed: {0}")]
    Persistence(#[source] StoreError),
}

impl From<StoreError> for CompletionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound(id) => Self::UserNotFound(id),
            other => Self::Persistence(other),
        }
    }
}

impl CompletionError {
    /// Input errors are reported in detail; the rest are opaque to callers.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFields(_)
                | Self::InvalidPreference(_)
                | Self::InvalidInterests(_)
                | Self::Validation(_)
        )
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// The merged request body of `POST /profile/complete`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionPayload {
    pub biography: Option<String>,
    pub preferences: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub profile_picture: Option<ImageSource>,
    pub pictures: Option<Vec<ImageSource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub interests: Option<Vec<String>>,
}

fn blank(s: &Option<String>) -> bool {
    s.as_deref().is_none_or(|s| s.trim().is_empty())
}

impl CompletionPayload {
    /// Required fields that are absent or blank, in [`REQUIRED_FIELDS`] order.
    pub fn missing_fields(&self) -> Vec<Field> {
        REQUIRED_FIELDS
            .into_iter()
            .filter(|field| match field {
                Field::Biography => blank(&self.biography),
                Field::Preferences => blank(&self.preferences),
                Field::City => blank(&self.city),
                Field::Country => blank(&self.country),
                Field::ProfilePicture => self
                    .profile_picture
                    .as_ref()
                    .is_none_or(ImageSource::is_empty),
                Field::Pictures => self.pictures.as_ref().is_none_or(Vec::is_empty),
                Field::Interests => self.interests.as_ref().is_none_or(Vec::is_empty),
                Field::Latitude | Field::Longitude => false,
            })
            .collect()
    }

    /// Both coordinates, if both were supplied.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    /// Run every server-side check. No I/O is performed.
    pub fn validate(
        self,
        vocabulary: &InterestVocabulary,
    ) -> Result<ValidatedCompletion, CompletionError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CompletionError::MissingFields(missing));
        }

        let coordinates = self.coordinates();
        let preferences = self.preferences.unwrap_or_default();
        let preference = Preference::parse(preferences.trim())?;

        let interests = dedup_interests(self.interests.unwrap_or_default());
        let invalid = find_invalid_interests(&interests, vocabulary);
        if !invalid.is_empty() {
            return Err(CompletionError::InvalidInterests(invalid));
        }

        let personal = PersonalInfo {
            profile_picture: self.profile_picture.unwrap_or_default(),
            biography: self.biography.unwrap_or_default().trim().to_string(),
            preferences: preference.as_str().to_string(),
        };
        let address = AddressInfo {
            city: self.city.unwrap_or_default().trim().to_string(),
            country: self.country.unwrap_or_default().trim().to_string(),
            pictures: self.pictures.unwrap_or_default(),
            latitude: self.latitude,
            longitude: self.longitude,
        };
        let interests = InterestsInfo { interests };

        let problems: Vec<String> = [
            personal.validate().err(),
            address.validate().err(),
            interests.validate().err(),
        ]
        .into_iter()
        .flatten()
        .map(|errs| summarize(&errs))
        .collect();
        if !problems.is_empty() {
            return Err(CompletionError::Validation(problems.join("; ")));
        }

        Ok(ValidatedCompletion {
            biography: personal.biography,
            preference,
            city: address.city,
            country: address.country,
            profile_picture: personal.profile_picture,
            pictures: address.pictures,
            coordinates,
            interests: interests.interests,
        })
    }
}

/// A payload that passed every check and may be uploaded and persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCompletion {
    pub biography: String,
    pub preference: Preference,
    pub city: String,
    pub country: String,
    pub profile_picture: ImageSource,
    pub pictures: Vec<ImageSource>,
    pub coordinates: Option<Coordinates>,
    pub interests: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
