//! Partial form values.
//!
//! A [`FormDraft`] holds whatever the user has entered so far. The wizard
//! keeps two: the values merged from completed steps, and the pending
//! values of the active step.

use matcha_core::completion::CompletionPayload;
use matcha_core::image::ImageSource;
use matcha_core::schema::{AddressInfo, Field, InterestsInfo, PersonalInfo};
use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// An interest as offered by the selection control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestOption {
    pub value: String,
}

impl InterestOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A value entered into one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Image(ImageSource),
    Images(Vec<ImageSource>),
    /// `None` clears an optional number.
    Number(Option<f64>),
    Interests(Vec<InterestOption>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraft {
    pub profile_picture: Option<ImageSource>,
    pub biography: Option<String>,
    pub preferences: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub pictures: Option<Vec<ImageSource>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub interests: Option<Vec<InterestOption>>,
}

impl FormDraft {
    /// Store `value` under `field`, rejecting mismatched types.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<(), WizardError> {
        match (field, value) {
            (Field::ProfilePicture, FieldValue::Image(v)) => self.profile_picture = Some(v),
            (Field::Biography, FieldValue::Text(v)) => self.biography = Some(v),
            (Field::Preferences, FieldValue::Text(v)) => self.preferences = Some(v),
            (Field::City, FieldValue::Text(v)) => self.city = Some(v),
            (Field::Country, FieldValue::Text(v)) => self.country = Some(v),
            (Field::Pictures, FieldValue::Images(v)) => self.pictures = Some(v),
            (Field::Latitude, FieldValue::Number(v)) => self.latitude = v,
            (Field::Longitude, FieldValue::Number(v)) => self.longitude = v,
            (Field::Interests, FieldValue::Interests(v)) => self.interests = Some(v),
            (field, _) => return Err(WizardError::WrongValueType(field)),
        }
        Ok(())
    }

    /// Copy `field` from `other`, including an unset value.
    pub fn copy_field(&mut self, other: &FormDraft, field: Field) {
        match field {
            Field::ProfilePicture => self.profile_picture = other.profile_picture.clone(),
            Field::Biography => self.biography = other.biography.clone(),
            Field::Preferences => self.preferences = other.preferences.clone(),
            Field::City => self.city = other.city.clone(),
            Field::Country => self.country = other.country.clone(),
            Field::Pictures => self.pictures = other.pictures.clone(),
            Field::Latitude => self.latitude = other.latitude,
            Field::Longitude => self.longitude = other.longitude,
            Field::Interests => self.interests = other.interests.clone(),
        }
    }

    pub fn is_set(&self, field: Field) -> bool {
        match field {
            Field::ProfilePicture => self.profile_picture.is_some(),
            Field::Biography => self.biography.is_some(),
            Field::Preferences => self.preferences.is_some(),
            Field::City => self.city.is_some(),
            Field::Country => self.country.is_some(),
            Field::Pictures => self.pictures.is_some(),
            Field::Latitude => self.latitude.is_some(),
            Field::Longitude => self.longitude.is_some(),
            Field::Interests => self.interests.is_some(),
        }
    }

    pub(crate) fn personal_info(&self) -> PersonalInfo {
        PersonalInfo {
            profile_picture: self.profile_picture.clone().unwrap_or_default(),
            biography: self.biography.clone().unwrap_or_default(),
            preferences: self.preferences.clone().unwrap_or_default(),
        }
    }

    pub(crate) fn address_info(&self) -> AddressInfo {
        AddressInfo {
            city: self.city.clone().unwrap_or_default(),
            country: self.country.clone().unwrap_or_default(),
            pictures: self.pictures.clone().unwrap_or_default(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub(crate) fn interests_info(&self) -> InterestsInfo {
        InterestsInfo {
            interests: self.interest_values(),
        }
    }

    /// Interest records flattened to their tag identifiers.
    pub fn interest_values(&self) -> Vec<String> {
        self.interests
            .iter()
            .flatten()
            .map(|i| i.value.clone())
            .collect()
    }

    /// Build the request body from everything entered so far.
    pub fn to_payload(&self) -> CompletionPayload {
        CompletionPayload {
            biography: self.biography.clone(),
            preferences: self.preferences.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            profile_picture: self.profile_picture.clone(),
            pictures: self.pictures.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            interests: self.interests.as_ref().map(|_| self.interest_values()),
        }
    }
}
