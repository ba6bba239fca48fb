//! Field names and per-step validation schemas.
//!
//! The completion payload is partitioned into three step schemas. The
//! wizard validates one schema per step; the server validates all three.
//! Messages are user-facing and field-scoped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::image::ImageSource;
use crate::interests::{MAX_INTERESTS, MIN_INTERESTS};
use crate::preference::is_valid_preference;

/// Minimum biography length, in characters.
pub const BIOGRAPHY_MIN_CHARS: usize = 10;

/// Maximum biography length, in characters.
pub const BIOGRAPHY_MAX_CHARS: usize = 500;

/// Minimum gallery size.
pub const MIN_PICTURES: usize = 4;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// Every field of the completion payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ProfilePicture,
    Biography,
    Preferences,
    City,
    Country,
    Pictures,
    Latitude,
    Longitude,
    Interests,
}

/// Fields that must be present and non-empty on submission.
pub const REQUIRED_FIELDS: [Field; 7] = [
    Field::Biography,
    Field::Preferences,
    Field::City,
    Field::Country,
    Field::ProfilePicture,
    Field::Pictures,
    Field::Interests,
];

impl Field {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProfilePicture => "profile_picture",
            Self::Biography => "biography",
            Self::Preferences => "preferences",
            Self::City => "city",
            Self::Country => "country",
            Self::Pictures => "pictures",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Interests => "interests",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "profile_picture" => Some(Self::ProfilePicture),
            "biography" => Some(Self::Biography),
            "preferences" => Some(Self::Preferences),
            "city" => Some(Self::City),
            "country" => Some(Self::Country),
            "pictures" => Some(Self::Pictures),
            "latitude" => Some(Self::Latitude),
            "longitude" => Some(Self::Longitude),
            "interests" => Some(Self::Interests),
            _ => None,
        }
    }

    pub fn is_required(self) -> bool {
        REQUIRED_FIELDS.contains(&self)
    }
}

// ---------------------------------------------------------------------------
// Step schemas
// ---------------------------------------------------------------------------

/// Step 1: picture, biography and preference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PersonalInfo {
    #[validate(custom(function = "validate_image"))]
    pub profile_picture: ImageSource,

    #[validate(length(
        min = 10,
        max = 500,
        message = "Biography should be between 10 and 500 characters"
    ))]
    pub biography: String,

    #[validate(custom(function = "validate_preference"))]
    pub preferences: String,
}

/// Step 2: location and gallery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct AddressInfo {
    #[validate(length(min = 1, message = "City field is required"))]
    pub city: String,

    #[validate(length(min = 1, message = "Country field is required"))]
    pub country: String,

    #[validate(
        length(min = 4, message = "At least 4 pictures are required"),
        custom(function = "validate_images")
    )]
    pub pictures: Vec<ImageSource>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: Option<f64>,
}

/// Step 3: interest tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct InterestsInfo {
    #[validate(custom(function = "validate_interest_count"))]
    pub interests: Vec<String>,
}

fn validate_image(image: &ImageSource) -> Result<(), ValidationError> {
    image
        .validate()
        .map(|_| ())
        .map_err(|e| ValidationError::new("image").with_message(e.to_string().into()))
}

fn validate_images(images: &[ImageSource]) -> Result<(), ValidationError> {
    images.iter().try_for_each(validate_image)
}

fn validate_preference(value: &str) -> Result<(), ValidationError> {
    if is_valid_preference(value) {
        Ok(())
    } else {
        Err(ValidationError::new("preference")
            .with_message("You need to select one preferences".into()))
    }
}

fn validate_interest_count(interests: &[String]) -> Result<(), ValidationError> {
    if interests.len() < MIN_INTERESTS {
        return Err(ValidationError::new("interests_min")
            .with_message("Please select at least 5 interests".into()));
    }
    if interests.len() > MAX_INTERESTS {
        return Err(ValidationError::new("interests_max")
            .with_message("You can't select more than 10 interests".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Error flattening
// ---------------------------------------------------------------------------

/// Flatten validator output to one message per field.
///
/// Fields are keyed by wire name; the first message of each field wins.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let first = errs.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"));
            Some((field.to_string(), message))
        })
        .collect()
}

/// Render validator output as a single sentence, fields in name order.
pub fn summarize(errors: &ValidationErrors) -> String {
    field_messages(errors)
        .into_values()
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png() -> ImageSource {
        ImageSource::DataUrl(format!("data:image/png;base64,{}", STANDARD.encode(PNG_MAGIC)))
    }

    fn personal() -> PersonalInfo {
        PersonalInfo {
            profile_picture: png(),
            biography: "I like long walks on the beach".into(),
            preferences: "BOTH".into(),
        }
    }

    fn address(pictures: usize) -> AddressInfo {
        AddressInfo {
            city: "Paris".into(),
            country: "France".into(),
            pictures: vec![png(); pictures],
            latitude: None,
            longitude: None,
        }
    }

    fn interests(n: usize) -> InterestsInfo {
        InterestsInfo {
            interests: (0..n).map(|i| format!("tag{i}")).collect(),
        }
    }

    #[test]
    fn field_names_round_trip() {
        for field in [
            Field::ProfilePicture,
            Field::Biography,
            Field::Preferences,
            Field::City,
            Field::Country,
            Field::Pictures,
            Field::Latitude,
            Field::Longitude,
            Field::Interests,
        ] {
            assert_eq!(Field::from_name(field.as_str()), Some(field));
        }
        assert!(!Field::Latitude.is_required());
        assert!(Field::Country.is_required());
    }

    #[test]
    fn personal_info_valid() {
        assert!(personal().validate().is_ok());
    }

    #[test]
    fn biography_bounds() {
        let mut p = personal();
        p.biography = "too short".into();
        let errs = p.validate().unwrap_err();
        assert_eq!(
            field_messages(&errs)["biography"],
            "Biography should be between 10 and 500 characters"
        );

        p.biography = "x".repeat(BIOGRAPHY_MAX_CHARS);
        assert!(p.validate().is_ok());
        p.biography = "x".repeat(BIOGRAPHY_MAX_CHARS + 1);
        assert!(p.validate().is_err());
        p.biography = "x".repeat(BIOGRAPHY_MIN_CHARS);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn preference_must_be_in_closed_set() {
        let mut p = personal();
        p.preferences = "ANY".into();
        let errs = p.validate().unwrap_err();
        assert_eq!(
            field_messages(&errs)["preferences"],
            "You need to select one preferences"
        );
    }

    #[test]
    fn missing_profile_picture_is_field_scoped() {
        let mut p = personal();
        p.profile_picture = ImageSource::default();
        let messages = field_messages(&p.validate().unwrap_err());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages["profile_picture"], "this field is required");
    }

    #[test]
    fn picture_minimum_is_four() {
        assert!(address(MIN_PICTURES).validate().is_ok());
        let errs = address(3).validate().unwrap_err();
        assert_eq!(field_messages(&errs)["pictures"], "At least 4 pictures are required");
    }

    #[test]
    fn bad_gallery_image_rejected() {
        let mut a = address(4);
        a.pictures[2] = ImageSource::DataUrl("not an image".into());
        let errs = a.validate().unwrap_err();
        assert_eq!(field_messages(&errs)["pictures"], "Invalid image format");
    }

    #[test]
    fn coordinates_are_optional_but_bounded() {
        let mut a = address(4);
        a.latitude = Some(45.0);
        a.longitude = Some(181.0);
        let errs = a.validate().unwrap_err();
        let messages = field_messages(&errs);
        assert!(messages.contains_key("longitude"));
        assert!(!messages.contains_key("latitude"));
    }

    #[test]
    fn interest_count_bounds() {
        assert!(interests(5).validate().is_ok());
        assert!(interests(10).validate().is_ok());
        assert_eq!(
            field_messages(&interests(4).validate().unwrap_err())["interests"],
            "Please select at least 5 interests"
        );
        assert_eq!(
            field_messages(&interests(11).validate().unwrap_err())["interests"],
            "You can't select more than 10 interests"
        );
    }

    #[test]
    fn summarize_orders_by_field() {
        let a = AddressInfo::default();
        let summary = summarize(&a.validate().unwrap_err());
        assert_eq!(
            summary,
            "City field is required; Country field is required; At least 4 pictures are required"
        );
    }
}
