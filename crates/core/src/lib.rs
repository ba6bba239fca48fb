//! Domain types and rules for profile completion.
//!
//! Everything here is pure: validation, field schemas, and the collaborator
//! traits ([`media::MediaUploader`], [`store::CompletionStore`],
//! [`geo::GeoLocator`]) that the server and the wizard are written against.

pub mod completion;
pub mod error;
pub mod geo;
pub mod image;
pub mod interests;
pub mod media;
pub mod preference;
pub mod schema;
pub mod store;
pub mod types;
