//! HTTP clients for the services profile completion depends on.
//!
//! - [`cloudinary`] -- signed image uploads to a Cloudinary-compatible host.
//! - [`geolocation`] -- approximate coordinates from an IP address.

pub mod cloudinary;
pub mod geolocation;

pub use cloudinary::{CloudinaryConfig, CloudinaryUploader};
pub use geolocation::IpGeoClient;
