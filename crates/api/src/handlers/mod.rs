pub mod interests;
pub mod profile;
