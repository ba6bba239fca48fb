pub mod interest_tag;
pub mod picture;
pub mod user;
