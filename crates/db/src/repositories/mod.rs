//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an open transaction) as the first argument.

pub mod interest_tag_repo;
pub mod picture_repo;
pub mod user_interest_repo;
pub mod user_repo;

pub use interest_tag_repo::InterestTagRepo;
pub use picture_repo::PictureRepo;
pub use user_interest_repo::UserInterestRepo;
pub use user_repo::UserRepo;
