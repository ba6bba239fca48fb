//! Transactional persistence collaborator for profile completion.
//!
//! A [`CompletionStore`] hands out one [`CompletionTransaction`] per
//! request. The transaction is an explicit value: every write goes through
//! it, and it is consumed by either [`commit`](CompletionTransaction::commit)
//! or [`rollback`](CompletionTransaction::rollback).

use std::future::Future;

use crate::geo::Coordinates;
use crate::preference::Preference;
use crate::types::UserId;

/// Column values written to the user row when a profile is completed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub biography: String,
    pub coordinates: Option<Coordinates>,
    pub preference: Preference,
    pub profile_picture_url: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The user row to complete does not exist.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// Any failure raised by the storage backend.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

/// Opens request-scoped transactions.
pub trait CompletionStore: Send + Sync {
    type Tx: CompletionTransaction;

    fn begin(&self) -> impl Future<Output = Result<Self::Tx, StoreError>> + Send;
}

/// The three writes of a completion, applied inside one transaction.
pub trait CompletionTransaction: Send {
    /// Update the user row and mark it completed. Returns rows affected.
    fn update_user(
        &mut self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Append one picture row per URL. Returns rows inserted.
    fn insert_pictures(
        &mut self,
        user_id: UserId,
        urls: &[String],
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Associate the user with each named tag, ignoring existing pairs.
    /// Returns rows inserted (duplicates excluded).
    fn insert_interests(
        &mut self,
        user_id: UserId,
        tags: &[String],
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn rollback(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
