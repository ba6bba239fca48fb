//! Postgres implementation of the completion store.

use matcha_core::store::{CompletionStore, CompletionTransaction, ProfileUpdate, StoreError};
use matcha_core::types::UserId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::repositories::{PictureRepo, UserInterestRepo, UserRepo};

/// Opens one database transaction per completion request.
#[derive(Clone)]
pub struct PgCompletionStore {
    pool: PgPool,
}

impl PgCompletionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CompletionStore for PgCompletionStore {
    type Tx = PgCompletionTx;

    async fn begin(&self) -> Result<PgCompletionTx, StoreError> {
        let tx = self.pool.begin().await.map_err(StoreError::backend)?;
        Ok(PgCompletionTx { tx })
    }
}

/// An open transaction. Dropping it without committing rolls back.
pub struct PgCompletionTx {
    tx: Transaction<'static, Postgres>,
}

impl CompletionTransaction for PgCompletionTx {
    async fn update_user(
        &mut self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<u64, StoreError> {
        let rows = UserRepo::complete_profile(&mut self.tx, user_id, update)
            .await
            .map_err(StoreError::backend)?;
        tracing::debug!(%user_id, rows, "User row completed");
        Ok(rows)
    }

    async fn insert_pictures(
        &mut self,
        user_id: UserId,
        urls: &[String],
    ) -> Result<u64, StoreError> {
        let rows = PictureRepo::insert_many(&mut self.tx, user_id, urls)
            .await
            .map_err(StoreError::backend)?;
        tracing::debug!(%user_id, rows, "Pictures inserted");
        Ok(rows)
    }

    async fn insert_interests(
        &mut self,
        user_id: UserId,
        tags: &[String],
    ) -> Result<u64, StoreError> {
        let rows = UserInterestRepo::insert_by_tags(&mut self.tx, user_id, tags)
            .await
            .map_err(StoreError::backend)?;
        tracing::debug!(%user_id, requested = tags.len(), rows, "Interests inserted");
        Ok(rows)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(StoreError::backend)
    }

    async fn rollback(self) -> Result<(), StoreError> {
        tracing::debug!("Rolling back completion transaction");
        self.tx.rollback().await.map_err(StoreError::backend)
    }
}
