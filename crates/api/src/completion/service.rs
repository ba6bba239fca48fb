//! Orchestrates validation, media upload and the transactional write.
//!
//! The order is fixed:
//!
//! 1. validate the payload (no I/O; any failure stops here),
//! 2. fill missing coordinates from the caller's IP (best effort),
//! 3. upload the profile picture, then each gallery picture in order,
//! 4. in one transaction: update the user, insert pictures, insert interests.
//!
//! Uploads cannot be undone. When anything after step 3 fails, the uploaded
//! URLs are logged at `warn` as orphans.

use std::net::IpAddr;
use std::sync::Arc;

use matcha_core::completion::{CompletionError, CompletionPayload, ValidatedCompletion};
use matcha_core::geo::{Coordinates, GeoLocator};
use matcha_core::interests::InterestVocabulary;
use matcha_core::media::MediaUploader;
use matcha_core::store::{CompletionStore, CompletionTransaction, ProfileUpdate};
use matcha_core::types::UserId;
use tokio::task::JoinError;

/// URLs returned by the media host for one submission.
#[derive(Debug, Default)]
struct UploadedUrls {
    profile_picture: Option<String>,
    pictures: Vec<String>,
}

impl UploadedUrls {
    fn all(&self) -> Vec<&str> {
        self.profile_picture
            .iter()
            .chain(self.pictures.iter())
            .map(String::as_str)
            .collect()
    }
}

pub struct CompletionService<M, S, G> {
    uploader: M,
    store: S,
    geo: G,
    vocabulary: Arc<InterestVocabulary>,
}

impl<M, S, G> CompletionService<M, S, G>
where
    M: MediaUploader,
    S: CompletionStore,
    G: GeoLocator,
{
    pub fn new(uploader: M, store: S, geo: G, vocabulary: Arc<InterestVocabulary>) -> Self {
        Self {
            uploader,
            store,
            geo,
            vocabulary,
        }
    }

    pub fn vocabulary(&self) -> &InterestVocabulary {
        &self.vocabulary
    }

    /// [`complete`](Self::complete) on its own task.
    ///
    /// Once started, the pipeline runs to its end (commit, rollback and
    /// orphan logging included) even if the caller's future is dropped by a
    /// request timeout or a closed connection.
    pub async fn spawn_complete(
        self: &Arc<Self>,
        user_id: UserId,
        payload: CompletionPayload,
        client_ip: Option<IpAddr>,
    ) -> Result<Result<(), CompletionError>, JoinError>
    where
        M: 'static,
        S: 'static,
        G: 'static,
    {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.complete(user_id, payload, client_ip).await }).await
    }

    /// Complete `user_id`'s profile, or change nothing durable.
    ///
    /// `client_ip` is only used to default missing coordinates.
    pub async fn complete(
        &self,
        user_id: UserId,
        payload: CompletionPayload,
        client_ip: Option<IpAddr>,
    ) -> Result<(), CompletionError> {
        let validated = payload.validate(&self.vocabulary)?;

        let coordinates = match validated.coordinates {
            Some(coordinates) => Some(coordinates),
            None => self.default_coordinates(user_id, client_ip).await,
        };

        let mut uploaded = UploadedUrls::default();
        let result = match self.upload_all(&validated, &mut uploaded).await {
            Ok(profile_picture_url) => {
                self.persist(user_id, &validated, coordinates, profile_picture_url, &uploaded)
                    .await
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(()) => tracing::info!(
                %user_id,
                picture_count = uploaded.pictures.len(),
                interest_count = validated.interests.len(),
                "Profile completed"
            ),
            Err(e) => {
                let orphaned = uploaded.all();
                if !orphaned.is_empty() {
                    tracing::warn!(
                        %user_id,
                        error = %e,
                        orphaned = ?orphaned,
                        "Uploaded media was not persisted"
                    );
                }
            }
        }
        result
    }

    async fn default_coordinates(
        &self,
        user_id: UserId,
        client_ip: Option<IpAddr>,
    ) -> Option<Coordinates> {
        let ip = client_ip?;
        match self.geo.locate(Some(ip)).await {
            Ok(coordinates) => Some(coordinates),
            Err(e) => {
                tracing::warn!(%user_id, %ip, error = %e, "Could not default coordinates");
                None
            }
        }
    }

    /// Upload sequentially, recording each URL as soon as it exists.
    /// Returns the profile picture URL.
    async fn upload_all(
        &self,
        validated: &ValidatedCompletion,
        uploaded: &mut UploadedUrls,
    ) -> Result<String, CompletionError> {
        let profile = self
            .uploader
            .upload(&validated.profile_picture)
            .await
            .map_err(CompletionError::Upload)?;
        uploaded.profile_picture = Some(profile.url.clone());

        for picture in &validated.pictures {
            let media = self
                .uploader
                .upload(picture)
                .await
                .map_err(CompletionError::Upload)?;
            uploaded.pictures.push(media.url);
        }
        Ok(profile.url)
    }

    async fn persist(
        &self,
        user_id: UserId,
        validated: &ValidatedCompletion,
        coordinates: Option<Coordinates>,
        profile_picture_url: String,
        uploaded: &UploadedUrls,
    ) -> Result<(), CompletionError> {
        let update = ProfileUpdate {
            biography: validated.biography.clone(),
            coordinates,
            preference: validated.preference,
            profile_picture_url,
            city: validated.city.clone(),
            country: validated.country.clone(),
        };

        let mut tx = self.store.begin().await?;
        let written = Self::write(
            &mut tx,
            user_id,
            &update,
            &uploaded.pictures,
            &validated.interests,
        )
        .await;

        match written {
            Ok(()) => Ok(tx.commit().await?),
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(%user_id, error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn write(
        tx: &mut S::Tx,
        user_id: UserId,
        update: &ProfileUpdate,
        pictures: &[String],
        interests: &[String],
    ) -> Result<(), CompletionError> {
        if tx.update_user(user_id, update).await? == 0 {
            return Err(CompletionError::UserNotFound(user_id));
        }
        tx.insert_pictures(user_id, pictures).await?;
        tx.insert_interests(user_id, interests).await?;
        Ok(())
    }
}
