use tracing::{debug, info};

use crate::context::PortalContext;
use crate::error::{ApiError, Result};
use crate::http::{ensure_success, HttpSession};
use crate::models::Target;
use crate::undo::{with_store, EntityKind, SharedUndoStore};

/// Client for publication targets
///
/// Deletions share the undo store with articles but use their own slot.
pub struct TargetingClient {
    session: HttpSession,
    context: PortalContext,
    undo: SharedUndoStore,
}

impl TargetingClient {
    pub fn new(context: PortalContext, session: HttpSession, undo: SharedUndoStore) -> Self {
        Self {
            session,
            context,
            undo,
        }
    }

    pub fn undo_store(&self) -> &SharedUndoStore {
        &self.undo
    }

    fn target_url(&self, name: &str) -> String {
        format!("{}/{}", self.context.targeting_api(), urlencoding::encode(name))
    }

    /// Every configured target; an error status just means none
    pub async fn list_all(&self) -> Result<Vec<Target>> {
        self.list(&self.context.targeting_api()).await
    }

    /// Targets the current user may publish to
    pub async fn list_allowed(&self) -> Result<Vec<Target>> {
        let url = format!("{}/allowed", self.context.targeting_api());
        self.list(&url).await
    }

    async fn list(&self, url: &str) -> Result<Vec<Target>> {
        let response = self.session.get(url).send().await?;
        if !response.status().is_success() {
            debug!("Target list answered {}", response.status());
            return Ok(Vec::new());
        }
        Ok(response.json().await?)
    }

    pub async fn create(&self, target: &Target) -> Result<Target> {
        let response = self
            .session
            .post(&self.context.targeting_api())
            .json(target)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }

        info!("Created target {}", target.name);
        Ok(response.json().await?)
    }

    /// Update a target, possibly renaming it; returns the response status
    pub async fn update(&self, target: &Target, original_name: &str) -> Result<u16> {
        let response = self
            .session
            .put(&self.target_url(original_name))
            .json(target)
            .send()
            .await?;
        let response = ensure_success(response, "Error when updating news target").await?;
        Ok(response.status().as_u16())
    }

    pub async fn delete_soft(&self, target_name: &str, delay_seconds: u64) -> Result<()> {
        if delay_seconds > 0 {
            with_store(&self.undo, |store| {
                store.record(EntityKind::Target, target_name, delay_seconds)
            })?;
        }

        let url = format!("{}?delay={}", self.target_url(target_name), delay_seconds);
        let response = self.session.delete(&url).send().await?;
        ensure_success(response, "Error when deleting news target").await?;

        info!("Deleted target {} (delay {}s)", target_name, delay_seconds);
        Ok(())
    }

    pub async fn delete_undo(&self, target_name: &str) -> Result<()> {
        let url = format!("{}/undoDelete", self.target_url(target_name));
        let response = self.session.post(&url).send().await?;
        ensure_success(response, "Error when undoing deleting news target").await?;

        with_store(&self.undo, |store| store.clear(EntityKind::Target, target_name))?;
        info!("Restored target {}", target_name);
        Ok(())
    }
}
