//! Two-phase image lifecycle: uploads before the store write, best-effort
//! deletes after it.

use std::sync::Arc;

use futures_util::future::join_all;

use storefront_catalog::Product;

use super::{IMAGE_FOLDER, ImageHost, ImageHostError, asset_id_from_locator};

/// Outcome of the upload phase.
///
/// `image`/`images` are the locators the store write should persist (absent
/// fields left `None`); `superseded` holds locators whose assets must be
/// deleted once the write has succeeded.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImagePlan {
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub superseded: Vec<String>,
}

/// Computes the diff between a product's previous and requested image sets
/// and executes it against the hosting service.
///
/// Never touches the catalog store; the orchestrator owns the ordering of
/// the store write between the two phases.
pub struct ImageLifecycle {
    host: Arc<dyn ImageHost>,
    folder: String,
}

impl ImageLifecycle {
    pub fn new(host: Arc<dyn ImageHost>) -> Self {
        Self {
            host,
            folder: IMAGE_FOLDER.to_string(),
        }
    }

    /// Upload phase for a create: no prior images exist.
    ///
    /// Uploads of distinct images are issued concurrently; the returned
    /// additional-locator list preserves submission order.
    pub async fn stage_create(
        &self,
        main_payload: &str,
        additional_payloads: &[String],
    ) -> Result<(String, Vec<String>), ImageHostError> {
        let (main, additional) = tokio::join!(
            self.host.upload(main_payload, &self.folder),
            join_all(
                additional_payloads
                    .iter()
                    .map(|payload| self.host.upload(payload, &self.folder)),
            ),
        );

        let main = main?;
        let mut locators = Vec::with_capacity(additional.len());
        for result in additional {
            locators.push(result?);
        }
        Ok((main, locators))
    }

    /// Upload phase for an update.
    ///
    /// A main-image payload is uploaded only when it differs from the stored
    /// locator; the old asset is then scheduled for deletion. A submitted
    /// additional-images list is a full replacement: every entry is uploaded
    /// (submission order preserved) and every previously stored additional
    /// image is scheduled. An absent field leaves that image set untouched.
    pub async fn stage_update(
        &self,
        current: &Product,
        main_payload: Option<&str>,
        additional_payloads: Option<&[String]>,
    ) -> Result<ImagePlan, ImageHostError> {
        let mut plan = ImagePlan::default();

        if let Some(payload) = main_payload {
            if !payload.is_empty() && payload != current.image {
                let locator = self.host.upload(payload, &self.folder).await?;
                if !current.image.is_empty() {
                    plan.superseded.push(current.image.clone());
                }
                plan.image = Some(locator);
            }
        }

        if let Some(payloads) = additional_payloads {
            plan.superseded.extend(current.images.iter().cloned());

            let results = join_all(
                payloads
                    .iter()
                    .map(|payload| self.host.upload(payload, &self.folder)),
            )
            .await;

            let mut locators = Vec::with_capacity(results.len());
            for result in results {
                locators.push(result?);
            }
            plan.images = Some(locators);
        }

        Ok(plan)
    }

    /// Deletion phase: best-effort, each asset independent.
    ///
    /// Runs only after the store write has succeeded. Failures are logged
    /// and never affect sibling deletes or the enclosing operation.
    pub async fn discard(&self, locators: &[String]) {
        let deletions = locators
            .iter()
            .filter(|locator| !locator.is_empty())
            .map(|locator| async move {
                let asset_id = asset_id_from_locator(locator, &self.folder);
                if let Err(err) = self.host.delete(&asset_id).await {
                    tracing::warn!(%locator, "failed to delete superseded image asset: {err}");
                }
            });

        join_all(deletions).await;
    }
}
