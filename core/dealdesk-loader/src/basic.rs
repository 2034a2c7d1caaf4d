//! Reduced loader that joins only the details and files sources.

use crate::error::LoaderResult;
use crate::source::Source;
use async_trait::async_trait;
use dealdesk_types::{BasicDealDetailsModel, DealDetails, DealId, Files};
use std::sync::Arc;
use tracing::debug;

/// Loads the reduced [`BasicDealDetailsModel`].
#[async_trait]
pub trait BasicDealDetailsViewLoader: Send + Sync {
    async fn load(&self, deal_id: &DealId) -> LoaderResult<BasicDealDetailsModel>;
}

/// Polls the details and files sources concurrently and fails with whichever
/// error arrives first, dropping the other load.
pub struct BasicDealDetailsLoader {
    details: Arc<dyn Source<DealDetails>>,
    files: Arc<dyn Source<Files>>,
}

impl BasicDealDetailsLoader {
    pub fn new(details: Arc<dyn Source<DealDetails>>, files: Arc<dyn Source<Files>>) -> Self {
        Self { details, files }
    }
}

#[async_trait]
impl BasicDealDetailsViewLoader for BasicDealDetailsLoader {
    async fn load(&self, deal_id: &DealId) -> LoaderResult<BasicDealDetailsModel> {
        let (details, files) =
            tokio::try_join!(self.details.load(deal_id), self.files.load(deal_id))?;
        debug!(%deal_id, files = files.files.len(), "basic deal details loaded");
        Ok(BasicDealDetailsModel { details, files })
    }
}
