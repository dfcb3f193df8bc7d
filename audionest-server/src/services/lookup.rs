//! Search of the external platform

use audionest_common::models::ExternalSource;
use std::sync::Arc;
use tracing::info;

use crate::traits::AudioSourceSearcher;
use crate::Result;

pub struct AudioSourceLookup {
    searcher: Arc<dyn AudioSourceSearcher>,
}

impl AudioSourceLookup {
    pub fn new(searcher: Arc<dyn AudioSourceSearcher>) -> Self {
        Self { searcher }
    }

    /// Search by free text; a blank query matches nothing
    pub async fn search(&self, query: &str) -> Result<Vec<ExternalSource>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        info!("Searching external sources for '{}'", query);
        let results = self.searcher.search(query).await?;
        info!("Found {} external sources for '{}'", results.len(), query);
        Ok(results)
    }
}
