//! Catalog service implementation
//!
//! Runs the parse -> classify -> store pipeline for the mirrored channel
//! catalog and serves category listings to the mirror bot.

use tracing::debug;
use crate::catalog::{CategoryClassifier, PostParser};
use crate::config::CatalogConfig;
use crate::database::ChannelPostRepository;
use crate::models::channel_post::{ChannelPost, CreateChannelPostRequest};
use crate::utils::errors::Result;
use crate::utils::logging::log_catalog_ingest;

/// Catalog pipeline over the mirrored channel store
#[derive(Debug, Clone)]
pub struct CatalogService {
    parser: PostParser,
    classifier: CategoryClassifier,
    repository: ChannelPostRepository,
}

impl CatalogService {
    pub fn new(repository: ChannelPostRepository, config: &CatalogConfig) -> Self {
        Self {
            parser: PostParser::new(),
            classifier: CategoryClassifier::from_config(config),
            repository,
        }
    }

    /// Ingest a channel post. Returns the stored entry, or `None` when the
    /// post is unparseable (skipped) or already mirrored (idempotent).
    pub async fn ingest(
        &self,
        channel_id: i64,
        message_id: i64,
        text: &str,
        image_file_id: Option<String>,
    ) -> Result<Option<ChannelPost>> {
        let Some(parsed) = self.parser.parse(text) else {
            debug!(
                channel_id = channel_id,
                message_id = message_id,
                "Channel post has no parseable name or price, skipping"
            );
            return Ok(None);
        };

        let category = self.classifier.classify(&parsed.hashtags);

        let inserted = self
            .repository
            .insert(CreateChannelPostRequest {
                channel_id,
                message_id,
                name: parsed.name,
                caption: parsed.description,
                price: parsed.price,
                category: category.clone(),
                image_file_id,
            })
            .await?;

        log_catalog_ingest(channel_id, message_id as i32, &category, inserted.is_some());
        Ok(inserted)
    }

    /// Category labels currently present in the catalog
    pub async fn categories(&self) -> Result<Vec<String>> {
        self.repository.list_categories().await
    }

    /// Catalog entries for a category, newest first
    pub async fn products_in(&self, category: &str) -> Result<Vec<ChannelPost>> {
        self.repository.list_by_category(category).await
    }
}
