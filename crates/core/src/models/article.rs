use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A blog article of the public site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub category: String,
    pub image_url: String,
    #[serde(default)]
    pub featured: bool,
    /// Estimated reading time in minutes.
    pub read_time: u32,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}
