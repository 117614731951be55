//! Blog article repository for the public site.
//!
//! Articles are immutable and seeded once at startup from an embedded JSON document.
//! Parsing the seed is the only fallible step; every query afterwards is infallible and
//! reports absence as `None` or an empty `Vec`.

use crate::models::Article;
use crate::{ClinicError, ClinicResult};
use std::collections::HashSet;

const SEED_ARTICLES: &str = include_str!("../data/articles.json");

#[derive(Clone, Debug, Default)]
pub struct ArticleRepository {
    articles: Vec<Article>,
}

impl ArticleRepository {
    /// Build a repository over an explicit article list (source order is preserved).
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    /// Build the repository from the articles embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Decode`] if the embedded seed is not a valid article list, and
    /// [`ClinicError::InvalidInput`] if two articles share a slug.
    pub fn seeded() -> ClinicResult<Self> {
        let articles: Vec<Article> = serde_json::from_str(SEED_ARTICLES)?;

        let mut slugs = HashSet::new();
        for article in &articles {
            if !slugs.insert(article.slug.as_str()) {
                return Err(ClinicError::InvalidInput(format!(
                    "duplicate article slug: {}",
                    article.slug
                )));
            }
        }

        tracing::debug!(count = articles.len(), "loaded seed articles");
        Ok(Self::new(articles))
    }

    pub fn all(&self) -> &[Article] {
        &self.articles
    }

    /// The `limit` most recently published articles, newest first.
    ///
    /// Articles published at the same instant keep their source order.
    pub fn latest(&self, limit: usize) -> Vec<&Article> {
        let mut sorted = newest_first(self.articles.iter());
        sorted.truncate(limit);
        sorted
    }

    /// Featured articles, newest first.
    pub fn featured(&self) -> Vec<&Article> {
        newest_first(self.articles.iter().filter(|a| a.featured))
    }

    /// Exact slug lookup.
    pub fn by_slug(&self, slug: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.slug == slug)
    }

    /// Articles whose category matches ignoring case, newest first.
    pub fn by_category(&self, category: &str) -> Vec<&Article> {
        let wanted = category.to_lowercase();
        newest_first(
            self.articles
                .iter()
                .filter(|a| a.category.to_lowercase() == wanted),
        )
    }

    /// Distinct categories in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.articles
            .iter()
            .map(|a| a.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Other articles in the same category as `slug`, newest first.
    ///
    /// Empty when the slug is unknown.
    pub fn related(&self, slug: &str, limit: usize) -> Vec<&Article> {
        let Some(current) = self.by_slug(slug) else {
            return Vec::new();
        };

        let mut related: Vec<&Article> = self
            .by_category(&current.category)
            .into_iter()
            .filter(|a| a.slug != current.slug)
            .collect();
        related.truncate(limit);
        related
    }
}

fn newest_first<'a>(articles: impl Iterator<Item = &'a Article>) -> Vec<&'a Article> {
    let mut sorted: Vec<&Article> = articles.collect();
    // `sort_by` is stable, so equal timestamps keep source order.
    sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    sorted
}
