//! Image search
//!
//! The engine never looks at pixels. An upstream vision tagger turns the
//! uploaded photo into an [`ImageDescriptor`] (labels and an optional
//! caption); an [`ImageMatcher`] maps that descriptor to catalog products.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::embedding::{cosine_similarity, Embedding, HarmonicEmbedder};
use crate::core::catalog::Catalog;
use crate::core::config::DEFAULT_IMAGE_MATCH_THRESHOLD;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Opaque reference to the original payload (file name, upload id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ImageDescriptor {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Labels and caption as one string.
    pub fn text(&self) -> String {
        let mut parts: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        if let Some(caption) = &self.caption {
            parts.push(caption);
        }
        parts.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// Short form used in result headers.
    pub fn summary(&self) -> String {
        match (&self.caption, self.labels.is_empty()) {
            (Some(caption), _) => caption.clone(),
            (None, false) => self.labels.join(", "),
            (None, true) => self.source.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageMatch {
    pub product_id: String,
    pub score: f32,
}

/// Maps an image descriptor to candidate products, best match first.
pub trait ImageMatcher {
    fn find_matches(&self, image: &ImageDescriptor) -> Vec<ImageMatch>;
}

impl<T: ImageMatcher + ?Sized> ImageMatcher for Arc<T> {
    fn find_matches(&self, image: &ImageDescriptor) -> Vec<ImageMatch> {
        (**self).find_matches(image)
    }
}

impl<T: ImageMatcher + ?Sized> ImageMatcher for &T {
    fn find_matches(&self, image: &ImageDescriptor) -> Vec<ImageMatch> {
        (**self).find_matches(image)
    }
}

/// Product embeddings held in memory, in catalog order.
#[derive(Debug, Clone)]
pub struct ProductIndex {
    entries: Vec<(String, Embedding)>,
}

impl ProductIndex {
    pub fn build(catalog: &Catalog, embedder: &HarmonicEmbedder) -> Self {
        let entries = catalog
            .products()
            .iter()
            .map(|p| (p.id.clone(), embedder.embed(&p.searchable_text())))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries scoring at least `threshold`, highest first. Equal scores keep
    /// catalog order.
    pub fn search(&self, query: &[f32], threshold: f32) -> Vec<ImageMatch> {
        let mut matches: Vec<ImageMatch> = self
            .entries
            .iter()
            .map(|(id, emb)| ImageMatch {
                product_id: id.clone(),
                score: cosine_similarity(query, emb),
            })
            .filter(|m| m.score >= threshold)
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches
    }
}

/// Default matcher: compares descriptor text with product text embeddings.
#[derive(Debug, Clone)]
pub struct EmbeddingImageMatcher {
    embedder: HarmonicEmbedder,
    index: ProductIndex,
    threshold: f32,
}

impl EmbeddingImageMatcher {
    pub fn build(catalog: &Catalog) -> Self {
        Self::with_threshold(catalog, DEFAULT_IMAGE_MATCH_THRESHOLD)
    }

    pub fn with_threshold(catalog: &Catalog, threshold: f32) -> Self {
        let embedder = HarmonicEmbedder::new();
        let index = ProductIndex::build(catalog, &embedder);
        tracing::debug!(products = index.len(), threshold, "image index built");
        Self {
            embedder,
            index,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl ImageMatcher for EmbeddingImageMatcher {
    fn find_matches(&self, image: &ImageDescriptor) -> Vec<ImageMatch> {
        if image.is_empty() {
            return Vec::new();
        }
        let query = self.embedder.embed(&image.text());
        self.index.search(&query, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample::sample_catalog;

    #[test]
    fn test_descriptor_text() {
        let d = ImageDescriptor::from_labels(["robe", "rouge"]).with_caption("une robe de soirée");
        assert_eq!(d.text(), "robe rouge une robe de soirée");
        assert_eq!(d.summary(), "une robe de soirée");
        assert!(!d.is_empty());
        assert!(ImageDescriptor::default().is_empty());
    }

    #[test]
    fn test_matches_best_product_first() {
        let catalog = sample_catalog().unwrap();
        let matcher = EmbeddingImageMatcher::build(&catalog);

        let dress = matcher.find_matches(&ImageDescriptor::from_labels(["robe", "rouge"]));
        assert_eq!(dress.first().map(|m| m.product_id.as_str()), Some("prod1"));

        let phone = matcher.find_matches(&ImageDescriptor::from_labels(["smartphone"]));
        assert_eq!(phone.first().map(|m| m.product_id.as_str()), Some("prod5"));
    }

    #[test]
    fn test_scores_respect_threshold_and_order() {
        let catalog = sample_catalog().unwrap();
        let matcher = EmbeddingImageMatcher::with_threshold(&catalog, 0.1);
        let matches = matcher.find_matches(&ImageDescriptor::from_labels(["parfum", "floral"]));

        assert!(!matches.is_empty());
        assert!(matches.iter().all(|m| m.score >= 0.1));
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_deterministic() {
        let catalog = sample_catalog().unwrap();
        let a = EmbeddingImageMatcher::build(&catalog);
        let b = EmbeddingImageMatcher::build(&catalog);
        let d = ImageDescriptor::from_labels(["sac", "main"]);
        assert_eq!(a.find_matches(&d), b.find_matches(&d));
    }

    #[test]
    fn test_empty_descriptor_matches_nothing() {
        let catalog = sample_catalog().unwrap();
        let matcher = EmbeddingImageMatcher::build(&catalog);
        let d = ImageDescriptor {
            source: Some("upload-42.jpg".into()),
            ..ImageDescriptor::default()
        };
        assert!(matcher.find_matches(&d).is_empty());
    }

    #[test]
    fn test_threshold_above_one_matches_nothing() {
        let catalog = sample_catalog().unwrap();
        let matcher = EmbeddingImageMatcher::with_threshold(&catalog, 1.01);
        assert!(matcher
            .find_matches(&ImageDescriptor::from_labels(["robe"]))
            .is_empty());
    }
}
