//! Structural and source-trust checks applied before classification.

use crate::models::RawArticle;

/// Descriptions shorter than this are treated as teasers, not articles.
pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// Low-trust terms; any source name containing one is rejected.
pub const BLOCKED_SOURCE_TERMS: &[&str] = &["reddit", "quora", "gossip", "medium", "tabloid"];

/// Whether `article` may enter the classifier.
///
/// Rejects missing or empty titles and descriptions, short descriptions, and
/// sources whose name contains a blocked term (case-insensitive). Nothing
/// else is filtered here.
pub fn is_quality(article: &RawArticle) -> bool {
    let (Some(title), Some(description)) = (&article.title, &article.description) else {
        return false;
    };
    if title.is_empty() || description.is_empty() {
        return false;
    }
    if description.chars().count() < MIN_DESCRIPTION_CHARS {
        return false;
    }

    let source = article.source.as_deref().unwrap_or_default().to_lowercase();
    !BLOCKED_SOURCE_TERMS
        .iter()
        .any(|blocked| source.contains(blocked))
}
