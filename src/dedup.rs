//! Cross-source deduplication by exact title.

use crate::models::CanonicalArticle;
use itertools::Itertools;

/// Drop every article whose title equals (case-sensitively) the title of an
/// earlier article. Stable: the first occurrence wins and order is kept.
pub fn dedup_by_title(articles: Vec<CanonicalArticle>) -> Vec<CanonicalArticle> {
    articles
        .into_iter()
        .unique_by(|a| a.title.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_articles;
    use chrono::Utc;

    fn with_title(title: &str, description: &str) -> CanonicalArticle {
        let mut a = fallback_articles(Utc::now()).remove(0);
        a.title = title.to_string();
        a.description = description.to_string();
        a
    }

    #[test]
    fn test_first_occurrence_wins() {
        let articles = vec![
            with_title("Same headline", "first description"),
            with_title("Other headline", "other"),
            with_title("Same headline", "second description"),
        ];
        let out = dedup_by_title(articles);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].description, "first description");
        assert_eq!(out[1].title, "Other headline");
    }

    #[test]
    fn test_titles_compare_case_sensitively() {
        let out = dedup_by_title(vec![
            with_title("Lagos News", "a"),
            with_title("lagos news", "b"),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let articles = vec![
            with_title("A", "1"),
            with_title("B", "2"),
            with_title("A", "3"),
            with_title("C", "4"),
            with_title("B", "5"),
        ];
        let once = dedup_by_title(articles);
        let twice = dedup_by_title(once.clone());
        assert_eq!(once, twice);
        assert_eq!(
            once.iter().map(|a| a.title.as_str()).collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
    }
}
