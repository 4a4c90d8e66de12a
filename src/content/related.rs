//! Related-post matching by tag overlap

use super::post::PostMeta;

/// Find up to `limit` posts sharing tags with the current post.
///
/// Overlap is a case-sensitive intersection count over resolved tags.
/// Zero-overlap posts are dropped; the sort is stable, so ties keep the
/// listing order of `all_posts`. The current post is never returned.
pub fn find_related(
    current_slug: &str,
    current_tags: &[String],
    all_posts: &[PostMeta],
    limit: usize,
) -> Vec<PostMeta> {
    let mut scored: Vec<(usize, &PostMeta)> = all_posts
        .iter()
        .filter(|post| post.slug != current_slug)
        .map(|post| {
            let overlap = post
                .tags
                .iter()
                .filter(|tag| current_tags.contains(tag))
                .count();
            (overlap, post)
        })
        .filter(|(overlap, _)| *overlap > 0)
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, post)| post.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(slug: &str, tags: &[&str]) -> PostMeta {
        PostMeta {
            slug: slug.to_string(),
            title: slug.to_string(),
            date: "2024-01-01".to_string(),
            description: String::new(),
            author: None,
            cover_image: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            reading_time: "1 min read".to_string(),
        }
    }

    fn current_tags(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_never_returns_current_post() {
        let posts = vec![meta("a", &["X"]), meta("b", &["X"])];
        let related = find_related("a", &current_tags(&["X"]), &posts, 3);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].slug, "b");
    }

    #[test]
    fn test_zero_overlap_excluded() {
        let posts = vec![meta("a", &["X"]), meta("b", &["Y"]), meta("c", &["X", "Z"])];
        let related = find_related("a", &current_tags(&["X", "Z"]), &posts, 3);
        let slugs: Vec<_> = related.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["c"]);
    }

    #[test]
    fn test_sorted_by_overlap_desc() {
        let posts = vec![
            meta("one", &["A"]),
            meta("two", &["A", "B"]),
            meta("three", &["A", "B", "C"]),
        ];
        let related = find_related("current", &current_tags(&["A", "B", "C"]), &posts, 3);
        let slugs: Vec<_> = related.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["three", "two", "one"]);
    }

    #[test]
    fn test_limit_applied() {
        let posts = vec![
            meta("a", &["X"]),
            meta("b", &["X"]),
            meta("c", &["X"]),
            meta("d", &["X"]),
        ];
        let related = find_related("current", &current_tags(&["X"]), &posts, 3);
        assert_eq!(related.len(), 3);
    }

    #[test]
    fn test_ties_keep_listing_order() {
        let posts = vec![meta("newer", &["X"]), meta("older", &["X"])];
        let related = find_related("current", &current_tags(&["X"]), &posts, 3);
        let slugs: Vec<_> = related.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);
    }

    #[test]
    fn test_overlap_is_case_sensitive() {
        let posts = vec![meta("a", &["education"])];
        let related = find_related("current", &current_tags(&["Education"]), &posts, 3);
        assert!(related.is_empty());
    }
}
