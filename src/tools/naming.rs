//! Tool name normalization.

/// Maximum length, in characters, of a registered tool name.
pub const MAX_TOOL_NAME_LENGTH: usize = 64;

/// Derive a tool name from a client prefix and a human title.
///
/// Whitespace runs in `title` collapse to `_`, the title is lower-cased and
/// prefixed with `{prefix}_`, and the whole is cut at
/// [`MAX_TOOL_NAME_LENGTH`] characters regardless of word boundaries.
pub fn normalize_name(prefix: &str, title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('_');
            }
            in_whitespace = true;
        } else {
            slug.push(ch);
            in_whitespace = false;
        }
    }

    format!("{}_{}", prefix, slug.to_lowercase())
        .chars()
        .take(MAX_TOOL_NAME_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic() {
        assert_eq!(normalize_name("acme", "List Issues"), "acme_list_issues");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(
            normalize_name("acme", "  Get \t Issue\n\nDetails "),
            "acme__get_issue_details_"
        );
    }

    #[test]
    fn test_prefix_kept_verbatim() {
        assert_eq!(normalize_name("Acme", "Search"), "Acme_search");
    }

    #[test]
    fn test_long_title_truncated() {
        let title = "This is a really long tool title that should be truncated by the server";
        let name = normalize_name("test_product", title);
        let full = "test_product_this_is_a_really_long_tool_title_that_should_be_truncated_by_the_server";
        assert_eq!(name.chars().count(), 64);
        assert_eq!(name, &full[..64]);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let name = normalize_name("p", &"é".repeat(100));
        assert_eq!(name.chars().count(), MAX_TOOL_NAME_LENGTH);
    }

    proptest! {
        #[test]
        fn prop_bounded_and_deterministic(prefix in ".{0,40}", title in ".{0,120}") {
            let a = normalize_name(&prefix, &title);
            let b = normalize_name(&prefix, &title);
            prop_assert!(a.chars().count() <= MAX_TOOL_NAME_LENGTH);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_no_whitespace_from_title(title in "[a-zA-Z \\t]{0,50}") {
            let name = normalize_name("p", &title);
            prop_assert!(!name.chars().any(char::is_whitespace));
        }
    }
}
