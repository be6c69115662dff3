//! Slug and excerpt derivation for the post form.

use std::sync::LazyLock;

use itertools::Itertools as _;

pub const EXCERPT_WORDS: usize = 30;

static NON_SLUG_CHARS: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"[^a-z0-9\s-]").unwrap());
static WHITESPACE_RUN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\s+").unwrap());
static HYPHEN_RUN: LazyLock<regex::Regex> = LazyLock::new(|| regex::Regex::new(r"-+").unwrap());
static HTML_TAG: LazyLock<regex::Regex> = LazyLock::new(|| regex::Regex::new(r"<[^>]*>").unwrap());

pub fn slug(title: &str) -> String {
    let lower = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lower, "");
    let hyphenated = WHITESPACE_RUN.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_owned()
}

pub fn excerpt(content: &str) -> String {
    excerpt_with_limit(content, EXCERPT_WORDS)
}

pub fn excerpt_with_limit(content: &str, words: usize) -> String {
    let text = HTML_TAG.replace_all(content, " ");
    let mut iter = text.split_whitespace();
    let head = iter.by_ref().take(words).join(" ");
    if iter.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
