//! Pre-rendering post listings into the home page.

use std::sync::LazyLock;

use itertools::Itertools as _;
use regex::{Captures, Regex};
use tracing::warn;

use crate::{backend::PostRecord, config::Site};

use super::page::{display_date, file_name, truncate};

static FEATURED_SLOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div id="featured-post"([^>]*)>\s*<!--\s*Featured post will be loaded here\s*-->\s*</div>"#)
        .unwrap()
});
static POSTS_SLOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div id="posts"([^>]*)>\s*<!--\s*Regular posts will be loaded here\s*-->\s*</div>"#)
        .unwrap()
});
static LOADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<div id="loading"[^>]*>\s*Loading\.\.\.\s*</div>"#).unwrap());

const FEATURED_EXCERPT_CHARS: usize = 200;
const REGULAR_EXCERPT_CHARS: usize = 150;

fn summary(post: &PostRecord, chars: usize) -> String {
    if post.excerpt.is_empty() {
        format!("{}...", truncate(&post.content, chars))
    } else {
        post.excerpt.clone()
    }
}

fn featured_article(site: &Site, post: &PostRecord) -> String {
    format!(
        r#"
        <article class="border-b-2 border-black pb-8 mb-8">
            <div class="text-sm text-black mb-2 font-['Space_Mono']">Featured</div>
            <h1 class="text-2xl font-normal text-black mb-3 font-['Space_Mono']">
                <a href="{href}" class="hover:underline">{title}</a>
            </h1>
            <div class="text-black mb-4 font-['Space_Mono']">{date} • {byline}</div>
            <div class="text-black leading-relaxed font-['Inter']">{summary}</div>
        </article>"#,
        href = file_name(post),
        title = html_escape::encode_text(&post.title),
        date = display_date(post),
        byline = html_escape::encode_text(&site.byline),
        summary = summary(post, FEATURED_EXCERPT_CHARS),
    )
}

fn regular_article(site: &Site, post: &PostRecord) -> String {
    format!(
        r#"
        <article class="border-b border-black pb-8">
            <h2 class="text-xl font-normal text-black mb-2 font-['Space_Mono']">
                <a href="{href}" class="hover:underline">{title}</a>
            </h2>
            <div class="text-black mb-3 font-['Space_Mono']">{date} • {byline}</div>
            <div class="text-black leading-relaxed font-['Inter'] text-sm">{summary}</div>
        </article>
    "#,
        href = file_name(post),
        title = html_escape::encode_text(&post.title),
        date = display_date(post),
        byline = html_escape::encode_text(&site.byline),
        summary = summary(post, REGULAR_EXCERPT_CHARS),
    )
}

fn fill(template: &str, slot: &Regex, id: &str, html: &str) -> String {
    if !slot.is_match(template) {
        warn!(id, "index template has no placeholder");
    }
    slot.replace(template, |caps: &Captures<'_>| {
        format!("<div id=\"{id}\"{}>\n            {html}\n        </div>", &caps[1])
    })
    .into_owned()
}

/// Fill the featured and regular post slots of the index template and drop
/// its loading indicator. Only the first featured post is shown.
pub fn render_index(
    site: &Site,
    template: &str,
    featured: &[PostRecord],
    regular: &[PostRecord],
) -> String {
    let featured_html = featured
        .first()
        .map(|post| featured_article(site, post))
        .unwrap_or_default();
    let posts_html = regular
        .iter()
        .map(|post| regular_article(site, post))
        .join("");

    let index = fill(template, &FEATURED_SLOT, "featured-post", &featured_html);
    let index = fill(&index, &POSTS_SLOT, "posts", &posts_html);
    LOADING.replace(&index, "").into_owned()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    const TEMPLATE: &str = r#"<main>
        <div id="loading" class="text-black text-center py-8 font-['Space_Mono']">
            Loading...
        </div>
        <div id="featured-post" class="mb-12">
            <!-- Featured post will be loaded here -->
        </div>
        <div id="posts" class="space-y-8">
            <!-- Regular posts will be loaded here -->
        </div>
</main>"#;

    fn site() -> Site {
        Site {
            base_url: "https://example.com".into(),
            name: "Example".into(),
            author: "Someone".into(),
            byline: "jed".into(),
            keywords: Vec::new(),
        }
    }

    fn post(id: i64, slug: &str, excerpt: &str, featured: bool) -> PostRecord {
        PostRecord {
            id,
            title: slug.to_uppercase(),
            slug: slug.into(),
            excerpt: excerpt.into(),
            content: "word ".repeat(100),
            featured,
            created_at: chrono::Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_index() {
        let featured = vec![
            post(3, "newest", "Top story", true),
            post(2, "older", "Hidden", true),
        ];
        let regular = vec![post(1, "plain", "", false)];
        let html = render_index(&site(), TEMPLATE, &featured, &regular);

        assert!(!html.contains("Loading..."));
        assert!(!html.contains("will be loaded here"));
        assert!(html.contains(r#"<div id="featured-post" class="mb-12">"#));
        assert!(html.contains(r#"<a href="post-newest.html" class="hover:underline">NEWEST</a>"#));
        assert!(html.contains("Top story"));
        assert!(!html.contains("Hidden"));
        assert!(html.contains(r#"<a href="post-plain.html""#));
        assert!(html.contains("January 15, 2025 • jed"));
        let fallback = format!("{}...", &"word ".repeat(100)[..150]);
        assert!(html.contains(&fallback));
    }

    #[test]
    fn test_empty_featured() {
        let html = render_index(&site(), TEMPLATE, &[], &[]);
        assert!(html.contains("<div id=\"featured-post\" class=\"mb-12\">\n            \n        </div>"));
    }
}
