use std::fmt::Write as _;

use crate::{backend::PostRecord, config::Site, content::attr, preview};

const DESCRIPTION_CHARS: usize = 160;

pub(crate) fn display_date(post: &PostRecord) -> String {
    post.created_at.format("%B %-d, %Y").to_string()
}

pub(crate) fn truncate(content: &str, chars: usize) -> String {
    content.chars().take(chars).collect()
}

pub fn file_name(post: &PostRecord) -> String {
    format!("post-{}.html", post.slug)
}

fn description(post: &PostRecord) -> String {
    if post.excerpt.is_empty() {
        truncate(&post.content, DESCRIPTION_CHARS)
    } else {
        post.excerpt.clone()
    }
}

/// A standalone page for one post.
pub fn render_post_page(site: &Site, post: &PostRecord) -> String {
    let title = format!("{} - {}", post.title, site.name);
    let title_attr = attr(&title);
    let description = description(post);
    let description = attr(&description);
    let url = format!("{}/{}", site.base_url, file_name(post));
    let url = attr(&url);

    let mut head = String::new();
    writeln!(head, "    <title>{}</title>", html_escape::encode_text(&title)).unwrap();
    writeln!(head, r#"    <meta name="description" content="{description}">"#).unwrap();
    if !site.keywords.is_empty() {
        writeln!(
            head,
            r#"    <meta name="keywords" content="{}">"#,
            attr(&site.keywords.join(", "))
        )
        .unwrap();
    }
    writeln!(head, r#"    <meta name="author" content="{}">"#, attr(&site.author)).unwrap();
    writeln!(head).unwrap();
    writeln!(head, r#"    <meta property="og:type" content="article">"#).unwrap();
    writeln!(head, r#"    <meta property="og:url" content="{url}">"#).unwrap();
    writeln!(head, r#"    <meta property="og:title" content="{title_attr}">"#).unwrap();
    writeln!(head, r#"    <meta property="og:description" content="{description}">"#).unwrap();
    writeln!(head, r#"    <meta property="og:site_name" content="{}">"#, attr(&site.name)).unwrap();
    writeln!(head).unwrap();
    writeln!(head, r#"    <meta property="twitter:card" content="summary_large_image">"#).unwrap();
    writeln!(head, r#"    <meta property="twitter:url" content="{url}">"#).unwrap();
    writeln!(head, r#"    <meta property="twitter:title" content="{title_attr}">"#).unwrap();
    writeln!(head, r#"    <meta property="twitter:description" content="{description}">"#).unwrap();
    writeln!(head).unwrap();
    writeln!(head, r#"    <link rel="canonical" href="{url}">"#).unwrap();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
{head}
    <script src="https://cdn.tailwindcss.com"></script>
    <link href="https://fonts.googleapis.com/css2?family=Space+Mono:wght@400;700&family=Inter:wght@400;500&display=swap" rel="stylesheet">
    <link href="styles.css" rel="stylesheet">
    <style>
        .post-link {{
            color: #3b82f6;
        }}
    </style>
</head>
<body class="bg-white text-black font-sans">
    <div class="max-w-2xl mx-auto px-4 py-8">
        <div id="header"></div>

        <nav class="mb-6 text-sm">
            <a href="index.html" class="text-black font-['Space_Mono'] hover:underline">← Back to Home</a>
        </nav>

        <div id="post-content">
            <header class="mb-8">
                <h1 class="text-3xl font-normal text-black mb-3 font-['Space_Mono']">{heading}</h1>
                <div class="text-black mb-6 font-['Space_Mono']">{date} • {byline}</div>
            </header>

            <article class="prose prose-lg max-w-none">
                <div class="text-black leading-relaxed font-['Inter']">{body}</div>
            </article>
        </div>
    </div>

    <script src="header.js"></script>
</body>
</html>
"#,
        heading = html_escape::encode_text(&post.title),
        date = display_date(post),
        byline = html_escape::encode_text(&site.byline),
        body = preview::render_published(&post.content),
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn site() -> Site {
        Site {
            base_url: "https://reasonablemachines.io".into(),
            name: "Reasonable Machines".into(),
            author: "Jed Stiglitz".into(),
            byline: "jed".into(),
            keywords: vec!["law".into(), "AI".into()],
        }
    }

    fn post(excerpt: &str) -> PostRecord {
        PostRecord {
            id: 1,
            title: "Rules & Machines".into(),
            slug: "rules-machines".into(),
            excerpt: excerpt.into(),
            content: format!("{}\nSee <a href=\"https://example.com\">this</a>.", "x".repeat(200)),
            featured: false,
            created_at: chrono::Utc.with_ymd_and_hms(2025, 9, 4, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_page() {
        let html = render_post_page(&site(), &post("Short summary"));
        assert!(html.contains("<title>Rules &amp; Machines - Reasonable Machines</title>"));
        assert!(html.contains(r#"<meta name="description" content="Short summary">"#));
        assert!(html.contains(
            r#"<link rel="canonical" href="https://reasonablemachines.io/post-rules-machines.html">"#
        ));
        assert!(html.contains(r#"<meta name="keywords" content="law, AI">"#));
        assert!(html.contains("September 4, 2025 • jed"));
        assert!(html.contains(r#"<a href="https://example.com" class="post-link">this</a>"#));
        assert!(html.contains("<br>See"));
    }

    #[test]
    fn test_description_falls_back_to_content() {
        let html = render_post_page(&site(), &post(""));
        let expected = format!(r#"<meta name="description" content="{}">"#, "x".repeat(160));
        assert!(html.contains(&expected));
    }
}
