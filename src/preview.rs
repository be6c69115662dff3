//! Preview rendering
//!
//! Approximates how the published post will look by rewriting the raw
//! content buffer with an ordered list of text substitutions. There is no
//! HTML parse and no sanitizing; the buffer is trusted author input.
//!
//! Every rule is idempotent: a tag that already carries the class it would
//! receive is left alone, so refreshing the preview never stacks classes.

use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

static NEWLINES_BEFORE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n)+(<div|<figure)").unwrap());
static DOUBLE_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n\r?\n").unwrap());
static NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n").unwrap());
static OPENING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(table|th|td|tr|img|a)\b([^>]*)>").unwrap());
static CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`/]+))"#).unwrap());

pub const LINK_CLASS: &str = "post-link";

/// How a tag is styled when rendered.
#[derive(Debug, Clone, Copy)]
pub enum ClassRule {
    /// Add the class attribute only if the tag has none.
    Default(&'static str),
    /// Append the class to the existing list, or add it.
    Append(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub margins: &'static [(&'static str, &'static str)],
    pub tags: &'static [(&'static str, ClassRule)],
}

/// The editor preview: only bottom margins, every table and image styled.
pub const EDITOR: Profile = Profile {
    margins: &[
        (r#"class="my-2""#, r#"class="mb-2""#),
        (r#"class="my-1""#, r#"class="mb-1""#),
        (r#"class="mt-0 mb-2""#, r#"class="mb-2""#),
        (r#"class="mt-0 mb-1""#, r#"class="mb-1""#),
    ],
    tags: &[
        (
            "table",
            ClassRule::Default("w-full border-collapse border border-gray-300"),
        ),
        (
            "th",
            ClassRule::Default(
                "border border-gray-300 px-3 py-2 text-left font-['Space_Mono'] font-medium",
            ),
        ),
        (
            "td",
            ClassRule::Default("border border-gray-300 px-3 py-2 font-['Inter']"),
        ),
        ("tr", ClassRule::Default("even:bg-gray-50")),
        ("img", ClassRule::Default("w-full rounded-lg shadow-sm")),
        ("a", ClassRule::Append(LINK_CLASS)),
    ],
};

/// The published post page: tighter spacing around tables and figures,
/// links picked out.
pub const PUBLISHED: Profile = Profile {
    margins: &[
        (r#"class="my-6""#, r#"class="my-1""#),
        (r#"class="my-4""#, r#"class="my-1""#),
        (r#"class="my-2""#, r#"class="my-1""#),
        (r#"class="mt-2""#, r#"class="mt-1""#),
    ],
    tags: &[("a", ClassRule::Append(LINK_CLASS))],
};

fn class_list<'a>(caps: &Captures<'a>) -> &'a str {
    caps.get(2)
        .or_else(|| caps.get(3))
        .or_else(|| caps.get(4))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

fn style_tag(caps: &Captures<'_>, rule: ClassRule) -> String {
    let whole = &caps[0];
    let tag = &caps[1];
    let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    if let Some(class) = CLASS_ATTR.captures(attrs) {
        return match rule {
            ClassRule::Default(_) => whole.to_owned(),
            ClassRule::Append(extra) => {
                let existing = class_list(&class);
                if existing.split_whitespace().any(|c| c == extra) {
                    return whole.to_owned();
                }
                let merged = if existing.trim().is_empty() {
                    extra.to_owned()
                } else {
                    format!("{} {extra}", existing.trim_end())
                };
                let attrs = CLASS_ATTR.replace(attrs, |c: &Captures<'_>| {
                    format!(r#"{}class="{merged}""#, &c[1])
                });
                format!("<{tag}{attrs}>")
            }
        };
    }

    let class = match rule {
        ClassRule::Default(class) | ClassRule::Append(class) => class,
    };
    let trimmed = attrs.trim_end();
    match trimmed.strip_suffix('/') {
        Some(attrs) => format!(r#"<{tag}{} class="{class}" />"#, attrs.trim_end()),
        None => format!(r#"<{tag}{trimmed} class="{class}">"#),
    }
}

fn inject_classes<'a>(src: &'a str, profile: &Profile) -> Cow<'a, str> {
    OPENING_TAG.replace_all(src, |caps: &Captures<'_>| {
        let name = caps[1].to_ascii_lowercase();
        match profile.tags.iter().find(|(tag, _)| *tag == name) {
            Some((_, rule)) => style_tag(caps, *rule),
            None => caps[0].to_owned(),
        }
    })
}

/// Line breaks become `<br>`, except directly before tables and figures.
pub fn convert_line_breaks(src: &str) -> String {
    let src = NEWLINES_BEFORE_BLOCK.replace_all(src, "$1");
    let src = DOUBLE_NEWLINE.replace_all(&src, "<br><br>");
    NEWLINE.replace_all(&src, "<br>").into_owned()
}

pub fn render_with(content: &str, profile: &Profile) -> String {
    let mut out = convert_line_breaks(content);
    for (from, to) in profile.margins {
        out = out.replace(from, to);
    }
    inject_classes(&out, profile).into_owned()
}

/// Render the content buffer for the editor preview.
pub fn render(content: &str) -> String {
    render_with(content, &EDITOR)
}

/// Render post content for the published page.
pub fn render_published(content: &str) -> String {
    render_with(content, &PUBLISHED)
}
