use std::sync::LazyLock;

use tracing::debug;

use super::{Fragment, attr};

static SCHEME: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").unwrap());

/// Prefix `https://` unless the URL already names a scheme or is a `mailto:`
/// link. The result must still parse as a URL.
pub fn normalize_url(url: &str) -> Result<String, crate::Error> {
    let url = url.trim();
    if url.is_empty() {
        return Err(crate::Error::validation("Please enter a URL"));
    }
    let is_mailto = url
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("mailto:"));
    let normalized = if SCHEME.is_match(url) || is_mailto {
        url.to_owned()
    } else {
        format!("https://{url}")
    };
    url::Url::parse(&normalized).map_err(|e| {
        debug!(%normalized, %e, "rejected link");
        crate::Error::validation(format!("Please enter a valid URL ({e})"))
    })?;
    Ok(normalized)
}

/// A link to `url` labelled `text`. New-tab links carry
/// `rel="noopener noreferrer"` so the opened page gets no handle on the
/// opener.
pub fn link_fragment(url: &str, text: &str, new_tab: bool) -> Result<Fragment, crate::Error> {
    let text = text.trim();
    if text.is_empty() {
        return Err(crate::Error::validation(
            "Please enter both URL and link text",
        ));
    }
    let url = normalize_url(url)?;
    let target = if new_tab {
        r#" target="_blank" rel="noopener noreferrer""#
    } else {
        ""
    };
    Ok(Fragment::inline(format!(
        r#"<a href="{}"{target}>{text}</a>"#,
        attr(&url)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_url("example.com/a").unwrap(), "https://example.com/a");
        assert_eq!(normalize_url(" http://example.com ").unwrap(), "http://example.com");
        assert_eq!(
            normalize_url("mailto:jed@example.com").unwrap(),
            "mailto:jed@example.com"
        );
        assert_eq!(
            normalize_url("MAILTO:jed@example.com").unwrap(),
            "MAILTO:jed@example.com"
        );
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            normalize_url("not a url"),
            Err(crate::Error::Validation(_))
        ));
        assert!(matches!(normalize_url("  "), Err(crate::Error::Validation(_))));
    }

    #[test]
    fn test_fragment() {
        let fragment = link_fragment("example.com", "Example", false).unwrap();
        assert!(!fragment.is_block());
        assert_eq!(fragment.html, r#"<a href="https://example.com">Example</a>"#);
    }

    #[test]
    fn test_new_tab() {
        let fragment = link_fragment("https://example.com/?a=1&b=2", "Example", true).unwrap();
        assert_eq!(
            fragment.html,
            r#"<a href="https://example.com/?a=1&amp;b=2" target="_blank" rel="noopener noreferrer">Example</a>"#
        );
    }

    #[test]
    fn test_missing_text() {
        assert!(matches!(
            link_fragment("https://example.com", " ", false),
            Err(crate::Error::Validation(_))
        ));
    }
}
