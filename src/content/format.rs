use std::str::FromStr;

use super::Fragment;

/// A heading level between 1 and 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub fn new(level: u8) -> Result<Self, crate::Error> {
        if (1..=3).contains(&level) {
            Ok(Self(level))
        } else {
            Err(crate::Error::validation(format!(
                "Heading level must be 1-3, got {level}"
            )))
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
    Heading(HeadingLevel),
}

impl FormatKind {
    pub fn heading(level: u8) -> Result<Self, crate::Error> {
        HeadingLevel::new(level).map(Self::Heading)
    }

    fn tag(self) -> String {
        match self {
            Self::Bold => "strong".into(),
            Self::Italic => "em".into(),
            Self::Underline => "u".into(),
            Self::Heading(level) => format!("h{level}"),
        }
    }

    /// Text used when there is nothing to wrap, so the tag is never empty.
    pub fn placeholder(self) -> String {
        match self {
            Self::Bold => "bold text".into(),
            Self::Italic => "italic text".into(),
            Self::Underline => "underlined text".into(),
            Self::Heading(level) => format!("Heading {level}"),
        }
    }

    pub fn is_block(self) -> bool {
        matches!(self, Self::Heading(_))
    }
}

impl FromStr for FormatKind {
    type Err = crate::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bold" | "b" => Ok(Self::Bold),
            "italic" | "i" => Ok(Self::Italic),
            "underline" | "u" => Ok(Self::Underline),
            "h1" => Self::heading(1),
            "h2" => Self::heading(2),
            "h3" => Self::heading(3),
            _ => Err(crate::Error::validation(format!(
                "Unknown formatting: {s}"
            ))),
        }
    }
}

pub fn format_fragment(kind: FormatKind, span: &str) -> Fragment {
    let tag = kind.tag();
    let placeholder;
    let text = if span.trim().is_empty() {
        placeholder = kind.placeholder();
        placeholder.as_str()
    } else {
        span
    };
    let html = format!("<{tag}>{text}</{tag}>");
    if kind.is_block() {
        Fragment::block(html)
    } else {
        Fragment::inline(html)
    }
}
