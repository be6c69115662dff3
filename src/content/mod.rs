//! Content transformers
//!
//! Pure functions turning structured authoring input into HTML fragments
//! ready to be spliced into the content buffer.

pub mod csv;
pub mod format;
pub mod image;
pub mod link;
pub mod table;

pub use format::{FormatKind, HeadingLevel, format_fragment};
pub use image::{AssetOrigin, ImageAsset, ImageFile, image_fragment};
pub use link::{link_fragment, normalize_url};
pub use table::{TableData, table_fragment, table_preview};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Tables, figures and headings. Padded with newlines on insertion.
    Block,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub html: String,
    pub kind: FragmentKind,
}

impl Fragment {
    pub fn block(html: String) -> Self {
        Self {
            html,
            kind: FragmentKind::Block,
        }
    }

    pub fn inline(html: String) -> Self {
        Self {
            html,
            kind: FragmentKind::Inline,
        }
    }

    pub fn is_block(&self) -> bool {
        self.kind == FragmentKind::Block
    }
}

impl AsRef<str> for Fragment {
    fn as_ref(&self) -> &str {
        &self.html
    }
}

pub(crate) fn attr(value: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}
