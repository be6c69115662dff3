use tracing::{debug, info};

use crate::{
    content::{self, FormatKind, Fragment, ImageAsset, TableData},
    derive, preview,
};

use super::buffer::{ContentBuffer, Selection};

/// The post form fields besides the content buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub featured: bool,
}

/// Transient authoring state.
///
/// Every editing operation validates first and only then touches the
/// buffer, so a failed operation leaves the session as it was.
#[derive(Debug, Default)]
pub struct EditingSession {
    pub form: PostForm,
    buffer: ContentBuffer,
    table: Option<TableData>,
    images: Vec<ImageAsset>,
    editing_post: Option<i64>,
}

impl EditingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session editing an existing post.
    pub fn editing(id: i64, form: PostForm, content: impl Into<String>) -> Self {
        Self {
            form,
            buffer: ContentBuffer::new(content),
            editing_post: Some(id),
            ..Default::default()
        }
    }

    pub fn content(&self) -> &ContentBuffer {
        &self.buffer
    }

    pub fn table(&self) -> Option<&TableData> {
        self.table.as_ref()
    }

    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    pub fn editing_post(&self) -> Option<i64> {
        self.editing_post
    }

    /// Drop all state and return to create mode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
        self.form.slug = derive::slug(&self.form.title);
    }

    /// Replace the whole buffer, as typing into the editor does.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.buffer.set(content);
        self.refresh_excerpt();
    }

    fn refresh_excerpt(&mut self) {
        self.form.excerpt = derive::excerpt(self.buffer.as_str());
    }

    pub fn preview(&self) -> String {
        preview::render(self.buffer.as_str())
    }

    /// Parse a CSV document into the pending table. A document without data
    /// rows leaves no table behind.
    pub fn load_csv(&mut self, src: &str) -> Result<&TableData, crate::Error> {
        self.table = None;
        let table = TableData::from_csv(src)?;
        info!(rows = table.len(), "CSV loaded");
        Ok(self.table.insert(table))
    }

    pub fn insert_table(&mut self, caret: usize, caption: Option<&str>) -> Result<(), crate::Error> {
        let Some(table) = self.table.take() else {
            return Err(crate::Error::validation("Load a CSV file first"));
        };
        let fragment = content::table_fragment(&table, caption);
        self.insert(caret, &fragment);
        Ok(())
    }

    pub(crate) fn push_image(&mut self, asset: ImageAsset) {
        self.images.push(asset);
    }

    fn image_mut(&mut self, index: usize) -> Result<&mut ImageAsset, crate::Error> {
        self.images
            .get_mut(index)
            .ok_or_else(|| crate::Error::validation(format!("No image at position {index}")))
    }

    pub fn set_caption(&mut self, index: usize, caption: impl Into<String>) -> Result<(), crate::Error> {
        let caption = caption.into();
        self.image_mut(index)?.caption = Some(caption).filter(|c| !c.trim().is_empty());
        Ok(())
    }

    pub fn insert_image(&mut self, index: usize, caret: usize) -> Result<(), crate::Error> {
        let fragment = content::image_fragment(self.image_mut(index)?);
        self.insert(caret, &fragment);
        Ok(())
    }

    pub fn insert_link(
        &mut self,
        caret: usize,
        url: &str,
        text: &str,
        new_tab: bool,
    ) -> Result<(), crate::Error> {
        let fragment = content::link_fragment(url, text, new_tab)?;
        self.insert(caret, &fragment);
        Ok(())
    }

    /// Wrap the selected text in a link. Requires a non-blank selection.
    pub fn link_selection(
        &mut self,
        selection: Selection,
        url: &str,
        new_tab: bool,
    ) -> Result<(), crate::Error> {
        let text = self.buffer.selected(selection);
        let label = text.trim();
        if label.is_empty() {
            return Err(crate::Error::validation("Select text first"));
        }
        // Whitespace picked up by the selection stays outside the link.
        let leading = &text[..text.len() - text.trim_start().len()];
        let trailing = &text[text.trim_end().len()..];
        let link = content::link_fragment(url, label, new_tab)?;
        let fragment = Fragment::inline(format!("{leading}{}{trailing}", link.html));
        self.replace(selection, &fragment);
        Ok(())
    }

    /// Wrap the selection in `kind`. With nothing selected a placeholder is
    /// inserted at the caret instead.
    pub fn apply_format(&mut self, selection: Selection, kind: FormatKind) {
        let fragment = content::format_fragment(kind, self.buffer.selected(selection));
        if selection.is_empty() {
            self.insert(selection.start, &fragment);
        } else {
            self.replace(selection, &fragment);
        }
    }

    fn insert(&mut self, caret: usize, fragment: &Fragment) {
        debug!(caret, block = fragment.is_block(), "insert fragment");
        self.buffer.insert(caret, fragment);
        self.refresh_excerpt();
    }

    fn replace(&mut self, selection: Selection, fragment: &Fragment) {
        debug!(?selection, "replace selection");
        self.buffer.replace(selection, fragment);
        self.refresh_excerpt();
    }
}
