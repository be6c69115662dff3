use std::path::Path;

use base64::Engine as _;
use derive_debug::Dbg;

use super::{Fragment, attr};

const FIGURE_CLASS: &str = "my-2";
const IMG_CLASS: &str = "w-full rounded-lg shadow-sm";
const FIGCAPTION_CLASS: &str = "text-sm text-gray-600 mt-1 text-center font-['Inter']";

/// A user-selected image file.
#[derive(Dbg, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: mime::Mime,
    #[dbg(skip)]
    pub body: Box<[u8]>,
}

impl ImageFile {
    pub fn new(
        name: impl Into<String>,
        content_type: mime::Mime,
        body: impl Into<Box<[u8]>>,
    ) -> Result<Self, crate::Error> {
        let name = name.into();
        if content_type.type_() != mime::IMAGE {
            return Err(crate::Error::validation(format!(
                "{name} is not an image ({content_type})"
            )));
        }
        Ok(Self {
            name,
            content_type,
            body: body.into(),
        })
    }

    pub async fn load(path: &Path) -> Result<Self, crate::Error> {
        let body = tokio::fs::read(path).await.map_err(|error| crate::Error::Io {
            error,
            path: path.to_owned(),
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = mime_guess::from_path(path).first_or_octet_stream();
        Self::new(name, content_type, body)
    }

    /// The file read as a base64 `data:` URL.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type.essence_str(),
            base64::engine::general_purpose::STANDARD.encode(&self.body)
        )
    }

    pub fn extension(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| self.content_type.subtype().as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOrigin {
    /// Uploaded to object storage under `key`.
    Remote { key: String },
    /// Upload failed; the inline preview is used as the source.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub file: ImageFile,
    /// Where the image ended up: the public storage URL, or the preview data
    /// URL after a failed upload.
    pub url: String,
    /// Base64 data URL for displaying the image in the editor.
    pub preview: String,
    pub name: String,
    pub caption: Option<String>,
    pub origin: AssetOrigin,
}

impl ImageAsset {
    pub fn is_fallback(&self) -> bool {
        self.origin == AssetOrigin::Fallback
    }
}

pub fn image_fragment(asset: &ImageAsset) -> Fragment {
    let caption = asset
        .caption
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let alt = caption.unwrap_or(&asset.name);
    let mut html = format!(
        r#"<figure class="{FIGURE_CLASS}"><img src="{}" alt="{}" class="{IMG_CLASS}">"#,
        attr(&asset.url),
        attr(alt)
    );
    if let Some(caption) = caption {
        html.push_str(&format!(
            r#"<figcaption class="{FIGCAPTION_CLASS}">{caption}</figcaption>"#
        ));
    }
    html.push_str("</figure>");
    Fragment::block(html)
}
