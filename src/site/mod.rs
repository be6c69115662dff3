//! Static site generation from the post store.

pub mod index;
pub mod page;
pub mod sitemap;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use index::render_index;
pub use page::render_post_page;
pub use sitemap::render_sitemap;

use crate::{backend::PostStore, config::Config, status::StatusReporter};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: Vec<PathBuf>,
    pub featured: usize,
    pub regular: usize,
}

async fn write(path: &Path, contents: &str) -> Result<(), crate::Error> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|error| crate::Error::Io {
                error,
                path: parent.to_owned(),
            })?;
    }
    debug!(path = %path.display(), size = contents.len(), "write");
    tokio::fs::write(path, contents)
        .await
        .map_err(|error| crate::Error::Io {
            error,
            path: path.to_owned(),
        })
}

/// Write one page per post, fill the index and regenerate the sitemap.
pub async fn build_site<S, R>(
    config: &Config,
    store: &S,
    reporter: &R,
) -> Result<BuildReport, crate::Error>
where
    S: PostStore,
    R: StatusReporter + ?Sized,
{
    reporter.info("Fetching posts...");
    let posts = store.list().await?;
    reporter.info(&format!("Found {} posts", posts.len()));
    let (featured, regular): (Vec<_>, Vec<_>) = posts.iter().cloned().partition(|p| p.featured);

    let template_path = config.index_template();
    let template = tokio::fs::read_to_string(&template_path)
        .await
        .map_err(|error| crate::Error::Io {
            error,
            path: template_path.clone(),
        })?;
    let index = render_index(&config.site, &template, &featured, &regular);
    write(&config.output.join("index.html"), &index).await?;
    reporter.success("Updated index.html with featured and regular posts");

    let mut report = BuildReport {
        featured: featured.len(),
        regular: regular.len(),
        ..Default::default()
    };
    for post in &posts {
        let path = config.output.join(page::file_name(post));
        write(&path, &render_post_page(&config.site, post)).await?;
        reporter.info(&format!("Generated: {}", path.display()));
        report.pages.push(path);
    }

    write_sitemap(config, store, reporter).await?;
    info!(pages = report.pages.len(), "site built");
    reporter.success("Static generation complete!");
    Ok(report)
}

/// Regenerate only `sitemap.xml`.
pub async fn write_sitemap<S, R>(config: &Config, store: &S, reporter: &R) -> Result<PathBuf, crate::Error>
where
    S: PostStore,
    R: StatusReporter + ?Sized,
{
    let posts = store.list().await?;
    let today = chrono::Utc::now().date_naive();
    let path = config.output.join("sitemap.xml");
    write(&path, &render_sitemap(&config.site, &posts, today)).await?;
    reporter.success(&format!("Updated sitemap.xml with {} posts", posts.len()));
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::{PostDraft, SqlitePostStore},
        config::{ImageStorage, Site},
        status::NullReporter,
    };

    const TEMPLATE: &str = r#"<div id="featured-post" class="mb-12">
            <!-- Featured post will be loaded here -->
        </div>
<div id="posts" class="space-y-8">
            <!-- Regular posts will be loaded here -->
        </div>"#;

    fn config(output: &Path, template: PathBuf) -> Config {
        Config {
            site: Site {
                base_url: "https://example.com".into(),
                name: "Example".into(),
                author: "Someone".into(),
                byline: "jed".into(),
                keywords: Vec::new(),
            },
            database: "sqlite::memory:".into(),
            storage: ImageStorage::Asset {
                dir: output.join("images"),
                public_prefix: "/images".into(),
            },
            output: output.to_owned(),
            index_template: Some(template),
        }
    }

    #[tokio::test]
    async fn test_build_site() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("index.template.html");
        tokio::fs::write(&template, TEMPLATE).await.unwrap();
        let output = dir.path().join("public");
        let config = config(&output, template);

        let store = SqlitePostStore::open("sqlite::memory:").await.unwrap();
        for (title, featured) in [("Alpha", false), ("Beta", true)] {
            let draft = PostDraft {
                title: title.into(),
                slug: crate::derive::slug(title),
                excerpt: format!("About {title}"),
                content: format!("<p>{title}</p>"),
                featured,
            };
            store.create(&draft, chrono::Utc::now()).await.unwrap();
        }

        let report = build_site(&config, &store, &NullReporter).await.unwrap();
        assert_eq!(report.pages.len(), 2);
        assert_eq!((report.featured, report.regular), (1, 1));

        let page = tokio::fs::read_to_string(output.join("post-alpha.html"))
            .await
            .unwrap();
        assert!(page.contains("<title>Alpha - Example</title>"));
        let index = tokio::fs::read_to_string(output.join("index.html"))
            .await
            .unwrap();
        assert!(index.contains("About Beta"));
        assert!(index.contains("post-alpha.html"));
        let sitemap = tokio::fs::read_to_string(output.join("sitemap.xml"))
            .await
            .unwrap();
        assert!(sitemap.contains("https://example.com/posts/post-beta.html"));
    }

    #[tokio::test]
    async fn test_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), dir.path().join("missing.html"));
        let store = SqlitePostStore::open("sqlite::memory:").await.unwrap();
        assert!(matches!(
            build_site(&config, &store, &NullReporter).await,
            Err(crate::Error::Io { .. })
        ));
    }
}
