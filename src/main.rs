use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use blogsmith::{
    backend::{CurrentUser, PostStore as _, SqlitePostStore},
    config::Config,
    content::{self, ImageFile, TableData},
    editor::{self, EditingSession},
    preview, site,
    status::{SimpleReporter, StatusReporter as _},
    storage::{ConfiguredStore, Credentials},
};
use clap::{Parser, Subcommand};
use tracing::error;

#[derive(Parser)]
struct Opts {
    #[clap(short, long, env = "BLOGSMITH_CONFIG")]
    config: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct R2Opts {
    #[clap(long, env = "R2_ACCESS_KEY_ID", hide_env_values = true)]
    r2_access_key_id: Option<String>,
    #[clap(long, env = "R2_SECRET_ACCESS_KEY", hide_env_values = true)]
    r2_secret_access_key: Option<String>,
}

impl R2Opts {
    fn credentials(self) -> Option<Credentials> {
        Some(Credentials {
            access_key_id: self.r2_access_key_id?,
            secret_access_key: self.r2_secret_access_key?,
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Pre-render post pages, the index and the sitemap.
    Build,
    /// Regenerate sitemap.xml only.
    Sitemap,
    /// List stored posts, newest first.
    List {
        #[clap(long)]
        json: bool,
    },
    /// Delete a post.
    Delete { id: i64 },
    /// Print the table fragment for a CSV file.
    Table {
        csv: PathBuf,
        #[clap(long)]
        caption: Option<String>,
        /// Print the short preview table instead.
        #[clap(long, conflicts_with = "caption")]
        preview: bool,
    },
    /// Upload images and print their figure fragments.
    Upload {
        #[clap(required = true)]
        images: Vec<PathBuf>,
        #[clap(flatten)]
        r2: R2Opts,
    },
    /// Print the editor preview of a content file.
    Preview { content: PathBuf },
    /// Publish a post from a content file.
    Publish {
        #[clap(long)]
        title: String,
        /// Body of the post. Tables and figures are appended after it.
        content: PathBuf,
        #[clap(long)]
        slug: Option<String>,
        #[clap(long)]
        excerpt: Option<String>,
        /// Feature the post. Without this or `--no-featured` an edited
        /// post keeps its current state.
        #[clap(long, conflicts_with = "no_featured")]
        featured: bool,
        #[clap(long)]
        no_featured: bool,
        /// Update this post instead of creating one.
        #[clap(long)]
        edit: Option<i64>,
        #[clap(long)]
        csv: Option<PathBuf>,
        #[clap(long, requires = "csv")]
        caption: Option<String>,
        #[clap(long = "image")]
        images: Vec<PathBuf>,
        #[clap(flatten)]
        r2: R2Opts,
    },
}

fn featured_flag(featured: bool, no_featured: bool) -> Option<bool> {
    match (featured, no_featured) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

async fn read(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read {}", path.display()))
}

async fn load_images(paths: &[PathBuf]) -> anyhow::Result<Vec<ImageFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(
            ImageFile::load(path)
                .await
                .with_context(|| format!("load image {}", path.display()))?,
        );
    }
    Ok(files)
}

async fn open_store(config: &Config) -> anyhow::Result<SqlitePostStore> {
    SqlitePostStore::open(&config.database)
        .await
        .with_context(|| format!("open database {}", config.database))
}

async fn run(opts: Opts) -> anyhow::Result<()> {
    let config = Config::load(&opts.config)
        .await
        .with_context(|| format!("load config from {}", opts.config.display()))?;
    let reporter = SimpleReporter;

    match opts.command {
        Command::Build => {
            let store = open_store(&config).await?;
            site::build_site(&config, &store, &reporter).await?;
        }
        Command::Sitemap => {
            let store = open_store(&config).await?;
            site::write_sitemap(&config, &store, &reporter).await?;
        }
        Command::List { json } => {
            let store = open_store(&config).await?;
            let posts = editor::list_posts(&store).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
                return Ok(());
            }
            for post in posts {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    post.id,
                    post.created_at.format("%Y-%m-%d"),
                    if post.featured { "✓" } else { " " },
                    post.slug,
                    post.title
                );
            }
        }
        Command::Delete { id } => {
            let store = open_store(&config).await?;
            editor::delete_post(&store, id, &reporter).await?;
        }
        Command::Table {
            csv,
            caption,
            preview,
        } => {
            let table = TableData::from_csv(&read(&csv).await?)?;
            reporter.success(&format!("CSV loaded: {} rows", table.len()));
            if preview {
                println!("{}", content::table_preview(&table));
            } else {
                println!("{}", content::table_fragment(&table, caption.as_deref()).html);
            }
        }
        Command::Upload { images, r2 } => {
            let uploads = ConfiguredStore::new(&config.storage, r2.credentials()).await?;
            let mut session = EditingSession::new();
            let files = load_images(&images).await?;
            editor::process_images(&mut session, &uploads, files, &reporter).await;
            for image in session.images() {
                println!("{}", content::image_fragment(image).html);
            }
        }
        Command::Preview { content: path } => {
            println!("{}", preview::render(&read(&path).await?));
        }
        Command::Publish {
            title,
            content: path,
            slug,
            excerpt,
            featured,
            no_featured,
            edit,
            csv,
            caption,
            images,
            r2,
        } => {
            let store = open_store(&config).await?;
            let mut session = EditingSession::new();
            if let Some(id) = edit {
                editor::load_for_edit(&mut session, &store, id, &reporter).await?;
            }
            session.set_title(title);
            session.set_content(read(&path).await?);

            if !images.is_empty() {
                let uploads = ConfiguredStore::new(&config.storage, r2.credentials()).await?;
                let files = load_images(&images).await?;
                editor::process_images(&mut session, &uploads, files, &reporter).await;
                for index in 0..session.images().len() {
                    let end = session.content().char_len();
                    session.insert_image(index, end)?;
                }
            }
            if let Some(csv) = csv {
                session.load_csv(&read(&csv).await?)?;
                let end = session.content().char_len();
                session.insert_table(end, caption.as_deref())?;
            }

            if let Some(slug) = slug {
                session.form.slug = slug;
            }
            if let Some(excerpt) = excerpt {
                session.form.excerpt = excerpt;
            }
            if let Some(featured) = featured_flag(featured, no_featured) {
                session.form.featured = featured;
            }

            let user = CurrentUser::from_env();
            let outcome = editor::publish(&mut session, &store, user.as_ref(), &reporter).await?;
            let post = store
                .get(outcome.id)
                .await?
                .ok_or_else(|| anyhow!("post {} vanished after publishing", outcome.id))?;
            println!("{}\t{}", post.id, post.slug);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    if let Err(e) = run(opts).await {
        error!(?e, "critical error");
        std::process::exit(1);
    }
}
