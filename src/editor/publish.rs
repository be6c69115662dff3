//! Handing a finished session to the post store.

use tracing::{info, warn};

use crate::{
    backend::{CurrentUser, PostDraft, PostRecord, PostStore},
    status::StatusReporter,
};

use super::{EditingSession, PostForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    Created,
    Updated,
}

impl std::fmt::Display for PublishAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => f.write_str("published"),
            Self::Updated => f.write_str("updated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub id: i64,
    pub action: PublishAction,
    pub featured: bool,
}

fn draft(session: &EditingSession) -> Result<PostDraft, crate::Error> {
    let form = &session.form;
    let draft = PostDraft {
        title: form.title.trim().to_owned(),
        slug: form.slug.trim().to_owned(),
        excerpt: form.excerpt.trim().to_owned(),
        content: session.content().as_str().trim().to_owned(),
        featured: form.featured,
    };
    if draft.title.is_empty() || draft.slug.is_empty() || draft.content.is_empty() {
        return Err(crate::Error::validation(
            "Please fill in all required fields",
        ));
    }
    Ok(draft)
}

async fn store_draft<S: PostStore>(
    session: &EditingSession,
    store: &S,
    user: Option<&CurrentUser>,
) -> Result<PublishOutcome, crate::Error> {
    let draft = draft(session)?;
    let Some(user) = user else {
        return Err(crate::Error::validation("Please log in to publish posts"));
    };
    // A stale id must fail before any other post is touched.
    if let Some(id) = session.editing_post() {
        if store.get(id).await?.is_none() {
            return Err(crate::Error::NotFound(id));
        }
    }
    if draft.featured {
        store.unfeature_all().await?;
    }
    let (id, action) = match session.editing_post() {
        Some(id) => {
            if !store.update(id, &draft).await? {
                return Err(crate::Error::NotFound(id));
            }
            (id, PublishAction::Updated)
        }
        None => (
            store.create(&draft, chrono::Utc::now()).await?,
            PublishAction::Created,
        ),
    };
    info!(id, slug = draft.slug, %action, author = user.email, "post stored");
    Ok(PublishOutcome {
        id,
        action,
        featured: draft.featured,
    })
}

/// Store the session as a post. A successful publish resets the session.
pub async fn publish<S, R>(
    session: &mut EditingSession,
    store: &S,
    user: Option<&CurrentUser>,
    reporter: &R,
) -> Result<PublishOutcome, crate::Error>
where
    S: PostStore,
    R: StatusReporter + ?Sized,
{
    match store_draft(session, store, user).await {
        Ok(outcome) => {
            if outcome.featured {
                reporter.success(&format!("Featured post {} successfully!", outcome.action));
            } else {
                reporter.success(&format!("Post {} successfully!", outcome.action));
            }
            session.reset();
            Ok(outcome)
        }
        Err(e @ crate::Error::Validation(_)) => {
            reporter.error(&e.to_string());
            Err(e)
        }
        Err(e) => {
            warn!(error = %e, "publish failed");
            reporter.error(&format!("Error publishing post: {e}"));
            Err(e)
        }
    }
}

/// Replace the session with an existing post opened for editing.
pub async fn load_for_edit<S, R>(
    session: &mut EditingSession,
    store: &S,
    id: i64,
    reporter: &R,
) -> Result<(), crate::Error>
where
    S: PostStore,
    R: StatusReporter + ?Sized,
{
    let post = match store.get(id).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            reporter.error(&format!("Error loading post: not found ({id})"));
            return Err(crate::Error::NotFound(id));
        }
        Err(e) => {
            reporter.error(&format!("Error loading post: {e}"));
            return Err(e.into());
        }
    };
    let form = PostForm {
        title: post.title,
        slug: post.slug,
        excerpt: post.excerpt,
        featured: post.featured,
    };
    *session = EditingSession::editing(post.id, form, post.content);
    reporter.success("Post loaded for editing");
    Ok(())
}

pub async fn delete_post<S, R>(store: &S, id: i64, reporter: &R) -> Result<(), crate::Error>
where
    S: PostStore,
    R: StatusReporter + ?Sized,
{
    reporter.info("Deleting post...");
    match store.delete(id).await {
        Ok(true) => {
            reporter.success("Post deleted successfully");
            Ok(())
        }
        Ok(false) => {
            reporter.error(&format!("Error deleting post: not found ({id})"));
            Err(crate::Error::NotFound(id))
        }
        Err(e) => {
            reporter.error(&format!("Error deleting post: {e}"));
            Err(e.into())
        }
    }
}

/// All posts, newest first.
pub async fn list_posts<S: PostStore>(store: &S) -> Result<Vec<PostRecord>, crate::Error> {
    Ok(store.list().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::SqlitePostStore,
        status::{RecordingReporter, StatusLevel},
    };

    fn user() -> CurrentUser {
        CurrentUser {
            email: "jed@example.com".into(),
        }
    }

    fn session(title: &str, content: &str, featured: bool) -> EditingSession {
        let mut session = EditingSession::new();
        session.set_title(title);
        session.set_content(content);
        session.form.featured = featured;
        session
    }

    async fn store() -> SqlitePostStore {
        SqlitePostStore::open("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_requires_fields_and_user() {
        let store = store().await;
        let reporter = RecordingReporter::new();

        let mut empty = session("Title", "   ", false);
        let err = publish(&mut empty, &store, Some(&user()), &reporter)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields");

        let mut anonymous = session("Title", "Body", false);
        let err = publish(&mut anonymous, &store, None, &reporter)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please log in to publish posts");
        assert_eq!(anonymous.form.title, "Title");

        assert_eq!(reporter.count(StatusLevel::Error), 2);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_update() {
        let store = store().await;
        let reporter = RecordingReporter::new();

        let mut s = session("First Post", "<p>Hello</p>", false);
        let created = publish(&mut s, &store, Some(&user()), &reporter)
            .await
            .unwrap();
        assert_eq!(created.action, PublishAction::Created);
        assert!(s.content().is_empty());
        assert_eq!(s.form, PostForm::default());

        load_for_edit(&mut s, &store, created.id, &reporter)
            .await
            .unwrap();
        assert_eq!(s.editing_post(), Some(created.id));
        assert_eq!(s.form.slug, "first-post");
        assert_eq!(s.form.excerpt, "Hello");
        s.set_content("<p>Hello again</p>");
        let updated = publish(&mut s, &store, Some(&user()), &reporter)
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.action, PublishAction::Updated);

        let posts = list_posts(&store).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "<p>Hello again</p>");
        assert!(
            reporter
                .messages()
                .contains(&(StatusLevel::Success, "Post updated successfully!".into()))
        );
    }

    #[tokio::test]
    async fn test_featuring_unfeatures_others() {
        let store = store().await;
        let reporter = RecordingReporter::new();
        for title in ["One", "Two"] {
            let mut s = session(title, "body", true);
            publish(&mut s, &store, Some(&user()), &reporter)
                .await
                .unwrap();
        }
        let featured = list_posts(&store)
            .await
            .unwrap()
            .into_iter()
            .filter(|p| p.featured)
            .map(|p| p.title)
            .collect::<Vec<_>>();
        assert_eq!(featured, vec!["Two"]);
        assert!(
            reporter
                .messages()
                .contains(&(StatusLevel::Success, "Featured post published successfully!".into()))
        );
    }

    #[tokio::test]
    async fn test_missing_post_keeps_featured() {
        let store = store().await;
        let reporter = RecordingReporter::new();
        let mut keep = session("Keep", "body", true);
        let kept = publish(&mut keep, &store, Some(&user()), &reporter)
            .await
            .unwrap();

        let form = PostForm {
            title: "Stale".into(),
            slug: "stale".into(),
            excerpt: String::new(),
            featured: true,
        };
        let mut stale = EditingSession::editing(999, form, "body");
        assert!(matches!(
            publish(&mut stale, &store, Some(&user()), &reporter).await,
            Err(crate::Error::NotFound(999))
        ));
        assert!(store.get(kept.id).await.unwrap().unwrap().featured);
        assert_eq!(stale.editing_post(), Some(999));
    }

    #[tokio::test]
    async fn test_delete_and_missing() {
        let store = store().await;
        let reporter = RecordingReporter::new();
        let mut s = session("Gone", "soon", false);
        let outcome = publish(&mut s, &store, Some(&user()), &reporter)
            .await
            .unwrap();

        delete_post(&store, outcome.id, &reporter).await.unwrap();
        assert!(matches!(
            delete_post(&store, outcome.id, &reporter).await,
            Err(crate::Error::NotFound(_))
        ));
        assert!(matches!(
            load_for_edit(&mut s, &store, outcome.id, &reporter).await,
            Err(crate::Error::NotFound(_))
        ));
    }
}
