//! The authoring session and the operations that move it forward.

pub mod buffer;
pub mod images;
pub mod publish;
pub mod session;

pub use buffer::{ContentBuffer, Selection};
pub use images::{IntakeReport, process_images};
pub use publish::{
    PublishAction, PublishOutcome, delete_post, list_posts, load_for_edit, publish,
};
pub use session::{EditingSession, PostForm};
