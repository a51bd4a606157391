//! Mailbox storage and folder views.
//!
//! Emails live in one flat collection. Folders are not stored: each view is
//! computed from the email's tags and trash/archive flags, see [`Folder`].

mod folder;
mod model;
mod repository;

pub use folder::{Folder, FolderCount, FolderCounts, classify, classify_folder, folder_counts};
pub use model::{Email, EmailId, TAG_DRAFT, TAG_JUNK, TAG_SENT};
pub use repository::{EmailRepository, SearchPage};
