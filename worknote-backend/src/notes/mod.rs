//! Notes directory: Obsidian-compatible markdown files with YAML frontmatter
//! and #tags, indexed in an FTS5 side database for search.

pub mod file_ops;
pub mod frontmatter;
pub mod store;

pub use store::NoteStore;
