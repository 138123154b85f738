pub mod catalog;

pub use catalog::{ContentKind, ContentRow, MovieRecord, MovieView};
