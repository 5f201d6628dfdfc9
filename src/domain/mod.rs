pub mod action;
pub mod item;
pub mod source;

pub use action::{ActionKind, UserAction};
pub use item::{Bucket, Item, ItemStatus, NewItem};
pub use source::{Category, Source, SourceKind};
