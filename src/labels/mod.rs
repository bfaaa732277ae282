pub mod store;

pub use store::{LabelEntry, LabelStore};
