pub mod ask;

pub use ask::{AskHandler, AskInput};
