//INFO: Agent module - turns free-text questions into fetch actions

pub mod intent;

pub use intent::{classify, Intent};
