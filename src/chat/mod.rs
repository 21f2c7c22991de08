pub mod model;
pub mod store;

pub use model::{ChatSession, Message, Role};
pub use store::ChatStore;
