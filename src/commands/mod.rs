pub mod chats;
pub mod compose;
pub mod dispatcher;
pub mod handler;
pub mod organize;
pub mod registry;

pub use dispatcher::{CommandDispatcher, create_command_registry};
