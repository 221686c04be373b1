pub mod setup;
pub mod audio;
pub mod events;
pub mod log;
mod content;
mod state;

pub use content::parts::{Blob, Part};
pub use content::turn::{Content, Role};
pub use events::{ClientMessage, LiveEvent, ServerMessage};
pub use log::LogEntry;
pub use setup::{GenerationConfig, SessionConfig, SessionConfigurator};
pub use state::ConnectionState;
