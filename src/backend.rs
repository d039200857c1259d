pub mod client;
pub mod command;
pub mod events;

pub use client::BackendClient;
pub use command::LauncherBackend;
pub use events::BackendEvent;
