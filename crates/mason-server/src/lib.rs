pub mod bus;
pub mod chat;
pub mod scaffold;
pub mod server;
pub mod ws;

pub use bus::ProjectBus;
pub use server::{start, AppState, ServerConfig, ServerHandle};
