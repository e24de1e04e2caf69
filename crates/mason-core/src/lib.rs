pub mod events;
pub mod ids;

pub use events::AgentEvent;
pub use ids::{ConnectionId, EventId, ProjectId};
