use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;

/// Scaffold lifecycle events pushed to a project's WebSocket subscribers.
/// The wire shape is a flat JSON object with a `type` discriminator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentEvent {
    #[serde(rename = "scaffold_started")]
    ScaffoldStarted {
        project_id: ProjectId,
        stack: String,
    },

    #[serde(rename = "scaffold_progress")]
    ScaffoldProgress {
        project_id: ProjectId,
        pct: u8,
        message: String,
    },

    #[serde(rename = "file_generated")]
    FileGenerated {
        project_id: ProjectId,
        path: String,
    },

    #[serde(rename = "scaffold_complete")]
    ScaffoldComplete {
        project_id: ProjectId,
        file_count: usize,
    },

    #[serde(rename = "agent_error")]
    AgentError {
        project_id: ProjectId,
        message: String,
    },
}

impl AgentEvent {
    pub fn project_id(&self) -> &ProjectId {
        match self {
            Self::ScaffoldStarted { project_id, .. }
            | Self::ScaffoldProgress { project_id, .. }
            | Self::FileGenerated { project_id, .. }
            | Self::ScaffoldComplete { project_id, .. }
            | Self::AgentError { project_id, .. } => project_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ScaffoldStarted { .. } => "scaffold_started",
            Self::ScaffoldProgress { .. } => "scaffold_progress",
            Self::FileGenerated { .. } => "file_generated",
            Self::ScaffoldComplete { .. } => "scaffold_complete",
            Self::AgentError { .. } => "agent_error",
        }
    }
}
