use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A support ticket.
///
/// Tickets live only in memory and reset to the demo set on restart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// Workflow state of a ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

/// Input for creating a ticket. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketInput {
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
}

/// Input for updating a ticket. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub created_at: Option<DateTime<Utc>>,
}
