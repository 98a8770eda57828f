//! In-memory ticket store.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{CreateTicketInput, Ticket, TicketStatus, UpdateTicketInput};

/// Tickets shared by all request handlers. Contents are lost on restart.
#[derive(Clone)]
pub struct TicketStore {
    tickets: Arc<Mutex<Vec<Ticket>>>,
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::with_tickets(demo_tickets())
    }
}

impl TicketStore {
    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Arc::new(Mutex::new(tickets)),
        }
    }

    /// Tickets newest first.
    pub fn list(&self) -> Vec<Ticket> {
        self.lock().clone()
    }

    pub fn get(&self, id: &str) -> Option<Ticket> {
        self.lock().iter().find(|t| t.id == id).cloned()
    }

    pub fn add(&self, input: CreateTicketInput) -> Ticket {
        let ticket = Ticket {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            status: input.status,
            created_at: Utc::now(),
        };
        self.lock().insert(0, ticket.clone());
        tracing::debug!(ticket_id = %ticket.id, "Ticket created");
        ticket
    }

    /// Merge the provided fields into the ticket. Unknown ids change nothing.
    pub fn update(&self, id: &str, input: UpdateTicketInput) -> Option<Ticket> {
        let mut tickets = self.lock();
        let ticket = tickets.iter_mut().find(|t| t.id == id)?;
        if let Some(title) = input.title {
            ticket.title = title;
        }
        if let Some(description) = input.description {
            ticket.description = description;
        }
        if let Some(status) = input.status {
            ticket.status = status;
        }
        if let Some(created_at) = input.created_at {
            ticket.created_at = created_at;
        }
        Some(ticket.clone())
    }

    pub fn delete(&self, id: &str) -> bool {
        let mut tickets = self.lock();
        let before = tickets.len();
        tickets.retain(|t| t.id != id);
        tickets.len() < before
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Ticket>> {
        self.tickets.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// The tickets a fresh instance starts with.
pub fn demo_tickets() -> Vec<Ticket> {
    let seed = |id: &str,
                title: &str,
                description: &str,
                status: TicketStatus,
                (y, m, d): (i32, u32, u32)| Ticket {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        created_at: NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or_default(),
    };
    vec![
        seed(
            "1",
            "Fix login page bug",
            "Users are unable to login with correct credentials",
            TicketStatus::Open,
            (2025, 10, 20),
        ),
        seed(
            "2",
            "Update dashboard UI",
            "Modernize the dashboard with new design system",
            TicketStatus::InProgress,
            (2025, 10, 21),
        ),
        seed(
            "3",
            "Database optimization",
            "Improve query performance for large datasets",
            TicketStatus::Closed,
            (2025, 10, 19),
        ),
        seed(
            "4",
            "Add export functionality",
            "Allow users to export reports to CSV",
            TicketStatus::Open,
            (2025, 10, 22),
        ),
    ]
}
