//! Lookup lifecycle: normalize, go busy, fetch, render, go idle.
//!
//! The controller owns the only two pieces of mutable state in the program:
//! the busy flag and the display slot. It is driven either synchronously
//! ([`LookupController::run_lookup`]) or in two halves ([`LookupController::begin`]
//! / [`LookupController::finish`]) when the fetch happens on a worker thread.

use crate::render::{Display, render, render_error};
use pokefetch_api::{DataSource, LookupError, LookupResult};
use std::time::Instant;

pub type LookupId = u64;

/// A lookup the caller must now dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: LookupId,
    pub query: String,
}

/// Present while a lookup is in flight
#[derive(Debug, Clone)]
pub struct Busy {
    pub id: LookupId,
    pub query: String,
    pub started_at: Instant,
}

#[derive(Debug, Default)]
pub struct LookupController {
    display: Display,
    busy: Option<Busy>,
    /// Lookup whose card is on screen
    displayed: Option<LookupId>,
    last_id: LookupId,
}

/// Trim and lowercase; `None` when nothing is left
pub fn normalize_query(text: &str) -> Option<String> {
    let query = text.trim().to_lowercase();
    if query.is_empty() { None } else { Some(query) }
}

impl LookupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn busy(&self) -> Option<&Busy> {
        self.busy.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    /// Whether the trigger surface is enabled
    pub fn can_trigger(&self) -> bool {
        self.busy.is_none()
    }

    /// Lookup id of the card currently displayed, if any
    pub fn displayed_id(&self) -> Option<LookupId> {
        self.displayed
    }

    /// Idle -> Busy.
    ///
    /// Returns `None` without touching any state when the query is blank or a
    /// lookup is already in flight.
    pub fn begin(&mut self, query_text: &str) -> Option<Ticket> {
        if self.busy.is_some() {
            log::debug!("Ignoring trigger while busy");
            return None;
        }
        let query = normalize_query(query_text)?;

        self.last_id += 1;
        let id = self.last_id;

        self.display = Display::Empty;
        self.displayed = None;
        self.busy = Some(Busy {
            id,
            query: query.clone(),
            started_at: Instant::now(),
        });
        log::debug!("Lookup {} started for '{}'", id, query);

        Some(Ticket { id, query })
    }

    /// Busy -> Idle, rendering the outcome.
    ///
    /// Returns false (and changes nothing) for an id that is not in flight.
    pub fn finish(&mut self, id: LookupId, outcome: Result<LookupResult, LookupError>) -> bool {
        match &self.busy {
            Some(busy) if busy.id == id => {}
            _ => return false,
        }
        self.busy = None;

        match outcome {
            Ok(result) => {
                self.display = Display::Card(render(&result));
                self.displayed = Some(id);
            }
            Err(e) => {
                log::debug!("Lookup {} failed: {}", id, e.detail());
                self.display = render_error(&e.to_string());
            }
        }
        true
    }

    /// Run one lookup to completion on the calling thread
    pub fn run_lookup(&mut self, source: &dyn DataSource, query_text: &str) {
        let Some(ticket) = self.begin(query_text) else {
            return;
        };

        let mut guard = BusyGuard::new(self, ticket.id);
        guard.outcome = Some(source.lookup(&ticket.query));
    }
}

/// Leaves the busy state when dropped, including during unwinding.
/// Without a recorded outcome the lookup finishes as interrupted.
struct BusyGuard<'a> {
    controller: &'a mut LookupController,
    id: LookupId,
    outcome: Option<Result<LookupResult, LookupError>>,
}

impl<'a> BusyGuard<'a> {
    fn new(controller: &'a mut LookupController, id: LookupId) -> Self {
        Self {
            controller,
            id,
            outcome: None,
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or(Err(LookupError::Interrupted));
        self.controller.finish(self.id, outcome);
    }
}
