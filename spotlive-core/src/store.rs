//! The in-memory event collection and its derived views.

use std::collections::HashSet;

use tokio::sync::watch;

use crate::event::{Event, EventId};
use crate::gateway::RecordGateway;

/// Holds the working set fetched from the backend.
///
/// The store is invalidated through the refresh channel it was built with.
/// Activation always replaces the whole working set; nothing is merged.
pub struct EventStore {
    events: Vec<Event>,
    loading: bool,
    selected_category: Option<String>,
    refresh: watch::Receiver<u64>,
    loaded_generation: Option<u64>,
}

impl EventStore {
    pub fn new(refresh: watch::Receiver<u64>) -> Self {
        EventStore {
            events: Vec::new(),
            loading: true,
            selected_category: None,
            refresh,
            loaded_generation: None,
        }
    }

    /// True from activation until the fetch resolves, either way.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a refresh was triggered since the last completed load.
    pub fn is_stale(&self) -> bool {
        self.loaded_generation != Some(*self.refresh.borrow())
    }

    /// Force the next `sync` to refetch even if no refresh was triggered.
    pub fn invalidate(&mut self) {
        self.loaded_generation = None;
    }

    /// Reload only if the store is stale.
    pub async fn sync<R>(&mut self, records: &R)
    where
        R: RecordGateway + ?Sized,
    {
        while self.is_stale() {
            self.reload(records).await;
        }
    }

    /// Discard the working set and fetch the whole collection again.
    ///
    /// A failed fetch leaves the set empty and is only logged. If another
    /// refresh is triggered while the request is in flight, its result is
    /// dropped and the store stays stale. Returns whether the result was
    /// applied.
    pub async fn reload<R>(&mut self, records: &R) -> bool
    where
        R: RecordGateway + ?Sized,
    {
        let generation = *self.refresh.borrow_and_update();

        self.events.clear();
        self.selected_category = None;
        self.loading = true;

        let result = records.list_events().await;

        if *self.refresh.borrow() != generation {
            tracing::debug!(generation, "Discarding superseded event fetch");
            return false;
        }

        match result {
            Ok(events) => {
                tracing::debug!(count = events.len(), generation, "Loaded events");
                self.events = events;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching events");
            }
        }

        self.loading = false;
        self.loaded_generation = Some(generation);
        true
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn find(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// Distinct categories of the working set, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        distinct_categories(&self.events)
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    /// Select a category to filter by, or `None` for all events. Any value
    /// is accepted; one that matches nothing yields an empty view.
    pub fn select_category(&mut self, category: Option<String>) {
        self.selected_category = category;
    }

    /// The working set narrowed to the selected category.
    pub fn filtered(&self) -> Vec<&Event> {
        filter_by_category(&self.events, self.selected_category.as_deref())
    }
}

pub fn distinct_categories(events: &[Event]) -> Vec<&str> {
    let mut seen = HashSet::new();
    events
        .iter()
        .map(|e| e.category.as_str())
        .filter(|category| seen.insert(*category))
        .collect()
}

pub fn filter_by_category<'a>(events: &'a [Event], category: Option<&str>) -> Vec<&'a Event> {
    match category {
        Some(category) => events.iter().filter(|e| e.category == category).collect(),
        None => events.iter().collect(),
    }
}
