use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::api::GeocodingAPI;
use crate::entities::{AddressSuggestion, Coordinate};

const DEBOUNCE: Duration = Duration::from_millis(300);
const MIN_QUERY_CHARS: usize = 3;
const SUGGESTION_LIMIT: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuggestionStatus {
    Idle,
    Searching,
}

#[derive(Debug)]
struct State {
    status: SuggestionStatus,
    suggestions: Vec<AddressSuggestion>,
}

/// Debounced, cancellable address autocomplete.
///
/// Every keystroke bumps the generation counter; the counter is compared
/// again after the debounce window and once more when the response lands, so
/// a superseded lookup can never overwrite a later one.
pub struct SuggestionEngine {
    geocoder: Arc<dyn GeocodingAPI>,
    generation: Arc<AtomicU64>,
    state: Arc<Mutex<State>>,
    debounce: Duration,
}

impl SuggestionEngine {
    pub fn new(geocoder: Arc<dyn GeocodingAPI>) -> Self {
        Self::with_debounce(geocoder, DEBOUNCE)
    }

    pub fn with_debounce(geocoder: Arc<dyn GeocodingAPI>, debounce: Duration) -> Self {
        Self {
            geocoder,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(Mutex::new(State {
                status: SuggestionStatus::Idle,
                suggestions: vec![],
            })),
            debounce,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn on_input(&self, text: &str) {
        let text = text.trim().to_string();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if text.chars().count() < MIN_QUERY_CHARS {
            let mut state = self.state.lock().await;
            state.status = SuggestionStatus::Idle;
            state.suggestions.clear();
            return;
        }

        self.state.lock().await.status = SuggestionStatus::Searching;

        let geocoder = self.geocoder.clone();
        let shared_generation = self.generation.clone();
        let shared_state = self.state.clone();
        let debounce = self.debounce;

        // the window starts at the keystroke, not when the task first polls
        let window = tokio::time::sleep(debounce);

        tokio::spawn(async move {
            window.await;

            // a later keystroke inside the window wins; only it dispatches
            if shared_generation.load(Ordering::SeqCst) != generation {
                return;
            }

            let result = geocoder.search(&text, SUGGESTION_LIMIT).await;

            let mut state = shared_state.lock().await;

            // stale-response guard: the list belongs to the current
            // generation only
            if shared_generation.load(Ordering::SeqCst) != generation {
                return;
            }

            state.status = SuggestionStatus::Idle;

            match result {
                Ok(suggestions) => state.suggestions = suggestions,
                // the visible list is left untouched on failure
                Err(err) => tracing::warn!(?err, "suggestion lookup failed"),
            }
        });
    }

    /// Ends the current query and hands the chosen coordinate straight to
    /// the orchestrator, skipping re-geocoding.
    pub async fn select(&self, suggestion: &AddressSuggestion) -> Coordinate {
        self.reset().await;
        suggestion.coordinate
    }

    /// Ends the current query on submission.
    pub async fn submit(&self) {
        self.reset().await;
    }

    async fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().await;
        state.status = SuggestionStatus::Idle;
        state.suggestions.clear();
    }

    pub async fn status(&self) -> SuggestionStatus {
        self.state.lock().await.status
    }

    pub async fn suggestions(&self) -> Vec<AddressSuggestion> {
        self.state.lock().await.suggestions.clone()
    }
}
