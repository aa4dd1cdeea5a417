use super::{history, Engine, Notice, SearchOutcome};

use async_trait::async_trait;

use crate::api::{FareAPI, SearchAPI};
use crate::entities::{AddressSuggestion, Coordinate};

impl Engine {
    // publish a failure notice, leaving marker, route and quotes untouched
    async fn publish_notice(&self, generation: u64, notice: Notice) -> bool {
        let mut view = self.view.lock().await;

        if !self.is_current(generation) {
            return false;
        }

        view.notice = Some(notice);
        true
    }

    async fn route_and_publish(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        generation: u64,
    ) -> SearchOutcome {
        let maybe_route = match self.router.compute_route(origin, destination).await {
            Ok(maybe_route) => maybe_route,
            Err(err) => {
                tracing::warn!(?err, "route computation failed");

                return if self.publish_notice(generation, Notice::ServiceUnavailable).await {
                    SearchOutcome::Failed
                } else {
                    SearchOutcome::Superseded
                };
            }
        };

        let mut view = self.view.lock().await;

        if !self.is_current(generation) {
            return SearchOutcome::Superseded;
        }

        match maybe_route {
            None => {
                // destination marker still shown, previous route state kept
                view.destination = Some(destination);
                view.notice = Some(Notice::NoRoute);

                SearchOutcome::NoRoute { destination }
            }
            Some(route) => {
                let quotes = self.quote_fares(&route);

                view.destination = Some(destination);
                view.region = route.bounds();
                view.route = Some(route.clone());
                view.quotes = quotes.clone();
                view.notice = None;

                SearchOutcome::Routed {
                    destination,
                    route,
                    quotes,
                }
            }
        }
    }
}

#[async_trait]
impl SearchAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn submit_search(&self, origin: Coordinate, text: &str) -> SearchOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SearchOutcome::Rejected;
        }

        let generation = self.claim_generation();

        let destination = match self.geocoder.forward_geocode(text).await {
            Ok(Some(destination)) => destination,
            Ok(None) => {
                return if self.publish_notice(generation, Notice::AddressNotFound).await {
                    SearchOutcome::AddressNotFound
                } else {
                    SearchOutcome::Superseded
                };
            }
            Err(err) => {
                tracing::warn!(?err, "forward geocoding failed");

                return if self.publish_notice(generation, Notice::ServiceUnavailable).await {
                    SearchOutcome::Failed
                } else {
                    SearchOutcome::Superseded
                };
            }
        };

        let outcome = self.route_and_publish(origin, destination, generation).await;

        if matches!(outcome, SearchOutcome::Routed { .. }) {
            history::push(self.storage.as_ref(), text).await;
        }

        outcome
    }

    /// Suggestion-selection short-circuit: the coordinate is already known,
    /// so re-geocoding is skipped.
    #[tracing::instrument(skip(self, destination))]
    async fn submit_coordinate(
        &self,
        origin: Coordinate,
        destination: AddressSuggestion,
    ) -> SearchOutcome {
        let generation = self.claim_generation();

        let outcome = self
            .route_and_publish(origin, destination.coordinate, generation)
            .await;

        if matches!(outcome, SearchOutcome::Routed { .. }) {
            history::push(self.storage.as_ref(), &destination.title).await;
        }

        outcome
    }

    async fn recent_searches(&self) -> Vec<String> {
        history::recent(self.storage.as_ref()).await
    }
}
