use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::event;
use ratatui::prelude::*;

use crate::actions::{Action, ActionResult, apply_action};
use crate::api::{self, ApiEvent};
use crate::constants::{DEBOUNCE_MS, EVENT_POLL_MS};
use crate::debounce::Debounce;
use crate::events::handle_event;
use crate::state::{Order, State};
use crate::ui;

pub struct App {
    pub state: State,
    debounce: Debounce,
    client: reqwest::blocking::Client,
    base_url: String,
}

impl App {
    pub fn new(base_url: String) -> Self {
        Self {
            state: State::default(),
            debounce: Debounce::new(Duration::from_millis(DEBOUNCE_MS)),
            client: api::build_client(),
            base_url,
        }
    }

    pub fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tx: Sender<ApiEvent>,
        rx: Receiver<ApiEvent>,
    ) -> io::Result<()> {
        // Startup: fetch the source list once and schedule a prediction for
        // empty text so the initial suggestion state comes from the server
        api::spawn_fetch_sources(self.client.clone(), self.base_url.clone(), tx.clone());
        self.debounce.schedule(Instant::now(), String::new());
        self.state.dirty = true;

        loop {
            // User input first, for minimal latency
            if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
                let evt = event::read()?;
                let Some(action) = handle_event(&evt, &self.state) else {
                    break;
                };
                self.handle_action(action, &tx);
            }

            // A quiet period elapsed: the last scheduled text goes out
            if let Some(text) = self.debounce.fire(Instant::now()) {
                self.request_predictions(text, &tx);
            }

            // Fold settled background requests into the session state
            while let Ok(api_event) = rx.try_recv() {
                apply_api_event(&mut self.state, api_event);
            }

            if self.state.dirty {
                terminal.draw(|frame| ui::render(frame, &self.state))?;
                self.state.dirty = false;
            }
        }
        Ok(())
    }

    fn handle_action(&mut self, action: Action, tx: &Sender<ApiEvent>) {
        match apply_action(&mut self.state, action) {
            ActionResult::Nothing => {}
            ActionResult::Schedule => {
                self.debounce.schedule(Instant::now(), self.state.input.clone());
            }
            ActionResult::RequestNow => {
                // A pending debounced request would carry pre-reset text
                self.debounce.cancel();
                self.request_predictions(self.state.input.clone(), tx);
            }
            ActionResult::Toggle { name, active } => {
                // Toggles bypass the debouncer and re-predict with the text as of now
                let epoch = self.state.next_epoch();
                self.state.loading = true;
                api::spawn_toggle_then_predict(
                    self.client.clone(),
                    self.base_url.clone(),
                    name,
                    active,
                    self.state.input.clone(),
                    epoch,
                    tx.clone(),
                );
            }
        }
    }

    fn request_predictions(&mut self, text: String, tx: &Sender<ApiEvent>) {
        let epoch = self.state.next_epoch();
        self.state.loading = true;
        self.state.dirty = true;
        api::spawn_predict(self.client.clone(), self.base_url.clone(), text, epoch, tx.clone());
    }
}

/// Fold one settled request outcome into the session state.
///
/// Prediction outcomes are applied only when their epoch matches the highest
/// issued one; anything older was superseded while in flight and is dropped
/// without touching suggestions, order, or the loading flag.
pub fn apply_api_event(state: &mut State, event: ApiEvent) {
    match event {
        ApiEvent::Predicted { epoch, outcome } => {
            if epoch != state.predict_epoch {
                return;
            }
            state.loading = false;
            match outcome {
                Ok(prediction) => {
                    state.suggestions = prediction.suggestions;
                    state.order = prediction.order;
                }
                Err(_) => {
                    // Fail-soft: degraded empty state, next keystroke retries
                    state.suggestions.clear();
                    state.order = Order::First;
                }
            }
            // Selection restarts at the top rank of the new set
            state.selected_suggestion = 0;
            state.dirty = true;
        }
        ApiEvent::Sources(Ok(sources)) => {
            state.sources = sources;
            state.sources_error = None;
            state.selected_source = 0;
            state.dirty = true;
        }
        ApiEvent::Sources(Err(message)) => {
            state.sources_error = Some(message);
            state.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Prediction;
    use crate::state::{Source, Suggestion};

    fn suggestion(word: &str) -> Suggestion {
        Suggestion { word: word.to_string(), probability: 50.0 }
    }

    fn prediction(words: &[&str], order: Order) -> Result<Prediction, String> {
        Ok(Prediction { suggestions: words.iter().map(|w| suggestion(w)).collect(), order })
    }

    /// Issue a request the way the coordinator does: bump the epoch, set loading
    fn issue(state: &mut State) -> u64 {
        let epoch = state.next_epoch();
        state.loading = true;
        epoch
    }

    #[test]
    fn stale_response_arriving_late_is_discarded() {
        let mut state = State::default();
        let first = issue(&mut state);
        let second = issue(&mut state);

        // Second request settles first and wins
        apply_api_event(
            &mut state,
            ApiEvent::Predicted { epoch: second, outcome: prediction(&["fresh"], Order::Second) },
        );
        assert_eq!(state.suggestions[0].word, "fresh");
        assert!(!state.loading);

        // First request's response arrives afterwards and must not regress anything
        apply_api_event(
            &mut state,
            ApiEvent::Predicted { epoch: first, outcome: prediction(&["stale"], Order::First) },
        );
        assert_eq!(state.suggestions[0].word, "fresh");
        assert_eq!(state.order, Order::Second);
    }

    #[test]
    fn stale_response_does_not_clear_loading() {
        let mut state = State::default();
        let first = issue(&mut state);
        let _second = issue(&mut state);

        // The older request settles while the newer one is still in flight
        apply_api_event(
            &mut state,
            ApiEvent::Predicted { epoch: first, outcome: prediction(&["stale"], Order::First) },
        );
        assert!(state.loading);
        assert!(state.suggestions.is_empty());
    }

    #[test]
    fn failure_degrades_to_empty_first_order() {
        let mut state = State::default();
        state.suggestions = vec![suggestion("old")];
        state.order = Order::Second;
        let epoch = issue(&mut state);

        apply_api_event(
            &mut state,
            ApiEvent::Predicted { epoch, outcome: Err("connection refused".into()) },
        );
        assert!(state.suggestions.is_empty());
        assert_eq!(state.order, Order::First);
        assert!(!state.loading);
    }

    #[test]
    fn success_replaces_suggestions_in_rank_order() {
        let mut state = State::default();
        let epoch = issue(&mut state);
        apply_api_event(
            &mut state,
            ApiEvent::Predicted { epoch, outcome: prediction(&["a", "b", "c"], Order::Second) },
        );
        let words: Vec<&str> = state.suggestions.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(words, ["a", "b", "c"]);
        assert_eq!(state.order, Order::Second);
        assert!(!state.loading);
    }

    #[test]
    fn new_suggestion_set_resets_selection() {
        let mut state = State::default();
        state.suggestions = vec![suggestion("a"), suggestion("b"), suggestion("c")];
        state.selected_suggestion = 2;
        let epoch = issue(&mut state);
        apply_api_event(
            &mut state,
            ApiEvent::Predicted { epoch, outcome: prediction(&["only"], Order::First) },
        );
        assert_eq!(state.selected_suggestion, 0);
    }

    #[test]
    fn source_fetch_outcomes_update_cache_or_error() {
        let mut state = State::default();
        apply_api_event(
            &mut state,
            ApiEvent::Sources(Ok(vec![Source { name: "austen".into(), active: true }])),
        );
        assert_eq!(state.sources.len(), 1);
        assert!(state.sources_error.is_none());

        apply_api_event(&mut state, ApiEvent::Sources(Err("503".into())));
        assert_eq!(state.sources_error.as_deref(), Some("503"));
        // The cached list survives; only the checklist rendering switches
        assert_eq!(state.sources.len(), 1);
    }
}
