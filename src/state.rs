use serde::Deserialize;

/// One ranked prediction from the server. The sequence order is the rank
/// (highest confidence first) and must be preserved as received.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Suggestion {
    pub word: String,
    /// Percentage in 0..=100 as reported by the server
    pub probability: f64,
}

/// Which statistical model produced the current suggestion set.
/// Informational only; insertion logic never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    First,
    Second,
}

impl Order {
    /// Map the wire value (1 or 2); anything unexpected falls back to first order
    pub fn from_wire(value: u8) -> Self {
        if value == 2 { Order::Second } else { Order::First }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Order::First => "1st Order",
            Order::Second => "2nd Order",
        }
    }
}

/// A prediction source as cached from GET /sources. Toggles patch `active`
/// in place; the list is never re-fetched after startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Source {
    pub name: String,
    pub active: bool,
}

/// Which region keyboard input is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Sources,
}

/// Session state for one run. Everything here is mutated only on the event
/// loop thread; background workers report back through the api channel.
#[derive(Default)]
pub struct State {
    /// Editor text
    pub input: String,
    /// Cursor position in input (byte index, always a char boundary)
    pub input_cursor: usize,
    /// Current ranked suggestions, most recent non-stale response wins
    pub suggestions: Vec<Suggestion>,
    pub order: Order,
    /// Index into `suggestions` for keyboard selection
    pub selected_suggestion: usize,
    /// Cached source list from startup; empty until the fetch settles
    pub sources: Vec<Source>,
    /// Set when the startup source fetch failed; shown instead of the checklist
    pub sources_error: Option<String>,
    /// Index into `sources` for keyboard selection
    pub selected_source: usize,
    /// True exactly while a prediction request for the current epoch is outstanding
    pub loading: bool,
    /// Highest prediction epoch issued so far; a settled response is applied
    /// only if it carries this exact value
    pub predict_epoch: u64,
    pub focus: Focus,
    /// Redraw needed
    pub dirty: bool,
}

impl State {
    /// Stamp a new prediction request. Every issuance (debounced, toggle,
    /// reset) goes through here so stale responses can be told apart.
    pub fn next_epoch(&mut self) -> u64 {
        self.predict_epoch += 1;
        self.predict_epoch
    }

    /// Active-source counter, derived from the cached list
    pub fn active_source_count(&self) -> usize {
        self.sources.iter().filter(|s| s.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_wire_mapping() {
        assert_eq!(Order::from_wire(1), Order::First);
        assert_eq!(Order::from_wire(2), Order::Second);
        // Unknown model orders degrade to first rather than failing the decode
        assert_eq!(Order::from_wire(0), Order::First);
        assert_eq!(Order::from_wire(7), Order::First);
    }

    #[test]
    fn epochs_are_monotonic() {
        let mut state = State::default();
        assert_eq!(state.next_epoch(), 1);
        assert_eq!(state.next_epoch(), 2);
        assert_eq!(state.predict_epoch, 2);
    }

    #[test]
    fn active_count_follows_flags() {
        let mut state = State::default();
        state.sources = vec![
            Source { name: "austen".into(), active: true },
            Source { name: "carroll".into(), active: true },
            Source { name: "doyle".into(), active: false },
        ];
        assert_eq!(state.active_source_count(), 2);
        state.sources[0].active = false;
        assert_eq!(state.active_source_count(), 1);
    }
}
