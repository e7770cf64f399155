use std::collections::VecDeque;

/// Number of most recent exchanges injected into a prompt.
pub const DEFAULT_MAX_PAIRS: usize = 3;
/// Number of exchanges kept in memory before the oldest is dropped.
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

/// Append-only, in-process conversation memory bounded to `capacity` exchanges.
#[derive(Debug, Clone)]
pub struct ConversationState {
    exchanges: VecDeque<Exchange>,
    capacity: usize,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of 0 is treated as 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { exchanges: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn append(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        if self.exchanges.len() == self.capacity {
            self.exchanges.pop_front();
        }
        self.exchanges.push_back(Exchange { question: question.into(), answer: answer.into() });
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// The last `max_pairs` exchanges, oldest first, as `User:`/`Assistant:` lines.
    pub fn render(&self, max_pairs: usize) -> String {
        let skip = self.exchanges.len().saturating_sub(max_pairs);
        self.exchanges
            .iter()
            .skip(skip)
            .map(|e| format!("User: {}\nAssistant: {}", e.question, e.answer))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_renders_empty_string() {
        assert_eq!(ConversationState::new().render(DEFAULT_MAX_PAIRS), "");
    }

    #[test]
    fn render_keeps_only_the_latest_window() {
        let mut state = ConversationState::new();
        for i in 1..=5 {
            state.append(format!("q{i}"), format!("a{i}"));
        }
        let rendered = state.render(3);
        assert_eq!(rendered, "User: q3\nAssistant: a3\nUser: q4\nAssistant: a4\nUser: q5\nAssistant: a5");
        assert!(!rendered.contains("q1") && !rendered.contains("q2"));
        assert_eq!(rendered.lines().count(), 6);
    }

    #[test]
    fn render_with_fewer_pairs_than_window() {
        let mut state = ConversationState::new();
        state.append("Bonjour", "Salut");
        assert_eq!(state.render(3), "User: Bonjour\nAssistant: Salut");
        assert_eq!(state.render(0), "");
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut state = ConversationState::with_capacity(2);
        state.append("q1", "a1");
        state.append("q2", "a2");
        state.append("q3", "a3");
        assert_eq!(state.len(), 2);
        assert_eq!(state.render(5), "User: q2\nAssistant: a2\nUser: q3\nAssistant: a3");
    }
}
