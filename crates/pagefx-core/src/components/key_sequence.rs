//! Rolling detector for a fixed key sequence

use std::collections::VecDeque;

/// Remembers the most recent key codes, at most as many as the target has
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySequence {
    target: Vec<String>,
    recent: VecDeque<String>,
}

impl KeySequence {
    #[must_use]
    pub fn new(target: Vec<String>) -> Self {
        let recent = VecDeque::with_capacity(target.len().saturating_add(1));
        Self { target, recent }
    }

    /// Records `code`, evicting the oldest entry past the target length.
    ///
    /// Returns `true` and clears the buffer when the buffer equals the target.
    pub fn push(&mut self, code: &str) -> bool {
        self.recent.push_back(code.to_string());
        while self.recent.len() > self.target.len() {
            self.recent.pop_front();
        }

        let matched = !self.target.is_empty() && self.recent.iter().eq(self.target.iter());
        if matched {
            self.recent.clear();
        }
        matched
    }

    /// Buffered codes, oldest first
    #[must_use]
    pub fn recent(&self) -> Vec<&str> {
        self.recent.iter().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recent.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    pub fn reset(&mut self) {
        self.recent.clear();
    }

    #[must_use]
    pub fn target(&self) -> &[String] {
        &self.target
    }
}
