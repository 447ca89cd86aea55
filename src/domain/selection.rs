//! Selection models for the results list and the coding preview.
//!
//! Visibility is derived from the selection: once an entry (or option) is
//! chosen its siblings are hidden. Nothing un-hides them except replacing
//! the model, which happens on a new search or a new preview.

use super::coding::{Coding, CodingSet, DiagnosisChoice};
use super::condition::ResultEntry;

/// Search results with single selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultList {
    entries: Vec<ResultEntry>,
    selected: Option<usize>,
}

impl ResultList {
    #[must_use]
    pub fn new(entries: Vec<ResultEntry>) -> Self {
        Self {
            entries,
            selected: None,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn selected(&self) -> Option<&ResultEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    /// Select the entry at `index`.
    ///
    /// Once something is selected only that entry remains visible, so only
    /// the selected entry itself may be chosen again.
    pub fn select(&mut self, index: usize) -> Option<&ResultEntry> {
        if !self.is_visible(index) {
            return None;
        }
        self.selected = Some(index);
        self.entries.get(index)
    }

    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        index < self.entries.len() && self.selected.map_or(true, |s| s == index)
    }

    /// Visible entries with their original indices.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &ResultEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(i, _)| self.is_visible(*i))
    }
}

/// Translation preview with the two mutually exclusive options.
#[derive(Debug, Clone, PartialEq)]
pub struct CodingPreview {
    term: String,
    set: CodingSet,
    choice: Option<DiagnosisChoice>,
}

impl CodingPreview {
    #[must_use]
    pub fn new(term: impl Into<String>, set: CodingSet) -> Self {
        Self {
            term: term.into(),
            set,
            choice: None,
        }
    }

    /// Term the preview was loaded for.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn codings(&self) -> &CodingSet {
        &self.set
    }

    #[must_use]
    pub fn choice(&self) -> Option<DiagnosisChoice> {
        self.choice
    }

    /// Choose an option. The other option is hidden for good.
    ///
    /// Returns the chosen coding, or `None` if that option is already hidden.
    pub fn choose(&mut self, choice: DiagnosisChoice) -> Option<&Coding> {
        if !self.is_visible(choice) {
            return None;
        }
        self.choice = Some(choice);
        Some(self.set.get(choice))
    }

    #[must_use]
    pub fn is_visible(&self, option: DiagnosisChoice) -> bool {
        self.choice.map_or(true, |c| c == option)
    }
}
