// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last published state with last-writer-wins ordering.

use chrono::{DateTime, Utc};

use super::ClimateState;

/// The state a session last made visible, stamped with the wall-clock time
/// its data was observed.
///
/// Both poll cycles and command mirrors write through [`PublishedState::offer`].
/// A write carrying an older observation time than the current one is
/// discarded, so a slow poll that fetched before a command was acknowledged
/// cannot overwrite the mirrored value.
#[derive(Debug, Clone, Default)]
pub struct PublishedState {
    current: Option<(ClimateState, DateTime<Utc>)>,
}

impl PublishedState {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state, if any has been published.
    #[must_use]
    pub fn state(&self) -> Option<&ClimateState> {
        self.current.as_ref().map(|(state, _)| state)
    }

    /// Returns when the current state was observed.
    #[must_use]
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.current.as_ref().map(|(_, at)| *at)
    }

    /// Offers a new state observed at `at`.
    ///
    /// Returns `true` if the state was accepted.
    pub fn offer(&mut self, state: ClimateState, at: DateTime<Utc>) -> bool {
        if let Some((_, current_at)) = &self.current
            && at < *current_at
        {
            return false;
        }
        self.current = Some((state, at));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn state_with_mode(mode: &str) -> ClimateState {
        ClimateState {
            mode: mode.to_string(),
            ..ClimateState::default()
        }
    }

    #[test]
    fn empty_until_first_offer() {
        let published = PublishedState::new();
        assert!(published.state().is_none());
        assert!(published.observed_at().is_none());
    }

    #[test]
    fn newer_write_wins() {
        let mut published = PublishedState::new();
        let t0 = Utc::now();
        assert!(published.offer(state_with_mode("heat"), t0));
        assert!(published.offer(state_with_mode("cool"), t0 + TimeDelta::seconds(1)));
        assert_eq!(published.state().unwrap().mode, "cool");
    }

    #[test]
    fn stale_write_is_discarded() {
        let mut published = PublishedState::new();
        let t0 = Utc::now();
        published.offer(state_with_mode("cool"), t0);

        let accepted = published.offer(state_with_mode("heat"), t0 - TimeDelta::seconds(5));
        assert!(!accepted);
        assert_eq!(published.state().unwrap().mode, "cool");
        assert_eq!(published.observed_at(), Some(t0));
    }
}
