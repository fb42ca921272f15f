//! Load-state machine for UI binding.
//!
//! Every async action moves a piece of state through the same phases:
//! pending, fulfilled, rejected. `Loadable` captures those phases once,
//! parameterised by the data it carries.

use serde::{Deserialize, Serialize};

/// The current state of a piece of remote data.
///
/// - `Idle`: nothing requested yet, or reset
/// - `Loading`: request in flight, show a spinner
/// - `Success`: last request succeeded, render the data
/// - `Error`: last request failed, show the message and a retry affordance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Loadable<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Request in flight.
    Loading,
    /// Request fulfilled.
    Success(T),
    /// Request rejected with a user-facing message.
    Error(String),
}

impl<T> Loadable<T> {
    /// Returns true if the state is Idle.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if a request is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if the last request succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true if the last request failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the data if in Success state.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Returns mutable data if in Success state.
    pub const fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the error message if in Error state.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Consumes the state, returning the data if successful.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Maps the success value, keeping the other phases.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Self::Idle => Loadable::Idle,
            Self::Loading => Loadable::Loading,
            Self::Success(data) => Loadable::Success(f(data)),
            Self::Error(message) => Loadable::Error(message),
        }
    }

    /// Pending phase.
    pub fn start(&mut self) {
        *self = Self::Loading;
    }

    /// Fulfilled or rejected phase from an action result.
    pub fn settle<E: std::fmt::Display>(&mut self, result: Result<T, E>) {
        *self = match result {
            Ok(data) => Self::Success(data),
            Err(e) => Self::Error(e.to_string()),
        };
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Loadable<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_loadable_idle() {
        let state: Loadable<u32> = Loadable::default();
        assert!(state.is_idle());
        assert!(!state.is_loading());
        assert!(!state.is_success());
        assert!(!state.is_error());
    }

    #[test]
    fn test_phases() {
        let mut state: Loadable<Vec<u32>> = Loadable::Idle;
        state.start();
        assert!(state.is_loading());

        state.settle::<String>(Ok(vec![1, 2]));
        assert_eq!(state.data(), Some(&vec![1, 2]));

        state.start();
        state.settle::<String>(Err("Network Error".to_string()));
        assert_eq!(state.error(), Some("Network Error"));
        assert_eq!(state.data(), None);
    }

    #[test]
    fn test_map_keeps_error() {
        let state: Loadable<u32> = Loadable::Error("nope".to_string());
        assert_eq!(state.map(|n| n * 2), Loadable::Error("nope".to_string()));

        let state = Loadable::Success(21);
        assert_eq!(state.map(|n| n * 2), Loadable::Success(42));
    }

    #[test]
    fn test_serialized_shape() {
        let state = Loadable::Success(3);
        let value = serde_json::to_value(&state).unwrap_or_default();
        assert_eq!(value, serde_json::json!({"state": "success", "value": 3}));
    }
}
