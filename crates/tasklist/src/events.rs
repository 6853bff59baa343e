//! Store change events and the observer interface.

use serde::{Deserialize, Serialize};

/// A change to [`TaskStore`](crate::TaskStore) state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// The task collection was replaced or reconciled
    TasksChanged { count: usize },

    /// `loading_list` flipped
    LoadingListChanged { loading: bool },

    /// `loading_mutation` flipped
    LoadingMutationChanged { loading: bool },

    /// `error` was set or cleared
    ErrorChanged { error: Option<String> },
}

impl StoreEvent {
    /// Short name of the event kind, for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TasksChanged { .. } => "tasks_changed",
            Self::LoadingListChanged { .. } => "loading_list_changed",
            Self::LoadingMutationChanged { .. } => "loading_mutation_changed",
            Self::ErrorChanged { .. } => "error_changed",
        }
    }

    /// Whether this event reports a loading flag.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(
            self,
            Self::LoadingListChanged { .. } | Self::LoadingMutationChanged { .. }
        )
    }
}

/// Receives store changes.
///
/// Called synchronously after the state lock is released, so an observer
/// may read the store (e.g. [`TaskStore::snapshot`](crate::TaskStore::snapshot))
/// but should not block.
pub trait StoreObserver: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Handle one change.
    fn on_event(&self, event: &StoreEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kinds() {
        assert_eq!(StoreEvent::TasksChanged { count: 2 }.kind(), "tasks_changed");
        assert!(StoreEvent::LoadingListChanged { loading: true }.is_loading());
        assert!(!StoreEvent::ErrorChanged { error: None }.is_loading());
    }

    #[test]
    fn test_event_serialization() {
        let event = StoreEvent::ErrorChanged {
            error: Some("boom".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({ "type": "error_changed", "error": "boom" })
        );
    }
}
