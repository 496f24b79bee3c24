//! Core types for the subject.

use crate::error::{Result, SubjectError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Check that a topic name is usable as a registry key.
pub(crate) fn validate_topic(topic: &str) -> Result<()> {
    if topic.is_empty() {
        return Err(SubjectError::invalid("topic must be a non-empty string"));
    }
    Ok(())
}

/// What a broadcast does when an observer returns an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// Stop the broadcast and return the error to the publisher.
    #[default]
    Abort,
    /// Log the error and keep delivering to the rest of the snapshot.
    Isolate,
}

impl fmt::Display for DeliveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryPolicy::Abort => write!(f, "abort"),
            DeliveryPolicy::Isolate => write!(f, "isolate"),
        }
    }
}

/// Point-in-time counters for a subject.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectStats {
    pub topic_count: usize,
    /// Handles across all topics, including expired ones not yet pruned.
    pub observer_count: usize,
    pub destroyed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_topic() {
        assert!(validate_topic("news").is_ok());
        assert!(validate_topic(" ").is_ok());
        assert!(matches!(
            validate_topic(""),
            Err(SubjectError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_delivery_policy_serde() {
        let json = serde_json::to_string(&DeliveryPolicy::Isolate).unwrap();
        assert_eq!(json, "\"isolate\"");

        let parsed: DeliveryPolicy = serde_json::from_str("\"abort\"").unwrap();
        assert_eq!(parsed, DeliveryPolicy::Abort);
        assert_eq!(DeliveryPolicy::default(), DeliveryPolicy::Abort);
        assert_eq!(DeliveryPolicy::Isolate.to_string(), "isolate");
    }

    #[test]
    fn test_stats_serialize() {
        let stats = SubjectStats {
            topic_count: 2,
            observer_count: 3,
            destroyed: false,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["topic_count"], 2);
        assert_eq!(value["observer_count"], 3);
        assert_eq!(value["destroyed"], false);
    }
}
