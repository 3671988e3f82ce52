//! Administrative memory reset.

use serde::{Deserialize, Serialize};

use crate::errors::{RapportError, RapportResult};

/// Scope of a hard delete. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetFilter {
    pub user_id: Option<String>,
    pub channel: Option<String>,
}

impl ResetFilter {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            channel: None,
        }
    }

    pub fn channel(channel: impl Into<String>) -> Self {
        Self {
            user_id: None,
            channel: Some(channel.into()),
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Reject filters that would wipe every user's memory.
    pub fn validate(&self) -> RapportResult<()> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if blank(&self.user_id) && blank(&self.channel) {
            return Err(RapportError::InvalidInput(
                "reset filter needs a user_id or a channel".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rows removed by a reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetCounts {
    pub interactions: u64,
    pub project_interactions: u64,
    pub projects: u64,
    pub skills: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_is_rejected() {
        assert!(ResetFilter::default().validate().is_err());
        assert!(ResetFilter {
            user_id: Some("  ".to_string()),
            channel: None
        }
        .validate()
        .is_err());
        assert!(ResetFilter::user("u1").validate().is_ok());
        assert!(ResetFilter::channel("planning").validate().is_ok());
    }
}
