//! Driving port for listing fan-out.

use async_trait::async_trait;

use crate::domain::{Error, Listing};

/// Summary of one fan-out run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FanoutReport {
    /// Active users considered for the listing.
    pub candidates: usize,
    /// Notifications actually created.
    pub created: usize,
}

/// Port through which listing publication triggers notification fan-out.
///
/// A run fails only when the candidate set cannot be loaded at all;
/// per-user failures are absorbed and reflected in the report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingFanout: Send + Sync {
    /// Notify every eligible, opted-in active user about `listing`.
    async fn notify_eligible_users(&self, listing: &Listing) -> Result<FanoutReport, Error>;
}
