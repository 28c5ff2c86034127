//! Listing data model: jobs and schemes.
//!
//! A listing is anything that can trigger eligibility-based fan-out. Jobs
//! and schemes share the scope/state/age-band shape; eligibility rules
//! branch on the kind only where a rule is kind-specific.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Education;

/// Sentinel state value meaning a STATE-scope listing applies nationwide.
pub const ALL_INDIA: &str = "All India";

/// Stable listing identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`ListingId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Geographic applicability of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    /// Nationwide.
    Central,
    /// Restricted to the listing's state unless that state is "All India".
    State,
}

/// Inclusive age band `[min, max]`.
///
/// ## Invariants
/// - `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBand {
    min: i32,
    max: i32,
}

/// Validation errors raised by listing constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingValidationError {
    #[error("ageMin ({min}) must be less than ageMax ({max})")]
    InvertedAgeBand { min: i32, max: i32 },
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

impl AgeBand {
    /// Build a band, rejecting `min >= max`.
    pub fn new(min: i32, max: i32) -> Result<Self, ListingValidationError> {
        if min >= max {
            return Err(ListingValidationError::InvertedAgeBand { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower inclusive bound.
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Upper inclusive bound.
    pub fn max(&self) -> i32 {
        self.max
    }

    /// True when `age` lies inside the inclusive band.
    pub fn contains(&self, age: i32) -> bool {
        age >= self.min && age <= self.max
    }
}

/// A job posting open for applications until `last_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: ListingId,
    pub title: String,
    pub scope: Scope,
    /// Domain tag matched against user preferences (for example "Police").
    pub domain: String,
    pub state: String,
    /// Minimum education level required of applicants.
    pub education: Education,
    pub age_band: AgeBand,
    pub last_date: DateTime<Utc>,
    pub is_active: bool,
    pub is_featured: bool,
}

/// A government scheme; the age band is optional as a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: ListingId,
    pub name: String,
    pub scope: Scope,
    pub target_audience: String,
    pub benefit: String,
    pub state: String,
    pub age_band: Option<AgeBand>,
    pub is_active: bool,
    pub is_featured: bool,
}

/// Alert category, used to look up the matching preference flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingKind {
    Job,
    Scheme,
}

/// A job or scheme record eligible for notification fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Listing {
    Job(Job),
    Scheme(Scheme),
}

impl Listing {
    /// Stable listing identifier.
    pub fn id(&self) -> ListingId {
        match self {
            Self::Job(job) => job.id,
            Self::Scheme(scheme) => scheme.id,
        }
    }

    /// Alert category of this listing.
    pub fn kind(&self) -> ListingKind {
        match self {
            Self::Job(_) => ListingKind::Job,
            Self::Scheme(_) => ListingKind::Scheme,
        }
    }

    /// Geographic scope.
    pub fn scope(&self) -> Scope {
        match self {
            Self::Job(job) => job.scope,
            Self::Scheme(scheme) => scheme.scope,
        }
    }

    /// State the listing is pinned to (meaningful for [`Scope::State`]).
    pub fn state(&self) -> &str {
        match self {
            Self::Job(job) => job.state.as_str(),
            Self::Scheme(scheme) => scheme.state.as_str(),
        }
    }

    /// Age band, if the listing restricts by age.
    pub fn age_band(&self) -> Option<AgeBand> {
        match self {
            Self::Job(job) => Some(job.age_band),
            Self::Scheme(scheme) => scheme.age_band,
        }
    }

    /// Headline text used in notification bodies.
    pub fn headline(&self) -> &str {
        match self {
            Self::Job(job) => job.title.as_str(),
            Self::Scheme(scheme) => scheme.name.as_str(),
        }
    }
}
