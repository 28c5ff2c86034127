//! User identity and profile data model.
//!
//! The fan-out engine only needs a narrow slice of the account record: the
//! role/active flags that make someone a candidate, and the profile fields
//! the eligibility evaluator consumes. Everything else (mobile number, OTP
//! state, admin permissions) stays with the auth and admin collaborators.

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// End user receiving job and scheme alerts.
    User,
    /// Administrator publishing listings and announcements.
    Admin,
}

impl Role {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

/// Education levels, totally ordered for eligibility comparisons.
///
/// ITI is a lateral branch of the school track; its ordinal of 3 exists
/// only so requirement comparisons stay total, not as a skill equivalence
/// claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Education {
    #[serde(rename = "10th")]
    Tenth,
    #[serde(rename = "12th")]
    Twelfth,
    #[serde(rename = "ITI")]
    Iti,
    #[serde(rename = "Graduate")]
    Graduate,
}

impl Education {
    /// Ordinal used for "at least this level" comparisons.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Tenth => 1,
            Self::Twelfth => 2,
            Self::Iti => 3,
            Self::Graduate => 4,
        }
    }

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tenth => "10th",
            Self::Twelfth => "12th",
            Self::Iti => "ITI",
            Self::Graduate => "Graduate",
        }
    }
}

impl fmt::Display for Education {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown education string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEducationError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseEducationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown education level: {}", self.input)
    }
}

impl std::error::Error for ParseEducationError {}

impl std::str::FromStr for Education {
    type Err = ParseEducationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "10th" => Ok(Self::Tenth),
            "12th" => Ok(Self::Twelfth),
            "ITI" => Ok(Self::Iti),
            "Graduate" => Ok(Self::Graduate),
            _ => Err(ParseEducationError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Job-domain preference selection.
///
/// ## Invariants
/// - The `ALL` sentinel is only ever the sole selection; it cannot be
///   combined with specific domains. The enum makes the invalid state
///   unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum DomainPreference {
    /// Interested in every job domain.
    All,
    /// Interested only in the listed domain tags.
    Selected(Vec<String>),
}

impl DomainPreference {
    /// True when `domain` matches this preference.
    pub fn includes(&self, domain: &str) -> bool {
        match self {
            Self::All => true,
            Self::Selected(domains) => domains.iter().any(|d| d == domain),
        }
    }
}

impl Default for DomainPreference {
    fn default() -> Self {
        Self::All
    }
}

/// Error returned when a stored domain list combines `ALL` with others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPreferenceError;

impl fmt::Display for DomainPreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("'ALL' must be the only selected domain")
    }
}

impl std::error::Error for DomainPreferenceError {}

impl TryFrom<Vec<String>> for DomainPreference {
    type Error = DomainPreferenceError;

    fn try_from(domains: Vec<String>) -> Result<Self, Self::Error> {
        if domains.iter().any(|d| d == "ALL") {
            if domains.len() == 1 {
                Ok(Self::All)
            } else {
                Err(DomainPreferenceError)
            }
        } else {
            Ok(Self::Selected(domains))
        }
    }
}

impl From<DomainPreference> for Vec<String> {
    fn from(value: DomainPreference) -> Self {
        match value {
            DomainPreference::All => vec!["ALL".to_owned()],
            DomainPreference::Selected(domains) => domains,
        }
    }
}

/// Profile slice consumed by eligibility and fan-out.
///
/// Fields are optional because accounts exist before onboarding completes;
/// the fan-out engine gates on the completeness each listing kind needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    /// Derived from `date_of_birth` whenever the profile is stored.
    pub age: Option<i32>,
    pub education: Option<Education>,
    pub state: Option<String>,
    pub district: Option<String>,
    #[serde(default)]
    pub preferred_domains: DomainPreference,
}

impl UserProfile {
    /// True when the profile is complete enough for job fan-out.
    pub fn complete_for_jobs(&self) -> bool {
        self.full_name.is_some() && self.education.is_some()
    }

    /// True when the profile is complete enough for scheme fan-out.
    pub fn complete_for_schemes(&self) -> bool {
        self.full_name.is_some()
    }
}

/// Application user as seen by the notification core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub is_active: bool,
    pub profile: UserProfile,
}

/// Calendar-accurate age in whole years at `today`.
///
/// Counts completed years: the result only increments once the birthday has
/// passed in the current year. `floor(days / 365)` would drift across leap
/// years and is deliberately not used.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    let birthday_pending = (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day());
    if birthday_pending {
        age -= 1;
    }
    age
}

/// Calendar-accurate age as of the current UTC date.
pub fn current_age(date_of_birth: NaiveDate) -> i32 {
    age_on(date_of_birth, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[rstest]
    #[case::birthday_passed(date(2000, 3, 10), date(2026, 8, 30), 26)]
    #[case::birthday_today(date(2000, 8, 30), date(2026, 8, 30), 26)]
    #[case::birthday_pending(date(2000, 11, 2), date(2026, 8, 30), 25)]
    #[case::leap_day_birth(date(2004, 2, 29), date(2026, 2, 28), 21)]
    #[case::leap_day_passed(date(2004, 2, 29), date(2026, 3, 1), 22)]
    fn age_is_calendar_accurate(
        #[case] born: NaiveDate,
        #[case] today: NaiveDate,
        #[case] expected: i32,
    ) {
        assert_eq!(age_on(born, today), expected);
    }

    #[rstest]
    #[case::tenth(Education::Tenth, 1)]
    #[case::twelfth(Education::Twelfth, 2)]
    #[case::iti(Education::Iti, 3)]
    #[case::graduate(Education::Graduate, 4)]
    fn education_ordinals_are_total(#[case] level: Education, #[case] expected: u8) {
        assert_eq!(level.ordinal(), expected);
    }

    #[rstest]
    fn education_as_str_matches_parse() {
        for level in [
            Education::Tenth,
            Education::Twelfth,
            Education::Iti,
            Education::Graduate,
        ] {
            let parsed: Education = level.as_str().parse().expect("round-trip");
            assert_eq!(parsed, level);
        }
    }

    #[rstest]
    fn all_sentinel_must_be_sole_element() {
        let mixed = vec!["ALL".to_owned(), "Police".to_owned()];
        assert_eq!(DomainPreference::try_from(mixed), Err(DomainPreferenceError));

        let sole = vec!["ALL".to_owned()];
        assert_eq!(DomainPreference::try_from(sole), Ok(DomainPreference::All));
    }

    #[rstest]
    #[case::all_matches_anything(DomainPreference::All, "Railway", true)]
    #[case::selected_hit(DomainPreference::Selected(vec!["Police".to_owned()]), "Police", true)]
    #[case::selected_miss(DomainPreference::Selected(vec!["Police".to_owned()]), "Railway", false)]
    fn domain_preference_membership(
        #[case] preference: DomainPreference,
        #[case] domain: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(preference.includes(domain), expected);
    }

    #[rstest]
    fn profile_completeness_differs_by_listing_kind() {
        let mut profile = UserProfile {
            full_name: Some("Asha Kumari".to_owned()),
            ..UserProfile::default()
        };
        assert!(profile.complete_for_schemes());
        assert!(!profile.complete_for_jobs());

        profile.education = Some(Education::Twelfth);
        assert!(profile.complete_for_jobs());
    }
}
