//! Pure eligibility evaluator.
//!
//! Maps (profile, listing) to a verdict plus every unmet criterion. The
//! evaluator is deterministic, performs no I/O, and never short-circuits:
//! all applicable checks run so callers can show users the full list of
//! reasons, not just the first failure.

use super::listing::{ALL_INDIA, Listing, Scope};
use super::user::UserProfile;

/// Outcome of one eligibility evaluation.
///
/// A listing is eligible iff `reasons` is empty; `eligible` is carried
/// explicitly so callers never re-derive it inconsistently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    pub reasons: Vec<String>,
}

impl EligibilityVerdict {
    fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            eligible: reasons.is_empty(),
            reasons,
        }
    }
}

/// Evaluate a user profile against a listing.
///
/// Checks are a union of independent criteria:
/// - age band (inclusive; skipped when the listing has none, and a profile
///   without a derived age cannot fail it);
/// - required education, jobs only (strictly-below ordinal fails; a
///   missing education level ranks below every requirement);
/// - domain preference, jobs only (the `ALL` sentinel matches everything);
/// - state, only for STATE-scope listings pinned to a real state.
///
/// # Examples
/// ```
/// use rozgar_backend::domain::{eligibility, UserProfile};
/// # use rozgar_backend::domain::{AgeBand, Education, Job, Listing, ListingId, Scope};
/// # use chrono::Utc;
/// let job = Listing::Job(Job {
///     id: ListingId::random(),
///     title: "Constable".into(),
///     scope: Scope::State,
///     domain: "Police".into(),
///     state: "Maharashtra".into(),
///     education: Education::Twelfth,
///     age_band: AgeBand::new(18, 28).expect("valid band"),
///     last_date: Utc::now(),
///     is_active: true,
///     is_featured: false,
/// });
/// let verdict = eligibility::evaluate(&UserProfile::default(), &job);
/// assert!(!verdict.eligible);
/// ```
pub fn evaluate(profile: &UserProfile, listing: &Listing) -> EligibilityVerdict {
    let mut reasons = Vec::new();

    if let Some(band) = listing.age_band() {
        // An absent derived age passes: incomplete profiles are filtered
        // upstream by the fan-out completeness gate, and ad-hoc callers get
        // the permissive reading the original service had.
        if let Some(age) = profile.age {
            if !band.contains(age) {
                reasons.push(format!(
                    "Age requirement: {}-{} years",
                    band.min(),
                    band.max()
                ));
            }
        }
    }

    if let Listing::Job(job) = listing {
        let user_level = profile.education.map_or(0, |level| level.ordinal());
        if user_level < job.education.ordinal() {
            reasons.push(format!("Education requirement: {}", job.education));
        }

        if !profile.preferred_domains.includes(&job.domain) {
            reasons.push(format!("Domain preference: {}", job.domain));
        }
    }

    if listing.scope() == Scope::State && listing.state() != ALL_INDIA {
        let same_state = profile
            .state
            .as_deref()
            .is_some_and(|state| state == listing.state());
        if !same_state {
            reasons.push(format!("State requirement: {}", listing.state()));
        }
    }

    EligibilityVerdict::from_reasons(reasons)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::listing::{AgeBand, Job, ListingId, Scheme};
    use crate::domain::user::{DomainPreference, Education};
    use chrono::Utc;
    use rstest::rstest;

    fn police_job() -> Listing {
        Listing::Job(Job {
            id: ListingId::random(),
            title: "Police Constable Recruitment".to_owned(),
            scope: Scope::State,
            domain: "Police".to_owned(),
            state: "Maharashtra".to_owned(),
            education: Education::Twelfth,
            age_band: AgeBand::new(18, 28).expect("valid band"),
            last_date: Utc::now(),
            is_active: true,
            is_featured: false,
        })
    }

    fn scheme(age_band: Option<AgeBand>, scope: Scope, state: &str) -> Listing {
        Listing::Scheme(Scheme {
            id: ListingId::random(),
            name: "Skill Development Scheme".to_owned(),
            scope,
            target_audience: "Youth".to_owned(),
            benefit: "Training".to_owned(),
            state: state.to_owned(),
            age_band,
            is_active: true,
            is_featured: false,
        })
    }

    fn profile(age: i32, education: Education, state: &str) -> UserProfile {
        UserProfile {
            full_name: Some("Asha Kumari".to_owned()),
            date_of_birth: None,
            age: Some(age),
            education: Some(education),
            state: Some(state.to_owned()),
            district: Some("Pune".to_owned()),
            preferred_domains: DomainPreference::All,
        }
    }

    #[rstest]
    fn matching_profile_is_eligible_with_no_reasons() {
        let verdict = evaluate(&profile(25, Education::Graduate, "Maharashtra"), &police_job());
        assert!(verdict.eligible);
        assert!(verdict.reasons.is_empty());
    }

    #[rstest]
    fn evaluation_is_deterministic() {
        let user = profile(30, Education::Tenth, "Bihar");
        let job = police_job();
        let first = evaluate(&user, &job);
        let second = evaluate(&user, &job);
        assert_eq!(first, second);
    }

    #[rstest]
    #[case::at_min(18, true)]
    #[case::at_max(28, true)]
    #[case::below_min(17, false)]
    #[case::above_max(29, false)]
    fn age_bounds_are_inclusive(#[case] age: i32, #[case] expected: bool) {
        let verdict = evaluate(&profile(age, Education::Graduate, "Maharashtra"), &police_job());
        assert_eq!(verdict.eligible, expected);
        if !expected {
            assert_eq!(verdict.reasons, vec!["Age requirement: 18-28 years"]);
        }
    }

    #[rstest]
    fn overage_user_gets_the_exact_age_reason() {
        let verdict = evaluate(&profile(30, Education::Graduate, "Maharashtra"), &police_job());
        assert!(!verdict.eligible);
        assert_eq!(verdict.reasons, vec!["Age requirement: 18-28 years"]);
    }

    #[rstest]
    #[case::graduate_meets_everything(Education::Graduate, true)]
    #[case::iti_meets_twelfth(Education::Iti, true)]
    #[case::twelfth_exact(Education::Twelfth, true)]
    #[case::tenth_below(Education::Tenth, false)]
    fn education_is_ordered(#[case] level: Education, #[case] expected: bool) {
        let verdict = evaluate(&profile(25, level, "Maharashtra"), &police_job());
        assert_eq!(verdict.eligible, expected);
        if !expected {
            assert_eq!(verdict.reasons, vec!["Education requirement: 12th"]);
        }
    }

    #[rstest]
    fn missing_education_fails_any_job_requirement() {
        let mut user = profile(25, Education::Graduate, "Maharashtra");
        user.education = None;
        let verdict = evaluate(&user, &police_job());
        assert_eq!(verdict.reasons, vec!["Education requirement: 12th"]);
    }

    #[rstest]
    #[case::police("Police")]
    #[case::railway("Railway")]
    #[case::teaching("Teaching")]
    fn all_sentinel_never_fails_the_domain_check(#[case] domain: &str) {
        let mut job = police_job();
        if let Listing::Job(inner) = &mut job {
            inner.domain = domain.to_owned();
        }
        let verdict = evaluate(&profile(25, Education::Graduate, "Maharashtra"), &job);
        assert!(
            !verdict
                .reasons
                .iter()
                .any(|r| r.starts_with("Domain preference")),
        );
    }

    #[rstest]
    fn selected_domains_exclude_unlisted_listings() {
        let mut user = profile(25, Education::Graduate, "Maharashtra");
        user.preferred_domains = DomainPreference::Selected(vec!["Railway".to_owned()]);
        let verdict = evaluate(&user, &police_job());
        assert_eq!(verdict.reasons, vec!["Domain preference: Police"]);
    }

    #[rstest]
    #[case::central(Scope::Central, "Maharashtra")]
    #[case::all_india(Scope::State, ALL_INDIA)]
    fn central_and_all_india_listings_ignore_user_state(#[case] scope: Scope, #[case] state: &str) {
        let listing = scheme(None, scope, state);
        let verdict = evaluate(&profile(25, Education::Tenth, "Kerala"), &listing);
        assert!(verdict.eligible);
    }

    #[rstest]
    fn state_mismatch_fails_state_scoped_listings() {
        let verdict = evaluate(&profile(25, Education::Graduate, "Bihar"), &police_job());
        assert_eq!(verdict.reasons, vec!["State requirement: Maharashtra"]);
    }

    #[rstest]
    fn scheme_without_age_band_accepts_any_age() {
        let listing = scheme(None, Scope::Central, ALL_INDIA);
        for age in [17, 25, 70, 99] {
            let verdict = evaluate(&profile(age, Education::Tenth, "Kerala"), &listing);
            assert!(verdict.eligible, "age {age} should be eligible");
        }
    }

    #[rstest]
    fn scheme_with_age_band_enforces_it() {
        let listing = scheme(
            Some(AgeBand::new(18, 40).expect("valid band")),
            Scope::Central,
            ALL_INDIA,
        );
        let verdict = evaluate(&profile(45, Education::Tenth, "Kerala"), &listing);
        assert_eq!(verdict.reasons, vec!["Age requirement: 18-40 years"]);
    }

    #[rstest]
    fn all_failing_checks_are_reported_together() {
        let mut user = profile(31, Education::Tenth, "Bihar");
        user.preferred_domains = DomainPreference::Selected(vec!["Railway".to_owned()]);
        let verdict = evaluate(&user, &police_job());
        assert_eq!(
            verdict.reasons,
            vec![
                "Age requirement: 18-28 years",
                "Education requirement: 12th",
                "Domain preference: Police",
                "State requirement: Maharashtra",
            ],
        );
    }
}
