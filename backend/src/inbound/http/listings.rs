//! Admin listing publication HTTP handlers.
//!
//! ```text
//! POST /api/v1/admin/listings/job
//! POST /api/v1/admin/listings/scheme
//! ```
//!
//! Publishing a listing answers immediately: the handler validates the
//! payload, emits the admin event, and spawns the fan-out so the response
//! never waits on database or push-provider latency.

use std::str::FromStr;
use std::sync::Arc;

use actix_web::{HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::domain::ports::ListingFanout;
use crate::domain::{
    AgeBand, ApiResult, Education, Error, Job, Listing, ListingId, Scheme, Scope,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn parse_scope(value: &str) -> Result<Scope, Error> {
    match value {
        "CENTRAL" => Ok(Scope::Central),
        "STATE" => Ok(Scope::State),
        other => Err(
            Error::invalid_request("scope must be CENTRAL or STATE").with_details(json!({
                "field": "scope",
                "value": other,
            })),
        ),
    }
}

fn parse_education(value: &str) -> Result<Education, Error> {
    Education::from_str(value).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "education",
            "value": value,
        }))
    })
}

fn parse_age_band(min: i32, max: i32) -> Result<AgeBand, Error> {
    AgeBand::new(min, max).map_err(|err| Error::invalid_request(err.to_string()))
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(
            Error::invalid_request(format!("{field} must not be empty"))
                .with_details(json!({ "field": field })),
        );
    }
    Ok(())
}

/// Request payload for publishing a job listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    title: String,
    scope: String,
    domain: String,
    state: String,
    education: String,
    age_min: i32,
    age_max: i32,
    last_date: DateTime<Utc>,
    #[serde(default)]
    is_featured: bool,
}

impl JobPayload {
    fn into_listing(self) -> Result<Listing, Error> {
        require_non_empty("title", &self.title)?;
        require_non_empty("domain", &self.domain)?;
        require_non_empty("state", &self.state)?;
        Ok(Listing::Job(Job {
            id: ListingId::random(),
            title: self.title,
            scope: parse_scope(&self.scope)?,
            domain: self.domain,
            state: self.state,
            education: parse_education(&self.education)?,
            age_band: parse_age_band(self.age_min, self.age_max)?,
            last_date: self.last_date,
            is_active: true,
            is_featured: self.is_featured,
        }))
    }
}

/// Request payload for publishing a scheme listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemePayload {
    name: String,
    scope: String,
    target_audience: String,
    benefit: String,
    state: String,
    age_min: Option<i32>,
    age_max: Option<i32>,
    #[serde(default)]
    is_featured: bool,
}

impl SchemePayload {
    fn into_listing(self) -> Result<Listing, Error> {
        require_non_empty("name", &self.name)?;
        require_non_empty("state", &self.state)?;
        let age_band = match (self.age_min, self.age_max) {
            (Some(min), Some(max)) => Some(parse_age_band(min, max)?),
            (None, None) => None,
            _ => {
                return Err(Error::invalid_request(
                    "ageMin and ageMax must be provided together",
                ));
            }
        };
        Ok(Listing::Scheme(Scheme {
            id: ListingId::random(),
            name: self.name,
            scope: parse_scope(&self.scope)?,
            target_audience: self.target_audience,
            benefit: self.benefit,
            state: self.state,
            age_band,
            is_active: true,
            is_featured: self.is_featured,
        }))
    }
}

/// Run the fan-out off the request path and log its outcome.
fn spawn_fanout(fanout: Arc<dyn ListingFanout>, listing: Listing) {
    tokio::spawn(async move {
        match fanout.notify_eligible_users(&listing).await {
            Ok(report) => {
                tracing::info!(
                    listing_id = %listing.id(),
                    candidates = report.candidates,
                    created = report.created,
                    "background fan-out finished"
                );
            }
            Err(error) => {
                tracing::error!(
                    listing_id = %listing.id(),
                    error = %error,
                    "background fan-out failed"
                );
            }
        }
    });
}

async fn publish(state: &HttpState, listing: Listing, admin_event: &str) -> HttpResponse {
    state
        .realtime
        .emit_to_admins(admin_event, serde_json::to_value(&listing).unwrap_or_default())
        .await;
    let response = HttpResponse::Accepted().json(&listing);
    spawn_fanout(Arc::clone(&state.fanout), listing);
    response
}

#[post("/job")]
pub async fn publish_job(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<JobPayload>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let listing = payload.into_inner().into_listing()?;
    Ok(publish(&state, listing, "job:created").await)
}

#[post("/scheme")]
pub async fn publish_scheme(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<SchemePayload>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let listing = payload.into_inner().into_listing()?;
    Ok(publish(&state, listing, "scheme:created").await)
}
