use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    models::{CertificationDocument, Profile},
    schema::{certification_documents, profiles},
    state::AppState,
};

#[derive(Serialize)]
pub struct UserSummary {
    pub profile_id: Uuid,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

impl From<Profile> for UserSummary {
    fn from(profile: Profile) -> Self {
        Self {
            profile_id: profile.id,
            role: profile.role,
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            created_at: profile.created_at,
        }
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<UserSummary>>> {
    user.require_admin()?;

    let mut conn = state.db()?;
    let rows: Vec<Profile> = profiles::table
        .order(profiles::created_at.desc())
        .load(&mut conn)?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[derive(Serialize)]
pub struct VerificationItem {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub certification_type: String,
    pub document_url: String,
    pub status: String,
    pub expiration_date: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn to_verification_item(document: CertificationDocument, profile: Profile) -> VerificationItem {
    VerificationItem {
        id: document.id,
        candidate_id: document.candidate_id,
        candidate_name: format!("{} {}", profile.first_name, profile.last_name),
        certification_type: document.certification_type,
        document_url: document.document_url,
        status: document.status,
        expiration_date: document.expiration_date,
        rejection_reason: document.rejection_reason,
        created_at: document.created_at,
        updated_at: document.updated_at,
    }
}

#[derive(Serialize)]
pub struct VerificationQueue {
    pub pending: Vec<VerificationItem>,
    pub recent: Vec<VerificationItem>,
}

/// The review desk: every pending document oldest-first, plus the last 20
/// decisions for context.
pub async fn list_verifications(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<VerificationQueue>> {
    user.require_admin()?;

    let mut conn = state.db()?;
    let pending: Vec<(CertificationDocument, Profile)> = certification_documents::table
        .inner_join(profiles::table)
        .filter(certification_documents::status.eq("pending"))
        .order(certification_documents::created_at.asc())
        .load(&mut conn)?;

    let recent: Vec<(CertificationDocument, Profile)> = certification_documents::table
        .inner_join(profiles::table)
        .filter(certification_documents::status.ne("pending"))
        .order(certification_documents::updated_at.desc())
        .limit(20)
        .load(&mut conn)?;

    Ok(Json(VerificationQueue {
        pending: pending
            .into_iter()
            .map(|(document, profile)| to_verification_item(document, profile))
            .collect(),
        recent: recent
            .into_iter()
            .map(|(document, profile)| to_verification_item(document, profile))
            .collect(),
    }))
}

fn pending_document(
    conn: &mut PgConnection,
    document_id: Uuid,
) -> AppResult<CertificationDocument> {
    let document: CertificationDocument = certification_documents::table
        .find(document_id)
        .first(conn)?;
    if document.status != "pending" {
        return Err(AppError::conflict(
            "this document has already been reviewed",
        ));
    }
    Ok(document)
}

pub async fn verify_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(document_id): Path<Uuid>,
) -> AppResult<Json<VerificationItem>> {
    user.require_admin()?;

    let mut conn = state.db()?;
    let document = pending_document(&mut conn, document_id)?;

    let now = Utc::now().naive_utc();
    diesel::update(certification_documents::table.find(document.id))
        .set((
            certification_documents::status.eq("verified"),
            certification_documents::verified_by.eq(user.profile_id),
            certification_documents::verified_at.eq(now),
            certification_documents::rejection_reason.eq(None::<String>),
            certification_documents::updated_at.eq(now),
        ))
        .execute(&mut conn)?;

    info!(%document_id, "certification document verified");

    let (document, profile): (CertificationDocument, Profile) = certification_documents::table
        .inner_join(profiles::table)
        .filter(certification_documents::id.eq(document_id))
        .first(&mut conn)?;
    Ok(Json(to_verification_item(document, profile)))
}

#[derive(Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

pub async fn reject_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(document_id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> AppResult<Json<VerificationItem>> {
    user.require_admin()?;

    let reason = payload.reason.trim();
    if reason.is_empty() {
        return Err(AppError::bad_request("a rejection reason is required"));
    }

    let mut conn = state.db()?;
    let document = pending_document(&mut conn, document_id)?;

    let now = Utc::now().naive_utc();
    diesel::update(certification_documents::table.find(document.id))
        .set((
            certification_documents::status.eq("rejected"),
            certification_documents::verified_by.eq(user.profile_id),
            certification_documents::verified_at.eq(now),
            certification_documents::rejection_reason.eq(reason),
            certification_documents::updated_at.eq(now),
        ))
        .execute(&mut conn)?;

    info!(%document_id, "certification document rejected");

    let (document, profile): (CertificationDocument, Profile) = certification_documents::table
        .inner_join(profiles::table)
        .filter(certification_documents::id.eq(document_id))
        .first(&mut conn)?;
    Ok(Json(to_verification_item(document, profile)))
}
