use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    domain,
    error::{AppError, AppResult},
    models::{CertificationDocument, NewCertificationDocument},
    schema::certification_documents,
    state::AppState,
    uploads,
};

#[derive(Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub certification_type: String,
    pub document_url: String,
    pub status: String,
    pub expiration_date: Option<NaiveDate>,
    pub rejection_reason: Option<String>,
    pub verified_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<CertificationDocument> for DocumentResponse {
    fn from(document: CertificationDocument) -> Self {
        Self {
            id: document.id,
            certification_type: document.certification_type,
            document_url: document.document_url,
            status: document.status,
            expiration_date: document.expiration_date,
            rejection_reason: document.rejection_reason,
            verified_at: document.verified_at,
            created_at: document.created_at,
        }
    }
}

pub async fn list_documents(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<DocumentResponse>>> {
    user.require_candidate()?;

    let mut conn = state.db()?;
    let documents: Vec<CertificationDocument> = certification_documents::table
        .filter(certification_documents::candidate_id.eq(user.profile_id))
        .order(certification_documents::created_at.desc())
        .load(&mut conn)?;

    Ok(Json(documents.into_iter().map(Into::into).collect()))
}

/// Uploads a certification document for admin verification. The fields
/// `certification_type` and optionally `expiration_date` (YYYY-MM-DD) ride
/// alongside the file in the multipart body.
pub async fn upload_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DocumentResponse>)> {
    user.require_candidate()?;

    let (file, fields) = uploads::read_multipart(multipart).await?;
    let file = uploads::require_file(file)?;
    let content_type = uploads::resolve_content_type(&file);

    let certification_type = fields
        .get("certification_type")
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::bad_request("certification_type is required"))?;
    if !domain::is_certification(certification_type) {
        return Err(AppError::bad_request("unknown certification type"));
    }

    let expiration_date = match fields.get("expiration_date").map(|value| value.trim()) {
        Some(value) if !value.is_empty() => Some(
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| AppError::bad_request("expiration_date must be YYYY-MM-DD"))?,
        ),
        _ => None,
    };

    let key = format!(
        "certifications/{}/{}_{}.{}",
        user.profile_id,
        certification_type,
        uploads::upload_stamp(),
        uploads::file_extension(&file.filename)
    );

    state
        .storage
        .put_object(&key, file.bytes, content_type)
        .await
        .map_err(|err| {
            error!(error = %err, key = %key, "failed to store certification document");
            AppError::internal(format!("failed to store certification document: {err}"))
        })?;

    let document_url = state.storage.public_url(&key);

    let new_document = NewCertificationDocument {
        id: Uuid::new_v4(),
        candidate_id: user.profile_id,
        certification_type: certification_type.to_string(),
        document_url,
        status: "pending".to_string(),
        expiration_date,
    };

    let mut conn = state.db()?;
    diesel::insert_into(certification_documents::table)
        .values(&new_document)
        .execute(&mut conn)?;

    info!(document_id = %new_document.id, certification_type = %new_document.certification_type, "certification document uploaded");

    let document: CertificationDocument = certification_documents::table
        .find(new_document.id)
        .first(&mut conn)?;
    Ok((StatusCode::CREATED, Json(document.into())))
}
