use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    domain::ApplicationStatus,
    error::{AppError, AppResult},
    models::{
        Application, ComplianceRequirement, ComplianceSubmission, NewComplianceSubmission, Profile,
    },
    routes::jobs::owned_job,
    schema::{applications, compliance_requirements, compliance_submissions, profiles},
    state::AppState,
    uploads,
};

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub requirement_id: Uuid,
    pub application_id: Uuid,
    pub document_url: String,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub reviewed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ComplianceSubmission> for SubmissionResponse {
    fn from(submission: ComplianceSubmission) -> Self {
        Self {
            id: submission.id,
            requirement_id: submission.requirement_id,
            application_id: submission.application_id,
            document_url: submission.document_url,
            status: submission.status,
            rejection_reason: submission.rejection_reason,
            reviewed_at: submission.reviewed_at,
            created_at: submission.created_at,
            updated_at: submission.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ChecklistItem {
    pub requirement_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
    pub submission: Option<SubmissionResponse>,
}

#[derive(Serialize)]
pub struct CandidateChecklist {
    pub application_id: Uuid,
    pub items: Vec<ChecklistItem>,
}

#[derive(Serialize)]
pub struct MatrixCandidate {
    pub application_id: Uuid,
    pub candidate_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub application_status: String,
    pub items: Vec<ChecklistItem>,
}

#[derive(Serialize)]
pub struct EmployerMatrix {
    pub job_id: Uuid,
    pub candidates: Vec<MatrixCandidate>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ComplianceView {
    Checklist(CandidateChecklist),
    Matrix(EmployerMatrix),
}

fn application_unlocked(status: &str) -> bool {
    ApplicationStatus::parse(status)
        .map(ApplicationStatus::unlocks_compliance)
        .unwrap_or(false)
}

fn checklist_items(
    requirements: &[ComplianceRequirement],
    submissions: Vec<ComplianceSubmission>,
) -> Vec<ChecklistItem> {
    let mut by_requirement: HashMap<Uuid, ComplianceSubmission> = submissions
        .into_iter()
        .map(|submission| (submission.requirement_id, submission))
        .collect();

    requirements
        .iter()
        .map(|requirement| ChecklistItem {
            requirement_id: requirement.id,
            name: requirement.name.clone(),
            description: requirement.description.clone(),
            required: requirement.required,
            submission: by_requirement.remove(&requirement.id).map(Into::into),
        })
        .collect()
}

/// Compliance view for a job. Candidates see their own checklist once the
/// employer has shortlisted or accepted them; the owning employer sees the
/// full matrix across every unlocked applicant.
pub async fn job_compliance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(job_id): Path<Uuid>,
) -> AppResult<Json<ComplianceView>> {
    let mut conn = state.db()?;

    if user.is_candidate() {
        let application: Application = applications::table
            .filter(applications::job_id.eq(job_id))
            .filter(applications::candidate_id.eq(user.profile_id))
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| {
                AppError::forbidden("compliance is available after you have been shortlisted")
            })?;
        if !application_unlocked(&application.status) {
            return Err(AppError::forbidden(
                "compliance is available after you have been shortlisted",
            ));
        }

        let requirements: Vec<ComplianceRequirement> = compliance_requirements::table
            .filter(compliance_requirements::job_id.eq(job_id))
            .order(compliance_requirements::created_at.asc())
            .load(&mut conn)?;

        let submissions: Vec<ComplianceSubmission> = compliance_submissions::table
            .filter(compliance_submissions::application_id.eq(application.id))
            .load(&mut conn)?;

        return Ok(Json(ComplianceView::Checklist(CandidateChecklist {
            application_id: application.id,
            items: checklist_items(&requirements, submissions),
        })));
    }

    let job = owned_job(&mut conn, &user, job_id)?;

    let requirements: Vec<ComplianceRequirement> = compliance_requirements::table
        .filter(compliance_requirements::job_id.eq(job.id))
        .order(compliance_requirements::created_at.asc())
        .load(&mut conn)?;

    let rows: Vec<(Application, Profile)> = applications::table
        .inner_join(profiles::table)
        .filter(applications::job_id.eq(job.id))
        .filter(applications::status.eq_any(vec![
            ApplicationStatus::Shortlisted.as_str(),
            ApplicationStatus::Accepted.as_str(),
        ]))
        .order(applications::created_at.asc())
        .load(&mut conn)?;

    let application_ids: Vec<Uuid> = rows.iter().map(|(application, _)| application.id).collect();
    let submissions: Vec<ComplianceSubmission> = if application_ids.is_empty() {
        Vec::new()
    } else {
        compliance_submissions::table
            .filter(compliance_submissions::application_id.eq_any(&application_ids))
            .load(&mut conn)?
    };

    let mut by_application: HashMap<Uuid, Vec<ComplianceSubmission>> = HashMap::new();
    for submission in submissions {
        by_application
            .entry(submission.application_id)
            .or_default()
            .push(submission);
    }

    let candidates = rows
        .into_iter()
        .map(|(application, profile)| {
            let submissions = by_application.remove(&application.id).unwrap_or_default();
            MatrixCandidate {
                application_id: application.id,
                candidate_id: profile.id,
                first_name: profile.first_name,
                last_name: profile.last_name,
                application_status: application.status,
                items: checklist_items(&requirements, submissions),
            }
        })
        .collect();

    Ok(Json(ComplianceView::Matrix(EmployerMatrix {
        job_id: job.id,
        candidates,
    })))
}

/// Uploads a document against a checklist requirement. Resubmission replaces
/// the previous file and sends the row back to pending review; an approved
/// submission can no longer be replaced.
pub async fn submit_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(requirement_id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<SubmissionResponse>> {
    user.require_candidate()?;

    let mut conn = state.db()?;
    let requirement: ComplianceRequirement = compliance_requirements::table
        .find(requirement_id)
        .first(&mut conn)?;

    let application: Application = applications::table
        .filter(applications::job_id.eq(requirement.job_id))
        .filter(applications::candidate_id.eq(user.profile_id))
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| {
            AppError::forbidden("compliance is available after you have been shortlisted")
        })?;
    if !application_unlocked(&application.status) {
        return Err(AppError::forbidden(
            "compliance is available after you have been shortlisted",
        ));
    }

    let existing: Option<ComplianceSubmission> = compliance_submissions::table
        .filter(compliance_submissions::requirement_id.eq(requirement.id))
        .filter(compliance_submissions::application_id.eq(application.id))
        .first(&mut conn)
        .optional()?;
    if let Some(existing) = &existing {
        if existing.status == "approved" {
            return Err(AppError::conflict(
                "this requirement has already been approved",
            ));
        }
    }

    let (file, _fields) = uploads::read_multipart(multipart).await?;
    let file = uploads::require_file(file)?;
    let content_type = uploads::resolve_content_type(&file);

    let key = format!(
        "compliance/{}/{}_{}.{}",
        application.id,
        requirement.id,
        uploads::upload_stamp(),
        uploads::file_extension(&file.filename)
    );

    state
        .storage
        .put_object(&key, file.bytes, content_type)
        .await
        .map_err(|err| {
            error!(error = %err, key = %key, "failed to store compliance document");
            AppError::internal(format!("failed to store compliance document: {err}"))
        })?;

    let document_url = state.storage.public_url(&key);
    let now = Utc::now().naive_utc();

    let submission_id = match existing {
        Some(existing) => {
            diesel::update(compliance_submissions::table.find(existing.id))
                .set((
                    compliance_submissions::document_url.eq(&document_url),
                    compliance_submissions::status.eq("pending"),
                    compliance_submissions::reviewed_by.eq(None::<Uuid>),
                    compliance_submissions::reviewed_at.eq(None::<NaiveDateTime>),
                    compliance_submissions::rejection_reason.eq(None::<String>),
                    compliance_submissions::updated_at.eq(now),
                ))
                .execute(&mut conn)?;
            existing.id
        }
        None => {
            let new_submission = NewComplianceSubmission {
                id: Uuid::new_v4(),
                requirement_id: requirement.id,
                application_id: application.id,
                document_url: document_url.clone(),
                status: "pending".to_string(),
            };
            diesel::insert_into(compliance_submissions::table)
                .values(&new_submission)
                .execute(&mut conn)?;
            new_submission.id
        }
    };

    info!(%submission_id, requirement_id = %requirement.id, application_id = %application.id, "compliance document submitted");

    let submission: ComplianceSubmission = compliance_submissions::table
        .find(submission_id)
        .first(&mut conn)?;
    Ok(Json(submission.into()))
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub action: String,
    pub reason: Option<String>,
}

/// Approve or reject a pending submission. Decisions are final; a resubmission
/// from the candidate is the only way a rejected requirement comes back.
pub async fn review_submission(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(submission_id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<SubmissionResponse>> {
    let mut conn = state.db()?;

    let (submission, application): (ComplianceSubmission, Application) =
        compliance_submissions::table
            .inner_join(applications::table)
            .filter(compliance_submissions::id.eq(submission_id))
            .first(&mut conn)?;
    owned_job(&mut conn, &user, application.job_id)?;

    if submission.status != "pending" {
        return Err(AppError::conflict("this submission has already been reviewed"));
    }

    let now = Utc::now().naive_utc();
    match payload.action.as_str() {
        "approve" => {
            diesel::update(compliance_submissions::table.find(submission.id))
                .set((
                    compliance_submissions::status.eq("approved"),
                    compliance_submissions::reviewed_by.eq(user.profile_id),
                    compliance_submissions::reviewed_at.eq(now),
                    compliance_submissions::rejection_reason.eq(None::<String>),
                    compliance_submissions::updated_at.eq(now),
                ))
                .execute(&mut conn)?;
        }
        "reject" => {
            let reason = payload
                .reason
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| AppError::bad_request("a rejection reason is required"))?;
            diesel::update(compliance_submissions::table.find(submission.id))
                .set((
                    compliance_submissions::status.eq("rejected"),
                    compliance_submissions::reviewed_by.eq(user.profile_id),
                    compliance_submissions::reviewed_at.eq(now),
                    compliance_submissions::rejection_reason.eq(reason),
                    compliance_submissions::updated_at.eq(now),
                ))
                .execute(&mut conn)?;
        }
        _ => {
            return Err(AppError::bad_request(
                "action must be either approve or reject",
            ));
        }
    }

    info!(%submission_id, action = %payload.action, "compliance submission reviewed");

    let refreshed: ComplianceSubmission = compliance_submissions::table
        .find(submission.id)
        .first(&mut conn)?;
    Ok(Json(refreshed.into()))
}
