use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    domain::ApplicationStatus,
    error::{self, AppError, AppResult},
    models::{Application, CandidateProfile, Company, Job, NewApplication, Profile},
    routes::jobs::owned_job,
    schema::{
        applications, candidate_profiles, certification_documents, companies, jobs, profiles,
    },
    state::AppState,
};

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub cover_message: Option<String>,
}

#[derive(Serialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub cover_message: Option<String>,
    pub created_at: NaiveDateTime,
    pub compliance_unlocked: bool,
}

fn to_application_response(application: Application) -> ApplicationResponse {
    let unlocked = ApplicationStatus::parse(&application.status)
        .map(ApplicationStatus::unlocks_compliance)
        .unwrap_or(false);
    ApplicationResponse {
        id: application.id,
        job_id: application.job_id,
        status: application.status,
        cover_message: application.cover_message,
        created_at: application.created_at,
        compliance_unlocked: unlocked,
    }
}

pub async fn apply(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<ApplyRequest>,
) -> AppResult<(StatusCode, Json<ApplicationResponse>)> {
    user.require_candidate()?;

    let mut conn = state.db()?;
    let job: Job = jobs::table.find(job_id).first(&mut conn)?;
    if !job.is_active {
        return Err(AppError::bad_request("this job is no longer active"));
    }

    let new_application = NewApplication {
        id: Uuid::new_v4(),
        job_id,
        candidate_id: user.profile_id,
        status: ApplicationStatus::Pending.as_str().to_string(),
        cover_message: payload
            .cover_message
            .filter(|message| !message.trim().is_empty()),
    };

    diesel::insert_into(applications::table)
        .values(&new_application)
        .execute(&mut conn)
        .map_err(|err| error::on_unique_violation(err, "you have already applied to this job"))?;

    info!(application_id = %new_application.id, %job_id, "application submitted");

    let application: Application = applications::table
        .find(new_application.id)
        .first(&mut conn)?;
    Ok((
        StatusCode::CREATED,
        Json(to_application_response(application)),
    ))
}

#[derive(Serialize)]
pub struct MyApplicationResponse {
    #[serde(flatten)]
    pub application: ApplicationResponse,
    pub job_title: String,
    pub company_name: String,
}

pub async fn list_my_applications(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<MyApplicationResponse>>> {
    user.require_candidate()?;

    let mut conn = state.db()?;
    let rows: Vec<(Application, (Job, Company))> = applications::table
        .inner_join(jobs::table.inner_join(companies::table))
        .filter(applications::candidate_id.eq(user.profile_id))
        .order(applications::created_at.desc())
        .load(&mut conn)?;

    let response = rows
        .into_iter()
        .map(|(application, (job, company))| MyApplicationResponse {
            application: to_application_response(application),
            job_title: job.title,
            company_name: company.name,
        })
        .collect();
    Ok(Json(response))
}

#[derive(Serialize)]
pub struct ApplicantResponse {
    #[serde(flatten)]
    pub application: ApplicationResponse,
    pub candidate_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub title: Option<String>,
    pub years_experience: Option<i32>,
    pub certifications: Vec<String>,
    pub clearance_level: String,
    pub resume_url: Option<String>,
    /// Certification types with an admin-verified document, computed at
    /// read time for the badge next to each claimed certification.
    pub verified_certifications: Vec<String>,
}

pub async fn list_job_applications(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(job_id): Path<Uuid>,
) -> AppResult<Json<Vec<ApplicantResponse>>> {
    let mut conn = state.db()?;
    let job = owned_job(&mut conn, &user, job_id)?;

    let rows: Vec<(Application, (Profile, CandidateProfile))> = applications::table
        .inner_join(profiles::table.inner_join(candidate_profiles::table))
        .filter(applications::job_id.eq(job.id))
        .order(applications::created_at.desc())
        .load(&mut conn)?;

    let candidate_ids: Vec<Uuid> = rows
        .iter()
        .map(|(application, _)| application.candidate_id)
        .collect();

    let verified: Vec<(Uuid, String)> = if candidate_ids.is_empty() {
        Vec::new()
    } else {
        certification_documents::table
            .filter(certification_documents::candidate_id.eq_any(&candidate_ids))
            .filter(certification_documents::status.eq("verified"))
            .select((
                certification_documents::candidate_id,
                certification_documents::certification_type,
            ))
            .load(&mut conn)?
    };

    let mut verified_map: HashMap<Uuid, HashSet<String>> = HashMap::new();
    for (candidate_id, certification_type) in verified {
        verified_map
            .entry(candidate_id)
            .or_default()
            .insert(certification_type);
    }

    let response = rows
        .into_iter()
        .map(|(application, (profile, candidate))| {
            let verified_certifications = verified_map
                .get(&profile.id)
                .map(|set| {
                    let mut list: Vec<String> = set.iter().cloned().collect();
                    list.sort();
                    list
                })
                .unwrap_or_default();
            ApplicantResponse {
                application: to_application_response(application),
                candidate_id: profile.id,
                first_name: profile.first_name,
                last_name: profile.last_name,
                email: profile.email,
                title: candidate.title,
                years_experience: candidate.years_experience,
                certifications: candidate.certifications,
                clearance_level: candidate.clearance_level,
                resume_url: candidate.resume_url,
                verified_certifications,
            }
        })
        .collect();
    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Moves an application through the review pipeline. Transitions outside
/// the pipeline (backwards moves, or out of a terminal state) are refused.
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApplicationResponse>> {
    let target = ApplicationStatus::parse(&payload.status)
        .ok_or_else(|| AppError::bad_request("unknown application status"))?;

    let mut conn = state.db()?;
    let application: Application = applications::table.find(application_id).first(&mut conn)?;
    owned_job(&mut conn, &user, application.job_id)?;

    let current = ApplicationStatus::parse(&application.status)
        .ok_or_else(|| AppError::internal("application has an unrecognized status"))?;

    if !current.can_transition_to(target) {
        return Err(AppError::bad_request(format!(
            "cannot move application from {} to {}",
            current.as_str(),
            target.as_str()
        )));
    }

    diesel::update(applications::table.find(application_id))
        .set((
            applications::status.eq(target.as_str()),
            applications::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

    info!(
        %application_id,
        from = current.as_str(),
        to = target.as_str(),
        "application status updated"
    );

    let refreshed: Application = applications::table.find(application_id).first(&mut conn)?;
    Ok(Json(to_application_response(refreshed)))
}
