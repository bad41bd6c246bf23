use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    auth::{AuthenticatedUser, ROLE_CANDIDATE, ROLE_EMPLOYER},
    domain,
    error::{AppError, AppResult},
    models::{CandidateProfile, Company, EmployerProfile, Profile},
    schema::{candidate_profiles, companies, employer_profiles, profiles},
    state::AppState,
    uploads,
};

#[derive(Serialize)]
pub struct CandidateSection {
    pub title: Option<String>,
    pub years_experience: Option<i32>,
    pub certifications: Vec<String>,
    pub clearance_level: String,
    pub plant_experience: Vec<String>,
    pub desired_rate: Option<f64>,
    pub available_date: Option<NaiveDate>,
    pub willing_to_relocate: bool,
    pub resume_url: Option<String>,
}

#[derive(Serialize)]
pub struct CompanySection {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: uuid::Uuid,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<CandidateSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanySection>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<ProfileResponse>> {
    let mut conn = state.db()?;
    let profile: Profile = profiles::table.find(user.profile_id).first(&mut conn)?;
    let response = build_profile_response(&mut conn, profile)?;
    Ok(Json(response))
}

fn build_profile_response(
    conn: &mut PgConnection,
    profile: Profile,
) -> AppResult<ProfileResponse> {
    let mut response = ProfileResponse {
        id: profile.id,
        role: profile.role.clone(),
        first_name: profile.first_name,
        last_name: profile.last_name,
        email: profile.email,
        phone: profile.phone,
        location: profile.location,
        bio: profile.bio,
        candidate: None,
        company: None,
    };

    if profile.role == ROLE_CANDIDATE {
        let candidate: CandidateProfile =
            candidate_profiles::table.find(profile.id).first(conn)?;
        response.candidate = Some(CandidateSection {
            title: candidate.title,
            years_experience: candidate.years_experience,
            certifications: candidate.certifications,
            clearance_level: candidate.clearance_level,
            plant_experience: candidate.plant_experience,
            desired_rate: candidate.desired_rate,
            available_date: candidate.available_date,
            willing_to_relocate: candidate.willing_to_relocate,
            resume_url: candidate.resume_url,
        });
    } else if profile.role == ROLE_EMPLOYER {
        let employer: EmployerProfile =
            employer_profiles::table.find(profile.id).first(conn)?;
        let company: Company = companies::table.find(employer.company_id).first(conn)?;
        response.company = Some(CompanySection {
            id: company.id,
            name: company.name,
            description: company.description,
            website: company.website,
            location: company.location,
        });
    }

    Ok(response)
}

#[derive(Deserialize)]
pub struct CandidateUpdate {
    pub title: Option<String>,
    pub years_experience: Option<i32>,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub clearance_level: String,
    #[serde(default)]
    pub plant_experience: Vec<String>,
    pub desired_rate: Option<f64>,
    pub available_date: Option<NaiveDate>,
    #[serde(default)]
    pub willing_to_relocate: bool,
}

#[derive(Deserialize)]
pub struct CompanyUpdate {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub candidate: Option<CandidateUpdate>,
    pub company: Option<CompanyUpdate>,
}

/// Saves the base profile and, depending on role, either the candidate
/// extension or the employer's company, in one transaction.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let first_name = payload.first_name.trim().to_string();
    let last_name = payload.last_name.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::bad_request("first and last name are required"));
    }

    if let Some(candidate) = &payload.candidate {
        if !domain::is_clearance_level(&candidate.clearance_level) {
            return Err(AppError::bad_request("unknown clearance level"));
        }
        if let Some(cert) = candidate
            .certifications
            .iter()
            .find(|value| !domain::is_certification(value))
        {
            return Err(AppError::bad_request(format!(
                "unknown certification: {cert}"
            )));
        }
        if let Some(plant) = candidate
            .plant_experience
            .iter()
            .find(|value| !domain::is_plant_type(value))
        {
            return Err(AppError::bad_request(format!("unknown plant type: {plant}")));
        }
    }
    if let Some(company) = &payload.company {
        if company.name.trim().is_empty() {
            return Err(AppError::bad_request("company name must not be empty"));
        }
    }

    let mut conn = state.db()?;
    let profile: Profile = profiles::table.find(user.profile_id).first(&mut conn)?;
    let now = Utc::now().naive_utc();

    conn.transaction(|conn| {
        diesel::update(profiles::table.find(profile.id))
            .set((
                profiles::first_name.eq(&first_name),
                profiles::last_name.eq(&last_name),
                profiles::phone.eq(&payload.phone),
                profiles::location.eq(&payload.location),
                profiles::bio.eq(&payload.bio),
                profiles::updated_at.eq(now),
            ))
            .execute(conn)?;

        if profile.role == ROLE_CANDIDATE {
            if let Some(candidate) = &payload.candidate {
                diesel::update(candidate_profiles::table.find(profile.id))
                    .set((
                        candidate_profiles::title.eq(&candidate.title),
                        candidate_profiles::years_experience.eq(candidate.years_experience),
                        candidate_profiles::certifications.eq(&candidate.certifications),
                        candidate_profiles::clearance_level.eq(&candidate.clearance_level),
                        candidate_profiles::plant_experience.eq(&candidate.plant_experience),
                        candidate_profiles::desired_rate.eq(candidate.desired_rate),
                        candidate_profiles::available_date.eq(candidate.available_date),
                        candidate_profiles::willing_to_relocate
                            .eq(candidate.willing_to_relocate),
                    ))
                    .execute(conn)?;
            }
        } else if profile.role == ROLE_EMPLOYER {
            if let Some(company) = &payload.company {
                let employer: EmployerProfile =
                    employer_profiles::table.find(profile.id).first(conn)?;
                diesel::update(companies::table.find(employer.company_id))
                    .set((
                        companies::name.eq(company.name.trim()),
                        companies::description.eq(&company.description),
                        companies::website.eq(&company.website),
                        companies::location.eq(&company.location),
                        companies::updated_at.eq(now),
                    ))
                    .execute(conn)?;
            }
        }

        Ok::<_, diesel::result::Error>(())
    })?;

    let refreshed: Profile = profiles::table.find(user.profile_id).first(&mut conn)?;
    let response = build_profile_response(&mut conn, refreshed)?;
    Ok(Json(response))
}

#[derive(Serialize)]
pub struct ResumeResponse {
    pub resume_url: String,
}

pub async fn upload_resume(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<Json<ResumeResponse>> {
    user.require_candidate()?;

    let (file, _fields) = uploads::read_multipart(multipart).await?;
    let file = uploads::require_file(file)?;
    let content_type = uploads::resolve_content_type(&file);

    let key = format!(
        "resumes/{}/resume_{}.{}",
        user.profile_id,
        uploads::upload_stamp(),
        uploads::file_extension(&file.filename)
    );

    state
        .storage
        .put_object(&key, file.bytes, content_type)
        .await
        .map_err(|err| {
            error!(error = %err, key = %key, "failed to store resume");
            AppError::internal(format!("failed to store resume: {err}"))
        })?;

    let resume_url = state.storage.public_url(&key);

    let mut conn = state.db()?;
    let previous_url: Option<Option<String>> = candidate_profiles::table
        .find(user.profile_id)
        .select(candidate_profiles::resume_url)
        .first(&mut conn)
        .optional()?;

    diesel::update(candidate_profiles::table.find(user.profile_id))
        .set(candidate_profiles::resume_url.eq(&resume_url))
        .execute(&mut conn)?;

    // Replacing a resume orphans the previous object; best-effort delete.
    if let Some(Some(old_url)) =
        previous_url.filter(|old| old.as_deref() != Some(resume_url.as_str()))
    {
        let prefix = state.storage.public_url("");
        if let Some(old_key) = old_url.strip_prefix(&prefix) {
            if let Err(err) = state.storage.delete_object(old_key).await {
                warn!(error = %err, key = %old_key, "failed to delete replaced resume");
            }
        }
    }

    Ok(Json(ResumeResponse { resume_url }))
}
