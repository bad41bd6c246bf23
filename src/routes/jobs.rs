use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    domain,
    error::{AppError, AppResult},
    models::{
        Company, ComplianceRequirement, EmployerProfile, Job, NewComplianceRequirement, NewJob,
    },
    schema::{applications, companies, compliance_requirements, employer_profiles, jobs},
    state::AppState,
};

/// The company an employer posts for. Missing linkage is a validation
/// error, not a silent default.
pub(crate) fn employer_company_id(
    conn: &mut PgConnection,
    profile_id: Uuid,
) -> AppResult<Uuid> {
    let employer = employer_profiles::table
        .find(profile_id)
        .first::<EmployerProfile>(conn)
        .optional()?;
    match employer {
        Some(employer) => Ok(employer.company_id),
        None => Err(AppError::bad_request(
            "no company associated with your profile",
        )),
    }
}

/// Loads a job and checks the authenticated employer's company owns it.
pub(crate) fn owned_job(
    conn: &mut PgConnection,
    user: &AuthenticatedUser,
    job_id: Uuid,
) -> AppResult<Job> {
    user.require_employer()?;
    let company_id = employer_company_id(conn, user.profile_id)?;
    let job: Job = jobs::table.find(job_id).first(conn)?;
    if job.company_id != company_id {
        return Err(AppError::not_found());
    }
    Ok(job)
}

#[derive(Serialize)]
pub struct CompanySummary {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
}

impl From<Company> for CompanySummary {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            location: company.location,
        }
    }
}

#[derive(Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub remote: bool,
    pub contract_type: String,
    pub plant_type: Option<String>,
    pub nrc_region: Option<String>,
    pub required_certifications: Vec<String>,
    pub required_clearance: String,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub duration: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub company: CompanySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_count: Option<i64>,
}

fn to_job_response(job: Job, company: Company, application_count: Option<i64>) -> JobResponse {
    JobResponse {
        id: job.id,
        title: job.title,
        description: job.description,
        location: job.location,
        remote: job.remote,
        contract_type: job.contract_type,
        plant_type: job.plant_type,
        nrc_region: job.nrc_region,
        required_certifications: job.required_certifications,
        required_clearance: job.required_clearance,
        min_rate: job.min_rate,
        max_rate: job.max_rate,
        start_date: job.start_date,
        duration: job.duration,
        is_active: job.is_active,
        created_at: job.created_at,
        company: company.into(),
        application_count,
    }
}

#[derive(Deserialize)]
pub struct JobFilters {
    pub contract_type: Option<String>,
    pub plant_type: Option<String>,
    pub clearance: Option<String>,
}

/// Candidates browse active postings with equality filters; employers see
/// every posting of their own company with applicant counts.
pub async fn list_jobs(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filters): Query<JobFilters>,
) -> AppResult<Json<Vec<JobResponse>>> {
    let mut conn = state.db()?;

    if user.is_employer() {
        let company_id = employer_company_id(&mut conn, user.profile_id)?;
        let rows: Vec<(Job, Company)> = jobs::table
            .inner_join(companies::table)
            .filter(jobs::company_id.eq(company_id))
            .order(jobs::created_at.desc())
            .load(&mut conn)?;

        let counts: Vec<(Uuid, i64)> = applications::table
            .inner_join(jobs::table)
            .filter(jobs::company_id.eq(company_id))
            .group_by(applications::job_id)
            .select((applications::job_id, count_star()))
            .load(&mut conn)?;
        let counts: HashMap<Uuid, i64> = counts.into_iter().collect();

        let response = rows
            .into_iter()
            .map(|(job, company)| {
                let count = counts.get(&job.id).copied().unwrap_or(0);
                to_job_response(job, company, Some(count))
            })
            .collect();
        return Ok(Json(response));
    }

    let mut query = jobs::table
        .inner_join(companies::table)
        .filter(jobs::is_active.eq(true))
        .into_boxed();

    if let Some(contract_type) = &filters.contract_type {
        query = query.filter(jobs::contract_type.eq(contract_type.clone()));
    }
    if let Some(plant_type) = &filters.plant_type {
        query = query.filter(jobs::plant_type.eq(plant_type.clone()));
    }
    if let Some(clearance) = &filters.clearance {
        // "None" means no clearance requirement, so it is not a filter.
        if clearance != "None" {
            query = query.filter(jobs::required_clearance.eq(clearance.clone()));
        }
    }

    let rows: Vec<(Job, Company)> = query.order(jobs::created_at.desc()).load(&mut conn)?;
    let response = rows
        .into_iter()
        .map(|(job, company)| to_job_response(job, company, None))
        .collect();
    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct RequirementDraft {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub required: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub remote: bool,
    pub contract_type: String,
    pub plant_type: Option<String>,
    pub nrc_region: Option<String>,
    #[serde(default)]
    pub required_certifications: Vec<String>,
    pub required_clearance: String,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub duration: Option<String>,
    #[serde(default)]
    pub compliance_requirements: Vec<RequirementDraft>,
}

/// Posts a job together with its compliance checklist. Requirement drafts
/// with blank names are dropped; the job row and the surviving requirement
/// rows are inserted in one transaction.
pub async fn create_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateJobRequest>,
) -> AppResult<(StatusCode, Json<JobResponse>)> {
    user.require_employer()?;

    if payload.title.trim().is_empty() {
        return Err(AppError::bad_request("title must not be empty"));
    }
    if payload.description.trim().is_empty() {
        return Err(AppError::bad_request("description must not be empty"));
    }
    if payload.location.trim().is_empty() {
        return Err(AppError::bad_request("location must not be empty"));
    }
    if !domain::is_contract_type(&payload.contract_type) {
        return Err(AppError::bad_request("unknown contract type"));
    }
    if let Some(plant_type) = &payload.plant_type {
        if !domain::is_plant_type(plant_type) {
            return Err(AppError::bad_request("unknown plant type"));
        }
    }
    if let Some(region) = &payload.nrc_region {
        if !domain::is_nrc_region(region) {
            return Err(AppError::bad_request("unknown NRC region"));
        }
    }
    if !domain::is_clearance_level(&payload.required_clearance) {
        return Err(AppError::bad_request("unknown clearance level"));
    }
    if let Some(cert) = payload
        .required_certifications
        .iter()
        .find(|value| !domain::is_certification(value))
    {
        return Err(AppError::bad_request(format!(
            "unknown certification: {cert}"
        )));
    }
    if let (Some(min), Some(max)) = (payload.min_rate, payload.max_rate) {
        if min > max {
            return Err(AppError::bad_request("min_rate must not exceed max_rate"));
        }
    }

    let mut conn = state.db()?;
    let company_id = employer_company_id(&mut conn, user.profile_id)?;
    let job_id = Uuid::new_v4();

    let drafts: Vec<&RequirementDraft> = payload
        .compliance_requirements
        .iter()
        .filter(|draft| !draft.name.trim().is_empty())
        .collect();

    conn.transaction(|conn| {
        let new_job = NewJob {
            id: job_id,
            company_id,
            posted_by: user.profile_id,
            title: payload.title.trim().to_string(),
            description: payload.description.clone(),
            location: payload.location.trim().to_string(),
            remote: payload.remote,
            contract_type: payload.contract_type.clone(),
            plant_type: payload.plant_type.clone(),
            nrc_region: payload.nrc_region.clone(),
            required_certifications: payload.required_certifications.clone(),
            required_clearance: payload.required_clearance.clone(),
            min_rate: payload.min_rate,
            max_rate: payload.max_rate,
            start_date: payload.start_date,
            duration: payload.duration.clone(),
        };
        diesel::insert_into(jobs::table)
            .values(&new_job)
            .execute(conn)?;

        let new_requirements: Vec<NewComplianceRequirement> = drafts
            .iter()
            .map(|draft| NewComplianceRequirement {
                id: Uuid::new_v4(),
                job_id,
                name: draft.name.trim().to_string(),
                description: draft
                    .description
                    .as_ref()
                    .filter(|value| !value.trim().is_empty())
                    .cloned(),
                required: draft.required,
            })
            .collect();

        if !new_requirements.is_empty() {
            diesel::insert_into(compliance_requirements::table)
                .values(&new_requirements)
                .execute(conn)?;
        }

        Ok::<_, diesel::result::Error>(())
    })?;

    info!(%job_id, %company_id, requirements = drafts.len(), "job posted");

    let job: Job = jobs::table.find(job_id).first(&mut conn)?;
    let company: Company = companies::table.find(company_id).first(&mut conn)?;
    Ok((
        StatusCode::CREATED,
        Json(to_job_response(job, company, Some(0))),
    ))
}

#[derive(Serialize)]
pub struct RequirementResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
}

impl From<ComplianceRequirement> for RequirementResponse {
    fn from(requirement: ComplianceRequirement) -> Self {
        Self {
            id: requirement.id,
            name: requirement.name,
            description: requirement.description,
            required: requirement.required,
        }
    }
}

#[derive(Serialize)]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub job: JobResponse,
    pub compliance_requirements: Vec<RequirementResponse>,
}

pub async fn get_job(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(job_id): Path<Uuid>,
) -> AppResult<Json<JobDetailResponse>> {
    let mut conn = state.db()?;
    let job: Job = jobs::table.find(job_id).first(&mut conn)?;
    let company: Company = companies::table.find(job.company_id).first(&mut conn)?;

    let requirements: Vec<ComplianceRequirement> = compliance_requirements::table
        .filter(compliance_requirements::job_id.eq(job_id))
        .order(compliance_requirements::created_at.asc())
        .load(&mut conn)?;

    Ok(Json(JobDetailResponse {
        job: to_job_response(job, company, None),
        compliance_requirements: requirements.into_iter().map(Into::into).collect(),
    }))
}

#[derive(Deserialize)]
pub struct UpdateJobRequest {
    pub is_active: bool,
}

pub async fn update_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<UpdateJobRequest>,
) -> AppResult<Json<JobResponse>> {
    let mut conn = state.db()?;
    let job = owned_job(&mut conn, &user, job_id)?;

    diesel::update(jobs::table.find(job.id))
        .set((
            jobs::is_active.eq(payload.is_active),
            jobs::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

    let job: Job = jobs::table.find(job_id).first(&mut conn)?;
    let company: Company = companies::table.find(job.company_id).first(&mut conn)?;
    Ok(Json(to_job_response(job, company, None)))
}
