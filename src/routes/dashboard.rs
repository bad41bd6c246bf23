use axum::{extract::State, Json};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    domain::{self, ApplicationStatus, ExpiryState},
    error::AppResult,
    models::{Application, CertificationDocument, Company, Job, Profile},
    routes::jobs::employer_company_id,
    schema::{applications, certification_documents, companies, jobs, profiles, users},
    state::AppState,
};

#[derive(Serialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub contract_type: String,
    pub company_name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize)]
pub struct ExpiringDocument {
    pub id: Uuid,
    pub certification_type: String,
    pub expiration_date: NaiveDate,
}

#[derive(Serialize)]
pub struct CandidateDashboard {
    pub total_applications: i64,
    pub shortlisted_applications: i64,
    pub recent_jobs: Vec<JobSummary>,
    pub expired_certifications: Vec<ExpiringDocument>,
    pub expiring_soon_certifications: Vec<ExpiringDocument>,
}

#[derive(Serialize)]
pub struct ApplicationSummary {
    pub id: Uuid,
    pub job_title: String,
    pub candidate_name: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize)]
pub struct EmployerDashboard {
    pub active_jobs: i64,
    pub pending_applications: i64,
    pub recent_applications: Vec<ApplicationSummary>,
}

#[derive(Serialize)]
pub struct AdminDashboard {
    pub total_users: i64,
    pub total_jobs: i64,
    pub total_applications: i64,
    pub pending_verifications: i64,
}

#[derive(Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardResponse {
    Candidate(CandidateDashboard),
    Employer(EmployerDashboard),
    Admin(AdminDashboard),
}

pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<DashboardResponse>> {
    let mut conn = state.db()?;

    if user.is_candidate() {
        return Ok(Json(DashboardResponse::Candidate(candidate_dashboard(
            &mut conn,
            user.profile_id,
        )?)));
    }
    if user.is_employer() {
        return Ok(Json(DashboardResponse::Employer(employer_dashboard(
            &mut conn,
            user.profile_id,
        )?)));
    }

    user.require_admin()?;
    Ok(Json(DashboardResponse::Admin(admin_dashboard(&mut conn)?)))
}

fn candidate_dashboard(
    conn: &mut PgConnection,
    profile_id: Uuid,
) -> AppResult<CandidateDashboard> {
    let total_applications: i64 = applications::table
        .filter(applications::candidate_id.eq(profile_id))
        .select(count_star())
        .first(conn)?;

    let shortlisted_applications: i64 = applications::table
        .filter(applications::candidate_id.eq(profile_id))
        .filter(applications::status.eq_any(vec![
            ApplicationStatus::Shortlisted.as_str(),
            ApplicationStatus::Accepted.as_str(),
        ]))
        .select(count_star())
        .first(conn)?;

    let recent: Vec<(Job, Company)> = jobs::table
        .inner_join(companies::table)
        .filter(jobs::is_active.eq(true))
        .order(jobs::created_at.desc())
        .limit(5)
        .load(conn)?;
    let recent_jobs = recent
        .into_iter()
        .map(|(job, company)| JobSummary {
            id: job.id,
            title: job.title,
            location: job.location,
            contract_type: job.contract_type,
            company_name: company.name,
            created_at: job.created_at,
        })
        .collect();

    // Expiration is a read-time projection over verified documents; a
    // document lands in exactly one of the two lists, or neither.
    let verified: Vec<CertificationDocument> = certification_documents::table
        .filter(certification_documents::candidate_id.eq(profile_id))
        .filter(certification_documents::status.eq("verified"))
        .load(conn)?;

    let today = Utc::now().date_naive();
    let mut expired = Vec::new();
    let mut expiring_soon = Vec::new();
    for document in verified {
        let Some(expiration_date) = document.expiration_date else {
            continue;
        };
        let entry = ExpiringDocument {
            id: document.id,
            certification_type: document.certification_type,
            expiration_date,
        };
        match domain::classify_expiry(expiration_date, today) {
            ExpiryState::Expired => expired.push(entry),
            ExpiryState::ExpiringSoon => expiring_soon.push(entry),
            ExpiryState::Current => {}
        }
    }
    expired.sort_by_key(|entry| entry.expiration_date);
    expiring_soon.sort_by_key(|entry| entry.expiration_date);

    Ok(CandidateDashboard {
        total_applications,
        shortlisted_applications,
        recent_jobs,
        expired_certifications: expired,
        expiring_soon_certifications: expiring_soon,
    })
}

fn employer_dashboard(conn: &mut PgConnection, profile_id: Uuid) -> AppResult<EmployerDashboard> {
    let company_id = employer_company_id(conn, profile_id)?;

    let active_jobs: i64 = jobs::table
        .filter(jobs::company_id.eq(company_id))
        .filter(jobs::is_active.eq(true))
        .select(count_star())
        .first(conn)?;

    let pending_applications: i64 = applications::table
        .inner_join(jobs::table)
        .filter(jobs::company_id.eq(company_id))
        .filter(applications::status.eq(ApplicationStatus::Pending.as_str()))
        .select(count_star())
        .first(conn)?;

    let recent: Vec<(Application, Job, Profile)> = applications::table
        .inner_join(jobs::table)
        .inner_join(profiles::table)
        .filter(jobs::company_id.eq(company_id))
        .order(applications::created_at.desc())
        .limit(5)
        .load(conn)?;

    let recent_applications = recent
        .into_iter()
        .map(|(application, job, profile)| ApplicationSummary {
            id: application.id,
            job_title: job.title,
            candidate_name: format!("{} {}", profile.first_name, profile.last_name),
            status: application.status,
            created_at: application.created_at,
        })
        .collect();

    Ok(EmployerDashboard {
        active_jobs,
        pending_applications,
        recent_applications,
    })
}

fn admin_dashboard(conn: &mut PgConnection) -> AppResult<AdminDashboard> {
    let total_users: i64 = users::table.select(count_star()).first(conn)?;
    let total_jobs: i64 = jobs::table.select(count_star()).first(conn)?;
    let total_applications: i64 = applications::table.select(count_star()).first(conn)?;
    let pending_verifications: i64 = certification_documents::table
        .filter(certification_documents::status.eq("pending"))
        .select(count_star())
        .first(conn)?;

    Ok(AdminDashboard {
        total_users,
        total_jobs,
        total_applications,
        pending_verifications,
    })
}
