use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::*;

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = profiles)]
#[diesel(belongs_to(User))]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = candidate_profiles)]
pub struct CandidateProfile {
    pub id: Uuid,
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

#[derive(Debug, Insertable)]
#[diesel(table_name = candidate_profiles)]
pub struct NewCandidateProfile {
    pub id: Uuid,
    pub clearance_level: String,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = employer_profiles)]
pub struct EmployerProfile {
    pub id: Uuid,
    pub company_id: Uuid,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = employer_profiles)]
pub struct NewEmployerProfile {
    pub id: Uuid,
    pub company_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = companies)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = companies)]
pub struct NewCompany {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = jobs)]
#[diesel(belongs_to(Company))]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub posted_by: Uuid,
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
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = jobs)]
pub struct NewJob {
    pub id: Uuid,
    pub company_id: Uuid,
    pub posted_by: Uuid,
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
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = applications)]
#[diesel(belongs_to(Job))]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub status: String,
    pub cover_message: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = applications)]
pub struct NewApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub status: String,
    pub cover_message: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = certification_documents)]
pub struct CertificationDocument {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub certification_type: String,
    pub document_url: String,
    pub status: String,
    pub expiration_date: Option<NaiveDate>,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<NaiveDateTime>,
    pub rejection_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = certification_documents)]
pub struct NewCertificationDocument {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub certification_type: String,
    pub document_url: String,
    pub status: String,
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = compliance_requirements)]
#[diesel(belongs_to(Job))]
pub struct ComplianceRequirement {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = compliance_requirements)]
pub struct NewComplianceRequirement {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = compliance_submissions)]
#[diesel(belongs_to(ComplianceRequirement, foreign_key = requirement_id))]
#[diesel(belongs_to(Application))]
pub struct ComplianceSubmission {
    pub id: Uuid,
    pub requirement_id: Uuid,
    pub application_id: Uuid,
    pub document_url: String,
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<NaiveDateTime>,
    pub rejection_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = compliance_submissions)]
pub struct NewComplianceSubmission {
    pub id: Uuid,
    pub requirement_id: Uuid,
    pub application_id: Uuid,
    pub document_url: String,
    pub status: String,
}
