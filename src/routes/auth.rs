use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::{password, AuthenticatedUser, ROLE_CANDIDATE, ROLE_EMPLOYER},
    error::{self, AppError, AppResult},
    models::{NewCandidateProfile, NewCompany, NewEmployerProfile, NewProfile, NewUser, Profile, User},
    schema::{candidate_profiles, companies, employer_profiles, profiles, users},
    state::AppState,
};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account provisioning: credentials, base profile, and the role-specific
/// extension row are created in a single transaction, so an employer can
/// never exist without their company and a candidate never without their
/// candidate row.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let email = payload.email.trim().to_lowercase();
    let first_name = payload.first_name.trim().to_string();
    let last_name = payload.last_name.trim().to_string();

    if email.is_empty() || !email.contains('@') {
        return Err(AppError::bad_request("a valid email is required"));
    }
    if payload.password.len() < 6 {
        return Err(AppError::bad_request(
            "password must be at least 6 characters",
        ));
    }
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::bad_request("first and last name are required"));
    }
    if payload.role != ROLE_CANDIDATE && payload.role != ROLE_EMPLOYER {
        return Err(AppError::bad_request(
            "role must be either candidate or employer",
        ));
    }

    let password_hash = password::hash_password(&payload.password)?;
    let user_id = Uuid::new_v4();
    let profile_id = Uuid::new_v4();

    let mut conn = state.db()?;
    let result = conn.transaction(|conn| {
        diesel::insert_into(users::table)
            .values(&NewUser {
                id: user_id,
                email: email.clone(),
                password_hash: password_hash.clone(),
            })
            .execute(conn)?;

        diesel::insert_into(profiles::table)
            .values(&NewProfile {
                id: profile_id,
                user_id,
                role: payload.role.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
            })
            .execute(conn)?;

        if payload.role == ROLE_CANDIDATE {
            diesel::insert_into(candidate_profiles::table)
                .values(&NewCandidateProfile {
                    id: profile_id,
                    clearance_level: "None".to_string(),
                })
                .execute(conn)?;
        } else {
            let company_id = Uuid::new_v4();
            diesel::insert_into(companies::table)
                .values(&NewCompany {
                    id: company_id,
                    name: format!("{first_name} {last_name}'s Company"),
                })
                .execute(conn)?;

            diesel::insert_into(employer_profiles::table)
                .values(&NewEmployerProfile {
                    id: profile_id,
                    company_id,
                })
                .execute(conn)?;
        }

        Ok::<_, diesel::result::Error>(())
    });

    result.map_err(|err| {
        error::on_unique_violation(err, "an account with this email already exists")
    })?;

    info!(%profile_id, role = %payload.role, "account provisioned");

    let access_token = state
        .jwt
        .generate_token(user_id, profile_id, &payload.role)?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.config.jwt_expiry_minutes * 60,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let mut conn = state.db()?;

    let email = payload.email.trim().to_lowercase();
    let user = match users::table
        .filter(users::email.eq(&email))
        .first::<User>(&mut conn)
    {
        Ok(user) => user,
        Err(diesel::result::Error::NotFound) => return Err(AppError::unauthorized()),
        Err(err) => return Err(AppError::from(err)),
    };

    let valid = password::verify_password(&payload.password, &user.password_hash)
        .map_err(|_| AppError::unauthorized())?;
    if !valid {
        return Err(AppError::unauthorized());
    }

    let profile: Profile = profiles::table
        .filter(profiles::user_id.eq(user.id))
        .first(&mut conn)?;

    let access_token = state
        .jwt
        .generate_token(user.id, profile.id, &profile.role)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.jwt_expiry_minutes * 60,
    }))
}

#[derive(Serialize)]
pub struct MeResponse {
    pub profile_id: Uuid,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<MeResponse>> {
    let mut conn = state.db()?;
    let profile: Profile = profiles::table.find(user.profile_id).first(&mut conn)?;

    Ok(Json(MeResponse {
        profile_id: profile.id,
        role: profile.role,
        first_name: profile.first_name,
        last_name: profile.last_name,
        email: profile.email,
    }))
}
