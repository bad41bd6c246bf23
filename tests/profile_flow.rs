mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{acquire_db_lock, body_to_vec, TestApp};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct CandidateSectionBody {
    title: Option<String>,
    clearance_level: String,
    certifications: Vec<String>,
    resume_url: Option<String>,
}

#[derive(Deserialize)]
struct CompanySectionBody {
    name: String,
}

#[derive(Deserialize)]
struct ProfileBody {
    role: String,
    first_name: String,
    candidate: Option<CandidateSectionBody>,
    company: Option<CompanySectionBody>,
}

#[tokio::test]
async fn candidate_profile_roundtrip() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let token = app.signup("profile@example.com", "secret1", "candidate").await?;

    let initial = app.get("/api/profile", Some(&token)).await?;
    assert_eq!(initial.status(), StatusCode::OK);
    let initial: ProfileBody = serde_json::from_slice(&body_to_vec(initial.into_body()).await?)?;
    assert_eq!(initial.role, "candidate");
    let section = initial.candidate.expect("candidate section");
    assert_eq!(section.clearance_level, "None");
    assert!(section.certifications.is_empty());

    let bad_clearance = app
        .put_json(
            "/api/profile",
            &json!({
                "first_name": "Jordan",
                "last_name": "Reyes",
                "candidate": { "clearance_level": "TS" }
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(bad_clearance.status(), StatusCode::BAD_REQUEST);

    let update = app
        .put_json(
            "/api/profile",
            &json!({
                "first_name": "Jordan",
                "last_name": "Reyes",
                "phone": "555-0100",
                "candidate": {
                    "title": "Senior RP Tech",
                    "years_experience": 12,
                    "certifications": ["RP", "HP"],
                    "clearance_level": "L",
                    "plant_experience": ["PWR"],
                    "willing_to_relocate": true
                }
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(update.status(), StatusCode::OK);
    let updated: ProfileBody = serde_json::from_slice(&body_to_vec(update.into_body()).await?)?;
    assert_eq!(updated.first_name, "Jordan");
    let section = updated.candidate.expect("candidate section");
    assert_eq!(section.title.as_deref(), Some("Senior RP Tech"));
    assert_eq!(section.clearance_level, "L");
    assert_eq!(section.certifications, vec!["RP", "HP"]);
    assert_eq!(section.resume_url, None);

    let resume = app
        .upload_file(
            "/api/profile/resume",
            "resume.pdf",
            "application/pdf",
            b"resume body",
            &[],
            &token,
        )
        .await?;
    assert_eq!(resume.status(), StatusCode::OK);

    let refreshed = app.get("/api/profile", Some(&token)).await?;
    let refreshed: ProfileBody =
        serde_json::from_slice(&body_to_vec(refreshed.into_body()).await?)?;
    let resume_url = refreshed
        .candidate
        .and_then(|section| section.resume_url)
        .expect("resume url recorded");
    assert!(resume_url.starts_with("https://fake-storage/resumes/"));
    assert_eq!(app.storage().object_count().await, 1);

    // Replacing the resume removes the superseded object.
    let replace = app
        .upload_file(
            "/api/profile/resume",
            "resume-v2.pdf",
            "application/pdf",
            b"newer resume",
            &[],
            &token,
        )
        .await?;
    assert_eq!(replace.status(), StatusCode::OK);
    assert_eq!(app.storage().object_count().await, 1);

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn employer_profile_updates_the_company() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let token = app.signup("owner@example.com", "secret1", "employer").await?;

    let initial = app.get("/api/profile", Some(&token)).await?;
    let initial: ProfileBody = serde_json::from_slice(&body_to_vec(initial.into_body()).await?)?;
    assert_eq!(initial.role, "employer");
    // Signup seeds a placeholder company named after the owner.
    assert_eq!(
        initial.company.expect("company section").name,
        "Test User's Company"
    );

    let blank_name = app
        .put_json(
            "/api/profile",
            &json!({
                "first_name": "Test",
                "last_name": "User",
                "company": { "name": "   " }
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(blank_name.status(), StatusCode::BAD_REQUEST);

    let update = app
        .put_json(
            "/api/profile",
            &json!({
                "first_name": "Test",
                "last_name": "User",
                "company": {
                    "name": "Meridian Outage Services",
                    "location": "Charlotte, NC"
                }
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(update.status(), StatusCode::OK);
    let updated: ProfileBody = serde_json::from_slice(&body_to_vec(update.into_body()).await?)?;
    assert_eq!(
        updated.company.expect("company section").name,
        "Meridian Outage Services"
    );

    // Employers have no resume slot.
    let resume = app
        .upload_file(
            "/api/profile/resume",
            "resume.pdf",
            "application/pdf",
            b"nope",
            &[],
            &token,
        )
        .await?;
    assert_eq!(resume.status(), StatusCode::FORBIDDEN);

    app.cleanup().await?;
    Ok(())
}
