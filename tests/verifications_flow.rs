mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{acquire_db_lock, body_to_vec, TestApp};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Deserialize)]
struct DocumentBody {
    id: Uuid,
    certification_type: String,
    status: String,
    document_url: String,
}

#[derive(Deserialize)]
struct VerificationItemBody {
    id: Uuid,
    candidate_name: String,
    certification_type: String,
    status: String,
    rejection_reason: Option<String>,
}

#[derive(Deserialize)]
struct QueueBody {
    pending: Vec<VerificationItemBody>,
    recent: Vec<VerificationItemBody>,
}

async fn upload_certification(
    app: &TestApp,
    token: &str,
    certification_type: &str,
) -> Result<DocumentBody> {
    let response = app
        .upload_file(
            "/api/certifications",
            "license.pdf",
            "application/pdf",
            b"license scan",
            &[("certification_type", certification_type)],
            token,
        )
        .await?;
    let status = response.status();
    let body = body_to_vec(response.into_body()).await?;
    if status != StatusCode::CREATED {
        panic!("upload failed: {}", String::from_utf8_lossy(&body));
    }
    Ok(serde_json::from_slice(&body)?)
}

#[tokio::test]
async fn certification_upload_and_listing() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let candidate = app.signup("sro@example.com", "secret1", "candidate").await?;

    let unknown_type = app
        .upload_file(
            "/api/certifications",
            "license.pdf",
            "application/pdf",
            b"scan",
            &[("certification_type", "PADI")],
            &candidate,
        )
        .await?;
    assert_eq!(unknown_type.status(), StatusCode::BAD_REQUEST);

    let sro = upload_certification(&app, &candidate, "SRO").await?;
    assert_eq!(sro.status, "pending");
    assert_eq!(sro.certification_type, "SRO");
    assert!(sro.document_url.starts_with("https://fake-storage/certifications/"));
    assert_eq!(app.storage().object_count().await, 1);

    upload_certification(&app, &candidate, "HP").await?;

    let listing = app.get("/api/certifications", Some(&candidate)).await?;
    assert_eq!(listing.status(), StatusCode::OK);
    let documents: Vec<DocumentBody> =
        serde_json::from_slice(&body_to_vec(listing.into_body()).await?)?;
    assert_eq!(documents.len(), 2);
    // Newest first.
    assert_eq!(documents[0].certification_type, "HP");
    assert_eq!(documents[1].id, sro.id);

    // Employers have no certification locker.
    let employer = app.signup("noloc@example.com", "secret1", "employer").await?;
    let forbidden = app.get("/api/certifications", Some(&employer)).await?;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn admin_reviews_the_verification_queue() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let app = TestApp::new().await?;

    let candidate = app.signup("queue@example.com", "secret1", "candidate").await?;
    let first = upload_certification(&app, &candidate, "SRO").await?;
    let second = upload_certification(&app, &candidate, "RP").await?;

    app.insert_admin("admin@example.com", "adminpw").await?;
    let admin = app.login_token("admin@example.com", "adminpw").await?;

    // Non-admins are shut out of the review desk.
    let forbidden = app.get("/api/admin/verifications", Some(&candidate)).await?;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let queue = app.get("/api/admin/verifications", Some(&admin)).await?;
    assert_eq!(queue.status(), StatusCode::OK);
    let queue: QueueBody = serde_json::from_slice(&body_to_vec(queue.into_body()).await?)?;
    assert_eq!(queue.pending.len(), 2);
    assert!(queue.recent.is_empty());
    // Oldest first.
    assert_eq!(queue.pending[0].id, first.id);
    assert_eq!(queue.pending[0].candidate_name, "Test User");
    assert_eq!(queue.pending[0].certification_type, "SRO");
    assert_eq!(queue.pending[1].id, second.id);

    let verify = app
        .post_json(
            &format!("/api/admin/verifications/{}/verify", first.id),
            &json!({}),
            Some(&admin),
        )
        .await?;
    assert_eq!(verify.status(), StatusCode::OK);
    let verified: VerificationItemBody =
        serde_json::from_slice(&body_to_vec(verify.into_body()).await?)?;
    assert_eq!(verified.status, "verified");

    // Decisions are final.
    let again = app
        .post_json(
            &format!("/api/admin/verifications/{}/verify", first.id),
            &json!({}),
            Some(&admin),
        )
        .await?;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let no_reason = app
        .post_json(
            &format!("/api/admin/verifications/{}/reject", second.id),
            &json!({ "reason": "  " }),
            Some(&admin),
        )
        .await?;
    assert_eq!(no_reason.status(), StatusCode::BAD_REQUEST);

    let reject = app
        .post_json(
            &format!("/api/admin/verifications/{}/reject", second.id),
            &json!({ "reason": "illegible scan" }),
            Some(&admin),
        )
        .await?;
    assert_eq!(reject.status(), StatusCode::OK);
    let rejected: VerificationItemBody =
        serde_json::from_slice(&body_to_vec(reject.into_body()).await?)?;
    assert_eq!(rejected.status, "rejected");
    assert_eq!(rejected.rejection_reason.as_deref(), Some("illegible scan"));

    // Both decisions show up in the recent list, newest decision first.
    let refreshed = app.get("/api/admin/verifications", Some(&admin)).await?;
    let refreshed: QueueBody =
        serde_json::from_slice(&body_to_vec(refreshed.into_body()).await?)?;
    assert!(refreshed.pending.is_empty());
    assert_eq!(refreshed.recent.len(), 2);
    assert_eq!(refreshed.recent[0].id, second.id);
    assert_eq!(refreshed.recent[1].id, first.id);

    // The verified badge surfaces on the employer's applicant list.
    let employer = app.signup("badge@example.com", "secret1", "employer").await?;
    let create = app
        .post_json(
            "/api/jobs",
            &json!({
                "title": "Badged role",
                "description": "x",
                "location": "y",
                "contract_type": "Outage",
                "required_clearance": "None"
            }),
            Some(&employer),
        )
        .await?;
    #[derive(Deserialize)]
    struct JobBody {
        id: Uuid,
    }
    let job: JobBody = serde_json::from_slice(&body_to_vec(create.into_body()).await?)?;
    app.post_json(&format!("/api/jobs/{}/apply", job.id), &json!({}), Some(&candidate))
        .await?;

    #[derive(Deserialize)]
    struct ApplicantBody {
        verified_certifications: Vec<String>,
    }
    let applicants = app
        .get(&format!("/api/jobs/{}/applications", job.id), Some(&employer))
        .await?;
    let applicants: Vec<ApplicantBody> =
        serde_json::from_slice(&body_to_vec(applicants.into_body()).await?)?;
    assert_eq!(applicants.len(), 1);
    assert_eq!(applicants[0].verified_certifications, vec!["SRO".to_string()]);

    app.cleanup().await?;
    Ok(())
}
