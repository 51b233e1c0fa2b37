mod common;

use axum::http::StatusCode;
use serde_json::{json, Value as JsonValue};

use common::{send, test_app};

fn assessment_body(job_id: &str) -> JsonValue {
    json!({
        "jobId": job_id,
        "title": "Frontend Screening",
        "sections": [{
            "id": "section-1",
            "title": "Basics",
            "questions": [
                {
                    "id": "q1",
                    "type": "single-choice",
                    "title": "Do you know React?",
                    "required": true,
                    "options": ["Yes", "No"]
                },
                {
                    "id": "q2",
                    "type": "short-text",
                    "title": "Which version?",
                    "required": true,
                    "validation": { "minLength": 2, "maxLength": 10 },
                    "condition": { "dependsOn": "q1", "value": "Yes" }
                },
                {
                    "id": "q3",
                    "type": "numeric",
                    "title": "Years of experience",
                    "required": false,
                    "validation": { "min": 0, "max": 50 }
                }
            ]
        }]
    })
}

fn scores(each: u32) -> JsonValue {
    json!({ "aptitude": each, "communication": each, "subjective": each, "coding": each })
}

#[tokio::test]
async fn assessment_create_read_replace() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, "GET", "/api/assessments/job-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let mut no_sections = assessment_body("job-1");
    no_sections["sections"] = json!([]);
    let (status, body) = send(&app, "POST", "/api/assessments", Some(no_sections)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["sections"], "At least one section is required");

    let mut blank_title = assessment_body("job-1");
    blank_title["title"] = json!("  ");
    let (status, body) = send(&app, "POST", "/api/assessments", Some(blank_title)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["title"], "Assessment title is required");

    let (status, created) = send(&app, "POST", "/api/assessments", Some(assessment_body("job-1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (_, fetched) = send(&app, "GET", "/api/assessments/job-1", None).await;
    assert_eq!(fetched["id"], id.as_str());
    assert_eq!(fetched["sections"][0]["questions"].as_array().unwrap().len(), 3);

    let mut replacement = assessment_body("some-other-job");
    replacement["title"] = json!("Frontend Screening v2");
    let (status, replaced) = send(&app, "PUT", "/api/assessments/job-1", Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], id.as_str());
    assert_eq!(replaced["jobId"], "job-1");
    assert_eq!(replaced["createdAt"], created["createdAt"]);

    let (_, other) = send(&app, "GET", "/api/assessments/some-other-job", None).await;
    assert!(other.is_null());
}

fn multi_section_body(job_id: &str, id: &str, title: &str) -> JsonValue {
    json!({
        "id": id,
        "jobId": job_id,
        "title": title,
        "domain": "Engineering",
        "sections": [
            {
                "id": "section-1",
                "title": "Background",
                "questions": [
                    {
                        "id": "q1",
                        "type": "single-choice",
                        "title": "Primary language?",
                        "required": true,
                        "options": ["Rust", "Go", "Other"],
                        "correctAnswer": 0
                    },
                    {
                        "id": "q2",
                        "type": "short-text",
                        "title": "Which other language?",
                        "required": false,
                        "validation": { "minLength": 2, "maxLength": 40 },
                        "condition": { "dependsOn": "q1", "value": "Other" }
                    },
                    {
                        "id": "q3",
                        "type": "multi-choice",
                        "title": "Frameworks used",
                        "required": false,
                        "options": ["axum", "actix", "rocket"]
                    }
                ]
            },
            {
                "id": "section-2",
                "title": "Experience",
                "questions": [
                    {
                        "id": "q4",
                        "type": "numeric",
                        "title": "Years of experience",
                        "required": true,
                        "validation": { "min": 1, "max": 40 }
                    },
                    {
                        "id": "q5",
                        "type": "long-text",
                        "title": "Why not Go?",
                        "required": false,
                        "conditional": { "dependsOn": "q1", "condition": "not_equals", "value": "Go" }
                    },
                    {
                        "id": "q6",
                        "type": "file-upload",
                        "title": "Resume",
                        "required": false
                    }
                ]
            }
        ]
    })
}

#[tokio::test]
async fn multi_section_assessment_round_trips() {
    let (app, _) = test_app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/assessments",
        Some(multi_section_body("job-7", "a1", "Old")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["sections"].as_array().unwrap().len(), 2);
    let rich = &created["sections"][1]["questions"][1]["condition"];
    assert_eq!(rich["dependsOn"], "q1");
    assert_eq!(rich["condition"], "not_equals");

    let (_, fetched) = send(&app, "GET", "/api/assessments/job-7", None).await;
    assert_eq!(fetched["sections"], created["sections"]);
    assert_eq!(fetched["domain"], "Engineering");

    let mut edited = multi_section_body("job-7", "a2", "New");
    edited["sections"] = fetched["sections"].clone();
    let (status, replaced) = send(&app, "PUT", "/api/assessments/job-7", Some(edited)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["id"], "a1");

    let (_, refetched) = send(&app, "GET", "/api/assessments/job-7", None).await;
    assert_eq!(refetched["id"], "a1");
    assert_eq!(refetched["title"], "New");
    assert_eq!(refetched["sections"], created["sections"]);
}

#[tokio::test]
async fn evaluate_applies_visibility_and_validation() {
    let (app, _) = test_app().await;
    send(&app, "POST", "/api/assessments", Some(assessment_body("job-1"))).await;

    let (status, result) = send(
        &app,
        "POST",
        "/api/assessments/job-1/evaluate",
        Some(json!({ "responses": { "q1": "No", "q3": "75" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["visibleQuestionIds"], json!(["q1", "q3"]));
    assert_eq!(result["valid"], false);
    assert_eq!(result["errors"]["q2"], "This field is required");
    assert_eq!(result["errors"]["q3"], "Maximum value is 50");

    let (_, result) = send(
        &app,
        "POST",
        "/api/assessments/job-1/evaluate",
        Some(json!({ "responses": { "q1": "Yes", "q2": "18", "q3": "4" } })),
    )
    .await;
    assert_eq!(result["visibleQuestionIds"], json!(["q1", "q2", "q3"]));
    assert_eq!(result["valid"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/api/assessments/missing/evaluate",
        Some(json!({ "responses": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn draft_then_submit_then_qualification() {
    let (app, _) = test_app().await;
    send(&app, "POST", "/api/assessments", Some(assessment_body("job-1"))).await;

    let (status, draft) = send(&app, "GET", "/api/assessments/job-1/responses/cand-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["status"], "not-started");

    let (status, draft) = send(
        &app,
        "PATCH",
        "/api/assessments/job-1/responses/cand-1",
        Some(json!({ "questionId": "q1", "value": "Yes" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["status"], "in-progress");
    assert_eq!(draft["visibleQuestionIds"], json!(["q1", "q2", "q3"]));

    let (status, body) = send(
        &app,
        "POST",
        "/api/assessments/job-1/submit",
        Some(json!({ "candidateId": "cand-1", "categoryScores": scores(78) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["q2"], "This field is required");

    let (_, draft) = send(&app, "GET", "/api/assessments/job-1/responses/cand-1", None).await;
    assert_eq!(draft["errors"]["q2"], "This field is required");

    let (_, draft) = send(
        &app,
        "PATCH",
        "/api/assessments/job-1/responses/cand-1",
        Some(json!({ "questionId": "q2", "value": "18" })),
    )
    .await;
    assert!(draft["errors"].get("q2").is_none());

    let (status, submission) = send(
        &app,
        "POST",
        "/api/assessments/job-1/submit",
        Some(json!({
            "candidateId": "cand-1",
            "categoryScores": { "aptitude": 80, "communication": 70, "subjective": 75, "coding": 85 },
            "timeSpent": 42
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(submission["scores"]["overall"], 78);
    assert_eq!(submission["status"], "completed");
    assert_eq!(submission["responses"]["q2"], "18");

    let (_, draft) = send(&app, "GET", "/api/assessments/job-1/responses/cand-1", None).await;
    assert_eq!(draft["status"], "completed");
    let (status, _) = send(
        &app,
        "PATCH",
        "/api/assessments/job-1/responses/cand-1",
        Some(json!({ "questionId": "q1", "value": "No" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, result) = send(&app, "GET", "/api/submissions/cand-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["qualified"], true);
    assert_eq!(result["timeSpent"], 42);

    let (status, _) = send(
        &app,
        "POST",
        "/api/assessments/job-1/submit",
        Some(json!({
            "candidateId": "cand-1",
            "responses": { "q1": "Yes", "q2": "18" },
            "categoryScores": scores(90)
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/api/assessments/job-1/submit",
        Some(json!({
            "candidateId": "cand-2",
            "responses": { "q1": "Yes", "q2": "18" },
            "categoryScores": scores(50)
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, result) = send(&app, "GET", "/api/submissions/cand-2", None).await;
    assert_eq!(result["qualified"], false);
    assert_eq!(result["scores"]["overall"], 50);

    let (_, all) = send(&app, "GET", "/api/submissions?jobId=job-1", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, "GET", "/api/submissions/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, notifications) = send(&app, "GET", "/api/notifications", None).await;
    let notifications = notifications.as_array().unwrap();
    let levels: Vec<&str> = notifications
        .iter()
        .map(|n| n["level"].as_str().unwrap())
        .collect();
    assert_eq!(levels, vec!["success", "error", "success"]);

    let id = notifications[0]["id"].as_u64().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("/api/notifications/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &format!("/api/notifications/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn out_of_range_scores_are_rejected() {
    let (app, _) = test_app().await;
    send(&app, "POST", "/api/assessments", Some(assessment_body("job-1"))).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/assessments/job-1/submit",
        Some(json!({
            "candidateId": "cand-9",
            "responses": { "q1": "Yes", "q2": "18" },
            "categoryScores": { "aptitude": 101, "communication": 70, "subjective": 70, "coding": 70 }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["categoryScores.aptitude"].is_string());
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, doc) = send(&app, "GET", "/api/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["info"]["title"], "TalentFlow API");
    assert!(doc["paths"]["/api/jobs/{id}/reorder"].is_object());
}
