use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::authenticate;
use crate::career::{filter_streams, CareerAnswers, RecommendationFilter};
use crate::store::ActivityLog;

use super::domain::{AnswerLetter, AnswerSheet, Difficulty, Question};
use super::sampler::{BucketRequest, SamplePlan};
use super::scoring::{recommended_difficulty, stream_breakdown, ScoreBand, StreamPerformance};
use super::service::{AssessmentError, AssessmentService};

/// Router builder exposing the assessment, progress, and recommendation
/// endpoints.
pub fn assessment_router<L>(service: Arc<AssessmentService<L>>) -> Router
where
    L: ActivityLog + 'static,
{
    Router::new()
        .route("/api/v1/auth/login", post(login_handler::<L>))
        .route("/api/v1/assessments/iq/sample", post(sample_handler::<L>))
        .route(
            "/api/v1/assessments/iq/submissions",
            post(iq_submission_handler::<L>),
        )
        .route(
            "/api/v1/assessments/career/questions",
            get(career_questions_handler::<L>),
        )
        .route(
            "/api/v1/assessments/career/submissions",
            post(career_submission_handler::<L>),
        )
        .route("/api/v1/progress/:user_id", get(progress_handler::<L>))
        .route(
            "/api/v1/progress/:user_id/certificates",
            get(certificate_list_handler::<L>).post(certificate_document_handler::<L>),
        )
        .route(
            "/api/v1/recommendations",
            post(recommendations_handler::<L>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginView {
    username: String,
    name: String,
    email: Option<String>,
}

pub(crate) async fn login_handler<L>(
    State(service): State<Arc<AssessmentService<L>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    L: ActivityLog + 'static,
{
    match authenticate(
        &request.username,
        &request.password,
        &service.reference().students,
    ) {
        Some(student) => (
            StatusCode::OK,
            axum::Json(LoginView {
                username: student.username.clone(),
                name: student.name.clone(),
                email: student.email.clone(),
            }),
        )
            .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({ "error": "invalid username or password" })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BucketSpec {
    difficulty: Difficulty,
    count: usize,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SampleRequest {
    /// Custom bucket composition; omitted means the standard 5/10/5 mix.
    #[serde(default)]
    plan: Option<Vec<BucketSpec>>,
}

pub(crate) async fn sample_handler<L>(
    State(service): State<Arc<AssessmentService<L>>>,
    axum::Json(request): axum::Json<SampleRequest>,
) -> axum::Json<Vec<Question>>
where
    L: ActivityLog + 'static,
{
    let plan = match request.plan {
        Some(buckets) => SamplePlan::new(
            buckets
                .into_iter()
                .map(|bucket| BucketRequest {
                    difficulty: bucket.difficulty,
                    count: bucket.count,
                })
                .collect(),
        ),
        None => SamplePlan::standard(),
    };
    axum::Json(service.sample(&plan))
}

#[derive(Debug, Deserialize)]
pub(crate) struct IqSubmission {
    user_id: String,
    /// Question ids in the order they were presented.
    question_ids: Vec<String>,
    /// Selected letters keyed by 0-based question index.
    answers: BTreeMap<usize, String>,
    #[serde(default)]
    time_taken_seconds: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct IqSubmissionView {
    accuracy: f64,
    correct: usize,
    total: usize,
    composite: f64,
    interpretation: &'static str,
    recommended_difficulty: &'static str,
    stream_breakdown: BTreeMap<String, StreamPerformance>,
}

pub(crate) async fn iq_submission_handler<L>(
    State(service): State<Arc<AssessmentService<L>>>,
    axum::Json(submission): axum::Json<IqSubmission>,
) -> Response
where
    L: ActivityLog + 'static,
{
    let questions = service.resolve_questions(&submission.question_ids);

    let mut answers = AnswerSheet::new();
    for (index, selection) in &submission.answers {
        if let Some(letter) = AnswerLetter::parse(selection) {
            answers.record(*index, letter);
        }
    }

    match service.submit_iq(
        &submission.user_id,
        &answers,
        &questions,
        submission.time_taken_seconds,
        Utc::now(),
    ) {
        Ok(outcome) => {
            let view = IqSubmissionView {
                accuracy: outcome.accuracy,
                correct: outcome.correct,
                total: outcome.total,
                composite: outcome.composite,
                interpretation: ScoreBand::for_composite(outcome.composite).label(),
                recommended_difficulty: recommended_difficulty(outcome.accuracy).label(),
                stream_breakdown: stream_breakdown(&answers, &questions),
            };
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn career_questions_handler<L>(
    State(service): State<Arc<AssessmentService<L>>>,
) -> Response
where
    L: ActivityLog + 'static,
{
    axum::Json(service.reference().career_questions.clone()).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct CareerSubmission {
    user_id: String,
    /// Selected letters keyed by 0-based question index.
    answers: CareerAnswers,
}

pub(crate) async fn career_submission_handler<L>(
    State(service): State<Arc<AssessmentService<L>>>,
    axum::Json(submission): axum::Json<CareerSubmission>,
) -> Response
where
    L: ActivityLog + 'static,
{
    match service.submit_career(&submission.user_id, &submission.answers, Utc::now()) {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn progress_handler<L>(
    State(service): State<Arc<AssessmentService<L>>>,
    Path(user_id): Path<String>,
) -> Response
where
    L: ActivityLog + 'static,
{
    match service.progress(&user_id, Utc::now()) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn certificate_list_handler<L>(
    State(service): State<Arc<AssessmentService<L>>>,
    Path(user_id): Path<String>,
) -> Response
where
    L: ActivityLog + 'static,
{
    match service.certificates(&user_id) {
        Ok(awards) => (StatusCode::OK, axum::Json(awards)).into_response(),
        Err(error) => service_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CertificateRequest {
    /// Display name printed on the document.
    user_name: String,
    /// Title of the eligible certificate to render.
    title: String,
}

pub(crate) async fn certificate_document_handler<L>(
    State(service): State<Arc<AssessmentService<L>>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<CertificateRequest>,
) -> Response
where
    L: ActivityLog + 'static,
{
    match service.certificate(&user_id, &request.user_name, &request.title, Utc::now()) {
        Ok(Some(bytes)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/pdf")],
            bytes,
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": "no eligible certificate with that title" })),
        )
            .into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn recommendations_handler<L>(
    State(service): State<Arc<AssessmentService<L>>>,
    axum::Json(filter): axum::Json<RecommendationFilter>,
) -> Response
where
    L: ActivityLog + 'static,
{
    let matched = filter_streams(&service.reference().streams, &filter);
    (StatusCode::OK, axum::Json(matched)).into_response()
}

fn service_error_response(error: AssessmentError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career::StreamRecommendation;
    use crate::progress::{AchievementConfig, ActivityRecord};
    use crate::quiz::scoring::ScoringConfig;
    use crate::quiz::service::ReferenceData;
    use crate::store::{ActivityLog, StoreError};
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct MemoryLog {
        records: Mutex<Vec<ActivityRecord>>,
    }

    impl ActivityLog for MemoryLog {
        fn append(&self, record: ActivityRecord) -> Result<(), StoreError> {
            self.records
                .lock()
                .expect("log mutex poisoned")
                .push(record);
            Ok(())
        }

        fn for_user(&self, user_id: &str) -> Result<Vec<ActivityRecord>, StoreError> {
            Ok(self
                .records
                .lock()
                .expect("log mutex poisoned")
                .iter()
                .filter(|record| record.user_id == user_id)
                .cloned()
                .collect())
        }
    }

    fn question(id: &str, difficulty: Difficulty) -> Question {
        Question {
            id: id.to_string(),
            text: format!("question {id}"),
            stream: "Mathematics".to_string(),
            difficulty,
            options: [
                "first".to_string(),
                "second".to_string(),
                "third".to_string(),
                "fourth".to_string(),
            ],
            correct_answer: AnswerLetter::B,
            explanation: None,
        }
    }

    fn stream(name: &str, category: &str, duration: &str) -> StreamRecommendation {
        StreamRecommendation {
            stream_name: name.to_string(),
            category: category.to_string(),
            description: format!("{name} fundamentals"),
            difficulty_level: "Beginner".to_string(),
            resource_type: "Course".to_string(),
            duration: duration.to_string(),
            url: None,
            platform: "OpenLearn".to_string(),
        }
    }

    fn build_router() -> (Router, Arc<AssessmentService<MemoryLog>>) {
        let reference = ReferenceData {
            students: vec![crate::auth::StudentRecord {
                username: "avery".to_string(),
                password: "hunter2".to_string(),
                name: "Avery Lee".to_string(),
                email: None,
            }],
            questions: (0..8)
                .map(|i| question(&format!("q{i}"), Difficulty::Beginner))
                .collect(),
            career_questions: Vec::new(),
            streams: vec![
                stream("Software Engineering", "Technology", "6 weeks"),
                stream("Fine Arts", "Arts", "Self-paced"),
            ],
        };
        let service = Arc::new(AssessmentService::new(
            Arc::new(MemoryLog::default()),
            Arc::new(reference),
            ScoringConfig::default(),
            AchievementConfig::default(),
        ));
        (assessment_router(service.clone()), service)
    }

    async fn read_json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    #[tokio::test]
    async fn sample_route_honors_custom_plans() {
        let (router, _) = build_router();

        let response = router
            .oneshot(
                axum::http::Request::post("/api/v1/assessments/iq/sample")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&json!({
                            "plan": [{ "difficulty": "Beginner", "count": 3 }]
                        }))
                        .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload.as_array().map(|items| items.len()), Some(3));
    }

    #[tokio::test]
    async fn iq_submission_scores_and_records() {
        let (router, service) = build_router();

        let question_ids: Vec<String> = (0..8).map(|i| format!("q{i}")).collect();
        let answers: BTreeMap<usize, &str> = (0..8).map(|i| (i, "b")).collect();

        let response = router
            .oneshot(
                axum::http::Request::post("/api/v1/assessments/iq/submissions")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&json!({
                            "user_id": "avery",
                            "question_ids": question_ids,
                            "answers": answers,
                        }))
                        .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = read_json_body(response).await;
        assert_eq!(payload["correct"], json!(8));
        assert_eq!(payload["composite"], json!(115.0));
        assert_eq!(payload["interpretation"], json!("High Average"));
        assert_eq!(payload["recommended_difficulty"], json!("Advanced"));

        let recorded = service.progress("avery", Utc::now()).expect("progress");
        assert_eq!(recorded.summary.total_activities, 1);
    }

    #[tokio::test]
    async fn unknown_question_ids_are_dropped_not_fatal() {
        let (router, _) = build_router();

        let response = router
            .oneshot(
                axum::http::Request::post("/api/v1/assessments/iq/submissions")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&json!({
                            "user_id": "avery",
                            "question_ids": ["q0", "ghost"],
                            "answers": { "0": "b" },
                        }))
                        .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = read_json_body(response).await;
        assert_eq!(payload["total"], json!(1));
        assert_eq!(payload["correct"], json!(1));
    }

    #[tokio::test]
    async fn recommendations_route_applies_filters() {
        let (router, _) = build_router();

        let response = router
            .oneshot(
                axum::http::Request::post("/api/v1/recommendations")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&json!({ "include_self_paced": false })).unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        let names: Vec<&str> = payload
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["stream_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Software Engineering"]);
    }

    #[tokio::test]
    async fn login_route_splits_on_credentials() {
        let (router, _) = build_router();

        let ok = router
            .clone()
            .oneshot(
                axum::http::Request::post("/api/v1/auth/login")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&json!({
                            "username": "avery",
                            "password": "hunter2",
                        }))
                        .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(ok.status(), StatusCode::OK);
        let payload = read_json_body(ok).await;
        assert_eq!(payload["name"], json!("Avery Lee"));

        let denied = router
            .oneshot(
                axum::http::Request::post("/api/v1/auth/login")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&json!({
                            "username": "avery",
                            "password": "wrong",
                        }))
                        .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn certificate_routes_list_and_render_awards() {
        let (router, service) = build_router();

        // Earn the IQ certificate first.
        let questions = service.sample(&SamplePlan::standard());
        let mut sheet = AnswerSheet::new();
        for (index, question) in questions.iter().enumerate() {
            sheet.record(index, question.correct_answer);
        }
        service
            .submit_iq("avery", &sheet, &questions, None, Utc::now())
            .expect("submission succeeds");

        let listing = router
            .clone()
            .oneshot(
                axum::http::Request::get("/api/v1/progress/avery/certificates")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(listing.status(), StatusCode::OK);
        let payload = read_json_body(listing).await;
        let titles: Vec<&str> = payload
            .as_array()
            .unwrap()
            .iter()
            .map(|award| award["title"].as_str().unwrap())
            .collect();
        assert!(titles.contains(&"IQ Assessment Excellence"));

        let document = router
            .clone()
            .oneshot(
                axum::http::Request::post("/api/v1/progress/avery/certificates")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&json!({
                            "user_name": "Avery Lee",
                            "title": "IQ Assessment Excellence",
                        }))
                        .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(document.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(document.into_body(), usize::MAX)
            .await
            .expect("body reads");
        assert!(bytes.starts_with(b"%PDF"));

        let unearned = router
            .oneshot(
                axum::http::Request::post("/api/v1/progress/avery/certificates")
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&json!({
                            "user_name": "Avery Lee",
                            "title": "100 Activities Milestone",
                        }))
                        .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(unearned.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn progress_route_reports_empty_history() {
        let (router, _) = build_router();

        let response = router
            .oneshot(
                axum::http::Request::get("/api/v1/progress/nobody")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["summary"]["total_activities"], json!(0));
        assert_eq!(payload["streaks"]["current"], json!(0));
    }
}
