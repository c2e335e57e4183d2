use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use pathways::config::AppConfig;
use pathways::error::AppError;
use pathways::progress::AchievementConfig;
use pathways::quiz::{AssessmentService, ReferenceData, ScoringConfig};
use pathways::store::DataStore;
use pathways::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = DataStore::new(config.data.dir.clone());
    let reference = ReferenceData {
        students: store.load_students(),
        questions: store.load_questions(),
        career_questions: store.load_career_questions(),
        streams: store.load_streams(),
    };
    info!(
        students = reference.students.len(),
        questions = reference.questions.len(),
        career_questions = reference.career_questions.len(),
        streams = reference.streams.len(),
        "reference collections loaded"
    );

    let assessment_service = Arc::new(AssessmentService::new(
        Arc::new(store),
        Arc::new(reference),
        ScoringConfig::default(),
        AchievementConfig::default(),
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "learning pathways service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
