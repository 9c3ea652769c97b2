//! Hushboard server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{Router, middleware};
use hushboard_api::{AppState, TokenVerifier, auth_middleware, router as api_router};
use hushboard_common::Config;
use hushboard_core::{
    AdminReviewService, AutoReporter, ContentService, ContentStore, Lexicon,
    ModerationLogService, ReportService, SubmissionGuard, UserService, verifier_from_config,
};
use hushboard_db::repositories::{
    MessageRepository, ModerationLogRepository, PostLikeRepository, PostRepository,
    ReplyRepository, ReportRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hushboard=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting hushboard server...");

    let config = Config::load().context("failed to load configuration")?;

    let db = hushboard_db::init(&config.database).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    hushboard_db::migrate(&db).await?;
    info!("Migrations completed");

    let lexicon = Lexicon::with_extra_terms(&config.moderation.extra_flagged_terms)?;
    info!(terms = lexicon.len(), "Flagged-term lexicon compiled");
    let guard = SubmissionGuard::new(Arc::new(lexicon));

    // Repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let post_like_repo = PostLikeRepository::new(Arc::clone(&db));
    let reply_repo = ReplyRepository::new(Arc::clone(&db));
    let message_repo = MessageRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let log_repo = ModerationLogRepository::new(Arc::clone(&db));

    // Services
    let report_service = ReportService::new(report_repo);
    let log_service = ModerationLogService::new(log_repo);
    let content_store = ContentStore::new(
        post_repo.clone(),
        message_repo.clone(),
        reply_repo.clone(),
    );
    let content_service = ContentService::new(
        post_repo,
        reply_repo,
        message_repo,
        post_like_repo,
        guard,
        AutoReporter::new(report_service.clone(), log_service.clone()),
    );
    let admin_review_service = AdminReviewService::new(
        user_repo.clone(),
        report_service.clone(),
        content_store,
        log_service,
    );
    let user_service = UserService::new(user_repo, config.moderation.admin_uids.clone());

    let state = AppState {
        user_service,
        content_service,
        report_service,
        admin_review_service,
        bot_verifier: verifier_from_config(&config.moderation)?,
        token_verifier: TokenVerifier::new(&config.auth.jwt_secret),
    };

    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.host))?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
