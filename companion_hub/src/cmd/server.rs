use crate::cmd::HubArgs;
use crate::modules::handlers::{
    archive::{
        archive_problem, archive_problem_overwrite, delete_archive, delete_group, import_archive,
        list_archives, rename_group,
    },
    answer_options_ping,
    files::{file_content, problem_meta, sample_input, sample_output},
    health,
    problem::{accept_request, pending_requests, reject_request, submit_problem},
    tests::{add_test, compare_outputs, delete_test, list_tests, update_test},
};
use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Extension},
    middleware, routing, Router, Server,
};
use clap::Args;
use companion_hub_libs::CompanionHub;
use std::{env, net::IpAddr, net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Args)]
pub struct ServerArgs {
    /// Port to listen on [env: COMPANION_HUB_PORT]
    #[arg(long)]
    port: Option<u16>,
    /// Address to bind [env: COMPANION_HUB_HOST]
    #[arg(long)]
    host: Option<String>,
}

pub async fn run(args: ServerArgs, hub_args: HubArgs) -> Result<()> {
    let port = match args.port {
        Some(port) => port,
        None => match env::var("COMPANION_HUB_PORT") {
            Ok(port) => port.parse::<u16>().with_context(|| {
                let message = format!("COMPANION_HUB_PORT is not a valid port number: {}", port);
                tracing::error!(message);
                message
            })?,
            Err(_) => {
                tracing::warn!("COMPANION_HUB_PORT environment variable is not set. Default port 10043 will be used.");
                10043u16
            }
        },
    };
    let host = args.host.unwrap_or_else(|| {
        env::var("COMPANION_HUB_HOST").unwrap_or_else(|_| {
            tracing::warn!("COMPANION_HUB_HOST environment variable is not set. Default value `127.0.0.1` will be used.");
            String::from("127.0.0.1")
        })
    });
    let ip = host.parse::<IpAddr>().with_context(|| {
        let message = format!("couldn't parse host address {}", host);
        tracing::error!(message);
        message
    })?;

    let hub = hub_args.open()?;
    let app = create_router(Arc::new(hub));

    let addr = SocketAddr::from((ip, port));
    tracing::info!("Server start at http://{}", addr);
    tracing::info!("Listening for Competitive Companion submissions");
    Server::try_bind(&addr)
        .with_context(|| {
            let message = format!("couldn't bind server to {}", addr);
            tracing::error!(message);
            message
        })?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated with an error")?;

    Ok(())
}

fn create_router(hub: Arc<CompanionHub>) -> Router {
    Router::new()
        .route("/", routing::post(submit_problem))
        .route("/health", routing::get(health))
        .route("/accept/:id", routing::post(accept_request))
        .route("/reject/:id", routing::post(reject_request))
        .route("/api/pending-requests", routing::get(pending_requests))
        .route("/api/compare", routing::get(compare_outputs))
        .route("/api/tests", routing::get(list_tests))
        .route("/api/tests/add", routing::post(add_test))
        .route("/api/tests/update", routing::post(update_test))
        .route("/api/tests/delete", routing::post(delete_test))
        .route("/api/archives", routing::get(list_archives))
        .route("/api/archives/archive", routing::post(archive_problem))
        .route(
            "/api/archives/archive-overwrite",
            routing::post(archive_problem_overwrite),
        )
        .route(
            "/api/archives/import/:group_name/:archive_id",
            routing::post(import_archive),
        )
        .route("/api/archives/group/rename", routing::post(rename_group))
        .route(
            "/api/archives/group/:group_name",
            routing::delete(delete_group),
        )
        .route(
            "/api/archives/:group_name/:archive_id",
            routing::delete(delete_archive),
        )
        .route("/api/file-content/:file_name", routing::get(file_content))
        .route("/sample/input/:file_name", routing::get(sample_input))
        .route("/sample/output/:file_name", routing::get(sample_output))
        .route("/.problem-meta.txt", routing::get(problem_meta))
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .layer(Extension(hub))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(middleware::from_fn(answer_options_ping))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, starting graceful shutdown. Pending requests are dropped.");
}
