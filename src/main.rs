#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    config::RuntimeConfiguration,
    routes::{
        dashboard::internal_get_dashboard,
        diagnostics::internal_get_diagnostics,
        index::get_index_route,
        student_form::{
            internal_get_edit_student_form, internal_get_new_student_form,
            internal_post_edit_student, internal_put_new_student,
        },
        student_list::{
            internal_delete_student, internal_get_confirm_delete, internal_post_toggle_student,
        },
    },
    state::AlumnosState,
};
use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod api;
mod config;
mod dashboard;
mod data;
mod error;
mod maud_conveniences;
mod routes;
mod state;
#[cfg(test)]
mod test_backend;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() {
    //a missing .env is fine, everything has a default
    let dotenv = dotenvy::dotenv();

    let config = RuntimeConfiguration::new().expect("unable to create config");
    let api_config = config.api_config();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(api_config.default_log_directives()));
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_env_filter(env_filter).finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    match dotenv {
        Ok(path) => debug!(?path, "Loaded env file"),
        Err(e) => debug!(?e, "No env file loaded"),
    }

    let state = AlumnosState::new(config.clone()).expect("unable to create state");

    if api_config.is_development() {
        info!(
            base_url = api_config.base_url(),
            environment = %api_config.environment(),
            app_name = api_config.app_name(),
            "API configuration"
        );

        match state.api().test_connection().await {
            Ok(service) => info!(?service, "Backend reachable"),
            Err(e) => warn!(%e, "Backend not reachable yet"),
        }
    }

    let trace_layer = TraceLayer::new_for_http();

    let app = Router::new()
        .route("/", get(get_index_route))
        .route("/internal/dashboard", get(internal_get_dashboard))
        .route("/internal/diagnostics", get(internal_get_diagnostics))
        .route("/internal/students/new", get(internal_get_new_student_form))
        .route("/internal/students", put(internal_put_new_student))
        .route(
            "/internal/students/{id}",
            post(internal_post_edit_student).delete(internal_delete_student),
        )
        .route(
            "/internal/students/{id}/edit",
            get(internal_get_edit_student_form),
        )
        .route(
            "/internal/students/{id}/toggle",
            post(internal_post_toggle_student),
        )
        .route(
            "/internal/students/{id}/confirm_delete",
            get(internal_get_confirm_delete),
        )
        .layer(trace_layer)
        .with_state(state);

    let server_ip = config.server_ip();
    let listener = TcpListener::bind(server_ip)
        .await
        .expect("unable to listen on server ip");

    info!(?server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("unable to serve app");
}
