use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::{ProjectPayload, build_project_response, inputs_from_payload};
use crate::chart::render_svg;
use crate::core::Inputs;
use crate::report::format_report;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "viewer listening");
    println!("Retirement projection viewer listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/chart.svg", get(chart_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
}

fn inputs_for_request(payload: ProjectPayload) -> Result<Inputs, Response> {
    inputs_from_payload(payload, Local::now().date_naive()).map_err(|e| {
        warn!(error = %e, "rejected projection request");
        error_response(StatusCode::BAD_REQUEST, &e.to_string())
    })
}

async fn index_handler(Query(payload): Query<ProjectPayload>) -> Response {
    let inputs = match inputs_for_request(payload) {
        Ok(inputs) => inputs,
        Err(response) => return response,
    };
    with_cache_control(Html(render_index(&inputs)))
}

async fn chart_handler(Query(payload): Query<ProjectPayload>) -> Response {
    let inputs = match inputs_for_request(payload) {
        Ok(inputs) => inputs,
        Err(response) => return response,
    };
    let response = build_project_response(&inputs);
    with_cache_control((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        render_svg(&response.chart),
    ))
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    match inputs_for_request(payload) {
        Ok(inputs) => json_response(StatusCode::OK, build_project_response(&inputs)),
        Err(response) => response,
    }
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn render_index(inputs: &Inputs) -> String {
    let response = build_project_response(inputs);
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Retirement projection</title>\n</head>\n<body>\n\
         <pre>{}</pre>\n{}</body>\n</html>\n",
        format_report(&response.report),
        render_svg(&response.chart)
    )
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> ProjectPayload {
        serde_json::from_str(json).expect("valid payload")
    }

    #[test]
    fn project_handler_returns_ok_with_no_store() {
        let response = project_handler_impl(payload("{}"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );
    }

    #[test]
    fn project_handler_rejects_invalid_payload() {
        let response = project_handler_impl(payload(r#"{"birthdate": "soon"}"#));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn index_page_embeds_report_and_chart() {
        let inputs = inputs_from_payload(
            payload(r#"{"targetWorth": 1000000}"#),
            Local::now().date_naive(),
        )
        .expect("valid inputs");
        let html = render_index(&inputs);
        assert!(html.contains("Est worth at retirement"));
        assert!(html.contains("Est age at $1,000,000"));
        assert!(html.contains("<svg"));
    }
}
