//! HTTP server for the CSV to JSON converter.
//!
//! Serves the form page and the conversion endpoint. All conversion requests
//! are independent, stateless core calls; the server owns request parsing,
//! the size limit and error rendering, nothing else.
//!
//! # Endpoints
//!
//! | Method | Path           | Description                          |
//! |--------|----------------|--------------------------------------|
//! | GET    | `/`            | Converter form page                  |
//! | GET    | `/health`      | Health check                         |
//! | POST   | `/api/convert` | Convert uploaded or pasted CSV       |
//! | GET    | `/api/logs`    | SSE stream of conversion logs        |

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, Method, StatusCode},
    response::{sse::Event, Html, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, log_success, LOG_BROADCASTER};
use super::types::{error_response, ConvertResponse};
use crate::convert::{convert_bytes, convert_str, ConversionOptions, DelimiterChoice};
use crate::error::{ConvertError, ServerError, ServerResult};

/// Maximum accepted source size, checked before the core runs.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// How much of the source is echoed back into the form textarea.
const PREVIEW_CHARS: usize = 2000;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Start the HTTP server
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/convert", post(convert_csv))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 csv2json server running on http://localhost:{}", port);
    println!("   GET  /            - Converter form");
    println!("   POST /api/convert - Convert CSV upload or pasted text");
    println!("   GET  /api/logs    - SSE log stream");
    println!("   GET  /health      - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The converter form page.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "csv2json",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "convert": "POST /api/convert",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for conversion log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// What the form submitted, decoded from the multipart body.
#[derive(Debug, Default)]
struct ConvertForm {
    file: Option<Vec<u8>>,
    file_name: Option<String>,
    csv_text: String,
    delimiter: DelimiterChoice,
    headers: bool,
    cast: bool,
    pretty: bool,
}

/// Convert endpoint: file upload or pasted text, options as form fields.
async fn convert_csv(
    mut multipart: Multipart,
) -> Result<Json<ConvertResponse>, (StatusCode, Json<Value>)> {
    let mut form = ConvertForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        bad_request(format!("Multipart error: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                form.file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Read error: {}", e)))?;
                form.file = Some(bytes.to_vec());
            }
            "csv_text" => {
                form.csv_text = field.text().await.unwrap_or_default();
            }
            "delimiter" => {
                let value = field.text().await.unwrap_or_default();
                form.delimiter = DelimiterChoice::from_form_value(&value);
            }
            // Checkboxes are submitted only when checked.
            "headers" => form.headers = true,
            "cast" => form.cast = true,
            "pretty" => form.pretty = true,
            _ => {}
        }
    }

    match run_conversion(form) {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            log_error(err.to_string());
            Err((status_for(&err), Json(error_response(&err.to_string()))))
        }
    }
}

/// Run one conversion request: pick the source, enforce the size limit, call
/// the core, assemble the response.
fn run_conversion(form: ConvertForm) -> ServerResult<ConvertResponse> {
    let options = ConversionOptions {
        delimiter: form.delimiter.resolve(),
        headers: form.headers,
        cast: form.cast,
        pretty: form.pretty,
        skip_empty: true,
        ..Default::default()
    };

    let upload = form.file.filter(|bytes| !bytes.is_empty());
    let pasted = form.csv_text.trim();

    if upload.is_none() && pasted.is_empty() {
        return Err(ServerError::BadRequest(
            "Please upload a CSV file or paste CSV text.".to_string(),
        ));
    }

    let (output, preview) = if let Some(bytes) = upload {
        log_info(format!(
            "📄 Upload: {} ({} bytes)",
            form.file_name.as_deref().unwrap_or("unnamed"),
            bytes.len()
        ));
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ServerError::SizeLimit {
                limit_bytes: MAX_UPLOAD_BYTES,
            });
        }
        let preview = truncate_chars(&String::from_utf8_lossy(&bytes), PREVIEW_CHARS);
        (convert_bytes(&bytes, &options)?, preview)
    } else {
        log_info(format!("📄 Pasted text ({} bytes)", form.csv_text.len()));
        if form.csv_text.len() > MAX_UPLOAD_BYTES {
            return Err(ServerError::SizeLimit {
                limit_bytes: MAX_UPLOAD_BYTES,
            });
        }
        let preview = truncate_chars(&form.csv_text, PREVIEW_CHARS);
        (convert_str(&form.csv_text, &options)?, preview)
    };

    log_success(format!(
        "Converted {} records (delimiter '{}', encoding {})",
        output.record_count,
        format_delimiter(output.delimiter),
        output.encoding
    ));

    Ok(ConvertResponse::from_output(output, preview))
}

/// Map a boundary error to its HTTP status.
fn status_for(err: &ServerError) -> StatusCode {
    match err {
        ServerError::SizeLimit { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        ServerError::Convert(ConvertError::EmptyInput) => StatusCode::BAD_REQUEST,
        ServerError::Convert(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn bad_request(message: String) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(error_response(&message)))
}

/// First `limit` characters of `text`, on char boundaries.
fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with_text(text: &str) -> ConvertForm {
        ConvertForm {
            csv_text: text.to_string(),
            headers: true,
            cast: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_source_is_bad_request() {
        let err = run_conversion(ConvertForm::default()).unwrap_err();
        assert!(matches!(err, ServerError::BadRequest(_)));
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_oversize_paste_is_rejected_before_conversion() {
        let mut form = form_with_text("");
        form.csv_text = "a".repeat(MAX_UPLOAD_BYTES + 1);

        let err = run_conversion(form).unwrap_err();
        assert!(matches!(err, ServerError::SizeLimit { .. }));
        assert_eq!(status_for(&err), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_upload_takes_precedence_over_pasted_text() {
        let mut form = form_with_text("x;y\n1;2");
        form.file = Some(b"a,b\n3,4".to_vec());

        let response = run_conversion(form).unwrap();
        assert_eq!(response.metadata.delimiter, ",");
        assert_eq!(response.metadata.columns, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_upload_falls_back_to_pasted_text() {
        let mut form = form_with_text("x;y\n1;2");
        form.file = Some(Vec::new());

        let response = run_conversion(form).unwrap();
        assert_eq!(response.metadata.columns, vec!["x", "y"]);
    }

    #[test]
    fn test_successful_conversion_response() {
        let response = run_conversion(form_with_text("id;name\n1;Apfel")).unwrap();

        assert_eq!(response.status, "ready");
        assert_eq!(response.json, r#"[{"id":1,"name":"Apfel"}]"#);
        assert_eq!(response.preview, "id;name\n1;Apfel");
        assert_eq!(response.metadata.record_count, 1);
    }

    #[test]
    fn test_unchecked_boxes_disable_features() {
        let form = ConvertForm {
            csv_text: "1;true".to_string(),
            ..Default::default()
        };

        // headers unchecked: synthetic names; cast unchecked: raw strings.
        let response = run_conversion(form).unwrap();
        assert_eq!(response.json, r#"[{"col1":"1","col2":"true"}]"#);
    }

    #[test]
    fn test_preview_is_capped() {
        let mut rows = String::from("id\n");
        for i in 0..1000 {
            rows.push_str(&format!("{}\n", i));
        }
        let response = run_conversion(form_with_text(&rows)).unwrap();
        assert_eq!(response.preview.chars().count(), PREVIEW_CHARS);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("äöü", 2), "äö");
        assert_eq!(truncate_chars("ab", 5), "ab");
    }
}
