mod logs;

pub use logs::{add_log, add_log_entry, snapshot, LogBuffer, LogBufferObserver, LogEntry};

use crate::application::CsvEnrichmentUseCase;
use crate::domain::csv::{upload_too_large, ProcessingResult, UploadedFile};
use crate::domain::error::AppError;
use crate::infrastructure::config::ServerConfig;
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub struct HttpState {
    pub use_case: Arc<CsvEnrichmentUseCase>,
    pub logs: Arc<LogBuffer>,
    pub max_upload_bytes: u64,
}

#[derive(Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub rows_processed: usize,
    pub description_count: usize,
    pub updated_descriptions: Vec<String>,
    pub saved_file_path: String,
    pub message: String,
}

impl From<ProcessingResult> for UploadResponse {
    fn from(result: ProcessingResult) -> Self {
        Self {
            file_name: result.file_name,
            rows_processed: result.rows_processed,
            description_count: result.descriptions.len(),
            updated_descriptions: result.descriptions,
            saved_file_path: result.saved_file_path,
            message: "File processed and saved successfully".to_string(),
        }
    }
}

fn error_response(err: &AppError) -> HttpResponse {
    if err.is_client_error() {
        HttpResponse::BadRequest().json(json!({ "error": err.to_string() }))
    } else {
        HttpResponse::InternalServerError().json(json!({
            "error": "An error occurred while processing the file",
            "details": err.to_string(),
        }))
    }
}

/// Body is the raw CSV file; its name travels in `?file_name=`.
#[post("/upload-csv")]
async fn upload_csv(
    data: web::Data<HttpState>,
    query: web::Query<UploadQuery>,
    body: Result<web::Bytes, actix_web::Error>,
) -> impl Responder {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            add_log(&data.logs, "WARN", "HttpApi", &format!("Upload body rejected: {}", e));
            return error_response(&upload_too_large(data.max_upload_bytes));
        }
    };
    let file_name = match query.file_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() && !body.is_empty() => name.to_string(),
        _ => return HttpResponse::BadRequest().json(json!({ "error": "No file uploaded" })),
    };

    let file = UploadedFile::new(file_name, body.to_vec());
    if let Err(e) = file.check(data.max_upload_bytes) {
        add_log(&data.logs, "WARN", "HttpApi", &format!("Upload rejected: {}", e));
        return error_response(&e);
    }

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Processing {} ({} bytes)", file.file_name, file.content.len()),
    );

    match data.use_case.execute(&file).await {
        Ok(result) => HttpResponse::Ok().json(UploadResponse::from(result)),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Processing {} failed: {}", file.file_name, e),
            );
            error_response(&e)
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(snapshot(&data.logs))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Body limit for the upload route. Bodies over it are answered with the
/// same JSON 400 as [`UploadedFile::check`].
pub fn payload_config(max_upload_bytes: u64) -> web::PayloadConfig {
    web::PayloadConfig::new(usize::try_from(max_upload_bytes).unwrap_or(usize::MAX))
}

/// Route table shared by the server and the handler tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(upload_csv)
            .service(get_logs)
            .service(health),
    );
}

pub fn start_server(
    use_case: Arc<CsvEnrichmentUseCase>,
    logs: Arc<LogBuffer>,
    server: &ServerConfig,
    max_upload_bytes: u64,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState {
        use_case,
        logs,
        max_upload_bytes,
    });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(payload_config(max_upload_bytes))
            .configure(configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run();

    Ok(server)
}
