//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the candidate, check-in and calendar
//! endpoints, and the master definition for the OpenAPI specification.

use crate::error::ApiError;
use crate::messages;
use crate::web::state::{AppState, CandidateSession};
use crate::web::{auth, oauth};
use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::{Datelike, Local, NaiveDate, Utc};
use recruitment_core::calendar::CalendarState;
use recruitment_core::dates::{display_birth_date, format_input_date};
use recruitment_core::documents::{DocumentError, DocumentRules};
use recruitment_core::obfuscation::{decode_token, encode_token, CheckInPayload};
use recruitment_core::ports::PortError;
use recruitment_core::validation::is_valid_nik;
use recruitment_core::{
    CandidateRecord, CandidateStatus, CompletionUpdate, DocumentKind, UploadedFile,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login_handler,
        auth::logout_handler,
        profile_handler,
        submit_documents_handler,
        checkin_decode_handler,
        calendar_handler,
        oauth::oauth_config_handler,
        oauth::oauth_token_handler,
    ),
    components(
        schemas(
            auth::LoginRequest,
            auth::LoginResponse,
            auth::NextStep,
            auth::MessageResponse,
            ProfileResponse,
            QrCode,
            SubmitDocumentsResponse,
            CheckInRequest,
            CheckInResponse,
            CalendarView,
            CalendarCell,
            CalendarNav,
            oauth::OAuthConfigResponse,
            oauth::OAuthTokenRequest,
        )
    ),
    tags(
        (name = "Candidate Verification API", description = "Login, document upload and check-in QR for recruitment candidates.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// How the client should render the check-in QR code.
#[derive(Serialize, ToSchema, Debug)]
pub struct QrCode {
    pub payload: String,
    pub size: u32,
    pub error_correction: String,
}

impl QrCode {
    fn new(payload: String) -> Self {
        Self {
            payload,
            size: 200,
            error_correction: "M".to_string(),
        }
    }
}

/// The candidate profile. Empty sheet cells are returned as `null`.
#[derive(Serialize, ToSchema, Debug)]
pub struct ProfileResponse {
    pub name: String,
    pub phone: String,
    /// e.g. `15 Mei 1985`
    pub birth_date: String,
    pub village: Option<String>,
    pub nik: Option<String>,
    pub test_schedule: Option<String>,
    pub test_location: Option<String>,
    pub ktp_url: Option<String>,
    pub selfie_url: Option<String>,
    pub status: String,
    pub complete: bool,
    pub qr: Option<QrCode>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl From<&CandidateRecord> for ProfileResponse {
    fn from(record: &CandidateRecord) -> Self {
        Self {
            name: record.name.clone(),
            phone: record.phone.clone(),
            birth_date: display_birth_date(&record.birth_date),
            village: non_empty(&record.village),
            nik: non_empty(&record.nik),
            test_schedule: non_empty(&record.test_schedule),
            test_location: non_empty(&record.test_location),
            ktp_url: non_empty(&record.ktp_url),
            selfie_url: non_empty(&record.selfie_url),
            status: record.status.to_string(),
            complete: record.is_complete(),
            qr: non_empty(&record.obfuscated_id).map(QrCode::new),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SubmitDocumentsResponse {
    pub message: String,
    pub profile: ProfileResponse,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    /// The text scanned from the candidate's QR code.
    pub token: String,
}

#[derive(Serialize, ToSchema)]
pub struct CheckInResponse {
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
}

#[derive(Deserialize, ToSchema, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CalendarNav {
    Prev,
    Next,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// Month to display; must come with `month`.
    pub year: Option<i32>,
    /// 1-12
    pub month: Option<u32>,
    /// Typed date, `DD/MM/YYYY`. Without `year`/`month` the grid jumps to it.
    pub selected: Option<String>,
    pub nav: Option<CalendarNav>,
}

#[derive(Serialize, ToSchema)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub day: u32,
    pub in_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

#[derive(Serialize, ToSchema)]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub day_headers: Vec<String>,
    /// The selection formatted for the date input.
    pub selected: Option<String>,
    pub cells: Vec<CalendarCell>,
}

//=========================================================================================
// Candidate Handlers
//=========================================================================================

/// Get the logged-in candidate's profile and check-in QR code.
#[utoipa::path(
    get,
    path = "/candidate/profile",
    responses(
        (status = 200, description = "The candidate profile", body = ProfileResponse),
        (status = 401, description = "No active session")
    )
)]
pub async fn profile_handler(
    Extension(session): Extension<CandidateSession>,
) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&session.record))
}

fn document_error(e: DocumentError) -> ApiError {
    match e {
        DocumentError::TooLarge { limit } => ApiError::Validation(messages::file_too_large(&limit)),
        DocumentError::UnsupportedType(_) => {
            ApiError::Validation(messages::INVALID_FILE_TYPE.to_string())
        }
    }
}

fn upload_error(e: PortError) -> ApiError {
    error!("Upload error: {:?}", e);
    match e {
        PortError::Unauthorized(_) => ApiError::Upstream(messages::AUTH_FAILED.to_string()),
        _ => ApiError::Upstream(messages::UPLOAD_FAILED.to_string()),
    }
}

/// The three form fields of the data-entry form.
#[derive(Default)]
struct DocumentForm {
    nik: String,
    ktp: Option<UploadedFile>,
    selfie: Option<UploadedFile>,
}

/// A body cut off by the request limit is reported as the size of the file
/// being read; anything else as an incomplete form.
fn form_error(e: MultipartError, rules: &DocumentRules, reading: DocumentKind) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        info!("Document submission exceeded the request body limit");
        return ApiError::Validation(messages::file_too_large(
            &rules.policy(reading).limit_label(),
        ));
    }
    error!("Failed to read multipart data: {}", e);
    ApiError::Validation(messages::FILES_REQUIRED.to_string())
}

async fn read_document_form(
    multipart: &mut Multipart,
    rules: &DocumentRules,
) -> Result<DocumentForm, ApiError> {
    let mut form = DocumentForm::default();
    let mut reading = DocumentKind::Ktp;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, rules, reading))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "nik" => {
                form.nik = field
                    .text()
                    .await
                    .map_err(|e| form_error(e, rules, reading))?
                    .trim()
                    .to_string()
            }
            "ktp_file" | "selfie_file" => {
                reading = if name == "ktp_file" {
                    DocumentKind::Ktp
                } else {
                    DocumentKind::Selfie
                };
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| form_error(e, rules, reading))?;
                // A file input left empty still sends a part, with no bytes.
                if bytes.is_empty() {
                    continue;
                }
                let file = UploadedFile {
                    file_name,
                    mime_type,
                    bytes: bytes.to_vec(),
                };
                match reading {
                    DocumentKind::Ktp => form.ktp = Some(file),
                    DocumentKind::Selfie => form.selfie = Some(file),
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

/// Submit the NIK and both identity documents.
///
/// Accepts a multipart/form-data request with the fields `nik`, `ktp_file` and
/// `selfie_file`. Everything is validated before the first upload starts.
#[utoipa::path(
    post,
    path = "/candidate/documents",
    request_body(content_type = "multipart/form-data", description = "NIK, KTP scan and selfie."),
    responses(
        (status = 200, description = "Documents stored and the row completed", body = SubmitDocumentsResponse),
        (status = 400, description = "Invalid NIK, missing file, file too large or wrong type"),
        (status = 401, description = "No active session"),
        (status = 409, description = "Data entry was already completed or is in progress"),
        (status = 502, description = "Upload or sheet write failed"),
        (status = 503, description = "Uploads are not configured")
    )
)]
pub async fn submit_documents_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<CandidateSession>,
    mut multipart: Multipart,
) -> Result<Json<SubmitDocumentsResponse>, ApiError> {
    // --- 1. One submission per session; re-read the record under the lock ---
    let _submission = session.submission.clone().try_lock_owned().map_err(|_| {
        ApiError::Conflict(messages::SUBMISSION_IN_PROGRESS.to_string())
    })?;
    let mut record = state
        .sessions
        .get(&session.id)
        .await
        .map(|current| current.record)
        .ok_or_else(|| ApiError::Unauthorized(messages::SESSION_REQUIRED.to_string()))?;
    if record.is_complete() {
        return Err(ApiError::Conflict(messages::ALREADY_COMPLETED.to_string()));
    }

    // --- 2. Validate the form before any network call ---
    let rules = &state.config.documents;
    let form = read_document_form(&mut multipart, rules).await?;
    if !is_valid_nik(&form.nik) {
        return Err(ApiError::Validation(messages::NIK_INVALID.to_string()));
    }
    let (ktp, selfie) = match (form.ktp, form.selfie) {
        (Some(ktp), Some(selfie)) => (ktp, selfie),
        _ => return Err(ApiError::Validation(messages::FILES_REQUIRED.to_string())),
    };
    rules
        .check_all(&[(DocumentKind::Ktp, &ktp), (DocumentKind::Selfie, &selfie)])
        .map_err(document_error)?;

    if !state.config.uploads_configured() {
        return Err(ApiError::NotConfigured(
            messages::UPLOAD_NOT_CONFIGURED.to_string(),
        ));
    }

    // --- 3. Store both documents ---
    // A rejected token is dropped so the next attempt waits for a fresh consent.
    let on_upload_error = |e: PortError| {
        if matches!(e, PortError::Unauthorized(_)) {
            state.token_gate.reset();
        }
        upload_error(e)
    };
    let now_millis = Utc::now().timestamp_millis();
    let file_millis = u64::try_from(now_millis).unwrap_or_default();
    let ktp_url = state
        .uploader
        .upload(DocumentKind::Ktp, &form.nik, ktp, file_millis)
        .await
        .map_err(on_upload_error)?;
    let selfie_url = state
        .uploader
        .upload(DocumentKind::Selfie, &form.nik, selfie, file_millis)
        .await
        .map_err(on_upload_error)?;

    // --- 4. Write the completed row back ---
    let payload = CheckInPayload::new(&form.nik, &record.test_schedule, now_millis);
    let obfuscated_id = encode_token(&payload, file_millis).map_err(|e| {
        error!("Failed to encode check-in token: {}", e);
        ApiError::Internal(e.to_string())
    })?;
    let update = CompletionUpdate {
        nik: form.nik,
        test_schedule: record.test_schedule.clone(),
        test_location: record.test_location.clone(),
        ktp_url,
        selfie_url,
        status: CandidateStatus::Completed,
        obfuscated_id,
    };
    state
        .registry
        .complete(record.row_index, &update)
        .await
        .map_err(|e| {
            error!("Save error: {:?}", e);
            ApiError::Upstream(messages::SAVE_FAILED.to_string())
        })?;

    record.apply(&update);
    state.sessions.update_record(&session.id, record.clone()).await;
    info!(row_index = record.row_index, "Candidate data entry completed");

    Ok(Json(SubmitDocumentsResponse {
        message: messages::SUCCESS_SAVE.to_string(),
        profile: ProfileResponse::from(&record),
    }))
}

//=========================================================================================
// Check-in and Calendar Handlers
//=========================================================================================

/// Decode a scanned check-in QR code.
#[utoipa::path(
    post,
    path = "/checkin/decode",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "The decoded check-in payload", body = CheckInResponse),
        (status = 400, description = "The token is not a check-in code")
    )
)]
pub async fn checkin_decode_handler(
    Json(req): Json<CheckInRequest>,
) -> Result<Json<CheckInResponse>, ApiError> {
    let payload = decode_token(req.token.trim()).map_err(|e| {
        info!("Rejected check-in token: {}", e);
        ApiError::Validation(messages::TOKEN_INVALID.to_string())
    })?;
    Ok(Json(CheckInResponse { payload }))
}

/// Month grid for the birth-date picker.
#[utoipa::path(
    get,
    path = "/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "The month grid", body = CalendarView),
        (status = 400, description = "Invalid month or date")
    )
)]
pub async fn calendar_handler(
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarView>, ApiError> {
    let today = Local::now().date_naive();
    let invalid = || ApiError::Validation(messages::DATE_INVALID.to_string());

    let mut calendar = CalendarState::new(today);
    if let Some(selected) = query.selected.as_deref().filter(|s| !s.is_empty()) {
        if !calendar.sync_from_input(selected, today.year()) {
            return Err(invalid());
        }
    }
    match (query.year, query.month) {
        (Some(year), Some(month)) => {
            if !calendar.show_month(year, month) {
                return Err(invalid());
            }
        }
        (None, None) => {}
        _ => return Err(invalid()),
    }
    match query.nav {
        Some(CalendarNav::Prev) => calendar.previous(),
        Some(CalendarNav::Next) => calendar.next(),
        None => {}
    }

    let grid = calendar.grid(today);
    Ok(Json(CalendarView {
        year: grid.year,
        month: grid.month,
        title: grid.title,
        day_headers: grid.day_headers.iter().map(|d| d.to_string()).collect(),
        selected: calendar.selected().map(format_input_date),
        cells: grid
            .cells
            .into_iter()
            .map(|cell| CalendarCell {
                date: cell.date,
                day: cell.day,
                in_month: cell.in_month,
                is_today: cell.is_today,
                is_selected: cell.is_selected,
            })
            .collect(),
    }))
}
