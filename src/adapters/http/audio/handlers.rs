//! HTTP handlers for the audio endpoints.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower::util::ServiceExt;
use tower_http::services::ServeFile;

use crate::adapters::audio::BroadcastAudioOutput;
use crate::adapters::http::error::{domain_error_response, ErrorResponse};
use crate::adapters::http::operator_metadata;
use crate::application::handlers::SoundSettingsHandler;
use crate::domain::alert::SoundKind;

use super::dto::{
    MuteResponse, SoundCheckResponse, SoundSettingsResponse, SoundSlot, UpdateSoundSettingsRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AudioHandlers {
    sounds: Arc<SoundSettingsHandler>,
    output: Arc<BroadcastAudioOutput>,
}

impl AudioHandlers {
    pub fn new(sounds: Arc<SoundSettingsHandler>, output: Arc<BroadcastAudioOutput>) -> Self {
        Self { sounds, output }
    }

    pub(crate) fn sounds(&self) -> &Arc<SoundSettingsHandler> {
        &self.sounds
    }

    pub(crate) fn output(&self) -> &Arc<BroadcastAudioOutput> {
        &self.output
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/sounds/settings - Current sound settings
pub async fn get_settings(State(handlers): State<AudioHandlers>) -> Response {
    let settings = handlers.sounds.current().await;
    let needs_interaction = handlers.sounds.needs_interaction();
    (
        StatusCode::OK,
        Json(SoundSettingsResponse::from_settings(settings, needs_interaction)),
    )
        .into_response()
}

/// PUT /api/sounds/settings - Update enabled flag and volume
pub async fn update_settings(
    State(handlers): State<AudioHandlers>,
    Json(req): Json<UpdateSoundSettingsRequest>,
) -> Response {
    let mut settings = handlers.sounds.current().await;
    settings.enabled = req.enabled;
    settings.new_order_enabled = req.new_order_enabled;
    settings.near_finish_enabled = req.near_finish_enabled;
    settings.volume = req.volume;

    match handlers.sounds.update(settings).await {
        Ok(settings) => (
            StatusCode::OK,
            Json(SoundSettingsResponse::from_settings(
                settings,
                handlers.sounds.needs_interaction(),
            )),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// POST /api/sounds/custom/:slot - Upload a custom sound (multipart `file`)
pub async fn upload_custom(
    State(handlers): State<AudioHandlers>,
    Path(slot): Path<SoundSlot>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let kind = SoundKind::from(slot);
    let metadata = operator_metadata(&headers);

    let content = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => match field.bytes().await {
                Ok(bytes) => break bytes,
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse::bad_request(format!(
                            "Failed to read upload: {e}"
                        ))),
                    )
                        .into_response()
                }
            },
            Ok(Some(_)) => continue,
            Ok(None) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request("Missing multipart field: file")),
                )
                    .into_response()
            }
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request(format!("Invalid multipart: {e}"))),
                )
                    .into_response()
            }
        }
    };

    match handlers.sounds.upload(kind, &content, metadata).await {
        Ok(settings) => (
            StatusCode::CREATED,
            Json(SoundSettingsResponse::from_settings(
                settings,
                handlers.sounds.needs_interaction(),
            )),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/sounds/custom/:slot - Whether a custom sound is stored
pub async fn check_custom(
    State(handlers): State<AudioHandlers>,
    Path(slot): Path<SoundSlot>,
) -> Response {
    let exists = handlers.sounds.custom_exists(SoundKind::from(slot)).await;
    (StatusCode::OK, Json(SoundCheckResponse { exists })).into_response()
}

/// DELETE /api/sounds/custom/:slot - Remove a custom sound
pub async fn delete_custom(
    State(handlers): State<AudioHandlers>,
    Path(slot): Path<SoundSlot>,
    headers: HeaderMap,
) -> Response {
    let metadata = operator_metadata(&headers);
    match handlers.sounds.remove_custom(SoundKind::from(slot), metadata).await {
        Ok(settings) => (
            StatusCode::OK,
            Json(SoundSettingsResponse::from_settings(
                settings,
                handlers.sounds.needs_interaction(),
            )),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/sounds/files/:file_name - Stream a stored custom sound
///
/// Served through `ServeFile` so Range requests work; audio elements seek.
pub async fn serve_sound(
    State(handlers): State<AudioHandlers>,
    Path(file_name): Path<String>,
    request: Request,
) -> Response {
    let path = match handlers.sounds.resolve_sound(&file_name).await {
        Ok(path) => path,
        Err(e) => return domain_error_response(e),
    };

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(axum::body::Body::new).into_response(),
        Err(e) => {
            tracing::error!(error = %e, file = %file_name, "failed to serve sound file");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// POST /api/sounds/mute/toggle - Flip the mute window
pub async fn toggle_mute(State(handlers): State<AudioHandlers>) -> Response {
    let snapshot = handlers.sounds.toggle_mute().await;
    (StatusCode::OK, Json(MuteResponse::from(snapshot))).into_response()
}

/// POST /api/sounds/unlock - Report a user interaction unlocking playback
pub async fn unlock(State(handlers): State<AudioHandlers>) -> Response {
    handlers.sounds.unlock_audio().await;
    StatusCode::NO_CONTENT.into_response()
}
