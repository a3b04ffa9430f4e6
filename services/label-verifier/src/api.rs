//! HTTP adapter. OCR happens upstream; this layer only accepts the extracted
//! text and hands it to the engine.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use shared::config::{Settings, VerifyOptions};
use shared::dto::{ExtractedText, FormInput, VerificationReport, WordBoxes};
use tracing::{info, warn};

use crate::verify::verify_with;

#[derive(Debug, Clone)]
pub struct AppState {
    pub options: VerifyOptions,
    pub min_text_len: usize,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            options: settings.verify_options(),
            min_text_len: settings.min_text_len,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            options: VerifyOptions::default(),
            min_text_len: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub form: FormInput,
    pub extracted_text: String,
    #[serde(default)]
    pub word_boxes: Option<WordBoxes>,
}

async fn health() -> impl Responder {
    "OK"
}

async fn verify_label(
    state: web::Data<AppState>,
    web::Json(req): web::Json<VerifyRequest>,
) -> HttpResponse {
    info!(brand = %req.form.brand_name, beverage = %req.form.beverage_type, "verification requested");
    if let Err(e) = req.form.validate() {
        warn!(%e, "rejected form input");
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
    }
    if req.extracted_text.trim().chars().count() < state.min_text_len {
        warn!(len = req.extracted_text.len(), "extracted text too short to verify");
        return HttpResponse::Ok().json(VerificationReport::unreadable(req.extracted_text));
    }

    let extracted = ExtractedText {
        raw_text: req.extracted_text,
        word_boxes: req.word_boxes,
    };
    HttpResponse::Ok().json(verify_with(&req.form, &extracted, &state.options))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/api/verify", web::post().to(verify_label));
}
