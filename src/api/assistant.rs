use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::utils::assistant::Assistant;

#[derive(Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[schema(example = "Draft a welcome letter for a new hire")]
    pub prompt: String,
    #[schema(example = "You are an HR assistant", nullable = true)]
    pub system: Option<String>,
}

/// Generate assistant text
///
/// Always answers 200; backend failures come back as a placeholder string.
#[utoipa::path(
    post,
    path = "/api/assistant",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated text", body = Object, example = json!({
            "text": "Dear John, welcome aboard..."
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Assistant"
)]
pub async fn generate(
    _auth: AuthUser,
    assistant: web::Data<Assistant>,
    payload: web::Json<GenerateRequest>,
) -> actix_web::Result<impl Responder> {
    let text = assistant.generate(&payload.prompt, payload.system.as_deref());
    Ok(HttpResponse::Ok().json(json!({ "text": text })))
}
