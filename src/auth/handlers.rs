use crate::{auth::jwt::generate_access_token, auth::otp::OtpService, config::Config, store::Store};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RequestCode {
    #[schema(example = "demo")]
    pub tenant_id: String,
    #[schema(example = "admin@demo.example", format = "email")]
    pub email: String,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyCode {
    #[schema(example = "demo")]
    pub tenant_id: String,
    #[schema(example = "admin@demo.example", format = "email")]
    pub email: String,
    #[schema(example = "123456")]
    pub code: String,
}

/// Issue a one-time login code for a known user.
#[utoipa::path(
    post,
    path = "/auth/request-code",
    request_body = RequestCode,
    responses(
        (status = 200, description = "Code issued", body = Object, example = json!({
            "success": true,
            "message": "Verification code sent"
        })),
        (status = 404, description = "Unknown user")
    ),
    tag = "Auth"
)]
pub async fn request_code(
    store: web::Data<Store>,
    otp: web::Data<OtpService>,
    payload: web::Json<RequestCode>,
) -> actix_web::Result<impl Responder> {
    let known = store.read(&payload.tenant_id, |state| {
        state.user_by_email(&payload.email).is_some()
    })?;
    if !known {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "User not found"
        })));
    }

    let outcome = otp.issue(&payload.tenant_id, &payload.email).await;
    Ok(HttpResponse::Ok().json(json!({
        "success": outcome.success,
        "message": outcome.message
    })))
}

/// Verify a one-time code and mint an access token.
#[utoipa::path(
    post,
    path = "/auth/verify",
    request_body = VerifyCode,
    responses(
        (status = 200, description = "Code accepted", body = Object, example = json!({
            "access_token": "eyJ...",
            "user": { "id": "demo-admin", "email": "admin@demo.example", "name": "Demo Admin" }
        })),
        (status = 401, description = "Invalid or expired code")
    ),
    tag = "Auth"
)]
pub async fn verify_code(
    store: web::Data<Store>,
    otp: web::Data<OtpService>,
    config: web::Data<Config>,
    payload: web::Json<VerifyCode>,
) -> actix_web::Result<impl Responder> {
    if !otp
        .verify(&payload.tenant_id, &payload.email, &payload.code)
        .await
    {
        info!(tenant_id = %payload.tenant_id, "Rejected one-time code");
        return Ok(HttpResponse::Unauthorized().json(json!({
            "message": "Invalid or expired code"
        })));
    }

    let user = store.read(&payload.tenant_id, |state| {
        state.user_by_email(&payload.email).cloned()
    })?;
    let user = match user {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::Unauthorized().json(json!({
                "message": "Invalid or expired code"
            })));
        }
    };

    let access_token = generate_access_token(
        &user,
        &payload.tenant_id,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    info!(tenant_id = %payload.tenant_id, user_id = %user.id, "Login successful");

    Ok(HttpResponse::Ok().json(json!({
        "access_token": access_token,
        "user": user
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::verify_token;
    use crate::model::user::User;
    use crate::store::test_support::tenant;
    use actix_web::{App, test, web::Data};

    fn test_config() -> Config {
        Config {
            server_addr: "127.0.0.1:0".to_string(),
            jwt_secret: "test-secret".to_string(),
            data_file: "/dev/null".to_string(),
            access_token_ttl: 900,
            otp_ttl_secs: 300,
            flush_interval_ms: 2000,
            rate_auth_per_min: 60,
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
        }
    }

    fn store_with_user() -> Data<Store> {
        let store = Data::new(Store::new());
        store.create_tenant(tenant("t1")).unwrap();
        store
            .mutate("t1", |state| {
                state.users.push(User {
                    id: "u1".to_string(),
                    email: "hr@test.example".to_string(),
                    name: "HR Person".to_string(),
                });
                Ok(())
            })
            .unwrap();
        store
    }

    #[actix_web::test]
    async fn verify_round_trip_issues_tenant_bound_token() {
        let store = store_with_user();
        let otp = Data::new(OtpService::new(300));
        otp.issue_fixed("t1", "hr@test.example", "123456").await;

        let app = test::init_service(
            App::new()
                .app_data(store.clone())
                .app_data(otp.clone())
                .app_data(Data::new(test_config()))
                .route("/auth/verify", actix_web::web::post().to(verify_code)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/verify")
            .set_json(json!({
                "tenant_id": "t1",
                "email": "hr@test.example",
                "code": "123456"
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let claims = verify_token(body["access_token"].as_str().unwrap(), "test-secret").unwrap();
        assert_eq!(claims.tenant_id, "t1");
        assert_eq!(claims.user_id, "u1");

        // Second use of the same code must fail.
        let req = test::TestRequest::post()
            .uri("/auth/verify")
            .set_json(json!({
                "tenant_id": "t1",
                "email": "hr@test.example",
                "code": "123456"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn request_code_for_unknown_user_is_not_found() {
        let store = store_with_user();
        let otp = Data::new(OtpService::new(300));

        let app = test::init_service(
            App::new()
                .app_data(store.clone())
                .app_data(otp.clone())
                .app_data(Data::new(test_config()))
                .route("/auth/request-code", actix_web::web::post().to(request_code)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/request-code")
            .set_json(json!({
                "tenant_id": "t1",
                "email": "nobody@test.example"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
