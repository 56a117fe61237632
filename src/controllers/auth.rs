use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};

use crate::auth::require_auth;
use crate::config::SESSION_COOKIE;
use crate::error::ApiError;
use crate::models::{AuthMeResponse, LoginRequest, TokenResponse};
use crate::security::{create_access_token, hash_token, verify_password};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}

fn client_address(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|a| a.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(CookieDuration::seconds(max_age_seconds))
        .finish()
}

async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    // A deployment without a password hash must never accept any credentials.
    if state.config.admin_password_hash.is_empty() {
        return Err(ApiError::Configuration(
            "CMS_ADMIN_PASSWORD_HASH is not configured".into(),
        ));
    }

    let address = client_address(&req);
    if !state.login_limiter.allow(&address) {
        log::warn!("[AUTH] Login rate limit hit for {}", address);
        return Err(ApiError::RateLimited);
    }

    if !verify_password(&body.password, &state.config.admin_password_hash)? {
        state.login_limiter.register_failure(&address);
        log::warn!("[AUTH] Failed login attempt from {}", address);
        return Err(ApiError::Unauthenticated("Invalid password".into()));
    }

    let (token, expires_at) = create_access_token(
        &state.config.admin_user,
        &state.config.jwt_secret,
        state.config.jwt_expire_hours,
    )?;
    state.db.create_session(&hash_token(&token), expires_at)?;

    state.db.record_audit(
        &state.config.admin_user,
        "auth.login",
        None,
        serde_json::json!({ "ip": address }),
    )?;
    log::info!("[AUTH] {} logged in from {}", state.config.admin_user, address);

    let max_age = state.config.jwt_expire_hours * 3600;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token, max_age, state.config.secure_cookie))
        .json(TokenResponse::bearer(token)))
}

async fn logout(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let session = require_auth(&state.db, &state.config, &req)?;

    state.db.revoke_session(&session.token_hash)?;
    state.db.record_audit(&session.user, "auth.logout", None, serde_json::json!({}))?;
    log::info!("[AUTH] {} logged out", session.user);

    let mut expired = session_cookie("", 0, state.config.secure_cookie);
    expired.make_removal();
    Ok(HttpResponse::Ok()
        .cookie(expired)
        .json(serde_json::json!({ "status": "ok" })))
}

async fn me(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let session = require_auth(&state.db, &state.config, &req)?;
    Ok(HttpResponse::Ok().json(AuthMeResponse { user: session.user }))
}
