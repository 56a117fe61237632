use actix_web::{web, HttpRequest, HttpResponse};

use crate::auth::require_auth;
use crate::error::ApiError;
use crate::models::{ContentCreateRequest, ContentListQuery, ContentUpdateRequest};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/content")
            .route("", web::get().to(list_content))
            .route("", web::post().to(create_content))
            // Ids contain a slash ("note/foo"), so the tail match is required.
            .route("/{id:.*}", web::get().to(get_content))
            .route("/{id:.*}", web::put().to(update_content))
            .route("/{id:.*}", web::delete().to(delete_content)),
    );
}

async fn list_content(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ContentListQuery>,
) -> Result<HttpResponse, ApiError> {
    require_auth(&state.db, &state.config, &req)?;

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);

    let listing = state
        .content
        .list(query.content_type, &query.query, page, page_size)?;
    Ok(HttpResponse::Ok().json(listing))
}

async fn get_content(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    require_auth(&state.db, &state.config, &req)?;

    let doc = state.content.get(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(doc))
}

async fn create_content(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ContentCreateRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = require_auth(&state.db, &state.config, &req)?;

    if body.title.trim().is_empty() {
        return Err(ApiError::Validation("Title must not be empty".into()));
    }

    let doc = state.content.create(&body)?;
    state.db.record_audit(
        &session.user,
        "content.create",
        Some(&doc.path),
        serde_json::json!({ "id": doc.id }),
    )?;
    log::info!("[CONTENT] Created {}", doc.id);
    Ok(HttpResponse::Created().json(doc))
}

async fn update_content(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<ContentUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = require_auth(&state.db, &state.config, &req)?;

    let doc = state.content.update(&path.into_inner(), &body)?;
    state.db.record_audit(
        &session.user,
        "content.update",
        Some(&doc.path),
        serde_json::json!({ "id": doc.id }),
    )?;
    log::info!("[CONTENT] Updated {}", doc.id);
    Ok(HttpResponse::Ok().json(doc))
}

async fn delete_content(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let session = require_auth(&state.db, &state.config, &req)?;

    let id = path.into_inner();
    // Look the document up first so the audit row carries its real path.
    let doc = state.content.get(&id)?;
    state.content.delete(&id)?;
    state.db.record_audit(
        &session.user,
        "content.delete",
        Some(&doc.path),
        serde_json::json!({ "id": doc.id }),
    )?;
    log::info!("[CONTENT] Deleted {}", doc.id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "deleted" })))
}
