use actix_web::{web, HttpRequest, HttpResponse};

use crate::auth::require_auth;
use crate::db::PublishRunStatus;
use crate::error::ApiError;
use crate::models::{GitStatusResponse, PublishRequest, PublishResponse};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/git")
            .route("/status", web::get().to(git_status))
            .route("/publish", web::post().to(publish)),
    );
}

async fn git_status(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_auth(&state.db, &state.config, &req)?;

    let files = state.publisher.status().await?;
    Ok(HttpResponse::Ok().json(GitStatusResponse {
        changed: !files.is_empty(),
        files,
    }))
}

async fn publish(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<PublishRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = require_auth(&state.db, &state.config, &req)?;

    // Snapshot of what the commit is expected to carry; the publisher
    // re-checks under its own lock before committing.
    let files = state.publisher.status().await?;

    let outcome = match state.publisher.publish(body.message.as_deref()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            state.db.record_publish_run(
                PublishRunStatus::Error,
                None,
                None,
                Some(&e.to_string()),
            )?;
            return Err(e);
        }
    };

    state.db.record_publish_run(
        PublishRunStatus::Success,
        Some(&outcome.commit_hash),
        Some(&outcome.output),
        None,
    )?;
    state.db.record_audit(
        &session.user,
        "git.publish",
        None,
        serde_json::json!({
            "commit_hash": outcome.commit_hash,
            "file_count": files.len(),
        }),
    )?;

    Ok(HttpResponse::Ok().json(PublishResponse {
        commit_hash: outcome.commit_hash,
        message: outcome.message,
        files,
        output: outcome.output,
    }))
}
