use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType, web};
use tracing::error;

use crate::auth::auth::SessionUser;
use crate::store::StudentStore;
use crate::view::{HomepageView, TimestampFormat, ViewState, render};

/// Mounts the homepage for the signed-in parent and answers once the load
/// has settled.
pub async fn homepage(
    user: SessionUser,
    store: web::Data<dyn StudentStore>,
    format: web::Data<TimestampFormat>,
) -> actix_web::Result<HttpResponse> {
    let mut view = HomepageView::mount(store.into_inner(), user.auth_user_id);
    let state = view.settled().await;

    let status = match &*state {
        ViewState::Failed(e) => e.status_code(),
        _ => StatusCode::OK,
    };

    html(status, &state, &format)
}

/// The first frame of the homepage, before any data has arrived.
pub async fn homepage_loading(
    _user: SessionUser,
    format: web::Data<TimestampFormat>,
) -> actix_web::Result<HttpResponse> {
    html(StatusCode::OK, &ViewState::Loading, &format)
}

fn html(
    status: StatusCode,
    state: &ViewState,
    format: &TimestampFormat,
) -> actix_web::Result<HttpResponse> {
    let body = render(state, format).map_err(|e| {
        error!(error = %e, "Homepage render failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body))
}
