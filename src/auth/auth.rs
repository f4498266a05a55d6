use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};
use uuid::Uuid;

/// Session context for the current request, placed in the request
/// extensions by `auth_middleware`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub auth_user_id: Uuid,
}

impl FromRequest for SessionUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<SessionUser>() {
            Some(user) => ready(Ok(*user)),
            None => ready(Err(ErrorUnauthorized("Missing session"))),
        }
    }
}
