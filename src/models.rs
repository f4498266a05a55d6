use serde::{Deserialize, Serialize};

/// Access token claims. `sub` carries the authenticated user's UUID, the
/// same identifier stored in `parents.auth_user_id`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub jti: String,
}
