use actix_web::web;

use crate::auth::auth::SessionUser;
use crate::loader::{LoadError, StudentData, load_student_data};
use crate::store::StudentStore;

/// Student and attendance for the signed-in parent
#[utoipa::path(
    get,
    path = "/api/student",
    responses(
        (status = 200, description = "Student with attendance records in store order", body = StudentData),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No parent or student linked to this user", body = Object, example = json!({
            "error": "Parent not found"
        })),
        (status = 502, description = "Attendance lookup failed", body = Object, example = json!({
            "error": "Error fetching attendance records"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Student"
)]
pub async fn student_data(
    user: SessionUser,
    store: web::Data<dyn StudentStore>,
) -> Result<web::Json<StudentData>, LoadError> {
    let data = load_student_data(store.get_ref(), &user.auth_user_id).await?;
    Ok(web::Json(data))
}
