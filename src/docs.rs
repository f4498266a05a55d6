use crate::loader::StudentData;
use crate::model::{
    attendance::{AttendanceKind, AttendanceRecord},
    student::Student,
};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parent Portal API",
        version = "1.0.0",
        description = r#"
## Parent Portal

Lets a signed-in parent see the student linked to their account and that
student's attendance history.

### Key Features
- **Student lookup**: parent → student, exactly one of each
- **Attendance history**: every time-in / time-out record, in store order
- **Homepage**: server-rendered HTML view at `/api/homepage`

### Security
All endpoints require a **JWT Bearer** token whose subject is the
authenticated user id.
"#,
    ),
    paths(crate::api::student::student_data),
    components(schemas(StudentData, Student, AttendanceRecord, AttendanceKind)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Student", description = "Student and attendance APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
