use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::{StoreError, StudentStore};
use crate::model::{attendance::AttendanceRecord, parent::Parent, student::Student};

/// Media type asking PostgREST for a single object; the server answers 406
/// when zero or several rows match.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Client for a hosted PostgREST-compatible database (`/rest/v1/<table>`).
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// `GET /rest/v1/<table>?select=<columns>&<column>=eq.<value>`
    fn select(&self, table: &str, columns: &str, column: &str, value: &str) -> RequestBuilder {
        let filter = format!("eq.{value}");
        self.client
            .get(self.table_url(table))
            .query(&[("select", columns), (column, filter.as_str())])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn fetch_one<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let body = send(request.header(header::ACCEPT, SINGLE_OBJECT)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_all<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let body = send(request.header(header::ACCEPT, "application/json")).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

async fn send(request: RequestBuilder) -> Result<String, StoreError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

#[async_trait]
impl StudentStore for RestStore {
    async fn parent_by_auth_user(&self, auth_user_id: &Uuid) -> Result<Parent, StoreError> {
        let request = self.select("parents", "id", "auth_user_id", &auth_user_id.to_string());
        self.fetch_one(request).await
    }

    async fn student_by_parent(&self, parent_id: i64) -> Result<Student, StoreError> {
        let request = self.select("students", "*", "parent_id", &parent_id.to_string());
        self.fetch_one(request).await
    }

    async fn attendance_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let request = self.select("attendance", "*", "student_id", &student_id.to_string());
        self.fetch_all(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{
        ATTENDANCE_FETCH_FAILED, LoadError, PARENT_NOT_FOUND, STUDENT_NOT_FOUND, load_student_data,
    };
    use crate::model::attendance::AttendanceKind;
    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, dev::ServerHandle, http::StatusCode, web};
    use std::collections::HashMap;

    type Routes = HashMap<String, (u16, String)>;

    const PARENT_ROW: &str = r#"{"id": 3}"#;
    const STUDENT_ROW: &str =
        r#"{"id": 7, "parent_id": 3, "name": "Ada Lovelace", "email": "ada@school.example", "qr_code": "STU-0007", "created_at": "2024-01-01T00:00:00Z"}"#;

    /// Answers `/rest/v1/<table>` with a canned status and body. Single-row
    /// tables insist on the object media type, like PostgREST's `.single()`.
    async fn table(req: HttpRequest, name: web::Path<String>, routes: web::Data<Routes>) -> HttpResponse {
        let single = req
            .headers()
            .get("accept")
            .and_then(|v| v.to_str().ok())
            == Some(SINGLE_OBJECT);
        if matches!(name.as_str(), "parents" | "students") && !single {
            return HttpResponse::UnsupportedMediaType().finish();
        }

        match routes.get(name.as_str()) {
            Some((status, body)) => HttpResponse::build(
                StatusCode::from_u16(*status).expect("status"),
            )
            .content_type("application/json")
            .body(body.clone()),
            None => HttpResponse::NotFound().finish(),
        }
    }

    async fn fake_backend(routes: &[(&str, u16, &str)]) -> (RestStore, ServerHandle) {
        let routes: Routes = routes
            .iter()
            .map(|(name, status, body)| (name.to_string(), (*status, body.to_string())))
            .collect();
        let routes = web::Data::new(routes);

        let server = HttpServer::new(move || {
            App::new()
                .app_data(routes.clone())
                .route("/rest/v1/{table}", web::get().to(table))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind");
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        (RestStore::new(format!("http://{addr}"), "anon-key"), handle)
    }

    #[test]
    fn builds_filtered_select_url() {
        let store = RestStore::new("https://project.example.co/", "anon-key");
        let request = store
            .select("students", "*", "parent_id", "3")
            .build()
            .expect("request");

        assert_eq!(
            request.url().as_str(),
            "https://project.example.co/rest/v1/students?select=*&parent_id=eq.3"
        );
        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()[header::AUTHORIZATION], "Bearer anon-key");
    }

    #[actix_web::test]
    async fn single_row_lookups_decode_objects() {
        let (store, handle) =
            fake_backend(&[("parents", 200, PARENT_ROW), ("students", 200, STUDENT_ROW)]).await;

        let parent = store
            .parent_by_auth_user(&Uuid::new_v4())
            .await
            .expect("parent");
        assert_eq!(parent.id, 3);

        let student = store.student_by_parent(parent.id).await.expect("student");
        assert_eq!(student.qr_code, "STU-0007");

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn not_exactly_one_row_is_not_found() {
        let rejection = r#"{"code": "PGRST116", "message": "JSON object requested, multiple (or no) rows returned"}"#;
        let (store, handle) = fake_backend(&[("parents", 406, rejection)]).await;

        let err = store
            .parent_by_auth_user(&Uuid::new_v4())
            .await
            .expect_err("406");
        assert!(matches!(err, StoreError::Status { status: 406, ref body } if body.contains("PGRST116")));

        let err = load_student_data(&store, &Uuid::new_v4())
            .await
            .expect_err("no parent");
        assert_eq!(err.to_string(), PARENT_NOT_FOUND);
        handle.stop(false).await;

        let (store, handle) =
            fake_backend(&[("parents", 200, PARENT_ROW), ("students", 406, rejection)]).await;
        let err = load_student_data(&store, &Uuid::new_v4())
            .await
            .expect_err("no student");
        assert_eq!(err.to_string(), STUDENT_NOT_FOUND);
        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn attendance_server_error_is_fetch_error() {
        let (store, handle) = fake_backend(&[
            ("parents", 200, PARENT_ROW),
            ("students", 200, STUDENT_ROW),
            ("attendance", 503, r#"{"message": "upstream unavailable"}"#),
        ])
        .await;

        let err = load_student_data(&store, &Uuid::new_v4())
            .await
            .expect_err("attendance down");

        assert_eq!(err.to_string(), ATTENDANCE_FETCH_FAILED);
        assert!(matches!(
            err,
            LoadError::FetchError(StoreError::Status { status: 503, .. })
        ));
        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn malformed_body_is_decode_error() {
        let (store, handle) = fake_backend(&[
            ("parents", 200, r#"{"id": "three"}"#),
            ("attendance", 200, r#"[{"id": 1, "student_id": 7}]"#),
        ])
        .await;

        let err = store
            .parent_by_auth_user(&Uuid::new_v4())
            .await
            .expect_err("bad parent");
        assert!(matches!(err, StoreError::Decode(_)));

        let err = store.attendance_by_student(7).await.expect_err("bad rows");
        assert!(matches!(err, StoreError::Decode(_)));
        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn attendance_accepts_both_timestamp_forms() {
        let rows = r#"[
            {"id": 1, "student_id": 7, "type": "time_in", "time": "2024-09-02T08:00:00"},
            {"id": 2, "student_id": 7, "type": "time_out", "time": "2024-09-02T15:00:00+00:00"}
        ]"#;
        let (store, handle) = fake_backend(&[("attendance", 200, rows)]).await;

        let records = store.attendance_by_student(7).await.expect("rows");

        let kinds: Vec<AttendanceKind> = records.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![AttendanceKind::TimeIn, AttendanceKind::TimeOut]);
        assert_eq!(records[0].time.to_rfc3339(), "2024-09-02T08:00:00+00:00");
        handle.stop(false).await;
    }
}
