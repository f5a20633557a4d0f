//! # 대시보드 클라이언트
//!
//! 브라우저 대시보드가 하던 일을 라이브러리로 옮긴 모듈입니다.
//! - `ApiClient`: `/api` 엔드포인트를 타입이 있는 메서드로 감싼 HTTP 클라이언트
//! - `upload`: 파일 선택 → AI 이름/미리보기 추천 → 업로드
//! - `assistant`: 파일 목록을 아는 챗봇 대화
//!
//! 응답 본문은 타입으로 디코딩하므로 `files`/`folders` 키가 빠진 응답은
//! 빈 목록이 아니라 `ClientError::Decode`입니다.

pub mod assistant;
pub mod upload;

pub use assistant::{Assistant, ChatMessage, Sender};
pub use upload::{SelectedFile, UploadError, UploadForm, UploadStatus};

use crate::{
    models::*,
    services::tree::reconstruct_file_paths,
};
use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// 토큰 없이 인증이 필요한 호출을 시도함. 네트워크 요청 전에 반환됩니다.
    #[error("Not signed in")]
    Unauthenticated,

    /// 삭제 확인 플래그 없이 삭제를 시도함. 네트워크 요청 전에 반환됩니다.
    #[error("Deletion was not confirmed")]
    NotConfirmed,

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 서버가 성공이 아닌 상태 코드를 돌려줌. `message`는 서버 에러 메시지 또는 상태 텍스트
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request cancelled")]
    Cancelled,
}

/// 에러 응답에서 사람이 읽을 메시지를 꺼냅니다.
///
/// `{error: {message}}`와 `{error: "..."}` 두 형태를 모두 받고,
/// 어느 쪽도 아니면 상태 텍스트를 씁니다.
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| match &value["error"] {
            Value::String(message) => Some(message.clone()),
            Value::Object(error) => error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

#[derive(Debug, Deserialize)]
struct ItemResponse<T> {
    item: T,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url`은 `/api` 앞부분입니다 (예: `http://localhost:5000`).
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn bearer(&self) -> Result<&str, ClientError> {
        self.token.as_deref().ok_or(ClientError::Unauthenticated)
    }

    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        Ok(builder.bearer_auth(self.bearer()?))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::warn!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.authed(self.http.get(self.url(path)))?;
        self.send(request).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, ClientError> {
        let request = self.authed(self.http.post(self.url(path)))?.json(body);
        self.send(request).await
    }

    // ── 인증 ──

    /// 가입에 성공하면 액세스 토큰을 이 클라이언트에 저장합니다.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<AuthResponse, ClientError> {
        let request = self.http.post(self.url("/auth/register")).json(&json!({
            "email": email,
            "password": password,
            "displayName": display_name,
        }));
        let auth: AuthResponse = self.send(request).await?;
        self.token = Some(auth.access_token.clone());
        Ok(auth)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }));
        let auth: AuthResponse = self.send(request).await?;
        self.token = Some(auth.access_token.clone());
        Ok(auth)
    }

    pub async fn me(&self) -> Result<UserResponse, ClientError> {
        self.get("/auth/me").await
    }

    // ── 파일 ──

    pub async fn create_file(&self, req: &CreateFileRequest) -> Result<CreateFileResponse, ClientError> {
        self.post("/files", &serde_json::to_value(req)?).await
    }

    pub async fn update_file(
        &self,
        file_id: &str,
        req: &UpdateFileRequest,
    ) -> Result<SuccessResponse, ClientError> {
        let request = self
            .authed(self.http.put(self.url(&format!("/files/{}", file_id))))?
            .json(req);
        self.send(request).await
    }

    /// `confirmed`가 false면 요청하지 않고 `NotConfirmed`를 돌려줍니다.
    pub async fn delete_file(&self, file_id: &str, confirmed: bool) -> Result<SuccessResponse, ClientError> {
        if !confirmed {
            return Err(ClientError::NotConfirmed);
        }
        let request = self.authed(self.http.delete(self.url(&format!("/files/{}", file_id))))?;
        self.send(request).await
    }

    pub async fn list_user_files(&self) -> Result<Vec<FileRecord>, ClientError> {
        let response: FilesResponse = self.get("/files/user").await?;
        Ok(response.files)
    }

    pub async fn list_files_by_path(&self, folder_path: &str) -> Result<Vec<FileRecord>, ClientError> {
        let request = self
            .authed(self.http.get(self.url("/files")))?
            .query(&[("folderPath", folder_path)]);
        let response: FilesResponse = self.send(request).await?;
        Ok(response.files)
    }

    /// `None`이면 루트의 파일들
    pub async fn list_folder_files(&self, folder_id: Option<&str>) -> Result<Vec<FileRecord>, ClientError> {
        let response: FilesResponse = self
            .get(&format!("/folders/{}/files", folder_id.unwrap_or("null")))
            .await?;
        Ok(response.files)
    }

    pub async fn get_file(&self, file_id: &str) -> Result<FileRecord, ClientError> {
        let response: ItemResponse<FileRecord> =
            self.get(&format!("/files/{}?collection=files", file_id)).await?;
        Ok(response.item)
    }

    // ── 폴더 ──

    /// `parent` 안에 새 폴더를 만들고 ID를 돌려줍니다.
    pub async fn create_folder(
        &self,
        name: &str,
        parent: &Folder,
        tags: Option<&str>,
    ) -> Result<String, ClientError> {
        let body = json!({
            "folderName": name,
            "parentId": parent.id,
            "pathArr": parent.child_path(),
            "tags": tags,
        });
        let response: CreateFolderResponse = self.post("/folders", &body).await?;
        Ok(response.folder_id)
    }

    pub async fn rename_folder(&self, folder_id: &str, name: &str) -> Result<(), ClientError> {
        let request = self
            .authed(self.http.put(self.url(&format!("/folders/{}", folder_id))))?
            .json(&json!({ "folderName": name }));
        let _: Value = self.send(request).await?;
        Ok(())
    }

    /// 하위 폴더와 파일까지 지웁니다. `confirmed`가 false면 요청하지 않습니다.
    pub async fn delete_folder(&self, folder_id: &str, confirmed: bool) -> Result<(), ClientError> {
        if !confirmed {
            return Err(ClientError::NotConfirmed);
        }
        let request = self.authed(self.http.delete(self.url(&format!("/folders/{}", folder_id))))?;
        let _: Value = self.send(request).await?;
        Ok(())
    }

    pub async fn get_folder(&self, folder_id: &str) -> Result<Folder, ClientError> {
        let response: FolderResponse = self.get(&format!("/folders/{}", folder_id)).await?;
        Ok(response.folder)
    }

    /// `None`이면 루트 바로 아래 폴더들
    pub async fn list_folders(&self, parent_id: Option<&str>) -> Result<Vec<Folder>, ClientError> {
        let request = self
            .authed(self.http.get(self.url("/folders")))?
            .query(&[("parentId", parent_id.unwrap_or("null"))]);
        let response: FoldersResponse = self.send(request).await?;
        Ok(response.folders)
    }

    pub async fn list_user_folders(&self) -> Result<Vec<Folder>, ClientError> {
        let response: FoldersResponse = self.get("/folders/user").await?;
        Ok(response.folders)
    }

    /// 내 파일 전체를 가져와 `path`를 폴더 이름 경로로 바꿔 돌려줍니다.
    pub async fn readable_files(&self) -> Result<Vec<FileRecord>, ClientError> {
        let folders: Vec<FolderRef> = self
            .list_user_folders()
            .await?
            .iter()
            .filter_map(Folder::as_ref_entry)
            .collect();
        let files = self.list_user_files().await?;
        Ok(reconstruct_file_paths(&folders, files))
    }

    // ── AI ──

    pub async fn ai_rename(&self, req: &AiFileRequest) -> Result<String, ClientError> {
        let result: AiResult = self.post("/aiRename", &serde_json::to_value(req)?).await?;
        Ok(result.result)
    }

    pub async fn ai_preview(&self, req: &AiFileRequest) -> Result<String, ClientError> {
        let result: AiResult = self.post("/aiPreview", &serde_json::to_value(req)?).await?;
        Ok(result.result)
    }

    pub async fn ai_analyse(&self, req: &AiTaskRequest) -> Result<String, ClientError> {
        let result: AiResult = self.post("/ai", &serde_json::to_value(req)?).await?;
        Ok(result.result)
    }

    pub async fn describe_image(&self, req: &AiTaskRequest) -> Result<String, ClientError> {
        let result: AiResult = self.post("/describe-image", &serde_json::to_value(req)?).await?;
        Ok(result.result)
    }

    pub async fn chatbot(&self, input: &str) -> Result<String, ClientError> {
        let result: AiResult = self.post("/chatbot", &json!({ "input": input })).await?;
        Ok(result.result)
    }

    // ── 테마 (토큰 선택) ──

    pub async fn dark_mode(&self) -> Result<bool, ClientError> {
        let mut request = self.http.get(self.url("/user/theme"));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let theme: ThemeResponse = self.send(request).await?;
        Ok(theme.dark_mode)
    }

    pub async fn set_dark_mode(&self, dark_mode: bool) -> Result<bool, ClientError> {
        let mut request = self
            .http
            .put(self.url("/user/theme"))
            .json(&json!({ "darkMode": dark_mode }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let theme: ThemeResponse = self.send(request).await?;
        Ok(theme.dark_mode)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::routes::testing::TestApp;
    use axum::Router;

    /// 라우터를 임시 포트에 띄우고 베이스 URL을 돌려줍니다.
    pub async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// 실제 API 라우터(인메모리 DB + AI 스텁)를 띄웁니다.
    pub async fn serve_app(ai_reply: Option<&str>) -> (String, TestApp) {
        let app = TestApp::new(ai_reply).await;
        let base = serve(app.router.clone()).await;
        (base, app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};

    async fn signed_in(base: &str) -> ApiClient {
        let mut client = ApiClient::new(base);
        client
            .register("a@example.com", "correct horse", Some("Ada"))
            .await
            .unwrap();
        client
    }

    #[test]
    fn extracts_error_messages() {
        let nested = br#"{"error":{"code":"bad_request","message":"Missing input."}}"#;
        assert_eq!(error_message(StatusCode::BAD_REQUEST, nested), "Missing input.");

        let flat = br#"{"error":"Internal server error"}"#;
        assert_eq!(error_message(StatusCode::INTERNAL_SERVER_ERROR, flat), "Internal server error");

        assert_eq!(error_message(StatusCode::BAD_GATEWAY, b"<html>"), "Bad Gateway");
    }

    #[tokio::test]
    async fn calls_without_token_fail_before_network() {
        // 아무것도 듣고 있지 않은 주소: 요청이 나갔다면 Transport 에러가 났을 것
        let client = ApiClient::new("http://127.0.0.1:9");
        assert!(matches!(client.list_user_files().await, Err(ClientError::Unauthenticated)));
        assert!(matches!(client.chatbot("hi").await, Err(ClientError::Unauthenticated)));
    }

    #[tokio::test]
    async fn deletes_require_confirmation() {
        let client = ApiClient::new("http://127.0.0.1:9").with_token("t");
        assert!(matches!(client.delete_file("f", false).await, Err(ClientError::NotConfirmed)));
        assert!(matches!(client.delete_folder("f", false).await, Err(ClientError::NotConfirmed)));
    }

    #[tokio::test]
    async fn missing_list_key_is_a_decode_error() {
        let router = Router::new().route(
            "/api/files/user",
            get(|| async { Json(serde_json::json!({ "items": [] })) }),
        );
        let base = testing::serve(router).await;
        let client = ApiClient::new(&base).with_token("t");
        assert!(matches!(client.list_user_files().await, Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn folder_and_file_round_trip_against_server() {
        let (base, _app) = testing::serve_app(None).await;
        let client = signed_in(&base).await;
        assert_eq!(client.me().await.unwrap().display_name.as_deref(), Some("Ada"));

        let work_id = client.create_folder("Work", &Folder::root(), None).await.unwrap();
        let work = client.get_folder(&work_id).await.unwrap();
        let year_id = client.create_folder("2024", &work, Some("archive")).await.unwrap();
        let year = client.get_folder(&year_id).await.unwrap();

        client
            .create_file(&CreateFileRequest {
                name: "draft.pdf".into(),
                content: Some("JVBERi0=".into()),
                path: format!("{work_id}/{year_id}/draft.pdf"),
                folder_id: year.id.clone(),
                ..Default::default()
            })
            .await
            .unwrap();

        let files = client.readable_files().await.unwrap();
        assert_eq!(files[0].path, "root/Work/2024/draft.pdf");

        assert_eq!(client.list_folders(None).await.unwrap().len(), 1);
        assert_eq!(client.list_folder_files(Some(&year_id)).await.unwrap().len(), 1);

        client.rename_folder(&work_id, "Jobs").await.unwrap();
        let files = client.readable_files().await.unwrap();
        assert_eq!(files[0].path, "root/Jobs/2024/draft.pdf");

        client.delete_folder(&work_id, true).await.unwrap();
        assert!(client.list_user_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn server_errors_surface_their_message() {
        let (base, _app) = testing::serve_app(None).await;
        let client = signed_in(&base).await;

        match client.get_folder("missing").await {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Resource not found");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn theme_works_signed_out() {
        let (base, _app) = testing::serve_app(None).await;
        let client = ApiClient::new(&base);
        assert!(!client.dark_mode().await.unwrap());
        assert!(client.set_dark_mode(true).await.unwrap());
        assert!(client.dark_mode().await.unwrap());
    }
}
