//! # 업로드 파이프라인
//!
//! 1. `SelectedFile::read()`로 로컬 파일을 읽어 base64로 인코딩
//! 2. (선택) `fetch_suggestions()`로 AI 이름/미리보기 추천을 한 번 요청
//! 3. `use_ai_name()` 또는 `use_custom_name()`으로 최종 이름 결정
//! 4. `submit()`으로 현재 폴더에 업로드
//!
//! `submit()`은 성공이든 실패든 선택 파일과 이름, 미리보기를 비웁니다.
//! 취소 토큰이 먼저 취소되면 아무 상태도 바꾸지 않고 `Cancelled`를 돌려줍니다.

use super::{ApiClient, ClientError};
use crate::{
    models::{mime_type_for, AiFileRequest, CreateFileRequest, FileRecord, Folder},
    services::naming::{sanitize_file_name, upload_path, with_extension_of},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// 업로드할 파일. 내용은 읽을 때 한 번만 base64로 인코딩합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub base64: String,
    text: Option<String>,
}

impl SelectedFile {
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Self {
        let mime_type = mime_type_for(name).to_string();
        let text = (mime_type == "text/plain").then(|| String::from_utf8_lossy(bytes).into_owned());

        Self {
            name: name.to_string(),
            mime_type,
            base64: STANDARD.encode(bytes),
            text,
        }
    }

    pub async fn read(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::from_bytes(&name, &bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// AI에 보낼 입력: 텍스트 파일은 본문, 그 외(이미지, 바이너리)는 base64
    fn ai_request(&self) -> AiFileRequest {
        AiFileRequest {
            input: self.text.clone().unwrap_or_else(|| self.base64.clone()),
            is_image: self.is_image(),
            mime_type: self.mime_type.clone(),
            file_name: Some(self.name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Succeeded,
    /// `"Upload failed: <message>"`
    Failed(String),
}

#[derive(Debug, Default)]
pub struct UploadForm {
    selected: Option<SelectedFile>,
    ai_name: Option<String>,
    use_ai_name: bool,
    custom_name: Option<String>,
    preview: String,
    notice: Option<String>,
    status: UploadStatus,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 파일을 고르면 이전 추천과 이름 선택은 버립니다.
    pub fn select(&mut self, file: SelectedFile) {
        self.clear_selection();
        self.selected = Some(file);
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn ai_name(&self) -> Option<&str> {
        self.ai_name.as_deref()
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn set_preview(&mut self, preview: impl Into<String>) {
        self.preview = preview.into();
    }

    /// AI 추천 실패 등 사용자에게 보여줄 안내
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    /// AI 이름과 미리보기를 각각 한 번씩 요청합니다. 재시도는 하지 않습니다.
    ///
    /// 실패하면 원래 이름을 유지하고 안내 문구를 남깁니다.
    pub async fn fetch_suggestions(&mut self, client: &ApiClient) -> Result<(), UploadError> {
        let request = self
            .selected
            .as_ref()
            .ok_or(UploadError::NoFileSelected)?
            .ai_request();

        match client.ai_rename(&request).await {
            Ok(name) => self.ai_name = Some(sanitize_file_name(name.trim())),
            Err(e) => {
                tracing::warn!("AI rename suggestion failed: {}", e);
                self.ai_name = None;
                self.notice = Some(format!("AI name suggestion unavailable: {}", e));
            }
        }

        match client.ai_preview(&request).await {
            Ok(preview) => self.preview = preview,
            Err(e) => {
                tracing::warn!("AI preview suggestion failed: {}", e);
                self.notice = Some(format!("AI preview unavailable: {}", e));
            }
        }

        Ok(())
    }

    pub fn use_ai_name(&mut self, enabled: bool) {
        self.use_ai_name = enabled;
        if enabled {
            self.custom_name = None;
        }
    }

    /// 사용자 지정 기본 이름을 씁니다. 원래 확장자는 유지됩니다.
    pub fn use_custom_name(&mut self, base: &str) {
        let base = base.trim();
        self.custom_name = match &self.selected {
            Some(file) if !base.is_empty() => Some(with_extension_of(base, &file.name)),
            _ => None,
        };
        if self.custom_name.is_some() {
            self.use_ai_name = false;
        }
    }

    /// 업로드될 이름: 사용자 지정 > (선택한 경우) AI 추천 > 원래 이름. 항상 정리된 값입니다.
    pub fn candidate_name(&self) -> Option<String> {
        let file = self.selected.as_ref()?;
        let chosen = self
            .custom_name
            .as_deref()
            .or(self.ai_name.as_deref().filter(|_| self.use_ai_name))
            .filter(|name| !name.is_empty())
            .unwrap_or(&file.name);
        Some(sanitize_file_name(chosen))
    }

    pub fn target_path(&self, folder: &Folder) -> Option<String> {
        self.candidate_name().map(|name| upload_path(folder, &name))
    }

    /// 현재 폴더에 업로드합니다.
    ///
    /// 성공하면 `on_success`를 정확히 한 번 호출합니다. 실패하면 호출하지 않고
    /// 상태를 `Failed("Upload failed: ...")`로 남깁니다.
    pub async fn submit<F>(
        &mut self,
        client: &ApiClient,
        folder: &Folder,
        cancel: &CancellationToken,
        on_success: F,
    ) -> Result<FileRecord, UploadError>
    where
        F: FnOnce(&FileRecord),
    {
        let file = self.selected.as_ref().ok_or(UploadError::NoFileSelected)?;
        let name = self.candidate_name().unwrap_or_else(|| sanitize_file_name(&file.name));
        let request = CreateFileRequest {
            path: upload_path(folder, &name),
            name,
            content: Some(file.base64.clone()),
            preview: Some(self.preview.clone()),
            folder_id: folder.id.clone(),
            tags: None,
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled.into()),
            result = client.create_file(&request) => result,
        };

        self.clear_selection();
        match result {
            Ok(response) => {
                tracing::info!(file_id = %response.file.id, path = %response.file.path, "upload finished");
                self.status = UploadStatus::Succeeded;
                on_success(&response.file);
                Ok(response.file)
            }
            Err(e) => {
                self.status = UploadStatus::Failed(format!("Upload failed: {}", e));
                Err(e.into())
            }
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.ai_name = None;
        self.use_ai_name = false;
        self.custom_name = None;
        self.preview.clear();
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing;
    use crate::models::FolderRef;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;
    use std::cell::Cell;

    fn nested_folder() -> Folder {
        Folder {
            id: Some("f2".to_string()),
            name: "Inner".to_string(),
            parent_id: Some("f1".to_string()),
            path: vec![FolderRef::new("f1", "Outer")],
            tags: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn encodes_and_classifies_selection() {
        let file = SelectedFile::from_bytes("notes.txt", b"hello");
        assert_eq!(file.base64, "aGVsbG8=");
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.ai_request().input, "hello");

        let image = SelectedFile::from_bytes("cat.PNG", &[0x89, b'P', b'N', b'G']);
        assert!(image.is_image());
        assert_eq!(image.ai_request().input, image.base64);
    }

    #[test]
    fn binary_files_send_base64_to_ai() {
        let pdf = SelectedFile::from_bytes("doc.pdf", b"%PDF\xff\xfe\x00\x80");
        let request = pdf.ai_request();
        assert_eq!(request.input, "JVBERv/+AIA=");
        assert_eq!(request.mime_type, "application/octet-stream");
        assert!(!request.is_image);
    }

    #[test]
    fn name_choice_precedence() {
        let mut form = UploadForm::new();
        form.select(SelectedFile::from_bytes("My Scan!.pdf", b"%PDF"));
        assert_eq!(form.candidate_name().as_deref(), Some("My_Scan_.pdf"));

        form.ai_name = Some("Tax_Return_2024.pdf".to_string());
        assert_eq!(form.candidate_name().as_deref(), Some("My_Scan_.pdf"));
        form.use_ai_name(true);
        assert_eq!(form.candidate_name().as_deref(), Some("Tax_Return_2024.pdf"));

        form.use_custom_name("quarterly taxes");
        assert_eq!(form.candidate_name().as_deref(), Some("quarterly_taxes.pdf"));
        assert_eq!(
            form.target_path(&nested_folder()).as_deref(),
            Some("f1/f2/quarterly_taxes.pdf")
        );
    }

    #[tokio::test]
    async fn reads_from_disk() {
        let path = std::env::temp_dir().join(format!("filenest-{}.txt", uuid::Uuid::now_v7()));
        tokio::fs::write(&path, b"disk contents").await.unwrap();
        let file = SelectedFile::read(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(file.name.ends_with(".txt"));
        assert_eq!(STANDARD.decode(&file.base64).unwrap(), b"disk contents");
    }

    #[tokio::test]
    async fn server_error_sets_failure_and_skips_callback() {
        let router = Router::new().route(
            "/api/files",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
            }),
        );
        let base = testing::serve(router).await;
        let client = ApiClient::new(&base).with_token("t");

        let mut form = UploadForm::new();
        form.select(SelectedFile::from_bytes("a.txt", b"a"));
        form.set_preview("letter a");
        let calls = Cell::new(0);

        let result = form
            .submit(&client, &Folder::root(), &CancellationToken::new(), |_| {
                calls.set(calls.get() + 1)
            })
            .await;

        assert!(matches!(result, Err(UploadError::Client(ClientError::Api { status: 500, .. }))));
        assert_eq!(calls.get(), 0);
        assert_eq!(
            form.status(),
            &UploadStatus::Failed("Upload failed: Internal server error".to_string())
        );
        assert!(form.selected().is_none());
        assert_eq!(form.preview(), "");
    }

    #[tokio::test]
    async fn success_notifies_once_and_clears_form() {
        let (base, _app) = testing::serve_app(None).await;
        let mut client = ApiClient::new(&base);
        client.register("a@example.com", "correct horse", None).await.unwrap();

        let mut form = UploadForm::new();
        form.select(SelectedFile::from_bytes("My File!@#.txt", b"hello"));
        form.set_preview("greeting");
        let calls = Cell::new(0);

        let file = form
            .submit(&client, &Folder::root(), &CancellationToken::new(), |file| {
                assert_eq!(file.name, "My_File___.txt");
                calls.set(calls.get() + 1);
            })
            .await
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(file.path, "My_File___.txt");
        assert_eq!(file.preview, "greeting");
        assert!(file.folder_id.is_none());
        assert_eq!(form.status(), &UploadStatus::Succeeded);
        assert!(form.selected().is_none());
        assert!(form.candidate_name().is_none());
    }

    #[tokio::test]
    async fn empty_file_uploads() {
        let (base, _app) = testing::serve_app(None).await;
        let mut client = ApiClient::new(&base);
        client.register("a@example.com", "correct horse", None).await.unwrap();

        let mut form = UploadForm::new();
        form.select(SelectedFile::from_bytes("empty.txt", b""));
        let file = form
            .submit(&client, &Folder::root(), &CancellationToken::new(), |_| {})
            .await
            .unwrap();

        assert_eq!(file.name, "empty.txt");
        assert_eq!(file.content, "");
        assert_eq!(form.status(), &UploadStatus::Succeeded);
    }

    #[tokio::test]
    async fn ai_suggestion_is_sanitized_and_opt_in() {
        let (base, _app) = testing::serve_app(Some("Quarterly Report.txt")).await;
        let mut client = ApiClient::new(&base);
        client.register("a@example.com", "correct horse", None).await.unwrap();

        let mut form = UploadForm::new();
        form.select(SelectedFile::from_bytes("notes.txt", b"revenue up"));
        form.fetch_suggestions(&client).await.unwrap();

        assert_eq!(form.ai_name(), Some("Quarterly_Report.txt"));
        assert_eq!(form.preview(), "Quarterly Report.txt");
        assert_eq!(form.candidate_name().as_deref(), Some("notes.txt"));

        form.use_ai_name(true);
        let file = form
            .submit(&client, &Folder::root(), &CancellationToken::new(), |_| {})
            .await
            .unwrap();
        assert_eq!(file.name, "Quarterly_Report.txt");
    }

    #[tokio::test]
    async fn failed_suggestion_keeps_original_name() {
        let (base, app) = testing::serve_app(None).await;
        let mut client = ApiClient::new(&base);
        client.register("a@example.com", "correct horse", None).await.unwrap();

        let mut form = UploadForm::new();
        form.select(SelectedFile::from_bytes("notes.txt", b"text"));
        form.fetch_suggestions(&client).await.unwrap();
        form.use_ai_name(true);

        assert!(form.notice().is_some());
        assert_eq!(form.candidate_name().as_deref(), Some("notes.txt"));
        // 이름/미리보기 각각 정확히 한 번
        assert_eq!(app.ai.prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cancelled_submit_leaves_state_untouched() {
        let client = ApiClient::new("http://127.0.0.1:9").with_token("t");
        let mut form = UploadForm::new();
        form.select(SelectedFile::from_bytes("a.txt", b"a"));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = form.submit(&client, &Folder::root(), &cancel, |_| {}).await;

        assert!(matches!(result, Err(UploadError::Client(ClientError::Cancelled))));
        assert!(form.selected().is_some());
        assert_eq!(form.status(), &UploadStatus::Idle);
    }

    #[tokio::test]
    async fn submit_without_selection_is_an_error() {
        let client = ApiClient::new("http://127.0.0.1:9").with_token("t");
        let mut form = UploadForm::new();
        let result = form
            .submit(&client, &Folder::root(), &CancellationToken::new(), |_| {})
            .await;
        assert!(matches!(result, Err(UploadError::NoFileSelected)));
    }
}
