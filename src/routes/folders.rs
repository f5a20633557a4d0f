//! # 폴더(Folder) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/folders`              → 새 폴더 `{ success, folderId }`
//! - `PUT    /api/folders/{id}`         → 이름 변경 `{ success, message }`
//! - `DELETE /api/folders/{id}`         → 하위 폴더·파일까지 삭제 `{ success, message }`
//! - `GET    /api/folders/{id}`         → 폴더 하나 `{ folder }`
//! - `GET    /api/folders?parentId=`    → 자식 폴더 (`null` = 루트) `{ folders }`
//! - `GET    /api/folders/user`         → 내 폴더 전체 `{ folders }`
//!
//! 폴더는 `parent_id`로 트리를 이루고, `path`는 서버가 부모 레코드에서 계산합니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::{folder_id_param, AppState},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentQuery {
    pub parent_id: Option<String>,
}

/// `POST /folders`
///
/// 요청 본문의 `pathArr`는 무시하고 부모 폴더의 `path`에 부모 자신을 붙여 저장합니다.
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<Json<CreateFolderResponse>, AppError> {
    let name = req.folder_name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Missing folderName".to_string()));
    }

    let parent = match req.parent_id.as_deref().and_then(folder_id_param) {
        Some(parent_id) => Some(
            db::find_folder(&state.pool, &auth.user_id, parent_id)
                .await?
                .ok_or(AppError::NotFound)?,
        ),
        None => None,
    };

    let folder = db::create_folder(
        &state.pool,
        &auth.user_id,
        name,
        parent.as_ref(),
        req.tags.as_deref(),
    )
    .await?;

    if req.path_arr.as_ref().is_some_and(|given| *given != folder.path) {
        tracing::debug!(folder_id = ?folder.id, "client pathArr differs from derived path");
    }

    let folder_id = folder
        .id
        .ok_or(AppError::Internal("Created folder has no id".to_string()))?;
    tracing::info!(folder_id = %folder_id, "folder created");

    Ok(Json(CreateFolderResponse {
        success: true,
        folder_id,
    }))
}

/// `PUT /folders/{id}`: 이름만 바꿀 수 있습니다.
pub async fn update_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateFolderRequest>,
) -> Result<Json<Value>, AppError> {
    let name = req.folder_name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Missing folderName".to_string()));
    }

    if !db::rename_folder(&state.pool, &auth.user_id, &id, name).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "success": true, "message": "Folder updated" })))
}

pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !db::delete_folder(&state.pool, &auth.user_id, &id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(folder_id = %id, "folder deleted with its contents");

    Ok(Json(json!({ "success": true, "message": "Folder deleted" })))
}

pub async fn get_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FolderResponse>, AppError> {
    let folder = db::find_folder(&state.pool, &auth.user_id, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(FolderResponse { folder }))
}

/// `parentId` 쿼리가 아예 없으면 400입니다. 루트 조회는 `?parentId=null`.
pub async fn list_folders_by_parent(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ParentQuery>,
) -> Result<Json<FoldersResponse>, AppError> {
    let parent_id = query
        .parent_id
        .ok_or(AppError::BadRequest("Missing parentId".to_string()))?;

    let folders =
        db::list_folders_by_parent(&state.pool, &auth.user_id, folder_id_param(&parent_id)).await?;
    Ok(Json(FoldersResponse { folders }))
}

pub async fn list_user_folders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<FoldersResponse>, AppError> {
    let folders = db::list_user_folders(&state.pool, &auth.user_id).await?;
    Ok(Json(FoldersResponse { folders }))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::TestApp;
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    async fn create(app: &TestApp, token: &str, name: &str, parent: Value) -> String {
        let (status, body) = app
            .send(
                Method::POST,
                "/api/folders",
                Some(token),
                Some(json!({ "folderName": name, "parentId": parent })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["success"], true);
        body["folderId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn create_nested_and_list() {
        let app = TestApp::new(None).await;
        let token = app.register("a@example.com").await;

        let docs = create(&app, &token, "Docs", Value::Null).await;
        let inner = create(&app, &token, "Inner", json!(docs)).await;

        let (_, roots) = app
            .send(Method::GET, "/api/folders?parentId=null", Some(&token), None)
            .await;
        assert_eq!(roots["folders"].as_array().unwrap().len(), 1);
        assert_eq!(roots["folders"][0]["name"], "Docs");

        let (_, children) = app
            .send(
                Method::GET,
                &format!("/api/folders?parentId={docs}"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(children["folders"][0]["id"], inner.as_str());
        assert_eq!(children["folders"][0]["parentId"], docs.as_str());
        assert_eq!(children["folders"][0]["path"], json!([{ "id": docs, "name": "Docs" }]));

        let (_, all) = app.send(Method::GET, "/api/folders/user", Some(&token), None).await;
        assert_eq!(all["folders"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn client_path_arr_is_not_trusted() {
        let app = TestApp::new(None).await;
        let token = app.register("a@example.com").await;
        let (_, body) = app
            .send(
                Method::POST,
                "/api/folders",
                Some(&token),
                Some(json!({
                    "folderName": "Top",
                    "parentId": null,
                    "pathArr": [{ "id": "forged", "name": "Forged" }]
                })),
            )
            .await;
        let id = body["folderId"].as_str().unwrap();

        let (_, fetched) = app
            .send(Method::GET, &format!("/api/folders/{id}"), Some(&token), None)
            .await;
        assert_eq!(fetched["folder"]["path"], json!([]));
    }

    #[tokio::test]
    async fn validation_errors() {
        let app = TestApp::new(None).await;
        let token = app.register("a@example.com").await;

        let (status, body) = app
            .send(Method::POST, "/api/folders", Some(&token), Some(json!({ "folderName": " " })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Missing folderName");

        let (status, _) = app.send(Method::GET, "/api/folders", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/folders",
                Some(&token),
                Some(json!({ "folderName": "Orphan", "parentId": "missing" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rename_and_cascade_delete() {
        let app = TestApp::new(None).await;
        let token = app.register("a@example.com").await;
        let docs = create(&app, &token, "Docs", Value::Null).await;
        let inner = create(&app, &token, "Inner", json!(docs)).await;
        app.send(
            Method::POST,
            "/api/files",
            Some(&token),
            Some(json!({ "name": "a.txt", "content": "YQ==", "path": format!("{docs}/{inner}/a.txt"), "folderId": inner })),
        )
        .await;

        let (status, body) = app
            .send(
                Method::PUT,
                &format!("/api/folders/{docs}"),
                Some(&token),
                Some(json!({ "folderName": "Papers" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Folder updated");

        let (_, fetched) = app
            .send(Method::GET, &format!("/api/folders/{inner}"), Some(&token), None)
            .await;
        assert_eq!(fetched["folder"]["path"][0]["name"], "Papers");

        let (status, body) = app
            .send(Method::DELETE, &format!("/api/folders/{docs}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Folder deleted");

        let (_, all) = app.send(Method::GET, "/api/folders/user", Some(&token), None).await;
        assert!(all["folders"].as_array().unwrap().is_empty());
        let (_, files) = app.send(Method::GET, "/api/files/user", Some(&token), None).await;
        assert!(files["files"].as_array().unwrap().is_empty());

        let (status, _) = app
            .send(Method::GET, &format!("/api/folders/{docs}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
