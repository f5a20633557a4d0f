//! # 폴더(Folder) 모델
//!
//! 사용자 네임스페이스의 계층 노드입니다.
//! `id`가 `None`인 폴더는 루트(Root) 센티널이며, DB에는 저장되지 않습니다.
//!
//! `path`는 루트(제외)부터 자기 자신(제외)까지의 조상 목록입니다.
//! 예: `Docs/Reports/2024` 폴더의 path → `[Docs, Reports]`

use serde::{Deserialize, Serialize};

/// 루트 센티널 폴더의 표시 이름
pub const ROOT_FOLDER_NAME: &str = "Root";

/// 조상 체인의 한 칸: `{ id, name }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    pub id: String,
    pub name: String,
}

impl FolderRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// 폴더 엔티티: DB의 `folders` 테이블 한 행에 대응합니다.
///
/// `#[serde(rename_all = "camelCase")]`: JSON에서는 `parentId`, `createdAt`처럼
/// camelCase로 주고받습니다. DB 컬럼 매핑(`sqlx::FromRow`)은 필드명을 그대로 씁니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// `None`이면 루트 센티널
    pub id: Option<String>,
    pub name: String,
    pub parent_id: Option<String>,
    /// TEXT 컬럼에 JSON 배열로 저장됩니다 (`#[sqlx(json)]`).
    #[sqlx(json)]
    #[serde(default)]
    pub path: Vec<FolderRef>,
    /// 쉼표로 구분된 태그 (예: "work,urgent")
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl Folder {
    /// 루트 센티널 폴더를 만듭니다.
    pub fn root() -> Self {
        Self {
            id: None,
            name: ROOT_FOLDER_NAME.to_string(),
            parent_id: None,
            path: Vec::new(),
            tags: None,
            created_at: String::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.id.is_none()
    }

    /// 이 폴더 안에 새 항목을 둘 때 사용할 조상 ID 체인.
    ///
    /// 루트면 빈 체인, 아니면 `path`의 ID들 뒤에 자기 자신의 ID를 붙입니다.
    pub fn id_chain(&self) -> Vec<String> {
        let mut chain: Vec<String> = self.path.iter().map(|p| p.id.clone()).collect();
        if let Some(id) = &self.id {
            chain.push(id.clone());
        }
        chain
    }

    /// 자식 폴더의 `path`가 될 값 (자기 path + 자기 자신)
    pub fn child_path(&self) -> Vec<FolderRef> {
        let mut path = self.path.clone();
        if let Some(id) = &self.id {
            path.push(FolderRef::new(id.clone(), self.name.clone()));
        }
        path
    }

    pub fn as_ref_entry(&self) -> Option<FolderRef> {
        self.id
            .as_ref()
            .map(|id| FolderRef::new(id.clone(), self.name.clone()))
    }
}

/// `POST /api/folders` 요청 본문
///
/// `pathArr`는 호환성을 위해 받지만, 서버는 부모 폴더 레코드로 path를 다시 계산합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    #[serde(default)]
    pub folder_name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub path_arr: Option<Vec<FolderRef>>,
    #[serde(default)]
    pub tags: Option<String>,
}

/// `PUT /api/folders/{folderId}` 요청 본문
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    #[serde(default)]
    pub folder_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderResponse {
    pub success: bool,
    pub folder_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldersResponse {
    pub folders: Vec<Folder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderResponse {
    pub folder: Folder,
}
