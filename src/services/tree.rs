//! # 파일 경로 재구성
//!
//! 파일의 저장 경로는 폴더 ID로 이루어져 있습니다 (`"f1/f2/report.pdf"`).
//! 화면과 어시스턴트에는 사람이 읽을 수 있는 폴더 이름 경로
//! (`"root/Work/2024/report.pdf"`)가 필요하므로, 사용자의 폴더 목록으로
//! ID → 이름 테이블을 만들어 각 세그먼트를 바꿉니다.
//!
//! 이 함수는 실패하지 않습니다. 찾을 수 없는 폴더 ID(삭제/이름 변경 직후 등)는
//! 원래 ID를 그대로 보여줍니다.

use crate::models::{FileRecord, FolderRef};
use std::collections::HashMap;

/// 재구성된 경로의 첫 세그먼트
pub const ROOT_SEGMENT: &str = "root";
/// 저장 경로에서 "폴더 없음(루트)"을 뜻하는 세그먼트
pub const NULL_SEGMENT: &str = "null";

/// 각 파일의 `path`를 폴더 이름 경로로 덮어씁니다.
///
/// - 입력 목록 중 하나라도 비어 있으면 경고를 남기고 파일을 그대로 돌려줍니다.
/// - 결과의 길이와 순서는 입력과 같고, `path` 외의 필드는 건드리지 않습니다.
pub fn reconstruct_file_paths(folders: &[FolderRef], files: Vec<FileRecord>) -> Vec<FileRecord> {
    if folders.is_empty() || files.is_empty() {
        tracing::warn!(
            folders = folders.len(),
            files = files.len(),
            "reconstruct_file_paths: empty input, returning files unchanged"
        );
        return files;
    }

    let names: HashMap<&str, &str> = folders
        .iter()
        .map(|f| (f.id.as_str(), f.name.as_str()))
        .collect();

    files
        .into_iter()
        .map(|mut file| {
            file.path = readable_path(&names, &file.path, &file.name);
            file
        })
        .collect()
}

/// 저장 경로 하나를 읽기 쉬운 경로로 바꿉니다.
///
/// 저장 경로가 `null`로 시작하면 마지막 세그먼트는 폴더이므로 파일 이름을 뒤에 붙이고,
/// 그렇지 않으면 마지막 세그먼트(저장된 파일 이름)를 현재 파일 이름으로 교체합니다.
fn readable_path(names: &HashMap<&str, &str>, raw: &str, file_name: &str) -> String {
    let segments: Vec<&str> = if raw.is_empty() {
        Vec::new()
    } else {
        raw.split('/').collect()
    };

    let mut readable: Vec<&str> = segments
        .iter()
        .map(|segment| {
            if *segment == NULL_SEGMENT {
                ROOT_SEGMENT
            } else {
                names.get(*segment).copied().unwrap_or(*segment)
            }
        })
        .collect();

    if readable.first() != Some(&ROOT_SEGMENT) {
        readable.insert(0, ROOT_SEGMENT);
    }

    // 빈 경로에서도 루트 표시는 남깁니다.
    let name_index = segments.len().max(1);
    if name_index < readable.len() {
        readable[name_index] = file_name;
    } else {
        readable.push(file_name);
    }

    readable.join("/")
}
