//! # 파일 이름 정리 및 저장 경로 생성
//!
//! - `sanitize_file_name()`: 허용 문자(`A-Z a-z 0-9 _ . -`) 외에는 `_`로 치환
//! - `upload_path()`: 현재 폴더의 조상 ID 체인 + 정리된 파일 이름
//! - `with_extension_of()`: 사용자 지정 이름에 원래 확장자를 붙임

use crate::models::Folder;

/// 파일 이름을 저장 가능한 문자 집합으로 정리합니다.
///
/// 문자 하나당 `_` 하나로 바뀌므로 길이(문자 수)가 보존되고,
/// 두 번 적용해도 결과가 같습니다 (멱등).
///
/// ```text
/// "My File!@#.txt" → "My_File___.txt"
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// 업로드 대상 경로를 만듭니다.
///
/// 루트 폴더면 `"<name>"`, 아니면 `"<조상 id>/.../<폴더 id>/<name>"`입니다.
pub fn upload_path(folder: &Folder, sanitized_name: &str) -> String {
    let mut segments = folder.id_chain();
    segments.push(sanitized_name.to_string());
    segments.join("/")
}

/// 사용자 지정 기본 이름에 원래 파일의 확장자를 붙입니다.
///
/// `with_extension_of("quarterly", "scan.pdf")` → `"quarterly.pdf"`
pub fn with_extension_of(base: &str, original_name: &str) -> String {
    match original_name.rfind('.') {
        Some(idx) => format!("{}{}", base, &original_name[idx..]),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FolderRef;

    #[test]
    fn sanitize_replaces_each_disallowed_char() {
        assert_eq!(sanitize_file_name("My File!@#.txt"), "My_File___.txt");
        assert_eq!(sanitize_file_name("ok-name_1.tar.gz"), "ok-name_1.tar.gz");
        assert_eq!(sanitize_file_name("보고서.pdf"), "___.pdf");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["My File!@#.txt", "a b/c\\d", "", "..", "émoji 🎉.png"] {
            let once = sanitize_file_name(raw);
            assert_eq!(sanitize_file_name(&once), once);
            assert!(once
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')));
        }
    }

    #[test]
    fn upload_path_for_root_is_just_the_name() {
        assert_eq!(upload_path(&Folder::root(), "a.txt"), "a.txt");
    }

    #[test]
    fn upload_path_joins_ancestor_ids() {
        let folder = Folder {
            id: Some("f2".to_string()),
            name: "Inner".to_string(),
            parent_id: Some("f1".to_string()),
            path: vec![FolderRef::new("f1", "Outer")],
            tags: None,
            created_at: String::new(),
        };
        assert_eq!(upload_path(&folder, "a.txt"), "f1/f2/a.txt");
    }

    #[test]
    fn custom_name_keeps_original_extension() {
        assert_eq!(with_extension_of("quarterly", "scan.pdf"), "quarterly.pdf");
        assert_eq!(with_extension_of("notes", "README"), "notes");
    }
}
