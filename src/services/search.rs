//! # 폴더/파일 검색 필터
//!
//! 검색창 하나로 세 종류의 조건을 표현합니다.
//!
//! | 토큰 | 예시 | 의미 |
//! |------|------|------|
//! | 일반 텍스트 | `report` | 이름에 부분 문자열로 포함 (대소문자 무시) |
//! | `#tag` | `#work` | 항목의 `tags`에 포함 |
//! | `type:ext` | `type:pdf` | 파일 이름이 `.pdf`로 끝남 (폴더는 항상 통과) |
//!
//! 세 조건을 모두 만족하는 항목만 보여주며, 필터링은 원래 순서를 바꾸지 않습니다.

use crate::models::{FileRecord, Folder};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+|type:\w+").expect("static token pattern"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("static tag pattern"));
static TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"type:(\w+)").expect("static type pattern"));

/// 검색 대상이 될 수 있는 항목
pub trait Searchable {
    /// 화면에 표시되는 이름
    fn display_name(&self) -> &str;

    /// 쉼표 구분 태그 문자열
    fn tags(&self) -> Option<&str>;

    /// 파일이면 `Some(이름)`, 폴더면 `None` (type: 조건을 항상 통과)
    fn file_name(&self) -> Option<&str>;
}

impl Searchable for Folder {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    fn file_name(&self) -> Option<&str> {
        None
    }
}

impl Searchable for FileRecord {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    fn file_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// 강조 표시를 위해 나눈 이름 조각
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'t> {
    Plain(&'t str),
    Match(&'t str),
}

/// 파싱된 검색어
#[derive(Debug, Clone)]
pub struct SearchQuery {
    cleaned: String,
    cleaned_lower: String,
    tag: Option<String>,
    file_type: Option<String>,
    highlighter: Option<Regex>,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Self {
        let cleaned = TOKEN_RE.replace_all(raw, "").trim().to_string();
        let tag = TAG_RE
            .captures(raw)
            .map(|caps| caps[1].to_lowercase());
        let file_type = TYPE_RE
            .captures(raw)
            .map(|caps| caps[1].to_lowercase());

        let highlighter = if cleaned.is_empty() {
            None
        } else {
            RegexBuilder::new(&regex::escape(&cleaned))
                .case_insensitive(true)
                .build()
                .ok()
        };

        Self {
            cleaned_lower: cleaned.to_lowercase(),
            cleaned,
            tag,
            file_type,
            highlighter,
        }
    }

    /// `#tag`, `type:x` 토큰을 뺀 검색어
    pub fn cleaned(&self) -> &str {
        &self.cleaned
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn file_type(&self) -> Option<&str> {
        self.file_type.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.cleaned.is_empty() && self.tag.is_none() && self.file_type.is_none()
    }

    pub fn matches_name(&self, name: Option<&str>) -> bool {
        if self.cleaned.is_empty() {
            return true;
        }
        name.map(|n| n.trim().to_lowercase().contains(&self.cleaned_lower))
            .unwrap_or(false)
    }

    pub fn matches_tag(&self, tags: Option<&str>) -> bool {
        let Some(tag) = &self.tag else {
            return true;
        };
        tags.map(|t| t.trim().to_lowercase().contains(tag.as_str()))
            .unwrap_or(false)
    }

    pub fn matches_type(&self, file_name: Option<&str>) -> bool {
        let (Some(ext), Some(name)) = (&self.file_type, file_name) else {
            return true;
        };
        name.to_lowercase().ends_with(&format!(".{}", ext))
    }

    pub fn matches<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        self.matches_name(Some(item.display_name()))
            && self.matches_tag(item.tags())
            && self.matches_type(item.file_name())
    }

    /// 조건에 맞는 항목만 원래 순서대로 돌려줍니다.
    pub fn filter<'a, T: Searchable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }

    /// 현재 폴더에 속한 파일 중 조건에 맞는 것만 돌려줍니다.
    ///
    /// 루트 폴더에서는 `folder_id`가 `None`인 파일만 해당합니다.
    pub fn visible_files<'a>(&self, files: &'a [FileRecord], current: &Folder) -> Vec<&'a FileRecord> {
        files
            .iter()
            .filter(|file| file.folder_id == current.id && self.matches(*file))
            .collect()
    }

    /// 이름을 일반/일치 조각으로 나눕니다. 검색어가 비어 있으면 통째로 `Plain`입니다.
    pub fn highlight<'t>(&self, text: &'t str) -> Vec<Fragment<'t>> {
        let Some(re) = &self.highlighter else {
            return vec![Fragment::Plain(text)];
        };

        let mut fragments = Vec::new();
        let mut last = 0;
        for m in re.find_iter(text) {
            if m.start() > last {
                fragments.push(Fragment::Plain(&text[last..m.start()]));
            }
            fragments.push(Fragment::Match(m.as_str()));
            last = m.end();
        }
        if last < text.len() || fragments.is_empty() {
            fragments.push(Fragment::Plain(&text[last..]));
        }
        fragments
    }

    /// 일치 부분을 `<mark>…</mark>`로 감싼 HTML. 이름 자체는 이스케이프됩니다.
    pub fn mark(&self, text: &str) -> String {
        self.highlight(text)
            .into_iter()
            .map(|fragment| match fragment {
                Fragment::Plain(s) => escape_html(s),
                Fragment::Match(s) => format!("<mark>{}</mark>", escape_html(s)),
            })
            .collect()
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
