// src/utils.rs

use crate::constants;
use regex::Regex;
use std::{collections::BTreeSet, path::Path, sync::LazyLock};

static ILLEGAL_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).unwrap());

/// 把文件名中的非法路径字符替换为下划线，并限制字节长度。
/// 截断时保证不破坏 UTF-8 字符，也不丢失扩展名。
pub fn sanitize_filename(name: &str) -> String {
    let original = name.trim();
    if original.is_empty() {
        return "unknown".to_string();
    }

    let mut name = ILLEGAL_CHARS_RE.replace_all(original, "_").into_owned();
    name = name
        .trim_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string();
    if name.is_empty() {
        return "unnamed".to_string();
    }

    if name.len() > constants::MAX_FILENAME_BYTES {
        if let (Some(stem), Some(ext)) = (Path::new(&name).file_stem(), Path::new(&name).extension())
        {
            let stem = stem.to_string_lossy();
            let ext = format!(".{}", ext.to_string_lossy());
            let max_stem_bytes = constants::MAX_FILENAME_BYTES.saturating_sub(ext.len());
            name = format!("{}{}", safe_truncate_utf8(&stem, max_stem_bytes), ext);
        } else {
            name = safe_truncate_utf8(&name, constants::MAX_FILENAME_BYTES).to_string();
        }
    }
    name
}

/// 确保文件名以音频扩展名结尾（大小写不敏感）
pub fn ensure_audio_extension(name: &str) -> String {
    let suffix = format!(".{}", constants::AUDIO_EXTENSION);
    if name.to_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

fn safe_truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut i = max_bytes;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    &s[..i]
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 {
        text.to_string()
    } else {
        format!("{}...", &text[..end_pos])
    }
}

/// 选择串的解析结果：有效下标（0 起始、去重、升序）加上被丢弃的原始 token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub indices: Vec<usize>,
    pub rejected: Vec<String>,
}

/// 解析用户输入的选择串。支持逗号分隔的 1 起始编号与 `a-b` 闭区间，
/// 以及 `all` 关键字；空输入默认选中第一项。
/// 非法或越界的 token 被记入 `rejected`，其余 token 照常生效。
pub fn parse_selection_indices(selection_str: &str, total_items: usize) -> Selection {
    let trimmed = selection_str.trim();
    if trimmed.is_empty() {
        return Selection {
            indices: if total_items > 0 { vec![0] } else { vec![] },
            rejected: vec![],
        };
    }
    if trimmed.eq_ignore_ascii_case("all") {
        return Selection {
            indices: (0..total_items).collect(),
            rejected: vec![],
        };
    }

    let mut indices = BTreeSet::new();
    let mut rejected = Vec::new();
    for part in trimmed.split(',').map(|s| s.trim()) {
        if part.is_empty() {
            continue;
        }
        if let Some((left, right)) = part.split_once('-') {
            match (left.trim().parse::<usize>(), right.trim().parse::<usize>()) {
                (Ok(start), Ok(end)) if start > 0 && end > 0 => {
                    let (min, max) = (start.min(end), start.max(end));
                    let mut any_valid = false;
                    for i in min..=max {
                        if i <= total_items {
                            indices.insert(i - 1);
                            any_valid = true;
                        }
                    }
                    if !any_valid {
                        rejected.push(part.to_string());
                    }
                }
                _ => rejected.push(part.to_string()),
            }
        } else {
            match part.parse::<usize>() {
                Ok(num) if num > 0 && num <= total_items => {
                    indices.insert(num - 1);
                }
                _ => rejected.push(part.to_string()),
            }
        }
    }
    Selection {
        indices: indices.into_iter().collect(),
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection_indices() {
        // 基本情况
        let sel = parse_selection_indices("1,2,5", 6);
        assert_eq!(sel.indices, vec![0, 1, 4]);
        assert!(sel.rejected.is_empty());

        // 范围
        assert_eq!(parse_selection_indices("1-3", 6).indices, vec![0, 1, 2]);

        // 反向范围按闭区间处理
        assert_eq!(parse_selection_indices("4-2", 6).indices, vec![1, 2, 3]);

        // 空输入默认选中第一项
        assert_eq!(parse_selection_indices("", 6).indices, vec![0]);
        assert_eq!(parse_selection_indices("", 0).indices, Vec::<usize>::new());

        // all 关键字（大小写不敏感）
        assert_eq!(parse_selection_indices("All", 3).indices, vec![0, 1, 2]);

        // 越界编号被丢弃并记录
        let sel = parse_selection_indices("9", 6);
        assert!(sel.indices.is_empty());
        assert_eq!(sel.rejected, vec!["9".to_string()]);

        // 非法 token 不影响其余有效 token
        let sel = parse_selection_indices("1,foo,1-x,3", 6);
        assert_eq!(sel.indices, vec![0, 2]);
        assert_eq!(sel.rejected, vec!["foo".to_string(), "1-x".to_string()]);

        // 混合、乱序、重复
        let sel = parse_selection_indices("5, 1-2, 1", 6);
        assert_eq!(sel.indices, vec![0, 1, 4]);
    }

    #[test]
    fn test_sanitize_filename() {
        // 非法字符替换为下划线
        assert_eq!(sanitize_filename("a/b:c*d"), "a_b_c_d".to_string());
        assert_eq!(sanitize_filename(r#"歌手?歌名"#), "歌手_歌名".to_string());
        assert_eq!(sanitize_filename("a\\b|c"), "a_b_c".to_string());

        // 首尾空白和点
        assert_eq!(sanitize_filename(" . my song. "), "my song".to_string());

        // 空或全非法输入
        assert_eq!(sanitize_filename(""), "unknown".to_string());
        assert_eq!(sanitize_filename(" .. "), "unnamed".to_string());

        // 超长文件名截断后仍保留扩展名且不破坏 UTF-8
        let long_name = format!("{}.mp3", "很长的歌曲名".repeat(20));
        let truncated = sanitize_filename(&long_name);
        assert!(truncated.len() <= constants::MAX_FILENAME_BYTES);
        assert!(truncated.ends_with(".mp3"));
    }

    #[test]
    fn test_ensure_audio_extension() {
        assert_eq!(ensure_audio_extension("Song"), "Song.mp3");
        assert_eq!(ensure_audio_extension("Song.mp3"), "Song.mp3");
        assert_eq!(ensure_audio_extension("Song.MP3"), "Song.MP3");
        // 清理与补扩展名串联：/ : * 被替换且结尾必为 .mp3
        assert_eq!(
            ensure_audio_extension(&sanitize_filename("a/b:c*d")),
            "a_b_c_d.mp3"
        );
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 20), "short");
        let long = "a".repeat(80);
        let cut = truncate_text(&long, 20);
        assert!(cut.ends_with("..."));
        assert!(cut.len() < 25);
    }
}
