//! 檔案洗牌
//!
//! 隨機打亂資料夾內的檔案順序並重新編號為 `0.ext`、`1.ext`…。
//! 兩階段改名：先全部改成唯一暫存名，再改成最終序號名，
//! 洗牌後的目標名稱才不會撞到還沒改名的來源檔。

use crate::tools::validate_directory_exists;
use anyhow::{Context, Result};
use log::info;
use rand::seq::SliceRandom;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 打亂並重新編號資料夾內的所有檔案，回傳處理的檔案數
pub fn shuffle_and_rename(dir: &Path) -> Result<usize> {
    validate_directory_exists(dir)?;

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("無法讀取目錄: {}", dir.display()))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    files.shuffle(&mut rand::thread_rng());

    // 第一階段：改成唯一暫存名，消除名稱衝突
    let mut temp_paths = Vec::with_capacity(files.len());
    for path in &files {
        let extension = extension_with_dot(path);
        let temp_name = format!("tmp_{}{extension}", Uuid::new_v4().simple());
        let temp_path = dir.join(temp_name);

        fs::rename(path, &temp_path).with_context(|| {
            format!(
                "無法改名為暫存名稱: {} -> {}",
                path.display(),
                temp_path.display()
            )
        })?;
        temp_paths.push(temp_path);
    }

    // 第二階段：依洗牌後的順序給最終序號名
    for (index, temp_path) in temp_paths.iter().enumerate() {
        let extension = extension_with_dot(temp_path);
        let final_path = dir.join(format!("{index}{extension}"));

        fs::rename(temp_path, &final_path).with_context(|| {
            format!(
                "無法改名為最終名稱: {} -> {}",
                temp_path.display(),
                final_path.display()
            )
        })?;
    }

    info!("已洗牌並重新編號 {} 個檔案: {}", files.len(), dir.display());

    Ok(files.len())
}

/// 檔案副檔名（含點），沒有副檔名時為空字串
fn extension_with_dot(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or_else(String::new, |e| format!(".{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_shuffle_renames_to_sequential_names() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..8 {
            fs::write(dir.path().join(format!("clip_{i}.mp4")), format!("{i}")).unwrap();
        }

        let count = shuffle_and_rename(dir.path()).unwrap();
        assert_eq!(count, 8);

        let names: BTreeSet<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();

        let expected: BTreeSet<String> = (0..8).map(|i| format!("{i}.mp4")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_shuffle_preserves_contents_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut contents_before = BTreeSet::new();
        for i in 0..5 {
            let content = format!("content-{i}");
            fs::write(dir.path().join(format!("file_{i}.mkv")), &content).unwrap();
            contents_before.insert(content);
        }

        shuffle_and_rename(dir.path()).unwrap();

        // 每個原始檔案恰好被搬移一次：內容集合不變、數量不變
        let contents_after: BTreeSet<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .map(|e| fs::read_to_string(e.path()).unwrap())
            .collect();

        assert_eq!(contents_before, contents_after);
    }

    #[test]
    fn test_shuffle_keeps_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp4"), "a").unwrap();
        fs::write(dir.path().join("b.mkv"), "b").unwrap();

        shuffle_and_rename(dir.path()).unwrap();

        let extensions: BTreeSet<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter_map(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_string())
            })
            .collect();

        assert_eq!(
            extensions,
            BTreeSet::from(["mp4".to_string(), "mkv".to_string()])
        );
    }

    #[test]
    fn test_shuffle_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(shuffle_and_rename(dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_shuffle_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(shuffle_and_rename(&dir.path().join("missing")).is_err());
    }
}
