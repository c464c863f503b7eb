use crate::config::FileTypeTable;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct VideoFileInfo {
    pub path: PathBuf,
    pub size: u64,
}

/// 掃描資料夾第一層的影片檔案
///
/// 只接受副檔名表列出的容器格式，結果依檔名排序，
/// 讓同一批輸入的處理順序在每次執行間保持一致。
pub fn scan_video_files(
    directory: &Path,
    file_type_table: &FileTypeTable,
) -> Result<Vec<VideoFileInfo>> {
    let mut video_files: Vec<VideoFileInfo> = WalkDir::new(directory)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| file_type_table.is_video_file(entry.path()))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(VideoFileInfo {
                path: entry.into_path(),
                size: metadata.len(),
            })
        })
        .collect();

    video_files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(video_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn test_table() -> FileTypeTable {
        FileTypeTable {
            video_file: vec![".mp4".to_string(), ".mkv".to_string()],
        }
    }

    #[test]
    fn test_scan_filters_and_sorts_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.mp4"), "bb").unwrap();
        fs::write(dir.path().join("a.mkv"), "a").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = scan_video_files(dir.path(), &test_table()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].path.ends_with("a.mkv"));
        assert!(files[1].path.ends_with("b.mp4"));
    }

    #[test]
    fn test_scan_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("nested.mp4"), "x").unwrap();
        fs::write(dir.path().join("top.mp4"), "x").unwrap();

        let files = scan_video_files(dir.path(), &test_table()).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("top.mp4"));
    }
}
