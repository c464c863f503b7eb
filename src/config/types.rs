use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 5;

/// 支援的影片副檔名表（編譯時嵌入）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
}

impl FileTypeTable {
    #[must_use]
    pub fn video_extensions_set(&self) -> HashSet<String> {
        self.video_file
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        let video_extensions = self.video_extensions_set();
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| video_extensions.contains(&format!(".{}", ext.to_lowercase())))
    }
}

/// 介面語言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::ZhTw
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EnUs => "English",
            Self::ZhTw => "繁體中文",
        };
        write!(f, "{name}")
    }
}

/// 場景切割政策設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSplitSettings {
    /// 場景變換閾值 (0.0-1.0)，越低越敏感
    pub scene_threshold: f64,
    /// 輸出片段最短長度（秒），更短的尾段直接捨棄
    pub min_clip_secs: f64,
    /// 輸出片段最長長度（秒），過長視窗自前端貪婪切割
    pub max_clip_secs: f64,
    /// 每個轉場起點向內修剪的秒數
    pub offset_start: f64,
    /// 每個轉場終點向內修剪的秒數
    pub offset_end: f64,
    /// 工作分塊長度（秒）
    pub chunk_length_secs: u64,
    /// 同時執行的編碼程序數上限
    pub render_workers: usize,
}

impl Default for SceneSplitSettings {
    fn default() -> Self {
        Self {
            scene_threshold: 0.15,
            min_clip_secs: 1.5,
            max_clip_secs: 8.0,
            offset_start: 0.0,
            offset_end: 0.0,
            chunk_length_secs: 120,
            render_workers: 4,
        }
    }
}

/// 使用者設定，持久化於 settings.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub scene_split: SceneSplitSettings,
    pub recent_paths: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file_type_table: FileTypeTable,
    pub settings: UserSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_video_file() {
        let table = FileTypeTable {
            video_file: vec![".mp4".to_string(), ".mkv".to_string()],
        };

        assert!(table.is_video_file(Path::new("/videos/a.mp4")));
        assert!(table.is_video_file(Path::new("/videos/a.MKV")));
        assert!(!table.is_video_file(Path::new("/videos/a.txt")));
        assert!(!table.is_video_file(Path::new("/videos/noext")));
    }

    #[test]
    fn test_scene_split_defaults_are_valid() {
        let settings = SceneSplitSettings::default();
        assert!(settings.min_clip_secs <= settings.max_clip_secs);
        assert!(settings.scene_threshold > 0.0 && settings.scene_threshold < 1.0);
        assert!(settings.render_workers >= 1);
    }

    #[test]
    fn test_language_round_trip() {
        let json = serde_json::to_string(&Language::ZhTw).unwrap();
        assert_eq!(json, "\"zh-TW\"");
        let back: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Language::ZhTw);
    }
}
