//! 管線錯誤分類
//!
//! 只有 `InvalidPolicy` 與找不到輸入資料夾會在開工前中止；
//! 其餘錯誤各自影響單一來源、分塊或片段，整體執行繼續。

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// 來源影片切塊失敗，整部影片放棄，不影響其他來源
    #[error("無法切割來源影片: {}", source_path.display())]
    SplitFailed {
        source_path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// 場景偵測失敗，該分塊整個跳過
    #[error("場景偵測失敗: {}", chunk_path.display())]
    DetectionFailed {
        chunk_path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// 設定錯誤：片段最短長度大於最長長度
    #[error("片段長度政策無效: 最短 {min_secs}s 大於最長 {max_secs}s")]
    InvalidPolicy { min_secs: f64, max_secs: f64 },

    /// 單一片段編碼失敗，其餘片段照常輸出
    #[error("片段編碼失敗: {chunk_stem} 序號 {ordinal}")]
    EncodeFailed {
        chunk_stem: String,
        ordinal: usize,
        #[source]
        source: anyhow::Error,
    },
}
