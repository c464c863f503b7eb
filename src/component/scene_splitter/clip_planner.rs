//! 片段邊界規劃
//!
//! 把一個分塊的轉場時間點序列轉換成具體的輸出區間。
//! 規劃是純計算：相同輸入永遠產生相同的區間序列。

use super::error::PipelineError;

/// 片段長度與修剪政策
#[derive(Debug, Clone, Copy)]
pub struct ClipPolicy {
    /// 每個轉場起點向內修剪的秒數
    pub offset_start: f64,
    /// 每個轉場終點向內修剪的秒數
    pub offset_end: f64,
    /// 輸出片段最短長度（秒）
    pub min_secs: f64,
    /// 輸出片段最長長度（秒）
    pub max_secs: f64,
}

impl ClipPolicy {
    /// 開工前的政策檢查；最短大於最長直接拒絕，
    /// 否則規劃器會安靜地產出零個片段
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.min_secs > self.max_secs {
            return Err(PipelineError::InvalidPolicy {
                min_secs: self.min_secs,
                max_secs: self.max_secs,
            });
        }
        Ok(())
    }
}

/// 規劃後的輸出區間
///
/// `ordinal` 在單一分塊內嚴格遞增，輸出檔名依它產生，
/// 平行編碼完成順序不影響最終的時間軸順序。
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInterval {
    pub start: f64,
    pub end: f64,
    pub ordinal: usize,
}

impl ClipInterval {
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// 將轉場時間點轉換為輸出區間序列
///
/// 1. 邊界序列 = `[0.0] + 轉場點 + [分塊總長]`
/// 2. 相鄰邊界形成候選視窗，起點加 `offset_start`、終點減 `offset_end`
/// 3. 視窗超過 `max_secs` 時自前端切出固定 `max_secs` 的片段，
///    直到剩餘長度不超過上限
/// 4. 剩餘長度達到 `min_secs` 才輸出，否則整段捨棄（不併入鄰段）
pub fn plan_clips(
    timestamps: &[f64],
    chunk_duration: f64,
    policy: &ClipPolicy,
) -> Result<Vec<ClipInterval>, PipelineError> {
    policy.validate()?;

    let mut boundaries = Vec::with_capacity(timestamps.len() + 2);
    boundaries.push(0.0);
    boundaries.extend(
        timestamps
            .iter()
            .copied()
            .filter(|t| *t > 0.0 && *t < chunk_duration),
    );
    boundaries.push(chunk_duration);

    let mut intervals = Vec::new();
    let mut ordinal = 0;

    for pair in boundaries.windows(2) {
        let mut start = pair[0] + policy.offset_start;
        let end = pair[1] - policy.offset_end;

        while end - start > policy.max_secs {
            intervals.push(ClipInterval {
                start,
                end: start + policy.max_secs,
                ordinal,
            });
            ordinal += 1;
            start += policy.max_secs;
        }

        if end > start && end - start >= policy.min_secs {
            intervals.push(ClipInterval { start, end, ordinal });
            ordinal += 1;
        }
    }

    Ok(intervals)
}
