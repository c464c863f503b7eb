use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    duration: Option<String>,
}

/// 使用 ffprobe 查詢影片總長度（秒）
///
/// 純查詢，無副作用。優先採用容器層的 format.duration，
/// 缺少時退回視訊串流自身的 duration。
pub fn get_video_duration(path: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {stderr}");
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_duration(&stdout).with_context(|| format!("無法取得影片長度: {}", path.display()))
}

/// 解析 ffprobe JSON 輸出中的影片長度
fn parse_duration(json: &str) -> Result<f64> {
    let probe: FfprobeOutput = serde_json::from_str(json).context("無法解析 ffprobe 輸出")?;

    let format_duration = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok());

    let stream_duration = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .and_then(|s| s.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok());

    match format_duration.or(stream_duration) {
        Some(duration) if duration > 0.0 => Ok(duration),
        _ => bail!("ffprobe 輸出中沒有有效的影片長度"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_from_format() {
        let json = r#"{"format": {"duration": "123.456"}, "streams": []}"#;
        let duration = parse_duration(json).unwrap();
        assert!((duration - 123.456).abs() < 0.001);
    }

    #[test]
    fn test_parse_duration_stream_fallback() {
        let json = r#"{
            "format": {},
            "streams": [
                {"codec_type": "audio", "duration": "99.0"},
                {"codec_type": "video", "duration": "120.5"}
            ]
        }"#;
        let duration = parse_duration(json).unwrap();
        assert!((duration - 120.5).abs() < 0.001);
    }

    #[test]
    fn test_parse_duration_missing() {
        let json = r#"{"format": {}, "streams": []}"#;
        assert!(parse_duration(json).is_err());
    }

    #[test]
    fn test_parse_duration_rejects_zero() {
        let json = r#"{"format": {"duration": "0.0"}, "streams": []}"#;
        assert!(parse_duration(json).is_err());
    }
}
