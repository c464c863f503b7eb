//! 場景切割元件
//!
//! 把長影片切成固定長度的工作分塊，偵測分塊內的場景轉場，
//! 依最短/最長長度政策規劃輸出區間，再平行編碼成片段

mod chunk_splitter;
mod clip_planner;
mod clip_renderer;
mod error;
mod main;
mod pipeline;
mod transition_detector;

pub use chunk_splitter::{Chunk, split_into_chunks};
pub use clip_planner::{ClipInterval, ClipPolicy, plan_clips};
pub use clip_renderer::{RenderResult, RenderTask, create_render_tasks, render_clips_parallel};
pub use error::PipelineError;
pub use main::SceneClipSplitter;
pub use pipeline::{FailedClip, PipelineReport, SceneSplitOptions, run_pipeline};
pub use transition_detector::{cache_path_for, detect_transitions};
