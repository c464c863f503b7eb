//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod chunk_grouper;
pub mod file_shuffler;
pub mod group_flattener;
pub mod scene_splitter;

pub use chunk_grouper::ChunkGrouper;
pub use file_shuffler::FileShuffler;
pub use group_flattener::GroupFlattener;
pub use scene_splitter::SceneClipSplitter;
