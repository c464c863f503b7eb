//! 群組攤平元件
//!
//! 把一個群組一個資料夾的結構合併為單一目錄，檔名加上群組前綴

mod flattener;
mod main;

pub use flattener::{FlattenResult, flatten_groups};
pub use main::GroupFlattener;
