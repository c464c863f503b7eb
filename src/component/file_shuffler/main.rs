use super::shuffler::shuffle_and_rename;
use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 檔案洗牌元件
pub struct FileShuffler {
    shutdown_signal: Arc<AtomicBool>,
}

impl FileShuffler {
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self { shutdown_signal }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 檔案洗牌 ===").cyan().bold());

        let input_path = self.prompt_input_path()?;
        let directory = PathBuf::from(&input_path);

        // 改名不可逆，先確認
        if !self.confirm_shuffle()? {
            println!("{}", style("操作已取消").yellow());
            return Ok(());
        }

        if self.shutdown_signal.load(Ordering::SeqCst) {
            return Ok(());
        }

        println!("{}", style("洗牌並重新編號中...").cyan());
        let count = shuffle_and_rename(&directory)?;

        println!();
        println!(
            "{}",
            style(format!("已洗牌並重新編號 {count} 個檔案")).green()
        );
        info!("檔案洗牌完成 - {} 個檔案", count);

        Ok(())
    }

    fn prompt_input_path(&self) -> Result<String> {
        let path: String = Input::new()
            .with_prompt("請輸入要洗牌的資料夾路徑")
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    fn confirm_shuffle(&self) -> Result<bool> {
        let confirm = Confirm::new()
            .with_prompt("確定要打亂並重新命名所有檔案嗎？原檔名將無法復原")
            .default(false)
            .interact()?;
        Ok(confirm)
    }
}
