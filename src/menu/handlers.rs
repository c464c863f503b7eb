use crate::component::{ChunkGrouper, FileShuffler, GroupFlattener, SceneClipSplitter};
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_scene_splitter(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let splitter = SceneClipSplitter::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = splitter.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_chunk_grouper(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let grouper = ChunkGrouper::new(Arc::clone(shutdown_signal));

    if let Err(e) = grouper.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_group_flattener(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let flattener = GroupFlattener::new(Arc::clone(shutdown_signal));

    if let Err(e) = flattener.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_file_shuffler(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let shuffler = FileShuffler::new(Arc::clone(shutdown_signal));

    if let Err(e) = shuffler.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
