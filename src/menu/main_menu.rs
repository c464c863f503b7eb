use crate::config::save::save_settings;
use crate::config::types::{Config, Language};
use crate::menu::handlers::{
    run_chunk_grouper, run_file_shuffler, run_group_flattener, run_scene_splitter,
};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_splitter"),
        t!("main_menu.opt_grouper"),
        t!("main_menu.opt_flattener"),
        t!("main_menu.opt_shuffler"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_scene_splitter(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            run_chunk_grouper(term, shutdown_signal)?;
            Ok(true)
        }
        Some(2) => {
            run_group_flattener(term, shutdown_signal)?;
            Ok(true)
        }
        Some(3) => {
            run_file_shuffler(term, shutdown_signal)?;
            Ok(true)
        }
        Some(4) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(5) => Ok(false),
        None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_split"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_split_settings_menu(term, config)?,
            Some(1) => show_language_menu(term, config)?,
            Some(2) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 場景切割政策設定選單
fn show_split_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.split.title")).cyan().bold());
    println!();

    let current = config.settings.scene_split.clone();
    let mut edited = current.clone();

    edited.scene_threshold = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.split.threshold_prompt"))
        .default(current.scene_threshold)
        .interact_text()?;

    edited.min_clip_secs = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.split.min_prompt"))
        .default(current.min_clip_secs)
        .interact_text()?;

    edited.max_clip_secs = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.split.max_prompt"))
        .default(current.max_clip_secs)
        .interact_text()?;

    edited.offset_start = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.split.offset_start_prompt"))
        .default(current.offset_start)
        .interact_text()?;

    edited.offset_end = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.split.offset_end_prompt"))
        .default(current.offset_end)
        .interact_text()?;

    edited.chunk_length_secs = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.split.chunk_prompt"))
        .default(current.chunk_length_secs)
        .interact_text()?;

    edited.render_workers = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.split.workers_prompt"))
        .default(current.render_workers)
        .interact_text()?;

    // 無效政策不寫入設定檔，管線開工前也會再驗一次
    if edited.min_clip_secs > edited.max_clip_secs {
        println!(
            "\n{}",
            style(t!("settings.split.invalid_policy")).red().bold()
        );
        std::thread::sleep(std::time::Duration::from_secs(2));
        return Ok(());
    }

    config.settings.scene_split = edited;
    save_settings(&config.settings)?;
    println!("\n{}", style(t!("settings.saved")).green());
    std::thread::sleep(std::time::Duration::from_secs(1));

    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhTw];

    let items: Vec<String> = languages.iter().map(|l: &Language| l.to_string()).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_lang = languages[selection];

    if selected_lang != config.settings.language {
        config.settings.language = selected_lang;
        rust_i18n::set_locale(selected_lang.as_str());
        save_settings(&config.settings)?;
        println!("\n{} {}", style(t!("settings.saved")).green(), selected_lang);
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
