#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

#[cfg(target_os = "windows")]
mod demo;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[cfg(target_os = "windows")]
    if let Err(e) = demo::run() {
        log::error!("{e:#}");
    }

    #[cfg(not(target_os = "windows"))]
    eprintln!("glow_demo requires Windows");
}
