mod commands;
mod controller;

use commands::{
    display_resized, load_result, media_loaded, playback_time_update, pointer_down, pointer_leave,
    pointer_move, pointer_up,
};
use controller::ViewerController;
use tauri::Manager;

pub(crate) struct AppState {
    pub(crate) viewer: ViewerController,
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("CountLens starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            app.manage(AppState {
                viewer: ViewerController::new(app.handle().clone()),
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            load_result,
            display_resized,
            media_loaded,
            pointer_down,
            pointer_move,
            pointer_up,
            pointer_leave,
            playback_time_update,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application")
}
