use tauri::State;

use crate::controller::LoadSummary;
use crate::AppState;

#[tauri::command]
pub async fn load_result(body: String, state: State<'_, AppState>) -> Result<LoadSummary, String> {
    state
        .viewer
        .load_result(body)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn display_resized(
    width: f32,
    height: f32,
    state: State<'_, AppState>,
) -> Result<(), String> {
    state
        .viewer
        .display_resized(width, height)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn media_loaded(
    native_width: f32,
    native_height: f32,
    state: State<'_, AppState>,
) -> Result<(), String> {
    state
        .viewer
        .media_loaded(native_width, native_height)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn pointer_down(x: f32, y: f32, state: State<'_, AppState>) -> Result<bool, String> {
    state
        .viewer
        .pointer_down(x, y)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn pointer_move(x: f32, y: f32, state: State<'_, AppState>) -> Result<(), String> {
    state
        .viewer
        .pointer_move(x, y)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn pointer_up(state: State<'_, AppState>) -> Result<(), String> {
    state.viewer.pointer_up().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn pointer_leave(state: State<'_, AppState>) -> Result<(), String> {
    state
        .viewer
        .pointer_leave()
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn playback_time_update(
    seconds: f64,
    state: State<'_, AppState>,
) -> Result<(), String> {
    state
        .viewer
        .playback_time(seconds)
        .await
        .map_err(|e| e.to_string())
}
