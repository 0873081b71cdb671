use log::{debug, info, warn};
use std::sync::Arc;
use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::TrayIconBuilder;
use tauri::{AppHandle, Manager, RunEvent, WindowEvent};

mod bridge;
mod config;
mod controller;
mod host;
mod panel;
mod secrets;

use bridge::InboundMessage;
use config::{Config, ConfigManager};
use controller::HostNotifier;
use host::{DesktopNotifier, PanelSink, PANEL_LABEL, TOKEN_PROMPT_LABEL};
use panel::{PanelHandle, PanelRegistry};
use secrets::TokenStore;
use wrike_api::{validate_token, ValidationOutcome, WrikeConfig};

const TRAY_ID: &str = "WrikeBoard";
const MENU_OPEN_ID: &str = "open_board";
const MENU_SET_TOKEN_ID: &str = "set_token";
const MENU_CLEAR_TOKEN_ID: &str = "clear_token";
const MENU_QUIT_ID: &str = "quit";

/// Process-wide state shared by commands, tray handlers and window events.
struct AppState {
    store: TokenStore,
    registry: PanelRegistry,
    config: Config,
}

impl AppState {
    fn api_config(&self) -> WrikeConfig {
        WrikeConfig::new("").with_base_url(self.config.api_base_url.clone())
    }
}

fn app_state(app: &AppHandle) -> Result<tauri::State<'_, AppState>, String> {
    app.try_state::<AppState>()
        .ok_or_else(|| "Application state is not initialized".to_string())
}

fn notifier(app: &AppHandle) -> Arc<DesktopNotifier> {
    Arc::new(DesktopNotifier::new(app.clone()))
}

async fn open_board_native(app: &AppHandle) -> Result<(), String> {
    let state = app_state(app)?;
    if state.registry.current().is_some() && host::reveal_window(app, PANEL_LABEL) {
        return Ok(());
    }

    let notifier = notifier(app);
    let token = match state.store.get().await {
        Ok(token) => token,
        Err(err) => {
            let message = format!("Failed to load stored token: {}", err);
            notifier.error(&message);
            return Err(message);
        }
    };

    let sink = Arc::new(PanelSink::new(app.clone()));
    match state
        .registry
        .open(token, &state.api_config(), sink, notifier.clone())
    {
        Ok(PanelHandle::Existing(_)) => {
            host::reveal_window(app, PANEL_LABEL);
            Ok(())
        }
        Ok(PanelHandle::Created(_)) => {
            if let Err(err) = host::open_panel_window(app, &state.config) {
                state.registry.close();
                return Err(format!("Failed to open board: {}", err));
            }
            info!("Board panel opened");
            Ok(())
        }
        Err(err) => {
            notifier.error(&err.to_string());
            Err(err.to_string())
        }
    }
}

async fn set_token_native(app: &AppHandle, token: &str) -> Result<ValidationOutcome, String> {
    let state = app_state(app)?;
    let notifier = notifier(app);
    let config = state.api_config();
    let token = token.trim();

    let outcome = validate_token(&config, token).await;
    match &outcome {
        ValidationOutcome::Valid { identity } => {
            if let Err(err) = state.store.set(token).await {
                let message = format!("Failed to store token: {}", err);
                notifier.error(&message);
                return Err(message);
            }
            if let Err(err) = state.registry.rebind(&config, token) {
                warn!("Failed to rebind open board: {}", err);
            }
            notifier.info(&format!("Authenticated as {}", identity.display_name()));
            host::close_window(app, TOKEN_PROMPT_LABEL);
            spawn_open_board(app);
        }
        ValidationOutcome::Invalid { reason } => {
            debug!("Token validation rejected: {}", reason);
            notifier.error(&format!("Failed to validate token: {}", reason));
        }
    }
    Ok(outcome)
}

async fn clear_token_native(app: &AppHandle) -> Result<(), String> {
    let state = app_state(app)?;
    state
        .store
        .delete()
        .await
        .map_err(|err| format!("Failed to clear token: {}", err))?;
    state.registry.close();
    host::close_window(app, PANEL_LABEL);
    info!("Stored token cleared");
    Ok(())
}

#[tauri::command]
async fn open_board(app: AppHandle) -> Result<(), String> {
    open_board_native(&app).await
}

#[tauri::command]
async fn set_token(app: AppHandle, token: String) -> Result<ValidationOutcome, String> {
    set_token_native(&app, &token).await
}

#[tauri::command]
async fn clear_token(app: AppHandle) -> Result<(), String> {
    clear_token_native(&app).await
}

/// Entry point for every message the board posts to the backend.
#[tauri::command]
async fn bridge_message(app: AppHandle, message: InboundMessage) -> Result<(), String> {
    let controller = app_state(&app)?
        .registry
        .current()
        .ok_or_else(|| "Wrike board is not open".to_string())?;
    controller.handle(message).await;
    Ok(())
}

fn build_tray_menu(app: &AppHandle) -> tauri::Result<Menu<tauri::Wry>> {
    let open = MenuItem::with_id(app, MENU_OPEN_ID, "Open Board", true, None::<&str>)?;
    let set_token = MenuItem::with_id(app, MENU_SET_TOKEN_ID, "Set Token…", true, None::<&str>)?;
    let clear_token = MenuItem::with_id(app, MENU_CLEAR_TOKEN_ID, "Sign Out", true, None::<&str>)?;
    let separator = PredefinedMenuItem::separator(app)?;
    let quit = MenuItem::with_id(app, MENU_QUIT_ID, "Quit", true, None::<&str>)?;
    Menu::with_items(app, &[&open, &set_token, &clear_token, &separator, &quit])
}

fn spawn_open_board(app: &AppHandle) {
    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        if let Err(err) = open_board_native(&app).await {
            warn!("Failed to open board: {}", err);
        }
    });
}

fn open_token_prompt_or_warn(app: &AppHandle) {
    if let Err(err) = host::open_token_prompt(app) {
        warn!("Failed to open token prompt: {}", err);
    }
}

pub fn run() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();

    info!("Starting Wrike board runtime");

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let app_handle = app.handle().clone();
            let store = TokenStore::initialize(&app_handle)?;
            let config = ConfigManager::new().load_or_init();
            debug!("Using Wrike API root {}", config.api_base_url);
            app.manage(AppState {
                store: store.clone(),
                registry: PanelRegistry::default(),
                config,
            });

            let menu = build_tray_menu(&app_handle)?;
            let mut tray = TrayIconBuilder::with_id(TRAY_ID)
                .menu(&menu)
                .tooltip("Wrike Board")
                .on_menu_event(move |app, event| match event.id.as_ref() {
                    MENU_OPEN_ID => spawn_open_board(app),
                    MENU_SET_TOKEN_ID => open_token_prompt_or_warn(app),
                    MENU_CLEAR_TOKEN_ID => {
                        let app = app.clone();
                        tauri::async_runtime::spawn(async move {
                            if let Err(err) = clear_token_native(&app).await {
                                warn!("{}", err);
                                notifier(&app).error(&err);
                            }
                        });
                    }
                    MENU_QUIT_ID => app.exit(0),
                    _ => {}
                });
            if let Some(icon) = app.default_window_icon() {
                tray = tray.icon(icon.clone());
            }
            tray.build(app)?;

            // First launch goes straight to token entry.
            let startup_handle = app_handle.clone();
            tauri::async_runtime::spawn(async move {
                match store.get().await {
                    Ok(Some(_)) => spawn_open_board(&startup_handle),
                    Ok(None) => open_token_prompt_or_warn(&startup_handle),
                    Err(err) => {
                        warn!("Failed to read stored token: {}", err);
                        open_token_prompt_or_warn(&startup_handle);
                    }
                }
            });
            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::Destroyed = event {
                if window.label() == PANEL_LABEL {
                    if let Some(state) = window.app_handle().try_state::<AppState>() {
                        state.registry.close();
                        debug!("Board panel closed");
                    }
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            open_board,
            set_token,
            clear_token,
            bridge_message
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|_app, event| {
        // Keep running in the tray when the last window closes.
        if let RunEvent::ExitRequested { code: None, api, .. } = event {
            api.prevent_exit();
        }
    });
}
