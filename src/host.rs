//! Tauri-backed implementations of the bridge's outbound sink and host
//! notifier, plus the windows the host opens.

use log::warn;
use tauri::{AppHandle, Emitter, Manager, WebviewUrl, WebviewWindowBuilder};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_notification::NotificationExt;

use crate::bridge::{OutboundMessage, BRIDGE_EVENT};
use crate::config::Config;
use crate::controller::{HostNotifier, MessageSink};

pub const PANEL_LABEL: &str = "wrike-board";
pub const TOKEN_PROMPT_LABEL: &str = "wrike-token";
const NOTIFICATION_TITLE: &str = "Wrike";
const SET_TOKEN_LABEL: &str = "Set Token";

/// Delivers bridge replies to the board webview as `bridge-message` events.
pub struct PanelSink {
    app: AppHandle,
}

impl PanelSink {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl MessageSink for PanelSink {
    fn post(&self, message: OutboundMessage) {
        if let Err(err) = self.app.emit_to(PANEL_LABEL, BRIDGE_EVENT, &message) {
            warn!("Failed to deliver {} to the board: {}", message.command, err);
        }
    }
}

pub struct DesktopNotifier {
    app: AppHandle,
}

impl DesktopNotifier {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn notify(&self, body: &str) {
        if let Err(err) = self
            .app
            .notification()
            .builder()
            .title(NOTIFICATION_TITLE)
            .body(body)
            .show()
        {
            warn!("Failed to show notification: {}", err);
        }
    }
}

impl HostNotifier for DesktopNotifier {
    fn info(&self, message: &str) {
        self.notify(message);
    }

    fn error(&self, message: &str) {
        self.notify(message);
    }

    fn auth_error(&self, message: &str) {
        let app = self.app.clone();
        self.app
            .dialog()
            .message(message)
            .title("Wrike authentication")
            .kind(MessageDialogKind::Error)
            .buttons(MessageDialogButtons::OkCancelCustom(
                SET_TOKEN_LABEL.to_string(),
                "Dismiss".to_string(),
            ))
            .show(move |set_token| {
                if set_token {
                    if let Err(err) = open_token_prompt(&app) {
                        warn!("Failed to open token prompt: {}", err);
                    }
                }
            });
    }
}

pub fn open_panel_window(app: &AppHandle, config: &Config) -> tauri::Result<()> {
    WebviewWindowBuilder::new(app, PANEL_LABEL, WebviewUrl::App("index.html".into()))
        .title("Wrike Board")
        .inner_size(config.panel_width, config.panel_height)
        .build()?;
    Ok(())
}

/// Brings the window with `label` to the front; false when it does not exist.
pub fn reveal_window(app: &AppHandle, label: &str) -> bool {
    match app.get_webview_window(label) {
        Some(window) => {
            let _ = window.show();
            let _ = window.set_focus();
            true
        }
        None => false,
    }
}

pub fn close_window(app: &AppHandle, label: &str) {
    if let Some(window) = app.get_webview_window(label) {
        if let Err(err) = window.close() {
            warn!("Failed to close window {}: {}", label, err);
        }
    }
}

/// Opens the masked token entry window, or focuses it if already open.
pub fn open_token_prompt(app: &AppHandle) -> tauri::Result<()> {
    if reveal_window(app, TOKEN_PROMPT_LABEL) {
        return Ok(());
    }
    WebviewWindowBuilder::new(app, TOKEN_PROMPT_LABEL, WebviewUrl::App("token.html".into()))
        .title("Set Wrike Token")
        .inner_size(440.0, 240.0)
        .resizable(false)
        .build()?;
    Ok(())
}
