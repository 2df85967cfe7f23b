//! Thin bindings to the Telegram mini app SDK (`window.Telegram.WebApp`).
//!
//! Outside Telegram the SDK object is missing and [`TelegramHost`] turns every
//! call into a no-op, so the game also runs in a plain browser tab.

use js_sys::{Function, Reflect};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

const THEME_COLOR: &str = "#667eea";

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type WebApp;

    #[wasm_bindgen(method)]
    fn expand(this: &WebApp);
    #[wasm_bindgen(method, js_name = enableClosingConfirmation)]
    fn enable_closing_confirmation(this: &WebApp);
    #[wasm_bindgen(method, js_name = setHeaderColor)]
    fn set_header_color(this: &WebApp, color: &str);
    #[wasm_bindgen(method, js_name = setBackgroundColor)]
    fn set_background_color(this: &WebApp, color: &str);
    #[wasm_bindgen(method)]
    fn ready(this: &WebApp);
    #[wasm_bindgen(method)]
    fn close(this: &WebApp);
    #[wasm_bindgen(method, js_name = sendData)]
    fn send_data(this: &WebApp, data: &str);
    #[wasm_bindgen(method, getter, js_name = BackButton)]
    fn back_button(this: &WebApp) -> BackButton;
    #[wasm_bindgen(method, getter, js_name = initDataUnsafe)]
    fn init_data_unsafe(this: &WebApp) -> JsValue;

    pub type BackButton;

    #[wasm_bindgen(method)]
    fn show(this: &BackButton);
    #[wasm_bindgen(method)]
    fn hide(this: &BackButton);
    #[wasm_bindgen(method, js_name = onClick)]
    fn on_click(this: &BackButton, callback: &Function);

    pub type HapticFeedback;

    #[wasm_bindgen(method, js_name = impactOccurred)]
    fn impact_occurred(this: &HapticFeedback, style: &str);
    #[wasm_bindgen(method, js_name = notificationOccurred)]
    fn notification_occurred(this: &HapticFeedback, kind: &str);
    #[wasm_bindgen(method, js_name = selectionChanged)]
    fn selection_changed(this: &HapticFeedback);
}

/// Strength of an impact haptic, named as the SDK expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    #[default]
    Medium,
    Heavy,
    Rigid,
    Soft,
}

impl ImpactStyle {
    pub fn name(self) -> &'static str {
        match self {
            ImpactStyle::Light => "light",
            ImpactStyle::Medium => "medium",
            ImpactStyle::Heavy => "heavy",
            ImpactStyle::Rigid => "rigid",
            ImpactStyle::Soft => "soft",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Haptic {
    Impact(ImpactStyle),
    Success,
    Error,
    Selection,
}

/// `initDataUnsafe.user` as sent by the client. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TelegramUser {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

impl TelegramUser {
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

#[derive(Clone, Default)]
pub struct TelegramHost {
    app: Option<WebApp>,
}

impl TelegramHost {
    /// Look up `window.Telegram.WebApp`.
    pub fn detect() -> Self {
        let app = web_sys::window()
            .and_then(|w| lookup(&w, "Telegram"))
            .and_then(|tg| lookup(&tg, "WebApp"))
            .map(|v| v.unchecked_into::<WebApp>());
        if app.is_none() {
            log::info!("Telegram WebApp not found, running standalone");
        }
        Self { app }
    }

    pub fn is_available(&self) -> bool {
        self.app.is_some()
    }

    /// Expand to full height, theme the chrome and hook the back button.
    pub fn init(&self, on_back: &Function) {
        let Some(app) = &self.app else { return };
        app.expand();
        app.enable_closing_confirmation();
        app.set_header_color(THEME_COLOR);
        app.set_background_color(THEME_COLOR);
        app.ready();
        app.back_button().on_click(on_back);
        log::info!("Telegram WebApp initialized");
    }

    pub fn show_back_button(&self) {
        if let Some(app) = &self.app {
            app.back_button().show();
        }
    }

    pub fn hide_back_button(&self) {
        if let Some(app) = &self.app {
            app.back_button().hide();
        }
    }

    pub fn haptic(&self, kind: Haptic) {
        let Some(haptics) = self
            .app
            .as_ref()
            .and_then(|app| lookup(app, "HapticFeedback"))
            .map(|v| v.unchecked_into::<HapticFeedback>())
        else {
            return;
        };
        match kind {
            Haptic::Impact(style) => haptics.impact_occurred(style.name()),
            Haptic::Success => haptics.notification_occurred("success"),
            Haptic::Error => haptics.notification_occurred("error"),
            Haptic::Selection => haptics.selection_changed(),
        }
    }

    pub fn user(&self) -> Option<TelegramUser> {
        let app = self.app.as_ref()?;
        let user = lookup(&app.init_data_unsafe(), "user")?;
        let json = js_sys::JSON::stringify(&user).ok()?;
        TelegramUser::from_json(&String::from(json))
    }

    pub fn send_data(&self, data: &str) {
        if let Some(app) = &self.app {
            app.send_data(data);
        }
    }

    pub fn close(&self) {
        if let Some(app) = &self.app {
            app.close();
        }
    }
}

/// Property read that treats `undefined`/`null` (and throwing getters) as absent.
fn lookup(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_full_payload() {
        let user = TelegramUser::from_json(
            r#"{"id":42,"first_name":"Ada","last_name":"L","username":"ada","language_code":"en","is_premium":true}"#,
        )
        .unwrap();
        assert_eq!(user.id, Some(42));
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.language_code.as_deref(), Some("en"));
    }

    #[test]
    fn test_user_from_sparse_payload() {
        let user = TelegramUser::from_json(r#"{"id":7}"#).unwrap();
        assert_eq!(user.first_name, None);
        assert!(TelegramUser::from_json("not json").is_none());
    }

    #[test]
    fn test_detached_host_is_inert() {
        let host = TelegramHost::default();
        assert!(!host.is_available());
        assert!(host.user().is_none());
    }

    #[test]
    fn test_detached_host_ignores_every_call() {
        let host = TelegramHost::default();
        for kind in [
            Haptic::Impact(ImpactStyle::default()),
            Haptic::Impact(ImpactStyle::Heavy),
            Haptic::Success,
            Haptic::Error,
            Haptic::Selection,
        ] {
            host.haptic(kind);
        }
        host.show_back_button();
        host.hide_back_button();
        host.send_data("{}");
        host.close();
        assert!(!host.is_available());
    }

    #[test]
    fn test_impact_style_names() {
        assert_eq!(ImpactStyle::default().name(), "medium");
        assert_eq!(ImpactStyle::Rigid.name(), "rigid");
    }
}
