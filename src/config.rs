//! Frontend Configuration
//!
//! Built-in defaults, optionally overridden by a JSON block in the host page:
//! `<script id="lia-config" type="application/json">{...}</script>`.

use board_dragdrop::DragConfig;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;

pub const CONFIG_SCRIPT_ID: &str = "lia-config";

const DEFAULT_API_BASE_URL: &str = "/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Absolute URL or a path on the page's origin
    pub api_base_url: String,
    pub drag: DragConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("LIA_API_BASE_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            drag: DragConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults merged with the page's config block, if any
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_SCRIPT_ID))
            .and_then(|el| el.dyn_into::<web_sys::HtmlScriptElement>().ok())
            .and_then(|script| script.text().ok());
        match raw {
            Some(raw) => Self::parse(&raw),
            None => Self::default(),
        }
    }

    /// Unparseable blocks fall back to the defaults
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<AppConfig>(raw) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("[CONFIG] ignoring #{}: {}", CONFIG_SCRIPT_ID, e);
                Self::default()
            }
        }
    }

    /// `api_base_url` made absolute against `origin`, without a trailing slash
    pub fn api_root(&self, origin: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            base.to_string()
        } else {
            format!("{}/{}", origin.trim_end_matches('/'), base.trim_start_matches('/'))
        }
    }
}

pub fn page_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_dragdrop::MoveStrategy;

    #[test]
    fn page_block_overrides_selected_fields() {
        let cfg = AppConfig::parse(r#"{"drag": {"strategy": "two_step", "long_press_delay_ms": 300}}"#);
        assert_eq!(cfg.drag.strategy, MoveStrategy::TwoStep);
        assert_eq!(cfg.drag.long_press_delay_ms, 300);
        assert_eq!(cfg.drag.move_threshold_px, DragConfig::default().move_threshold_px);
        assert_eq!(cfg.api_base_url, AppConfig::default().api_base_url);
    }

    #[test]
    fn broken_block_falls_back() {
        assert_eq!(AppConfig::parse("{not json"), AppConfig::default());
    }

    #[test]
    fn api_root_resolution() {
        let mut cfg = AppConfig::default();
        cfg.api_base_url = "/api/".into();
        assert_eq!(cfg.api_root("http://localhost:3000"), "http://localhost:3000/api");

        cfg.api_base_url = "https://lia.example.org/api".into();
        assert_eq!(cfg.api_root("http://localhost:3000"), "https://lia.example.org/api");
    }
}
