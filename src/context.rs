// src/context.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;

use crate::error::{AppError, UserMsg};

pub const APP_QUALIFIER: &str = "org";
pub const APP_ORG: &str = "artcap";
pub const APP_ID: &str = "artcap-form-sync";

pub const DRAFTS_DIR: &str = "drafts";
pub const PANEL_CONFIG_FILE: &str = "panels.json";

pub const DEFAULT_EXISTS_URL: &str = "http://127.0.0.1:5000/exists";
pub const DEFAULT_EXISTS_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct AppCtx {
    pub app_data_dir: PathBuf,
    pub panel_config_path: PathBuf,
    pub exists_url: String,
    pub exists_timeout: Duration,
    pub debug_ui: bool,
}

impl AppCtx {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self::from_lookup(app_data_dir, |k| std::env::var(k).ok())
    }

    /// Data dir from `ARTCAP_DATA_DIR`, else the platform data dir.
    pub fn from_env() -> Option<Self> {
        let dir = std::env::var_os("ARTCAP_DATA_DIR")
            .map(PathBuf::from)
            .or_else(default_app_data_dir)?;
        Some(Self::new(dir))
    }

    pub(crate) fn from_lookup(
        app_data_dir: PathBuf,
        var: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let debug_ui = var("ARTCAP_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let exists_url = var("ARTCAP_EXISTS_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EXISTS_URL.to_string());

        let exists_timeout = var("ARTCAP_EXISTS_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_EXISTS_TIMEOUT_SECS));

        let panel_config_path = var("ARTCAP_PANEL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| app_data_dir.join(PANEL_CONFIG_FILE));

        Self {
            app_data_dir,
            panel_config_path,
            exists_url,
            exists_timeout,
            debug_ui,
        }
    }

    /// <app_data>/drafts
    pub fn drafts_dir(&self) -> PathBuf {
        self.app_data_dir.join(DRAFTS_DIR)
    }

    pub fn app_data_dir(&self) -> &Path {
        &self.app_data_dir
    }

    /// User-facing message for `err`, with full detail when `ARTCAP_DEBUG` is set.
    pub fn user_msg(&self, err: &AppError) -> UserMsg {
        err.user_msg(self.debug_ui)
    }
}

pub fn default_app_data_dir() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_ID).map(|d| d.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let ctx = AppCtx::from_lookup(PathBuf::from("/data"), |_| None);
        assert_eq!(ctx.exists_url, DEFAULT_EXISTS_URL);
        assert_eq!(ctx.exists_timeout, Duration::from_secs(15));
        assert_eq!(ctx.panel_config_path, PathBuf::from("/data/panels.json"));
        assert_eq!(ctx.drafts_dir(), PathBuf::from("/data/drafts"));
        assert!(!ctx.debug_ui);
    }

    #[test]
    fn env_overrides_and_bad_timeout_falls_back() {
        let env: HashMap<&str, &str> = [
            ("ARTCAP_EXISTS_URL", "https://dig.example/exists"),
            ("ARTCAP_EXISTS_TIMEOUT_SECS", "zero"),
            ("ARTCAP_DEBUG", "TRUE"),
        ]
        .into_iter()
        .collect();

        let ctx = AppCtx::from_lookup(PathBuf::from("/data"), |k| env.get(k).map(|v| v.to_string()));
        assert_eq!(ctx.exists_url, "https://dig.example/exists");
        assert_eq!(ctx.exists_timeout, Duration::from_secs(15));
        assert!(ctx.debug_ui);
    }

    #[test]
    fn debug_flag_controls_error_detail() {
        let err = AppError::ExistsStatus(503);

        let quiet = AppCtx::from_lookup(PathBuf::from("/data"), |_| None);
        assert!(quiet.user_msg(&err).detail.is_none());

        let loud = AppCtx::from_lookup(PathBuf::from("/data"), |k| {
            (k == "ARTCAP_DEBUG").then(|| "1".to_string())
        });
        let detail = loud.user_msg(&err).detail.unwrap();
        assert!(detail.contains("503"));
        assert_eq!(loud.user_msg(&err).short, quiet.user_msg(&err).short);
    }
}
