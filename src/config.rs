use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use log::{debug, info};
use serde::Deserialize;

use crate::ribbon::{PausePolicy, RibbonConfig};

// ---------------------------------------------------------------------------
// ConfigFile — deserialized from TOML (all fields optional)
// ---------------------------------------------------------------------------

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Page opened at startup when none is given on the command line.
    pub page: Option<String>,
    /// Width used to size tracks; defaults to the window width.
    pub viewport_width: Option<f32>,
    pub dark_mode: Option<bool>,
    pub ribbon: RibbonConfigFile,
    pub images: ImagesConfigFile,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct RibbonConfigFile {
    pub speed: Option<f32>,
    pub slot_width: Option<f32>,
    pub slot_height: Option<f32>,
    pub gap: Option<f32>,
    pub padding: Option<f32>,
    pub coverage: Option<f32>,
    pub corner_radius: Option<f32>,
    pub visibility_threshold: Option<f32>,
    pub fade_in_ms: Option<u64>,
    pub shimmer_period_ms: Option<u64>,
    pub edge_fade: Option<f32>,
    pub pause_policy: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct ImagesConfigFile {
    pub max_width: Option<u32>,
}

// ---------------------------------------------------------------------------
// Config — resolved (all fields concrete)
// ---------------------------------------------------------------------------

pub struct Config {
    pub page: Option<String>,
    pub viewport_width: Option<f32>,
    pub dark_mode: bool,
    pub max_image_width: u32,
    pub ribbon: RibbonConfig,
}

impl ConfigFile {
    /// Merge CLI values (overwrites non-None fields).
    pub fn merge_cli(
        &mut self,
        page: Option<String>,
        viewport_width: Option<f32>,
        speed: Option<f32>,
        pause_policy: Option<String>,
    ) {
        if let Some(ref v) = page {
            debug!("config: CLI override page={v}");
            self.page = page;
        }
        if let Some(v) = viewport_width {
            debug!("config: CLI override viewport_width={v}");
            self.viewport_width = viewport_width;
        }
        if let Some(v) = speed {
            debug!("config: CLI override speed={v}");
            self.ribbon.speed = speed;
        }
        if let Some(ref v) = pause_policy {
            debug!("config: CLI override pause_policy={v}");
            self.ribbon.pause_policy = pause_policy;
        }
    }

    /// Resolve to a Config by applying defaults to missing fields.
    pub fn resolve(self) -> anyhow::Result<Config> {
        let defaults = RibbonConfig::default();
        let r = self.ribbon;

        let pause_policy = match r.pause_policy.as_deref() {
            Some(name) => PausePolicy::parse(name)
                .with_context(|| format!("unknown pause_policy {name:?} (expected any-active or last-writer-wins)"))?,
            None => defaults.pause_policy,
        };

        let ribbon = RibbonConfig {
            speed: r.speed.unwrap_or(defaults.speed),
            slot_width: r.slot_width.unwrap_or(defaults.slot_width),
            slot_height: r.slot_height.unwrap_or(defaults.slot_height),
            gap: r.gap.unwrap_or(defaults.gap),
            padding: r.padding.unwrap_or(defaults.padding),
            coverage: r.coverage.unwrap_or(defaults.coverage),
            corner_radius: r.corner_radius.unwrap_or(defaults.corner_radius),
            visibility_threshold: r
                .visibility_threshold
                .unwrap_or(defaults.visibility_threshold),
            fade_in_secs: r
                .fade_in_ms
                .map(|ms| Duration::from_millis(ms).as_secs_f32())
                .unwrap_or(defaults.fade_in_secs),
            shimmer_period_secs: r
                .shimmer_period_ms
                .map(|ms| Duration::from_millis(ms).as_secs_f32())
                .unwrap_or(defaults.shimmer_period_secs),
            edge_fade: r.edge_fade.unwrap_or(defaults.edge_fade),
            pause_policy,
        };

        if !(ribbon.speed.is_finite() && ribbon.speed > 0.0) {
            bail!("ribbon.speed must be a positive number, got {}", ribbon.speed);
        }
        if !(positive(ribbon.slot_width) && positive(ribbon.slot_height)) {
            bail!(
                "ribbon slot must have a positive size, got {}x{}",
                ribbon.slot_width,
                ribbon.slot_height
            );
        }
        if !(non_negative(ribbon.gap) && non_negative(ribbon.padding) && non_negative(ribbon.corner_radius)) {
            bail!(
                "ribbon.gap, ribbon.padding and ribbon.corner_radius must be finite and not negative, got {}, {}, {}",
                ribbon.gap,
                ribbon.padding,
                ribbon.corner_radius
            );
        }
        if !positive(ribbon.coverage) {
            bail!("ribbon.coverage must be a positive number, got {}", ribbon.coverage);
        }
        if !(0.0..=1.0).contains(&ribbon.visibility_threshold) {
            bail!(
                "ribbon.visibility_threshold must be within 0.0..=1.0, got {}",
                ribbon.visibility_threshold
            );
        }
        if !(0.0..=0.5).contains(&ribbon.edge_fade) {
            bail!("ribbon.edge_fade must be within 0.0..=0.5, got {}", ribbon.edge_fade);
        }
        if let Some(width) = self.viewport_width {
            if !positive(width) {
                bail!("viewport_width must be a positive number, got {width}");
            }
        }

        let config = Config {
            page: self.page,
            viewport_width: self.viewport_width,
            dark_mode: self.dark_mode.unwrap_or(false),
            max_image_width: self.images.max_width.unwrap_or(800),
            ribbon,
        };
        info!(
            "config: resolved speed={}, slot={}x{}, gap={}, coverage={}, \
             visibility_threshold={}, pause_policy={}, max_image_width={}, viewport_width={:?}",
            config.ribbon.speed,
            config.ribbon.slot_width,
            config.ribbon.slot_height,
            config.ribbon.gap,
            config.ribbon.coverage,
            config.ribbon.visibility_threshold,
            config.ribbon.pause_policy.name(),
            config.max_image_width,
            config.viewport_width,
        );
        Ok(config)
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

/// Resolve the XDG config path for scroll-ribbon.
fn config_path() -> Option<PathBuf> {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(config_dir.join("scroll-ribbon").join("config.toml"))
}

/// Load config file. Returns `ConfigFile::default()` if no file exists.
/// Returns an error if the file exists but cannot be parsed.
/// An explicit path must exist.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ConfigFile> {
    if let Some(path) = explicit {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        info!("config: loaded from {}", path.display());
        return parse_config(&text, path);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            info!("config: no HOME or XDG_CONFIG_HOME set, using defaults");
            return Ok(ConfigFile::default());
        }
    };
    debug!("config: looking for {}", path.display());
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            info!("config: loaded from {}", path.display());
            parse_config(&text, &path)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("config: {} not found, using defaults", path.display());
            Ok(ConfigFile::default())
        }
        Err(e) => Err(anyhow::anyhow!("failed to read {}: {e}", path.display())),
    }
}

fn parse_config(text: &str, path: &Path) -> anyhow::Result<ConfigFile> {
    toml::from_str(text).map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ConfigFile {
        parse_config(text, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn empty_file_resolves_to_defaults() {
        let config = parse("").resolve().unwrap();
        assert_eq!(config.ribbon, RibbonConfig::default());
        assert_eq!(config.max_image_width, 800);
        assert!(!config.dark_mode);
        assert!(config.page.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let config = parse(
            r#"
            page = "https://example.com"
            dark_mode = true

            [ribbon]
            speed = 3.0
            gap = 10.0
            fade_in_ms = 250
            pause_policy = "last-writer-wins"

            [images]
            max_width = 640
            "#,
        )
        .resolve()
        .unwrap();
        assert_eq!(config.page.as_deref(), Some("https://example.com"));
        assert!(config.dark_mode);
        assert_eq!(config.ribbon.speed, 3.0);
        assert_eq!(config.ribbon.slot_span(), 310.0);
        assert_eq!(config.ribbon.fade_in_secs, 0.25);
        assert_eq!(config.ribbon.pause_policy, PausePolicy::LastWriterWins);
        assert_eq!(config.max_image_width, 640);
    }

    #[test]
    fn cli_overrides_file() {
        let mut file = parse("[ribbon]\nspeed = 3.0\npause_policy = \"any\"\n");
        file.merge_cli(None, Some(1440.0), Some(0.5), Some("last-writer".into()));
        let config = file.resolve().unwrap();
        assert_eq!(config.ribbon.speed, 0.5);
        assert_eq!(config.viewport_width, Some(1440.0));
        assert_eq!(config.ribbon.pause_policy, PausePolicy::LastWriterWins);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse("[ribbon]\nspeed = 0.0\n").resolve().is_err());
        assert!(parse("[ribbon]\npause_policy = \"never\"\n").resolve().is_err());
        assert!(parse("[ribbon]\nedge_fade = 0.9\n").resolve().is_err());
        assert!(parse_config("ribbon = 3", Path::new("bad.toml")).is_err());
    }

    #[test]
    fn rejects_values_that_break_track_sizing() {
        assert!(parse("[ribbon]\ngap = nan\n").resolve().is_err());
        assert!(parse("[ribbon]\ngap = -1.0\n").resolve().is_err());
        assert!(parse("[ribbon]\nslot_width = inf\n").resolve().is_err());
        assert!(parse("[ribbon]\ncoverage = -3.0\n").resolve().is_err());
        assert!(parse("[ribbon]\ncoverage = 0.0\n").resolve().is_err());
        assert!(parse("[ribbon]\nvisibility_threshold = 7.0\n").resolve().is_err());
        assert!(parse("viewport_width = 0.0\n").resolve().is_err());

        let mut file = parse("");
        file.merge_cli(None, Some(f32::INFINITY), None, None);
        assert!(file.resolve().is_err());

        let config = parse("viewport_width = 1e30\n").resolve().unwrap();
        assert_eq!(config.viewport_width, Some(1e30));
        assert!(parse("[ribbon]\nvisibility_threshold = 1.0\n").resolve().is_ok());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        assert!(load_config(Some(Path::new("/no/such/scroll-ribbon.toml"))).is_err());
    }
}
