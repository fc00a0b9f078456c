use std::path::PathBuf;

pub const DEFAULT_RENDER_SCALE: f32 = 3.0;
pub const MAX_RENDER_SCALE: f32 = 8.0;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub template_image: PathBuf,
    pub font_dir: Option<PathBuf>,
    pub font_sans: String,
    pub font_serif: String,
    pub render_scale: f32,
    pub layout_file: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            template_image: PathBuf::from("static/certificate.png"),
            font_dir: None,
            font_sans: "LiberationSans".to_string(),
            font_serif: "LiberationSerif".to_string(),
            render_scale: DEFAULT_RENDER_SCALE,
            layout_file: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let host = lookup("HOST").unwrap_or(defaults.host);
        let port: u16 = lookup("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);

        let template_image = lookup("TEMPLATE_IMAGE")
            .map(|p| base_dir.join(p))
            .unwrap_or_else(|| base_dir.join(&defaults.template_image));
        let font_dir = lookup("FONT_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let font_sans = lookup("FONT_SANS").unwrap_or(defaults.font_sans);
        let font_serif = lookup("FONT_SERIF").unwrap_or(defaults.font_serif);

        let render_scale = lookup("RENDER_SCALE")
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(|s| s.min(MAX_RENDER_SCALE))
            .unwrap_or(defaults.render_scale);

        let layout_file = lookup("LAYOUT_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(|p| base_dir.join(p));

        let max_upload_bytes = lookup("MAX_UPLOAD_BYTES")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_upload_bytes);

        Self {
            host,
            port,
            template_image,
            font_dir,
            font_sans,
            font_serif,
            render_scale,
            layout_file,
            max_upload_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.port, 5001);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.render_scale, DEFAULT_RENDER_SCALE);
        assert!(config.font_dir.is_none());
        assert!(config.layout_file.is_none());
        assert!(config.template_image.ends_with("static/certificate.png"));
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("RENDER_SCALE", "-2"),
            ("MAX_UPLOAD_BYTES", "lots"),
        ]));
        assert_eq!(config.port, 5001);
        assert_eq!(config.render_scale, DEFAULT_RENDER_SCALE);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn huge_render_scale_is_capped() {
        let config = Config::from_lookup(lookup_from(&[("RENDER_SCALE", "1e9")]));
        assert_eq!(config.render_scale, MAX_RENDER_SCALE);
        let config = Config::from_lookup(lookup_from(&[("RENDER_SCALE", "inf")]));
        assert_eq!(config.render_scale, DEFAULT_RENDER_SCALE);
    }

    #[test]
    fn explicit_values_are_used() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("RENDER_SCALE", "1.5"),
            ("FONT_DIR", "/opt/fonts"),
            ("FONT_SANS", "DejaVuSans"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.render_scale, 1.5);
        assert_eq!(config.font_dir, Some(PathBuf::from("/opt/fonts")));
        assert_eq!(config.font_sans, "DejaVuSans");
    }
}
