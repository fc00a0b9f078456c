use std::sync::OnceLock;
use tera::Tera;

static TERA: OnceLock<Tera> = OnceLock::new();

const INDEX: &str = include_str!("../templates/index.html");

/// Built-in pages, overridden by same-named files in `templates/`.
pub fn get_tera() -> &'static Tera {
    TERA.get_or_init(|| {
        let mut tera = Tera::default();
        if let Err(e) = tera.add_raw_template("index.html", INDEX) {
            tracing::error!("Built-in template failed to parse: {}", e);
        }

        let template_dir = std::path::Path::new("templates");
        let overrides: Vec<_> = std::fs::read_dir(template_dir)
            .into_iter()
            .flatten()
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().map_or(false, |ext| ext == "html"))
            .filter_map(|p| {
                let name = p.file_name()?.to_str()?.to_string();
                Some((p, Some(name)))
            })
            .collect();
        if let Err(e) = tera.add_template_files(overrides) {
            tracing::error!("Failed to load templates from {}: {}", template_dir.display(), e);
        }
        tera
    })
}
