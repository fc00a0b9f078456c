// Font discovery for the rasterizer.
// Needs real TrueType files: Liberation or DejaVu in the standard paths work.
use rusttype::Font;
use std::path::{Path, PathBuf};

use crate::certificate::FontFace;
use crate::error::{AppError, AppResult};

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation-serif",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
    "/System/Library/Fonts/Supplemental",
    "/Library/Fonts",
];

const SANS_FALLBACKS: &[&str] = &["LiberationSans", "DejaVuSans", "Arial"];
const SERIF_FALLBACKS: &[&str] = &["LiberationSerif", "DejaVuSerif", "Georgia"];

pub struct FontSet {
    sans: FacePair,
    serif: FacePair,
}

struct FacePair {
    regular: Font<'static>,
    bold: Font<'static>,
}

impl FontSet {
    /// Loads the sans and serif families, searching `font_dir` first and then
    /// the usual system locations. A missing serif family falls back to sans;
    /// a missing bold face falls back to regular.
    pub fn load(font_dir: Option<&Path>, sans: &str, serif: &str) -> AppResult<Self> {
        let dirs = search_dirs(font_dir);

        let sans_names = with_fallbacks(sans, SANS_FALLBACKS);
        let sans_pair = sans_names
            .iter()
            .find_map(|name| load_pair(&dirs, name))
            .ok_or_else(|| {
                AppError::font(format!(
                    "no usable sans font found (tried {}); install fonts-liberation or set FONT_DIR",
                    sans_names.join(", ")
                ))
            })?;

        let serif_pair = with_fallbacks(serif, SERIF_FALLBACKS)
            .iter()
            .find_map(|name| load_pair(&dirs, name));
        let serif_pair = match serif_pair {
            Some(pair) => pair,
            None => {
                tracing::warn!("No serif font found, using the sans family for serif layers");
                FacePair {
                    regular: sans_pair.regular.clone(),
                    bold: sans_pair.bold.clone(),
                }
            }
        };

        Ok(Self {
            sans: sans_pair,
            serif: serif_pair,
        })
    }

    pub fn face(&self, face: FontFace, bold: bool) -> &Font<'static> {
        let pair = match face {
            FontFace::Sans => &self.sans,
            FontFace::Serif => &self.serif,
        };
        if bold {
            &pair.bold
        } else {
            &pair.regular
        }
    }
}

fn search_dirs(font_dir: Option<&Path>) -> Vec<PathBuf> {
    font_dir
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_FONT_DIRS.iter().map(PathBuf::from))
        .filter(|p| p.is_dir())
        .collect()
}

fn with_fallbacks(preferred: &str, fallbacks: &[&str]) -> Vec<String> {
    let mut names = vec![preferred.to_string()];
    names.extend(
        fallbacks
            .iter()
            .filter(|n| **n != preferred)
            .map(|n| n.to_string()),
    );
    names
}

/// Finds `name` in the first directory that has it and loads the regular and
/// bold faces from there.
fn load_pair(dirs: &[PathBuf], name: &str) -> Option<FacePair> {
    dirs.iter().find_map(|dir| {
        let regular_path = find_file(dir, name, &["-Regular", ""])?;
        let regular_bytes = std::fs::read(&regular_path).ok()?;
        let regular = Font::try_from_vec(regular_bytes)?;

        let bold = find_file(dir, name, &["-Bold"])
            .and_then(|p| std::fs::read(p).ok())
            .and_then(Font::try_from_vec)
            .unwrap_or_else(|| regular.clone());

        tracing::debug!("Loaded font family {} from {}", name, dir.display());
        Some(FacePair { regular, bold })
    })
}

fn find_file(dir: &Path, name: &str, suffixes: &[&str]) -> Option<PathBuf> {
    suffixes.iter().find_map(|suffix| {
        ["ttf", "TTF"]
            .iter()
            .map(|ext| dir.join(format!("{}{}.{}", name, suffix, ext)))
            .find(|p| p.is_file())
    })
}
