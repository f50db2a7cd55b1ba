//! Visual assets
//!
//! Two color tokens and three images, resolved once at startup. Images that
//! are not configured, or fail to load, are replaced by solid placeholder
//! bitmaps so the launch always renders.

use crate::config::AssetsConfig;
use crate::error::Result;
use liquid_core::Color;
use liquid_render::{Bitmap, ImageResolver};
use std::collections::HashMap;
use std::path::Path;

pub const ICON_KEY: &str = "icon";
pub const WORDMARK_KEY: &str = "wordmark";
pub const CONTENT_KEY: &str = "content";

/// Placeholder fills used when an image is unavailable
pub const ICON_PLACEHOLDER: Color = Color::rgb(1.0, 0.72, 0.0);
pub const WORDMARK_PLACEHOLDER: Color = Color::rgb(0.055, 0.106, 0.239);
pub const CONTENT_PLACEHOLDER: Color = Color::rgb(0.96, 0.96, 0.94);

const PLACEHOLDER_EDGE: u32 = 8;

/// Color tokens
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Screen background
    pub background: Color,
    /// Fill behind the logo
    pub accent: Color,
}

impl Palette {
    pub fn from_config(config: &AssetsConfig) -> Result<Self> {
        Ok(Self {
            background: config.background_color()?,
            accent: config.accent_color()?,
        })
    }
}

/// Resolved launch assets
#[derive(Clone, Debug)]
pub struct AssetCatalog {
    palette: Palette,
    images: HashMap<String, Bitmap>,
}

impl AssetCatalog {
    /// Load every configured asset, falling back to placeholders
    pub fn load(config: &AssetsConfig) -> Result<Self> {
        let mut catalog = Self::placeholders(Palette::from_config(config)?);

        for (key, path) in [
            (ICON_KEY, &config.icon),
            (WORDMARK_KEY, &config.wordmark),
            (CONTENT_KEY, &config.content),
        ] {
            match path {
                Some(path) => {
                    if let Some(bitmap) = load_or_warn(key, path) {
                        catalog.images.insert(key.to_string(), bitmap);
                    }
                }
                None => tracing::debug!(key, "no image configured, using placeholder"),
            }
        }

        Ok(catalog)
    }

    /// Catalog made only of placeholder images
    pub fn placeholders(palette: Palette) -> Self {
        let images = [
            (ICON_KEY, ICON_PLACEHOLDER),
            (WORDMARK_KEY, WORDMARK_PLACEHOLDER),
            (CONTENT_KEY, CONTENT_PLACEHOLDER),
        ]
        .into_iter()
        .map(|(key, color)| {
            (
                key.to_string(),
                Bitmap::solid(PLACEHOLDER_EDGE, PLACEHOLDER_EDGE, color),
            )
        })
        .collect();

        Self { palette, images }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn image(&self, key: &str) -> Option<&Bitmap> {
        self.images.get(key)
    }

    /// Replace one image
    pub fn insert(&mut self, key: impl Into<String>, bitmap: Bitmap) {
        self.images.insert(key.into(), bitmap);
    }
}

impl ImageResolver for AssetCatalog {
    fn resolve(&self, key: &str) -> Option<&Bitmap> {
        self.image(key)
    }
}

fn load_or_warn(key: &str, path: &Path) -> Option<Bitmap> {
    match Bitmap::load(path) {
        Ok(bitmap) => Some(bitmap),
        Err(err) => {
            tracing::warn!(key, path = %path.display(), "failed to load image, using placeholder: {err}");
            None
        }
    }
}
