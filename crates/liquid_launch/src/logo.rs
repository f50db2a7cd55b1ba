//! Logo composition
//!
//! Four white rounded tiles, sheared into parallelograms and laid out in an
//! overlapping row, with the icon and wordmark images drawn over them. The
//! image row is masked by the tile group, so the images only show through
//! the tiles.

use crate::assets::{ICON_KEY, WORDMARK_KEY};
use crate::config::LogoConfig;
use crate::state::AnimationState;
use liquid_core::{Affine2D, Color, Layer, Path, Rect, Size};

pub const TILE_COUNT: usize = 4;
pub const TILE_SIZE: Size = Size::new(88.0, 103.0);
pub const TILE_CORNER_RADIUS: f32 = 30.0;
/// Horizontal shear applied to each tile: `x' = x + 0.14·y`
pub const TILE_SHEAR: f32 = 0.14;
/// Nominal width of the tile row used to center it
pub const TILE_ROW_WIDTH: f32 = 330.0;
pub const WORDMARK_SIZE: Size = Size::new(175.0, 57.0);
/// Gap between the icon and the wordmark
pub const IMAGE_SPACING: f32 = 7.0;
/// Leading inset of the image row; negative values pull it left
pub const IMAGE_ROW_INSET: f32 = -20.0;

/// Screen-space geometry of the logo for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct LogoLayout {
    /// Sheared tile outlines, left to right
    pub tiles: Vec<Path>,
    pub icon: Rect,
    pub wordmark: Rect,
}

impl LogoLayout {
    pub fn compute(screen: Size, spacing: f32, icon_size: f32) -> Self {
        let row_x = (screen.width - TILE_ROW_WIDTH) / 2.0;
        let row_y = (screen.height - TILE_SIZE.height) / 2.0;
        let tile = Path::rounded_rect(TILE_SIZE.to_rect(), TILE_CORNER_RADIUS);

        let tiles = (0..TILE_COUNT)
            .map(|i| {
                let x = row_x + i as f32 * (TILE_SIZE.width + spacing);
                let placement = Affine2D::translation(x, row_y).then(&Affine2D::shear_x(TILE_SHEAR));
                tile.transformed(&placement)
            })
            .collect();

        // The row is centered, then the leading inset moves it by half its amount
        let icon_size = icon_size.max(0.0);
        let images_width = icon_size + IMAGE_SPACING + WORDMARK_SIZE.width;
        let images_x = (screen.width - images_width) / 2.0 + IMAGE_ROW_INSET / 2.0;
        let center_y = screen.height / 2.0;

        let icon = Rect::new(images_x, center_y - icon_size / 2.0, icon_size, icon_size);
        let wordmark = Rect::new(
            images_x + icon_size + IMAGE_SPACING,
            center_y - WORDMARK_SIZE.height / 2.0,
            WORDMARK_SIZE.width,
            WORDMARK_SIZE.height,
        );

        Self {
            tiles,
            icon,
            wordmark,
        }
    }

    fn tiles_layer(&self) -> Layer {
        Layer::stack(
            self.tiles
                .iter()
                .map(|path| Layer::shape(path.clone(), Color::WHITE))
                .collect(),
        )
        .named("tiles")
    }

    /// Full logo layer over an `accent` background
    pub fn layer(&self, accent: Color) -> Layer {
        let images = Layer::stack(vec![
            Layer::image(ICON_KEY, self.icon).named("icon"),
            Layer::image(WORDMARK_KEY, self.wordmark).named("wordmark"),
        ]);

        let badge = Layer::stack(vec![self.tiles_layer(), images]).with_mask(self.tiles_layer());

        Layer::stack(vec![Layer::solid(accent).named("accent"), badge])
    }
}

/// The logo as shown in one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Logo {
    /// Fully revealed, with no entrance animation
    pub finished: bool,
    pub spacing: f32,
    pub icon_size: f32,
}

impl Logo {
    /// The settled logo shown behind the content
    pub fn finished(config: &LogoConfig) -> Self {
        Self {
            finished: true,
            spacing: config.spacing_to,
            icon_size: config.icon_size,
        }
    }

    /// The entering logo, driven by the animation state
    pub fn entering(state: &AnimationState) -> Self {
        Self {
            finished: false,
            spacing: state.logo_spacing,
            icon_size: state.icon_size,
        }
    }

    pub fn layout(&self, screen: Size) -> LogoLayout {
        LogoLayout::compute(screen, self.spacing, self.icon_size)
    }

    pub fn layer(&self, screen: Size, accent: Color) -> Layer {
        let name = if self.finished { "logo-final" } else { "logo" };
        self.layout(screen).layer(accent).named(name)
    }
}
