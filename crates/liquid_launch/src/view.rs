//! Frame composition
//!
//! Turns an [`AnimationState`] into the layer tree for one frame:
//!
//! ```text
//! Stack "launch"
//! ├── Solid "background"
//! ├── Logo "logo-final"              (content step only)
//! └── Clip "liquid-mask"             (liquid_mask(progress))
//!     └── background | Logo "logo" | Image "content"
//! ```

use crate::assets::{Palette, CONTENT_KEY};
use crate::config::{LaunchConfig, LogoConfig};
use crate::error::Result;
use crate::logo::Logo;
use crate::shape::MaskPlacement;
use crate::state::{AnimationState, Step};
use liquid_core::{ClipShape, Layer, Size};

/// Composes launch frames for one screen size
#[derive(Clone, Debug)]
pub struct LaunchView {
    size: Size,
    palette: Palette,
    logo: LogoConfig,
    placement: MaskPlacement,
}

impl LaunchView {
    pub fn new(config: &LaunchConfig) -> Result<Self> {
        Ok(Self {
            size: config.viewport.size(),
            palette: Palette::from_config(&config.assets)?,
            logo: config.logo,
            placement: MaskPlacement::default(),
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Layer tree for `state`
    pub fn compose(&self, state: &AnimationState) -> Layer {
        let mut layers = vec![Layer::solid(self.palette.background).named("background")];

        if state.step == Step::Content {
            layers.push(Logo::finished(&self.logo).layer(self.size, self.palette.accent));
        }

        let flipped = state.step == Step::Content;
        let mask = self.placement.mask(state.progress, self.size, flipped);
        layers.push(
            self.masked_content(state)
                .with_clip(ClipShape::Path(mask))
                .named("liquid-mask"),
        );

        Layer::stack(layers).named("launch")
    }

    fn masked_content(&self, state: &AnimationState) -> Layer {
        match state.step {
            Step::Blank => Layer::solid(self.palette.background),
            Step::Logo => Logo::entering(state).layer(self.size, self.palette.accent),
            Step::Content => Layer::image(CONTENT_KEY, self.size.to_rect()).named("content"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> LaunchView {
        LaunchView::new(&LaunchConfig::default()).unwrap()
    }

    fn state(step: Step, progress: f32) -> AnimationState {
        AnimationState {
            step,
            progress,
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_step() {
        let layer = view().compose(&state(Step::Blank, 0.0));
        assert_eq!(layer.name(), Some("launch"));
        assert!(layer.find_named("background").is_some());
        assert!(layer.find_named("liquid-mask").is_some());
        assert!(layer.find_named("logo").is_none());
        assert!(layer.find_named("content").is_none());
    }

    #[test]
    fn test_logo_step_masks_entering_logo() {
        let layer = view().compose(&state(Step::Logo, 0.5));
        let mask = layer.find_named("liquid-mask").unwrap();
        assert!(mask.find_named("logo").is_some());
        assert!(layer.find_named("logo-final").is_none());
    }

    #[test]
    fn test_content_step_keeps_final_logo_behind() {
        let layer = view().compose(&state(Step::Content, 0.5));
        assert!(layer.find_named("logo-final").is_some());

        let mask = layer.find_named("liquid-mask").unwrap();
        assert!(mask.find_named("content").is_some());
        assert!(mask.find_named("logo-final").is_none());
    }

    #[test]
    fn test_mask_flips_in_content_step() {
        let view = view();
        let clip_path = |step| match view.compose(&state(step, 0.3)).find_named("liquid-mask") {
            Some(Layer::Clip {
                shape: ClipShape::Path(path),
                ..
            }) => path.clone(),
            other => panic!("unexpected mask layer: {other:?}"),
        };

        let upright = clip_path(Step::Logo).bounds().unwrap();
        let flipped = clip_path(Step::Content).bounds().unwrap();
        assert!((upright.width() - flipped.width()).abs() < 1e-2);
        assert!((upright.center().y - flipped.center().y).abs() > 1.0);
    }
}
