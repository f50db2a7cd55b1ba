//! Liquid Launch
//!
//! A launch screen that reveals a logo, then the app's content, through an
//! animated liquid-shaped mask.
//!
//! # Pieces
//!
//! - [`Sequencer`]: plays the timed launch script and samples [`AnimationState`]
//! - [`LiquidShape`] and [`liquid_mask`]: the wipe path for a progress value
//! - [`Logo`]: the tile badge with its icon and wordmark
//! - [`LaunchView`]: composes one frame's layer tree
//! - [`AssetCatalog`]: colors and images, with placeholders
//! - headless runner: deterministic scenario checks and frame export
//!
//! # Example
//!
//! ```
//! use liquid_launch::{LaunchConfig, LaunchView, Sequencer, Step};
//!
//! let config = LaunchConfig::default();
//! let mut sequencer = Sequencer::new(&config).unwrap();
//! let view = LaunchView::new(&config).unwrap();
//!
//! sequencer.seek(1000.0);
//! let state = sequencer.state();
//! assert_eq!(state.step, Step::Logo);
//!
//! let frame = view.compose(&state);
//! assert!(frame.find_named("logo").is_some());
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;
pub mod logo;
pub mod sequence;
pub mod shape;
pub mod state;
pub mod view;

pub use assets::{AssetCatalog, Palette, CONTENT_KEY, ICON_KEY, WORDMARK_KEY};
pub use config::LaunchConfig;
pub use error::{LaunchError, Result};
pub use headless_report::{HeadlessReport, ReportStatus};
pub use headless_runner::{
    render_sequence, render_sequence_with, run_scenario, LaunchHarness, RenderedLaunch, RunOutcome,
};
pub use headless_scenario::{HeadlessScenario, ScenarioStep};
pub use logo::{Logo, LogoLayout};
pub use sequence::{LaunchAction, LaunchEvent, Property, Sequencer};
pub use shape::{liquid_mask, LiquidShape, MaskPlacement};
pub use state::{AnimationState, Step};
pub use view::LaunchView;
