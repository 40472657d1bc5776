//! Presentation shell state
//!
//! Progress math and labels, auto-hiding controls, fullscreen handling and
//! the [`ShellView`] snapshot. Nothing here renders.

pub mod controls;
pub mod fullscreen;
pub mod progress;
pub mod view;

pub use controls::{ControlsConfig, ControlsVisibility, DEFAULT_HIDE_AFTER};
pub use fullscreen::FullscreenController;
pub use progress::{ProgressReadout, progress_fraction};
pub use view::{Overlay, ShellView, ViewSources};
