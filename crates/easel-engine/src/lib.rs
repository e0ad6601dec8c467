//! Easel engine crate.
//!
//! Active-rendering window backend for small 2D games: owns one top-level
//! window whose client area is exactly the requested size, embeds a software
//! or GPU rendering surface in it, and tears both down in order.
//!
//! Entry point is [`GraphicsEngine`]; windows come from a
//! [`platform::Toolkit`] (real desktop or headless).

pub mod config;
pub mod coords;
pub mod device;
pub mod error;
pub mod exit;
pub mod graphics;
pub mod icon;
pub mod logging;
pub mod paint;
pub mod platform;
pub mod render;
pub mod scene;
pub mod surface;
pub mod window;

mod engine;

pub use config::{EngineConfig, SurfaceKind, TeardownPolicy, WindowKind};
pub use engine::GraphicsEngine;
pub use error::{GraphicsError, PresentError};
pub use exit::ExitSignal;
pub use graphics::Graphics;
pub use icon::Icon;
