use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use easel_engine::coords::Size;
use easel_engine::{EngineConfig, SurfaceKind, TeardownPolicy, WindowKind};

#[derive(Parser, Debug, Clone)]
#[command(name = "easel-studio")]
#[command(about = "Drives an easel graphics engine with a bouncing-box render loop", long_about = None)]
pub struct Cli {
    /// Client area width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Client area height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Open a dialog-style window instead of a primary frame
    #[arg(long)]
    pub dialog: bool,

    /// Remove the title bar and borders
    #[arg(long)]
    pub undecorated: bool,

    /// Render on the GPU instead of the CPU
    #[arg(long)]
    pub accelerated: bool,

    /// Wait for vertical sync (accelerated only)
    #[arg(long, requires = "accelerated")]
    pub vsync: bool,

    /// Skip toolkit page flipping and blit a back buffer instead (software only)
    #[arg(long = "no-buffer-strategy", conflicts_with = "accelerated")]
    pub no_buffer_strategy: bool,

    /// Frames to render before cleaning up; 0 runs until the window is closed
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Frame rate cap when not waiting for vsync
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// What cleanup does when the window cannot be destroyed
    #[arg(long, value_enum, default_value_t = Teardown::Hide)]
    pub teardown: Teardown,

    /// Window icon (PNG, BMP or ICO)
    #[arg(long)]
    pub icon: Option<PathBuf>,

    /// Use the in-memory window system; needs no display
    #[arg(long)]
    pub headless: bool,

    /// Debug logging for the engine
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Copy, Clone, Eq, PartialEq)]
pub enum Teardown {
    Exit,
    Hide,
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        let surface = if self.accelerated {
            SurfaceKind::Accelerated { vsync: self.vsync }
        } else {
            SurfaceKind::Software {
                buffer_strategy: !self.no_buffer_strategy,
            }
        };
        let teardown = match self.teardown {
            Teardown::Exit => TeardownPolicy::Exit,
            Teardown::Hide => TeardownPolicy::Hide,
        };

        EngineConfig {
            size: Size::new(self.width, self.height),
            kind: if self.dialog { WindowKind::Dialog } else { WindowKind::Frame },
            decorated: !self.undecorated,
            title: "easel studio".to_string(),
            surface,
            teardown,
            ..EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_decorated_software_frame() {
        let config = Cli::parse_from(["easel-studio"]).engine_config();
        assert_eq!(config.size, Size::new(640, 480));
        assert_eq!(config.kind, WindowKind::Frame);
        assert!(config.decorated);
        assert_eq!(config.surface, SurfaceKind::Software { buffer_strategy: true });
        assert_eq!(config.teardown, TeardownPolicy::Hide);
    }

    #[test]
    fn accelerated_vsync_dialog() {
        let cli = Cli::parse_from(["easel-studio", "--dialog", "--accelerated", "--vsync", "--teardown", "exit"]);
        let config = cli.engine_config();
        assert_eq!(config.kind, WindowKind::Dialog);
        assert_eq!(config.surface, SurfaceKind::Accelerated { vsync: true });
        assert_eq!(config.teardown, TeardownPolicy::Exit);
    }

    #[test]
    fn vsync_requires_accelerated() {
        assert!(Cli::try_parse_from(["easel-studio", "--vsync"]).is_err());
    }
}
