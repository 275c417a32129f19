use std::path::PathBuf;

use crate::context::ErrorPolicy;

/// Window and render settings for [`App`](crate::App).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Requested core-profile context version, `(major, minor)`.
    pub gl_version: (u8, u8),
    pub vsync: bool,
    /// Combined `#shader vertex` / `#shader fragment` source file.
    pub shader_path: PathBuf,
    /// `vec4` uniform that receives the animated colour.
    pub colour_uniform: String,
    pub clear_colour: [f32; 4],
    pub error_policy: ErrorPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            title: "Hello World".to_owned(),
            width: 640,
            height: 480,
            gl_version: (3, 3),
            vsync: true,
            shader_path: PathBuf::from("res/shaders/basic.shader"),
            colour_uniform: "u_Color".to_owned(),
            clear_colour: [0.0, 0.0, 0.0, 1.0],
            error_policy: ErrorPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo_scene() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.gl_version, (3, 3));
        assert!(config.vsync);
        assert_eq!(config.colour_uniform, "u_Color");
        assert!(config.shader_path.ends_with("basic.shader"));
    }

    #[test]
    fn debug_builds_break_on_gl_errors() {
        let expected = if cfg!(debug_assertions) {
            ErrorPolicy::Break
        } else {
            ErrorPolicy::Report
        };
        assert_eq!(AppConfig::default().error_policy, expected);
    }
}
