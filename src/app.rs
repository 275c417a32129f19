use std::time::Instant;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::video::{GLContext, GLProfile, SwapInterval, Window};
use sdl2::{EventPump, Sdl, VideoSubsystem};

use crate::config::AppConfig;
use crate::context::RenderContext;
use crate::driver::NativeGl;
use crate::error::{Error, Result};
use crate::quad::Quad;
use crate::shader::ShaderProgram;

/// Red channel follows `|sin(t)|`; the rest is fixed.
pub fn pulse_colour(seconds: f64) -> [f32; 4] {
    [seconds.sin().abs() as f32, 0.0, 0.0, 1.0]
}

/// Window, GL context and the one quad it draws.
pub struct App {
    // Field order is drop order: GL objects go before the context they live in.
    quad: Quad,
    program: ShaderProgram,
    ctx: RenderContext,
    _gl_context: GLContext,
    window: Window,
    event_pump: EventPump,
    _video: VideoSubsystem,
    _sdl: Sdl,
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let sdl = sdl2::init().map_err(Error::Window)?;
        let video = sdl.video().map_err(Error::Window)?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(config.gl_version.0, config.gl_version.1);

        let window = video
            .window(&config.title, config.width, config.height)
            .opengl()
            .build()
            .map_err(|err| Error::Window(err.to_string()))?;

        let gl_context = window.gl_create_context().map_err(Error::Window)?;
        window.gl_make_current(&gl_context).map_err(Error::Window)?;

        let interval = if config.vsync {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        if let Err(err) = video.gl_set_swap_interval(interval) {
            log::warn!("could not set swap interval: {}", err);
        }

        let api = NativeGl::load_with(|name| video.gl_get_proc_address(name) as *const _);
        let ctx = RenderContext::new(api, config.error_policy);
        match ctx.version() {
            Some(version) => log::info!("OpenGL {}", version),
            None => log::warn!("driver did not report GL_VERSION"),
        }

        let quad = Quad::new(&ctx)?;
        let program = ShaderProgram::from_file(&ctx, &config.shader_path)?;

        let event_pump = sdl.event_pump().map_err(Error::Window)?;

        Ok(App {
            quad,
            program,
            ctx,
            _gl_context: gl_context,
            window,
            event_pump,
            _video: video,
            _sdl: sdl,
            config,
        })
    }

    /// Renders until the window is closed or Escape is pressed.
    pub fn run(&mut self) -> Result<()> {
        let start_time = Instant::now();
        let [red, green, blue, alpha] = self.config.clear_colour;

        'running: loop {
            self.ctx.clear(red, green, blue, alpha)?;

            let colour = pulse_colour(start_time.elapsed().as_secs_f64());
            self.quad.draw(
                &self.ctx,
                &self.program,
                &self.config.colour_uniform,
                colour,
            )?;

            self.window.gl_swap_window();

            for event in self.event_pump.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => break 'running,
                    _ => {}
                }
            }
        }

        log::info!("window closed after {:.1}s", start_time.elapsed().as_secs_f64());
        Ok(())
    }
}
