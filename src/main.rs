use sdl2_gl_quad::logging::{init_logging, LoggingConfig};
use sdl2_gl_quad::{App, AppConfig};

fn main() {
    init_logging(LoggingConfig::default());

    let result = App::new(AppConfig::default()).and_then(|mut app| app.run());
    if let Err(err) = result {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
