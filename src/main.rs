use termgrid::config::Config;
use termgrid::platform::app::App;
use winit::event_loop::EventLoop;

fn main() {
    env_logger::init();

    let config = Config::load();
    let mut app = App::new(config);

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}
