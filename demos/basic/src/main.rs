mod app;
mod equipment;
mod world;

use app::App;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut app = App::default();
    while !app.is_finished() {
        app.update();
    }
}
