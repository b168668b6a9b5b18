mod app;
mod audio;
mod config;
mod library;
mod meter;
mod persist;
mod playback;
mod playlist;
mod runtime;
mod tags;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
