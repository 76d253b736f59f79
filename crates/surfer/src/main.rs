use surfer_core::{LogLevel, init_logging};

mod app;
mod commands;

fn main() {
    let app = app::build_cli();
    let matches = app.get_matches();

    let level = LogLevel::from_flags(matches.get_flag("verbose"), matches.get_flag("debug"));
    init_logging(level);

    if let Err(e) = commands::run_command(&matches) {
        // Error already printed to user via eprintln! in run_command.
        // Exit with non-zero code without printing Rust's Debug representation.
        drop(e);
        std::process::exit(1);
    }
}
