
use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};
use std::path::PathBuf;

pub fn build_cli() -> Command {
    Command::new("surfer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Show images on a Waveshare e-paper panel")
        .long_about("surfer draws an image on an e-paper panel, or watches a directory and redraws whenever a file in it is modified. Partial refreshes are used while the budget allows; the panel is put to sleep after every draw and blanked on exit.")
        .arg(
            Arg::new("image")
                .help("Image to display once")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("watch-directory")
                .short('w')
                .long("watch-directory")
                .value_name("PATH")
                .help("Directory to watch; modified files are drawn")
                .value_parser(value_parser!(PathBuf)),
        )
        .group(
            ArgGroup::new("input")
                .args(["image", "watch-directory"])
                .required(true)
                .multiple(false),
        )
        .arg(
            Arg::new("display")
                .short('d')
                .long("display")
                .value_name("MODEL")
                .help("Display model specifier [default: epd7in5_V2, or [display] model from config]"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable informational logging output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('e')
                .long("debug")
                .help("Enable debug logging output")
                .action(ArgAction::SetTrue),
        )
        .arg_required_else_help(true)
}
