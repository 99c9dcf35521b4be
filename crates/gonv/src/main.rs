//! gonv - Go toolchain version manager

use clap::Parser;

use crate::cli::App;

mod cli;
mod context;
mod logging;
mod ui;

fn main() {
    let app = App::parse();
    logging::init();

    let code = match cli::run(app) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("gonv: {e:#}");
            1
        }
    };
    std::process::exit(code);
}
