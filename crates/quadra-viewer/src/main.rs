mod cli;
mod viewer;

use std::process::ExitCode;

use quadra_engine::device::GpuInit;
use quadra_engine::logging::{init_logging, LoggingConfig};
use quadra_engine::window::Runtime;

use cli::{Command, ViewerOptions, USAGE};
use viewer::Viewer;

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let options = match cli::parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(options: ViewerOptions) -> anyhow::Result<()> {
    let ViewerOptions { image, quad, runtime } = options;
    log::info!("viewing {}", image.display());

    Runtime::run(runtime, GpuInit::default(), Viewer::new(image, quad))
}
