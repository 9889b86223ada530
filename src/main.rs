use runsible::{cli, runner, settings::Settings};

use env_logger::Builder;
use log::{info, LevelFilter};
use std::io::Write;

fn main() {
    // Delay logger initialization until after parsing arguments
    let matches = cli::build_cli().get_matches();
    let mut settings = Settings::from_matches(&matches);

    // Set log level based on the configured verbosity
    let log_level = match settings.verbose {
        0 | 1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // Custom log format
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .filter_level(log_level)
        .init();

    info!(
        "Starting runsible {} - running Ansible as a pipeline step",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = runner::run(&mut settings) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
