mod app;
mod cli;
mod color;
mod config;
mod event;
mod logging;
mod session;
mod store;
mod tui;
mod types;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let config_path = cli_opts
        .config
        .clone()
        .unwrap_or_else(config::Config::default_path);
    let config = config::Config::load_from(&config_path)?;
    let data_dir = cli_opts.data_dir.clone().unwrap_or_else(|| config.data_dir());
    let shift = cli_opts.shift();

    if let Some(command) = cli_opts.command {
        return cli::run(command, cli_opts.project.as_deref(), &config, &data_dir);
    }

    logging::enable_logging(&data_dir, &config.log_level)?;
    tracing::info!(data_dir = %data_dir.display(), "starting session");

    let mut app = app::App::new(config, data_dir);
    app.prefill(cli_opts.project, shift);
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    result
}
