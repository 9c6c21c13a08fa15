use anyhow::{Context, Result};
use clap::Parser;

fn main() -> Result<()> {
    let cli = taskboard::cli::Cli::parse();
    let config = taskboard::config::from_cli(&cli)?;
    let service = taskboard::TasksService::from_config(&config)?;

    match cli.command.clone() {
        Some(taskboard::cli::CliCommand::Tui) | None => {
            taskboard::logging::init_file(config.log_path(), cli.log_filter.as_deref())?;
            taskboard::tui::run(config, service)?;
        }
        Some(command) => {
            taskboard::logging::init_stderr(cli.log_filter.as_deref())?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            runtime.block_on(taskboard::commands::execute(&service, command, &mut handle))?;
        }
    }

    Ok(())
}
