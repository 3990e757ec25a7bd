use clap::Parser;

use portfolio::cli::{Cli, Commands};
use portfolio::runtime::modes::{run_cli, run_server};
use portfolio::system::logging::init_logging;
use portfolio::system::panic_handler::{RunMode, install_panic_hook};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    portfolio::config::init_config_from(cli.config.as_deref());
    let config = portfolio::config::get_config();

    match cli.command {
        None | Some(Commands::Serve) => {
            install_panic_hook(RunMode::Server);
            // guard 必须存活到进程结束，否则文件日志会丢失
            let _guard = init_logging(&config.logging);
            run_server().await
        }
        Some(cmd) => {
            install_panic_hook(RunMode::Command);
            if let Err(e) = run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
