use clap::Parser;

use fintrack::config::{Cli, Command, ConfigAction, get_config, init_config};
use fintrack::runtime::modes;
use fintrack::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command() {
        Command::Config {
            action: ConfigAction::Generate { path, force },
        } => {
            if let Err(e) = modes::generate_config(path, *force) {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Serve => {
            init_config(&cli.config);
            let config = get_config();

            // guard 必须存活到进程结束，否则日志不会刷新
            let _guard = init_logging(&config.logging);

            modes::run_server().await
        }
    }
}
