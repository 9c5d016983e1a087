use std::process::ExitCode;

use clap::Parser;
use mari_core::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli::bootstrap();

    match cli.command {
        Command::Validate(args) => Ok(cli::validate::run(args)),
        Command::FunctionId(args) => cli::function_id::run(args).map(|_| ExitCode::SUCCESS),
        Command::TransferCoupon(args) => {
            cli::transfer_coupon::run(args).map(|_| ExitCode::SUCCESS)
        }
        Command::User(args) => cli::user::run(args, &config).await,
    }
}
