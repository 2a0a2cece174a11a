#[path = "zabbix-elasticsearch/app.rs"]
mod app;
#[path = "zabbix-elasticsearch/cli.rs"]
mod cli;

use std::error::Error as StdError;

use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let cli = cli::Cli::parse_args();
    match app::run(cli).await {
        Ok(value) => {
            println!("{value}");
            std::process::ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, transport = err.is_transport(), "terminating");
            report_error(&err);
            std::process::ExitCode::from(1)
        }
    }
}

fn report_error(err: &zabbix_elasticsearch::error::Error) {
    eprintln!("Error: {err}");
    let mut source: Option<&dyn StdError> = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
