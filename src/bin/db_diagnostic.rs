use std::path::PathBuf;

use clap::Parser;
use hbs_maintenance::config::{DbSettings, DiagnosticConfig};
use hbs_maintenance::diagnostic::run_and_report;
use hbs_maintenance::logging::init_tracing;

#[derive(Parser)]
#[command(name = "db-diagnostic")]
#[command(about = "Dump hotel, SBH2 room type and 18500 booking rows to JSON", long_about = None)]
struct Cli {
    /// Full connection string; overrides the individual --db-* options
    #[arg(long)]
    database_url: Option<String>,

    #[arg(long)]
    db_host: Option<String>,

    #[arg(long)]
    db_port: Option<u16>,

    #[arg(long)]
    db_user: Option<String>,

    #[arg(long)]
    db_password: Option<String>,

    #[arg(long)]
    db_name: Option<String>,

    /// Output file (default: db_diagnostic.json in the working directory)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    /// Layer command-line options over the environment.
    fn into_config(self) -> DiagnosticConfig {
        let mut config = DiagnosticConfig::from_env();

        let overrides_components = self.db_host.is_some()
            || self.db_port.is_some()
            || self.db_user.is_some()
            || self.db_password.is_some()
            || self.db_name.is_some();

        if let Some(url) = self.database_url {
            config.database_url = url;
        } else if overrides_components {
            let mut settings = DbSettings::from_env();
            if let Some(host) = self.db_host {
                settings.host = host;
            }
            if let Some(port) = self.db_port {
                settings.port = port;
            }
            if let Some(user) = self.db_user {
                settings.user = user;
            }
            if let Some(password) = self.db_password {
                settings.password = password;
            }
            if let Some(name) = self.db_name {
                settings.name = name;
            }
            config.database_url = settings.database_url();
        }

        if let Some(output) = self.output {
            config.output_path = output;
        }

        config
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing("warn,hbs_maintenance=info");

    let config = Cli::parse().into_config();
    tracing::debug!("Running diagnostic with config: {:?}", config);

    // Failures are reported inside; the process exits 0 either way
    run_and_report(&config).await;
}
