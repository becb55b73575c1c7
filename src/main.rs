use clap::{Parser, Subcommand, builder::NonEmptyStringValueParser};
use time::UtcOffset;
use tokio::io::BufReader;
use tracing::{debug, info};

use regform::config::{ClientConfig, ConfigError, Mode};
use regform::controller::FormController;
use regform::net::api::{ApiError, HttpUsersApi};
use regform::session::{self, ReportError};
use regform::state::form::FormField;
use regform::state::loading::LoadingGate;
use regform::state::notifier::StatusNotifier;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Report(#[from] ReportError),
}

#[derive(Parser, Debug)]
#[command(name = "regform", about = "Registration form client for a /users REST backend")]
struct Cli {
    /// Backend base URL; overrides the mode default.
    #[arg(long, env = "REGFORM_API_BASE_URL")]
    base_url: Option<String>,

    /// `production` or `development`; selects the default base URL.
    #[arg(long, env = "REGFORM_MODE")]
    mode: Option<Mode>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Line-oriented form session (default).
    Interactive,
    /// Add one user.
    Add {
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        username: String,
        #[arg(long, env = "REGFORM_PASSWORD", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
        password: String,
    },
    /// List all users.
    List,
    /// Delete all users.
    Clear,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "loaded .env");
    }

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?.with_overrides(cli.mode, cli.base_url);
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let api = HttpUsersApi::new(&config)?;
    info!(mode = ?config.mode, base_url = %api.base_url(), "regform starting");
    let mut controller = FormController::new(api, StatusNotifier::new(config.message_ttl), LoadingGate::new());

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let mut stdout = std::io::stdout();
            session::run(&mut controller, BufReader::new(tokio::io::stdin()), &mut stdout, offset).await?;
            Ok(())
        }
        Command::Add { username, password } => {
            controller.on_field_change(FormField::Username, username);
            controller.on_field_change(FormField::Password, password);
            let outcome = controller.submit().await;
            Ok(session::report(&controller, outcome, &mut std::io::stdout(), offset)?)
        }
        Command::List => {
            let outcome = controller.fetch_all().await;
            Ok(session::report(&controller, outcome, &mut std::io::stdout(), offset)?)
        }
        Command::Clear => {
            let outcome = controller.delete_all().await;
            Ok(session::report(&controller, outcome, &mut std::io::stdout(), offset)?)
        }
    }
}
