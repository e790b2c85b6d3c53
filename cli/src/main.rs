use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wsscribe_cli::config::{
    API_URL_ENV, ClientConfig, ConfigError, DEFAULT_DEBOUNCE_MS, DEFAULT_MIN_CONTEXT_CHARS,
    DEFAULT_NOTIFICATION_TTL_MS, SessionTuning, WS_URL_ENV,
};
use wsscribe_cli::controller::EditingSession;
use wsscribe_cli::rooms::{JoinError, RoomId, RoomsClient, RoomsError};
use wsscribe_cli::suggest::HttpSuggestionSource;
use wsscribe_cli::terminal;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Join(#[from] JoinError),
    #[error("room registry request failed: {0}")]
    Rooms(#[from] RoomsError),
    #[error("terminal io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "wsscribe", about = "Collaborative code editing rooms in the terminal")]
struct Cli {
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,

    #[arg(long, env = WS_URL_ENV)]
    ws_url: Option<String>,

    #[command(flatten)]
    tuning: TuningArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct TuningArgs {
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS, help = "Quiet period before a suggestion request")]
    debounce_ms: u64,

    #[arg(long, default_value_t = DEFAULT_MIN_CONTEXT_CHARS)]
    min_context_chars: usize,

    #[arg(long, default_value_t = DEFAULT_NOTIFICATION_TTL_MS)]
    notification_ttl_ms: u64,

    #[arg(long, default_value = frames::DEFAULT_LANGUAGE)]
    language: String,
}

impl From<TuningArgs> for SessionTuning {
    fn from(args: TuningArgs) -> Self {
        Self {
            debounce: Duration::from_millis(args.debounce_ms),
            min_context_chars: args.min_context_chars,
            notification_ttl: Duration::from_millis(args.notification_ttl_ms),
            language: args.language,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    Rooms(RoomsCommand),
    /// Join an existing room by id.
    Join { room_id: String },
    /// Create a new room and join it.
    Create,
}

#[derive(Args, Debug)]
struct RoomsCommand {
    #[command(subcommand)]
    command: RoomsSubcommand,
}

#[derive(Subcommand, Debug)]
enum RoomsSubcommand {
    Create,
    List,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_parts(cli.api_url, cli.ws_url, cli.tuning.into())?;
    let rooms = RoomsClient::new(&config);

    match cli.command {
        Command::Rooms(RoomsCommand { command: RoomsSubcommand::Create }) => {
            let room_id = rooms.create_room().await?;
            println!("{room_id}");
            Ok(())
        }
        Command::Rooms(RoomsCommand { command: RoomsSubcommand::List }) => {
            let listed = rooms.list_rooms().await?;
            println!("{}", serde_json::to_string_pretty(&listed)?);
            Ok(())
        }
        Command::Join { room_id } => {
            let room_id = rooms.resolve_join(&room_id).await?;
            run_session(&config, room_id).await
        }
        Command::Create => {
            let room_id = rooms.create_room().await.map_err(|_| JoinError::Unreachable)?;
            println!("created room {room_id}");
            run_session(&config, room_id).await
        }
    }
}

async fn run_session(config: &ClientConfig, room_id: RoomId) -> Result<(), CliError> {
    let source = Arc::new(HttpSuggestionSource::new(config));
    let mut session = EditingSession::connect(config, room_id, source);
    terminal::run(&mut session, tokio::io::stdin(), tokio::io::stdout()).await?;
    Ok(())
}
