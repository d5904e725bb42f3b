use clap::{Parser, ValueEnum};
use chess_server::config::db::DbProfile;
use chess_server::infra::db::connect_db;
use migration::{migrate, MigrationCommand};

#[derive(Clone, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Clone, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Chess server database migration tool")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,

    /// Database type. In-memory SQLite is not offered: the schema would vanish
    /// with the process.
    #[arg(short, long, value_enum, default_value = "postgres")]
    db: Db,

    /// SQLite file path (sqlite-file only)
    #[arg(short, long, default_value = "chess.db")]
    file: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let profile = match args.db {
        Db::Postgres => DbProfile::Postgres,
        Db::SqliteFile => DbProfile::SqliteFile { file: args.file },
    };

    let conn = match connect_db(&profile).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("❌ Could not connect to {profile:?}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&conn, args.command.into()).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
