use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use db_infra::db::DbConfig;
use db_infra::{orchestrate_migration, DbInfraError};
use migration::MigrationCommand;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Storefront database migration tool")]
struct Args {
    /// Migration command: up | down | fresh | reset | refresh | status
    command: String,

    /// SQLite database file (defaults to artisancraft.db in the working directory)
    #[arg(long)]
    db_path: Option<PathBuf>,
}

/// Plain-text log lines for terminals and captured CI output alike.
fn log_subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(writer)
        .without_time()
        .with_target(false)
        .with_ansi(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("migration=info,db_infra=info,sqlx=warn")
        .finish()
}

#[tokio::main]
async fn main() {
    log_subscriber(std::io::stdout).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let command = match MigrationCommand::from_str(&args.command) {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("❌ {msg}");
            std::process::exit(2);
        }
    };

    let mut cfg = match DbConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e @ DbInfraError::UnsupportedKind { .. }) => {
            eprintln!("❌ {e}");
            eprintln!("Supported database types: sqlite");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    if let Some(path) = args.db_path {
        cfg.path = path;
    }

    if let Err(e) = orchestrate_migration(&cfg, command).await {
        eprintln!("❌ Migration failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn log_lines_carry_no_ansi_escapes() {
        let captured = Captured::default();
        let writer = captured.clone();

        tracing::subscriber::with_default(log_subscriber(move || writer.clone()), || {
            tracing::info!(target: "migration", "migrate=done");
            tracing::debug!(target: "migration", "filtered out");
        });

        let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("migrate=done"), "got {out:?}");
        assert!(!out.contains("filtered out"));
        assert!(!out.contains('\x1b'), "escape codes in {out:?}");
    }
}
