use anyhow::{Context, Result};
use salesdash::{
    dataset::load_dataset,
    shell::{parse_command, ShellCommand},
    DashboardConfig, DashboardSession,
};
use std::{
    env,
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ─── 1) init logging (stderr; stdout carries the views) ──────────
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = DashboardConfig::resolve(config_path.as_deref())?;
    info!(
        sales = %config.sources.sales_path.display(),
        regions = %config.sources.regions_path.display(),
        date_field = ?config.date_field,
        "config resolved"
    );

    // ─── 3) load the dataset once, off the main thread ───────────────
    let sources = config.sources.clone();
    let table = tokio::task::spawn_blocking(move || load_dataset(&sources))
        .await
        .context("dataset loader task")?
        .context("loading dataset")?;
    let table = Arc::new(table);

    // ─── 4) initial render with the default range ────────────────────
    let mut session = DashboardSession::start(
        Arc::clone(&table),
        config.date_field,
        config.default_range.into(),
    )
    .context("initial render")?;
    emit(&session, config.pretty)?;

    // ─── 5) one render per submitted range ───────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match parse_command(&line) {
            Ok(ShellCommand::Blank) => continue,
            Ok(ShellCommand::Quit) => break,
            Ok(ShellCommand::Submit(request)) => {
                match session.submit(request.start, request.end) {
                    Ok(_) => emit(&session, config.pretty)?,
                    Err(e) => error!(error = %e, "render failed; previous charts kept"),
                }
            }
            Err(usage) => warn!(input = %line, "{}", usage),
        }
    }

    info!(submissions = session.state().submissions, "shutdown");
    Ok(())
}

fn emit(session: &DashboardSession, pretty: bool) -> Result<()> {
    let view = session.view();
    let json = if pretty {
        serde_json::to_string_pretty(&view)
    } else {
        serde_json::to_string(&view)
    }
    .context("serializing dashboard view")?;

    let mut out = io::stdout().lock();
    writeln!(out, "{}", json).context("writing view")?;
    out.flush().context("flushing stdout")?;
    Ok(())
}
