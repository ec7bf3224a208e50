use std::fs::File;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use salesboard::config::{self, Config};
use salesboard::report;
use salesboard::{
    client_options, load_credentials, Dashboard, ReaderSource, Refresher, Result, Scope, Session,
    SheetSource, Source,
};

fn source(config: &Config, path: Option<&Path>, gid: &str) -> Box<dyn Source> {
    match path {
        Some(path) => Box::new(ReaderSource::from_path(path, config.encoding)),
        None => Box::new(SheetSource::export(&config.sheet_id, gid, config.encoding)),
    }
}

fn show(dashboard: &mut Dashboard, session: &Session<Box<dyn Source>>, config: &Config) -> Result<()> {
    let snapshot = match session.snapshot() {
        Some(snapshot) => snapshot,
        None => return Ok(()),
    };
    let rankings = dashboard.rankings(&snapshot);
    let top = rankings.global.len().max(rankings.scoped.len());

    println!("Welcome, {} (update #{})", dashboard.viewer().name(), snapshot.generation);

    if dashboard.viewer().is_admin() {
        println!("Viewing for: {} of {}", rankings.scope, client_options(&snapshot.records).join(", "));
    }

    println!();
    println!("Top {} products (all clients)", top);

    for line in report::render(&rankings.global, &config.template)? {
        println!("{}", line);
    }

    println!();
    println!("Top {} products ({})", top, dashboard.title());

    for line in report::render(&rankings.scoped, &config.template)? {
        println!("{}", line);
    }

    if let Some(ref path) = config.csv_path {
        report::write_csv(&rankings.scoped, File::create(path)?)?;
    }

    Ok(())
}

fn run(config: Config) -> Result<()> {
    let credentials = load_credentials(&*source(&config, config.credentials_path.as_deref(), &config.credentials_gid));
    let orders = source(&config, config.orders_path.as_deref(), &config.orders_gid);
    let session = Arc::new(Session::login(orders, &credentials, &config.name, &config.key)?);

    let mut dashboard = Dashboard::new(session.viewer().clone(), config.reduce);

    if config.scope != Scope::Global {
        dashboard.select(config.scope.clone());
    }

    session.refresh()?;
    show(&mut dashboard, &session, &config)?;

    if !config.watch {
        return Ok(());
    }

    let _refresher = Refresher::spawn(Arc::clone(&session), config.refresh_interval);
    let mut shown = session.snapshot().map_or(0, |s| s.generation);

    loop {
        thread::sleep(Duration::from_secs(1));

        let generation = session.snapshot().map_or(0, |s| s.generation);

        if generation != shown {
            println!();
            show(&mut dashboard, &session, &config)?;
            shown = generation;
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = config::app().get_matches();

    let result = Config::from_matches(&matches).and_then(run);

    if let Err(e) = result {
        eprintln!("{}", e);

        process::exit(1);
    }
}
