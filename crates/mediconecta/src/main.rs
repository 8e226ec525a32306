use std::env;
use std::fs;
use std::io::{self, Write as _};
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use log::{error, info, warn};
use page_handler::{AlertPresenter, DataLoader, HtmlPage, LoadOptions, PageConfig, SimulatedBackend};
use tokio::runtime::Runtime;

use crate::args::Args;

mod args;

pub fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse(env::args().skip(1))?;
    let config = PageConfig::from_env();
    let markup = fs::read_to_string(&args.page).with_context(|| format!("reading {}", args.page.display()))?;

    let mut page = HtmlPage::parse(&markup, config.clone())?;
    if let Some(location) = args.location.clone() {
        page.window_mut().set_location(location);
    }
    if let Some(cookie) = &args.cookie {
        page.window_mut().set_cookie(cookie);
    }

    let backend = SimulatedBackend::new();
    args.kind.install(&mut page, &config, Box::new(backend.clone()));
    page.load();

    if !args.loads.is_empty() {
        let runtime = Runtime::new()?;
        let loader = DataLoader::new(AlertPresenter::new(config.alert_duration()));
        for request in &args.loads {
            let container = page.document().select(&request.selector)?;
            if container.is_none() {
                warn!("no element matches {:?}; loading without a container", request.selector);
            }
            runtime.block_on(loader.load_data(&mut page, &request.path, container, &LoadOptions::default()))?;
        }
    }

    let fired = page.run_until_idle();
    info!(
        "{:?} page settled after {fired} timers, {} native submissions, {} simulated requests",
        args.kind,
        page.window_mut().take_submissions().len(),
        backend.accepted().len()
    );

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", page.document().to_html())?;
    Ok(())
}
