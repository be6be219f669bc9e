//! Native preview: runs the panel against an in-memory document and prints
//! its HTML after every refresh.

#![forbid(unsafe_code)]

#[cfg(not(target_arch = "wasm32"))]
mod preview {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use clap::Parser;
    use tracing::info;

    use pytorn_quick_stats::app::{AppState, Host};
    use pytorn_quick_stats::config::{load_options_file, PanelOptions};
    use pytorn_quick_stats::logging;
    use pytorn_quick_stats::scheduler::{TokioSpawner, TokioTimers};
    use pytorn_quick_stats::source::JsonFileSource;
    use pytorn_quick_stats::{FixedStatSource, MemoryDom, ReadySignal};

    const POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Preview the stats panel outside the browser
    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Cli {
        /// Panel options JSON (same shape as the browser options object)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Snapshot JSON, re-read on every refresh. Placeholder values if omitted.
        #[arg(short, long)]
        stats: Option<PathBuf>,

        /// Exit after this many refresh intervals, whether or not they rendered
        #[arg(short, long)]
        ticks: Option<u32>,

        /// trace, debug, info, warn or error (overrides LOG_LEVEL)
        #[arg(long)]
        log_level: Option<String>,
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();

        let options = match &cli.config {
            Some(path) => load_options_file(path)?,
            None => PanelOptions::default(),
        };

        // --log-level, then LOG_LEVEL, then the options file
        let level_name = cli
            .log_level
            .clone()
            .or_else(|| std::env::var("LOG_LEVEL").ok())
            .unwrap_or_else(|| options.log_level().to_string());
        logging::init(logging::parse_level(&level_name))?;

        let config = options.into_config().context("Invalid panel options")?;
        let run_for = match cli.ticks {
            Some(ticks) => Some(
                run_duration(config.refresh_interval(), ticks)
                    .with_context(|| format!("--ticks {ticks} overflows the run time"))?,
            ),
            None => None,
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build tokio runtime")?;
        let local = tokio::task::LocalSet::new();
        local.block_on(&runtime, async move {
            let dom = MemoryDom::new();
            let host = Host {
                timers: TokioTimers,
                spawner: TokioSpawner,
            };
            let ready = ReadySignal::fired();
            let app = match &cli.stats {
                Some(path) => {
                    info!(path = %path.display(), "Reading snapshots from file");
                    AppState::initialize_async(config, JsonFileSource::new(path), dom.clone(), host, &ready)?
                }
                None => AppState::initialize_async(config, FixedStatSource::placeholder(), dom.clone(), host, &ready)?,
            };

            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);
            let deadline = async move {
                match run_for {
                    Some(duration) => tokio::time::sleep(duration).await,
                    None => std::future::pending::<()>().await,
                }
            };
            tokio::pin!(deadline);
            let mut poll = tokio::time::interval(POLL_INTERVAL);
            let mut printed = 0;
            loop {
                tokio::select! {
                    _ = &mut ctrl_c => {
                        info!("Interrupted, shutting down");
                        break;
                    }
                    _ = &mut deadline => {
                        print_if_changed(&app, &dom, &mut printed);
                        info!("Requested ticks elapsed, shutting down");
                        break;
                    }
                    _ = poll.tick() => print_if_changed(&app, &dom, &mut printed),
                }
            }

            app.shutdown().context("Failed to remove stats panel")?;
            Ok::<(), anyhow::Error>(())
        })
    }

    fn print_if_changed(app: &AppState<MemoryDom>, dom: &MemoryDom, printed: &mut u64) {
        let renders = app.renderer().borrow().render_count();
        if renders != *printed {
            *printed = renders;
            println!("{}", dom.body_html());
        }
    }

    /// Time to keep running for `ticks` refreshes after the initial one, with
    /// half an interval of slack so the last tick lands before the deadline
    pub(crate) fn run_duration(interval: Duration, ticks: u32) -> Option<Duration> {
        interval.checked_mul(ticks)?.checked_add(interval / 2)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_run_duration_covers_every_tick() {
            let interval = Duration::from_secs(30);
            assert_eq!(run_duration(interval, 0), Some(Duration::from_secs(15)));
            assert_eq!(run_duration(interval, 3), Some(Duration::from_secs(105)));
        }

        #[test]
        fn test_run_duration_overflow_is_reported() {
            assert_eq!(run_duration(Duration::MAX, 2), None);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    preview::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
