mod api;
mod rows;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use pagewise::config::DEFAULT_LOAD_MORE_TRIGGER_INDEX;
use pagewise::prelude::*;
use pagewise::wakeup;
use simplelog::{Config, LevelFilter, WriteLogger};

use api::{Row, SimulatedApi};
use rows::RowLines;

type Feed = PagedValueNotifier<usize, Row, SimulatedApi>;

/// Scroll through a simulated paged API and print every frame
#[derive(Parser, Debug)]
#[command(name = "pagewise-demo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Rows per page
    #[arg(long, default_value_t = 8)]
    page_size: usize,

    /// Rows served in total
    #[arg(long, default_value_t = 40)]
    total: usize,

    /// Distance from the end at which the next page is requested
    #[arg(long, default_value_t = DEFAULT_LOAD_MORE_TRIGGER_INDEX)]
    trigger: usize,

    /// Fail every n-th request once (0 never fails)
    #[arg(long, default_value_t = 0)]
    fail_every: usize,

    /// Simulated request latency in milliseconds
    #[arg(long, default_value_t = 50)]
    latency_ms: u64,

    /// Lay rows out in a grid instead of a list
    #[arg(long)]
    grid: bool,

    /// Grid columns
    #[arg(long, default_value_t = 3)]
    columns: usize,

    /// Visible slots (list) or rows (grid)
    #[arg(long, default_value_t = 6)]
    viewport: usize,

    /// Slots scrolled per idle frame
    #[arg(long, default_value_t = 3)]
    step: usize,

    /// Give up after this many consecutive failed retries
    #[arg(long, default_value_t = 3)]
    max_retries: usize,

    /// Stop after this many frames
    #[arg(long, default_value_t = 200)]
    max_frames: u64,

    /// Log file
    #[arg(long, default_value = "pagewise-demo.log")]
    log_file: PathBuf,

    /// Also log per-frame slot details
    #[arg(short, long)]
    verbose: bool,
}

/// The view being driven and its headless host.
enum Screen {
    List {
        view: PagedListView<Feed, RowLines>,
        host: WindowedList,
    },
    Grid {
        view: PagedGridView<Feed, RowLines>,
        host: WindowedGrid,
    },
}

impl Screen {
    fn new(args: &Args, feed: Arc<Feed>, render_loop: &RenderLoop) -> Result<Self, PagerError> {
        let config = PagedViewConfig::new().load_more_trigger_index(args.trigger);
        if args.grid {
            let delegate = GridDelegate::fixed(args.columns);
            Ok(Self::Grid {
                view: PagedGridView::with_config(feed, RowLines, delegate, config, render_loop)?,
                host: WindowedGrid::new(args.viewport, 80.0)?,
            })
        } else {
            Ok(Self::List {
                view: PagedListView::with_config(feed, RowLines, config, render_loop)?,
                host: WindowedList::new(args.viewport)?,
            })
        }
    }

    /// Render one frame as text lines.
    fn render(&mut self) -> Vec<String> {
        match self {
            Self::List { view, host } => match view.render(host) {
                PagedFrame::Items(frame) => frame.slots.into_iter().map(|(_, line)| line).collect(),
                PagedFrame::Loading(line) | PagedFrame::Error(line) | PagedFrame::Empty(line) => vec![line],
            },
            Self::Grid { view, host } => match view.render(host) {
                PagedFrame::Items(frame) => frame
                    .rows
                    .into_iter()
                    .map(|row| row.into_iter().map(|(_, cell)| cell).collect::<Vec<_>>().join(" | "))
                    .collect(),
                PagedFrame::Loading(line) | PagedFrame::Error(line) | PagedFrame::Empty(line) => vec![line],
            },
        }
    }

    fn scroll(&mut self, step: usize) {
        let step = isize::try_from(step).unwrap_or(isize::MAX);
        match self {
            Self::List { host, .. } => host.scroll_by(step),
            Self::Grid { host, .. } => host.scroll_by(1),
        }
    }

    fn at_end(&self) -> bool {
        match self {
            Self::List { host, .. } => host.at_end(),
            Self::Grid { host, .. } => host.at_end(),
        }
    }
}

/// Consecutive retries allowed before the demo gives up.
#[derive(Debug)]
struct RetryBudget {
    max: usize,
    used: usize,
}

impl RetryBudget {
    fn new(max: usize) -> Self {
        Self { max, used: 0 }
    }

    /// Take one retry. Returns `false` once the budget is spent.
    fn take(&mut self) -> bool {
        if self.used == self.max {
            return false;
        }
        self.used += 1;
        true
    }

    /// A fetch succeeded; the next failure starts a fresh streak.
    fn recover(&mut self) {
        self.used = 0;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let log_file = File::create(&args.log_file)?;
    let level = if args.verbose { LevelFilter::Trace } else { LevelFilter::Debug };
    WriteLogger::init(level, Config::default(), log_file)?;

    let api = SimulatedApi::new(args.page_size, args.total)
        .fail_every(args.fail_every)
        .latency(Duration::from_millis(args.latency_ms));
    let feed = Arc::new(Feed::new(api));
    let (tx, mut wakeups) = wakeup::channel();
    feed.install_wakeup(tx);

    let render_loop = RenderLoop::tokio();
    let mut screen = Screen::new(&args, Arc::clone(&feed), &render_loop)?;
    info!("Demo started: {:?}", args);

    let tick = Duration::from_millis(args.latency_ms.max(10) * 2);
    let mut retries = RetryBudget::new(args.max_retries);
    loop {
        // A new snapshot or an idle tick; both produce a frame.
        if let Ok(None) = tokio::time::timeout(tick, wakeups.recv()).await {
            break;
        }
        wakeups.drain();

        let frame = render_loop.begin_frame();
        let lines = screen.render();
        render_loop.end_frame();
        feed.clear_dirty();

        println!("-- frame {} --", frame);
        for line in &lines {
            println!("{}", line);
        }

        let value = feed.value();
        if value.is_error() || value.trailing_error().is_some() {
            if !retries.take() {
                warn!("Giving up after {} consecutive retries", retries.used);
                break;
            }
            feed.retry().await;
            continue;
        }
        retries.recover();
        if !value.is_loading() && !value.has_more() && screen.at_end() {
            info!("Reached the end: {} rows", value.items().len());
            break;
        }
        if frame >= args.max_frames {
            warn!("Stopping after {} frames", frame);
            break;
        }
        screen.scroll(args.step);
    }

    println!(
        "{} rows loaded in {} requests",
        feed.value().items().len(),
        feed.fetcher().requests()
    );
    Ok(())
}
