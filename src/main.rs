use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dovi_shelf::client::HttpScanService;
use dovi_shelf::i18n::translate;
use dovi_shelf::panel::{Control, FileOption, MessageKind, PanelView, ScanPanel};
use dovi_shelf::prefs::FileStore;
use dovi_shelf::table::{MediaRow, RowTable, SortMode, TableRow, TableSorter};
use dovi_shelf::{classify, Lang, PanelConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dovi-shelf")]
#[command(author, version, about = "Trigger library scans and sort media by HDR profile")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Library server root
    #[arg(long, global = true, env = "DOVI_SHELF_SERVER", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Message language: en or de (default: from $LANG)
    #[arg(long, global = true, env = "DOVI_SHELF_LANG")]
    lang: Option<Lang>,

    /// Preference file (default: platform config directory)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the whole library for new files
    Scan,

    /// List files known to the server
    Files,

    /// Scan a single file
    ScanFile {
        /// Server-side path as shown by `files`
        path: String,
    },

    /// Sort exported table rows and print them
    Sort {
        /// JSON array of rows: hdr_format, hdr_detail, el_type, filename
        rows: PathBuf,

        /// profile or filename; remembered for next time
        #[arg(short, long)]
        mode: Option<SortMode>,
    },

    /// Show the profile rank for a set of labels
    Rank {
        format: String,
        #[arg(default_value = "")]
        detail: String,
        #[arg(default_value = "")]
        el: String,
    },

    /// Open the library page in the browser
    Open,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "dovi_shelf=debug" } else { "dovi_shelf=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether the requested action succeeded.
fn run(args: Args) -> Result<bool> {
    let lang = args.lang.unwrap_or_else(|| {
        Lang::negotiate(None, std::env::var("LANG").ok().as_deref(), Lang::En)
    });

    let action = match args.command {
        Command::Rank { format, detail, el } => {
            println!("{}", classify(&format, &detail, &el));
            return Ok(true);
        }
        Command::Sort { rows, mode } => return sort_rows(&rows, mode, args.prefs, lang),
        Command::Open => {
            open::that(&args.server).with_context(|| format!("opening {}", args.server))?;
            return Ok(true);
        }
        Command::Scan => PanelAction::Scan,
        Command::Files => PanelAction::Files,
        Command::ScanFile { path } => PanelAction::ScanFile(path),
    };

    let config = PanelConfig { base_url: args.server.clone(), lang, ..Default::default() };
    let service = HttpScanService::new(&config.base_url)?;
    let panel = ScanPanel::new(service, TerminalView::new(lang), config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(run_panel(&panel, action))
}

/// Subcommands that go through the scan panel.
enum PanelAction {
    Scan,
    Files,
    ScanFile(String),
}

async fn run_panel(panel: &ScanPanel<HttpScanService, TerminalView>, action: PanelAction) -> Result<bool> {
    let ok = match action {
        PanelAction::Scan => panel.trigger_full_scan().await.kind != MessageKind::Error,
        PanelAction::Files => {
            panel.view().print_files.set(true);
            let count = panel
                .refresh_file_list()
                .await
                .with_context(|| format!("loading file list from {}", panel.config().base_url))?;
            if count == 0 {
                eprintln!("No files.");
            }
            true
        }
        PanelAction::ScanFile(path) => match panel.trigger_file_scan(Some(&path)).await {
            Some(outcome) => outcome.kind == MessageKind::Success,
            None => {
                eprintln!("No file given.");
                false
            }
        },
    };

    // A page reload shows the library as it is now; here that means listing it again
    if let Some(delay) = panel.view().reload.take() {
        tokio::time::sleep(delay).await;
        panel.view().print_files.set(true);
        if let Err(e) = panel.refresh_file_list().await {
            eprintln!("\x1b[90mCould not reload file list: {}\x1b[0m", e);
        }
    }

    Ok(ok)
}

fn sort_rows(path: &Path, mode: Option<SortMode>, prefs: Option<PathBuf>, lang: Lang) -> Result<bool> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let rows: Vec<MediaRow> =
        serde_json::from_str(&text).with_context(|| format!("parsing rows in {}", path.display()))?;

    let store = match prefs {
        Some(p) => FileStore::open(p)?,
        None => FileStore::open_default()?,
    };

    let mut sorter = TableSorter::new(RowTable::new(rows), store);
    let applied = match mode {
        Some(m) => sorter.choose(m.as_str()),
        None => sorter.apply(None),
    };
    let applied = match applied {
        Ok(m) => m,
        Err(never) => match never {},
    };

    let label_key = match applied {
        SortMode::Profile => "sort_mode_profile",
        SortMode::Filename => "sort_mode_filename",
    };
    eprintln!("\x1b[1m{}\x1b[0m", translate(label_key, lang, &[]));
    eprintln!("{}", "─".repeat(70));

    for row in &sorter.table().rows {
        let rank = row.profile_rank();
        println!(
            "{} {:<10} {:<14} {:<12} {:<4} {}",
            rank.as_u8(),
            rank.label(),
            truncate(&row.hdr_format, 14),
            truncate(&row.hdr_detail, 12),
            truncate(&row.el_type, 4),
            row.filename
        );
    }

    Ok(true)
}

/// Panel view for a terminal: spinner while busy, coloured messages on stderr.
#[derive(Default)]
struct TerminalView {
    lang: Lang,
    spinner: RefCell<Option<ProgressBar>>,
    reload: Cell<Option<Duration>>,
    print_files: Cell<bool>,
}

impl TerminalView {
    fn new(lang: Lang) -> Self {
        Self { lang, ..Default::default() }
    }
}

impl PanelView for TerminalView {
    fn begin_busy(&self, control: Control) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(match control {
            Control::ScanAll => "Scanning library...",
            Control::ScanFile => "Scanning file...",
        });
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.borrow_mut() = Some(pb);
    }

    fn end_busy(&self, _control: Control) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }

    fn show_message(&self, kind: MessageKind, text: &str) {
        let color = match kind {
            MessageKind::Success => "\x1b[32m", // Green
            MessageKind::Info => "\x1b[36m",    // Cyan
            MessageKind::Error => "\x1b[31m",   // Red
        };
        eprintln!("{}{}\x1b[0m", color, text);
    }

    fn populate_files(&self, _placeholder: &str, options: &[FileOption]) {
        if !self.print_files.replace(false) {
            return;
        }
        for option in options {
            let color = if option.scanned { "\x1b[32m" } else { "" };
            println!("{}{:<40}\x1b[0m  {}", color, truncate(&option.label, 40), option.value);
        }
    }

    fn set_scan_file_available(&self, _available: bool) {}

    fn schedule_reload(&self, delay: Duration) {
        let seconds = delay.as_secs_f32().to_string();
        eprintln!("\x1b[90m{}\x1b[0m", translate("reload_scheduled", self.lang, &[("seconds", seconds.as_str())]));
        self.reload.set(Some(delay));
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
