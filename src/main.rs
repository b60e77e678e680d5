use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use photoauth::input::{is_supported_image, looks_like_url};
use photoauth::report::{self, terminal, ReportEntry, Summary};
use photoauth::{ApiClient, Config, Session, StatsPoller, Submission};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Extra time past the request timeout before giving up on a worker.
const WAIT_MARGIN: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "photoauth")]
#[command(author, version, about = "Check whether an image is authentic, edited, or AI-generated")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Image file, directory of images, or image URL (optional in GUI mode)
    input: Option<String>,

    /// Analysis backend base URL
    #[arg(long, env = "PHOTOAUTH_API_URL", global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (at least 1)
    #[arg(long, default_value = "15", global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Launch GUI file picker (auto-enabled when double-clicked)
    #[arg(long)]
    gui: bool,

    /// Output report file (.html, .json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Don't prompt to open report
    #[arg(long)]
    no_open: bool,

    /// Show detailed analysis and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show summary
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive web UI
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Don't open a browser
        #[arg(long)]
        no_open: bool,
    },

    /// Check that the backend is up and its model is loaded
    Status,

    /// Show backend statistics
    Stats {
        /// Keep refreshing on the stats interval
        #[arg(short, long)]
        watch: bool,
    },
}

/// One thing to analyze, as given on the command line.
enum Target {
    File(PathBuf),
    Url(String),
}

impl Target {
    fn display(&self) -> String {
        match self {
            Target::File(path) => path.display().to_string(),
            Target::Url(url) => url.clone(),
        }
    }

    /// Where a report can load the image from.
    fn image(&self) -> Option<String> {
        match self {
            Target::File(path) => path
                .canonicalize()
                .ok()
                .map(|p| format!("file://{}", p.display())),
            Target::Url(url) => Some(url.trim().to_string()),
        }
    }
}

fn main() {
    // Before parsing so `.env` can feed `--api-url`.
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(args.verbose);

    let config = Config::from_env()
        .with_api_url(args.api_url.clone())
        .with_timeout(Duration::from_secs(args.timeout));

    // Handle subcommands first
    if let Some(cmd) = args.command {
        match cmd {
            Command::Serve { port, no_open } => {
                if let Err(e) = photoauth::serve::start(port, config, !no_open) {
                    eprintln!("Server error: {}", e);
                    std::process::exit(1);
                }
                return;
            }
            Command::Status => {
                let client = client_or_exit(config);
                match client.status() {
                    Ok(status) => println!("{}", terminal::status_line(client.base_url(), &status)),
                    Err(e) => {
                        eprintln!("{}", terminal::failure_line(&e));
                        std::process::exit(1);
                    }
                }
                return;
            }
            Command::Stats { watch } => {
                show_stats(config, watch);
                return;
            }
        }
    }

    // Determine if we should use GUI mode
    // With GUI feature: launch GUI if --gui flag OR no input provided
    #[cfg(feature = "gui")]
    let use_gui = args.gui || args.input.is_none();

    #[cfg(not(feature = "gui"))]
    let use_gui = false;

    #[cfg(feature = "gui")]
    let input = if use_gui {
        match pick_input_gui() {
            Some(p) => p.display().to_string(),
            None => {
                eprintln!("No file or folder selected.");
                std::process::exit(0);
            }
        }
    } else {
        args.input.clone().unwrap_or_default()
    };

    #[cfg(not(feature = "gui"))]
    let input = if let Some(input) = args.input.clone() {
        input
    } else {
        eprintln!("Usage: photoauth <INPUT>");
        eprintln!("Run 'photoauth --help' for more options.");
        eprintln!("Note: GUI mode not available in this build.");
        std::process::exit(1);
    };

    let targets = collect_targets(&input);
    if targets.is_empty() {
        eprintln!("No images found (supported: png, jpg, jpeg, gif, webp)");
        std::process::exit(1);
    }

    if !args.quiet {
        eprintln!("\x1b[1mPhotoAuth - Image Authenticity Check\x1b[0m");
        eprintln!("{}", terminal::rule());
        eprintln!("Backend: {}", config.api_url);
        eprintln!("Found {} image(s)\n", targets.len());
    }

    let wait = config.timeout + WAIT_MARGIN;
    let mut session = Session::new(Arc::new(client_or_exit(config)));

    // Set up progress indicator
    let pb = if args.quiet {
        ProgressBar::hidden()
    } else if targets.len() > 1 {
        let pb = ProgressBar::new(targets.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb
    };
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut entries = Vec::with_capacity(targets.len());
    for target in &targets {
        pb.set_message(format!("Analyzing {}", target.display()));
        let entry = analyze(&mut session, target, wait);

        if !args.quiet {
            pb.suspend(|| {
                println!("{}", terminal::entry_line(&entry));
                if args.verbose {
                    if let ReportEntry::Analyzed { analysis, .. } = &entry {
                        for line in terminal::detail_lines(analysis) {
                            eprintln!("{}", line);
                        }
                    }
                }
            });
        }
        pb.inc(1);
        entries.push(entry);
    }
    pb.finish_and_clear();

    // Summary
    let summary = Summary::from_entries(&entries);
    if args.quiet || entries.len() > 1 {
        eprintln!("\n{}", terminal::rule());
        for line in terminal::summary_lines(&summary) {
            eprintln!("{}", line);
        }
    }

    // Generate report
    if let Some(ref output_path) = args.output {
        if let Err(e) = report::generate(output_path, &entries) {
            eprintln!("Failed to write report: {}", e);
            std::process::exit(1);
        }
        if !args.quiet {
            eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", output_path.display());
        }

        if !args.no_open {
            if use_gui {
                // In GUI mode, auto-open the report (no prompt)
                let _ = open::that(output_path);
            } else if !args.quiet {
                eprint!("\nOpen report in browser? [Y/n] ");
                io::stderr().flush().ok();

                let mut answer = String::new();
                if io::stdin().read_line(&mut answer).is_ok() {
                    let answer = answer.trim().to_lowercase();
                    if answer.is_empty() || answer == "y" || answer == "yes" {
                        if let Err(e) = open::that(output_path) {
                            eprintln!("Failed to open report: {}", e);
                        }
                    }
                }
            }
        }
    }

    if !args.quiet {
        eprintln!("\n\x1b[90mAnalysis complete.\x1b[0m");
    }

    // Exit with appropriate code
    if summary.ai_edited > 0 {
        std::process::exit(2);
    } else if summary.possibly_edited > 0 || summary.failed > 0 {
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "photoauth=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn client_or_exit(config: Config) -> ApiClient {
    match ApiClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Could not create HTTP client: {}", e);
            std::process::exit(1);
        }
    }
}

fn collect_targets(input: &str) -> Vec<Target> {
    if looks_like_url(input) {
        return vec![Target::Url(input.to_string())];
    }

    let path = Path::new(input);
    if path.is_dir() {
        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_supported_image(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();
        files.into_iter().map(Target::File).collect()
    } else {
        // Unsupported or missing files still get a line explaining why.
        vec![Target::File(path.to_path_buf())]
    }
}

/// Run one target through the session and record how it went.
fn analyze<B: photoauth::Backend>(session: &mut Session<B>, target: &Target, wait: Duration) -> ReportEntry {
    let source = target.display();
    let failed = |error: String| ReportEntry::Failed {
        source: source.clone(),
        error,
    };

    let submission = match target {
        Target::File(path) => match Submission::from_path(path) {
            Ok(submission) => submission,
            Err(e) => return failed(e.to_string()),
        },
        Target::Url(url) => Submission::Url(url.clone()),
    };

    if let Err(e) = session.submit(submission) {
        return failed(e.to_string());
    }
    if !session.wait(wait) {
        session.reset();
        return failed("Timed out waiting for the backend".to_string());
    }

    let entry = match (session.state().result(), session.state().error()) {
        (Some(analysis), _) => ReportEntry::Analyzed {
            analysis: analysis.clone(),
            image: target.image(),
        },
        (None, Some(error)) => failed(error.to_string()),
        (None, None) => failed("Unexpected error".to_string()),
    };
    session.reset();
    entry
}

fn show_stats(config: Config, watch: bool) {
    let interval = config.stats_interval;
    let client = client_or_exit(config);

    if !watch {
        match client.stats() {
            Ok(stats) => println!("{}", terminal::stats_line(&stats)),
            Err(e) => {
                eprintln!("{}", terminal::failure_line(&e));
                std::process::exit(1);
            }
        }
        return;
    }

    let poller = StatsPoller::spawn(Arc::new(client), interval, |stats| {
        println!("{}", terminal::stats_line(&stats));
    });
    match poller {
        // Runs until interrupted.
        Ok(_poller) => loop {
            std::thread::park();
        },
        Err(e) => {
            eprintln!("Could not start stats poller: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "gui")]
fn pick_input_gui() -> Option<PathBuf> {
    let extensions: Vec<&str> = photoauth::input::SUPPORTED_IMAGES
        .iter()
        .map(|(ext, _)| *ext)
        .collect();

    // First try folder picker
    if let Some(folder) = rfd::FileDialog::new()
        .set_title("Select folder of images (or Cancel for single file)")
        .pick_folder()
    {
        return Some(folder);
    }

    // If cancelled, offer file picker
    rfd::FileDialog::new()
        .set_title("Select image to analyze")
        .add_filter("Images", &extensions[..])
        .pick_file()
}
