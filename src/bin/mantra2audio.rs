//! CLI binary for mantra2audio.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ProcessingConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mantra2audio::{
    inspect, process_folder, process_pdf, BatchOutput, DocumentOutput, InspectReport,
    ProcessingConfig, ProcessingProgressCallback, ProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::error;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar per document plus a log line per passage.
struct CliProgressCallback {
    bar: ProgressBar,
    passage_started: Mutex<Option<Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            passage_started: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, source: &str, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} passages  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_style(progress_style);
        self.bar.set_prefix(source.to_string());
        self.bar.set_message("");
        self.bar.reset_elapsed();
    }

    fn passage_elapsed(&self) -> f64 {
        self.passage_started
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ProcessingProgressCallback for CliProgressCallback {
    fn on_document_start(&self, source: &str, total_passages: usize) {
        self.activate_bar(source, total_passages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("{source}: {total_passages} passages found"))
        ));
    }

    fn on_passage_start(&self, _index: usize, _total: usize, title: &str) {
        *self.passage_started.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(title.to_string());
    }

    fn on_passage_complete(&self, index: usize, total: usize, audio_file: Option<&str>) {
        let elapsed = self.passage_elapsed();
        self.bar.println(format!(
            "  {} Passage {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total,
            audio_file.unwrap_or("report only"),
            dim(&format!("{elapsed:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_passage_error(&self, index: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        let msg: String = if error.chars().count() > 80 {
            let mut s: String = error.chars().take(79).collect();
            s.push('…');
            s
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Passage {:>3}/{:<3}  {}",
            red("✗"),
            index,
            total,
            red(&msg),
        ));
    }

    fn on_passage_skipped(&self, index: usize, total: usize, reason: &str) {
        self.bar.println(format!(
            "  {} Passage {:>3}/{:<3}  {}",
            yellow("–"),
            index,
            total,
            dim(reason),
        ));
        self.bar.inc(1);
    }

    fn on_document_complete(&self, accepted: usize, audio_written: usize) {
        self.bar.println(format!(
            "{} {} passages kept, {} audio files",
            if self.errors.swap(0, Ordering::SeqCst) == 0 {
                green("✔")
            } else {
                yellow("⚠")
            },
            bold(&accepted.to_string()),
            bold(&audio_written.to_string()),
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every PDF in ./pdf, one subdirectory per PDF under ./output
  mantra2audio

  # A single PDF
  mantra2audio catalogue.pdf -o out

  # Report only, no network
  mantra2audio --no-audio pdf/

  # See what the segmenter finds, as JSON
  mantra2audio --inspect-only --json catalogue.pdf

  # Route TTS requests through a local proxy
  mantra2audio --proxy http://127.0.0.1:7890 pdf/

OUTPUT:
  processed_content.txt   one record per accepted passage (raw title, cleaned
                          text, audio file name)
  <title>.mp3             one audio file per accepted passage

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         pdfium shared library, or the directory holding it
  RUST_LOG                tracing filter, overrides --verbose/--quiet
"#;

/// Extract romanized Sanskrit mantras from PDFs and read them aloud.
#[derive(Parser, Debug)]
#[command(
    name = "mantra2audio",
    version,
    about = "Extract romanized Sanskrit mantras from PDFs and synthesize one audio file per mantra",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file, or directory of PDF files.
    #[arg(env = "MANTRA2AUDIO_INPUT", default_value = "pdf")]
    input: PathBuf,

    /// Output directory.
    #[arg(short, long, env = "MANTRA2AUDIO_OUTPUT", default_value = "output")]
    output: PathBuf,

    /// Language tag for speech synthesis.
    #[arg(long, env = "MANTRA2AUDIO_LANG", default_value = "ro")]
    lang: String,

    /// HTTP(S) proxy for the speech endpoint, e.g. http://127.0.0.1:7890.
    #[arg(long, env = "MANTRA2AUDIO_PROXY")]
    proxy: Option<String>,

    /// Pause after each synthesized passage, in milliseconds.
    #[arg(long, env = "MANTRA2AUDIO_DELAY_MS", default_value_t = 1000)]
    delay_ms: u64,

    /// Minimum cleaned mantra length, in characters.
    #[arg(long, env = "MANTRA2AUDIO_MIN_CHARS", default_value_t = 5)]
    min_chars: usize,

    /// Text colour treated as mantra ink: 0x000000, #000000 or decimal.
    #[arg(long, env = "MANTRA2AUDIO_INK_COLOR", default_value = "0x000000",
          value_parser = parse_color)]
    ink_color: u32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "MANTRA2AUDIO_PASSWORD")]
    password: Option<String>,

    /// Write the report only; skip speech synthesis.
    #[arg(long, env = "MANTRA2AUDIO_NO_AUDIO")]
    no_audio: bool,

    /// In directory mode, write every PDF's files straight into the output
    /// directory; all documents then share one report.
    #[arg(long, env = "MANTRA2AUDIO_FLAT")]
    flat: bool,

    /// Print what segmentation finds; write nothing.
    #[arg(long, env = "MANTRA2AUDIO_INSPECT_ONLY")]
    inspect_only: bool,

    /// Print results as JSON on stdout.
    #[arg(long, env = "MANTRA2AUDIO_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "MANTRA2AUDIO_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MANTRA2AUDIO_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MANTRA2AUDIO_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new();
        Some(cb as Arc<dyn ProcessingProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let files = input_files(&cli.input)?;
        let (reports, failed) = inspect_all(&files, &config).await;
        if reports.is_empty() && failed > 0 {
            anyhow::bail!("None of the {} PDF files could be inspected", failed);
        }

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&reports).context("Failed to serialise report")?
            );
        } else {
            for report in &reports {
                print_inspect(report);
            }
        }
        return Ok(());
    }

    // ── Run ──────────────────────────────────────────────────────────────
    let start = Instant::now();
    if cli.input.is_dir() {
        let batch = process_folder(&cli.input, &cli.output, &config)
            .await
            .context("Batch processing failed")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&batch).context("Failed to serialise output")?
            );
        } else if !cli.quiet {
            print_batch_summary(&batch, start.elapsed());
        }
    } else {
        let output = process_pdf(&cli.input, &cli.output, &config)
            .await
            .with_context(|| format!("Failed to process {}", cli.input.display()))?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?
            );
        } else if !cli.quiet {
            print_document_summary(&output);
        }
    }

    Ok(())
}

/// Map CLI args to `ProcessingConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ProcessingConfig> {
    let mut builder = ProcessingConfig::builder()
        .ink_color(cli.ink_color)
        .language(cli.lang.clone())
        .min_body_chars(cli.min_chars)
        .synthesis_delay_ms(cli.delay_ms)
        .synthesize_audio(!cli.no_audio)
        .subdir_per_document(!cli.flat);

    if let Some(ref proxy) = cli.proxy {
        builder = builder.proxy(proxy.clone());
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--ink-color`: `0xRRGGBB`, `#RRGGBB`, or a decimal integer.
fn parse_color(s: &str) -> std::result::Result<u32, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix('#')) {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse::<u32>()
    };
    match parsed {
        Ok(v) if v <= 0xFF_FFFF => Ok(v),
        Ok(v) => Err(format!("colour {v:#x} is wider than 24 bits")),
        Err(e) => Err(format!("invalid colour '{s}': {e}")),
    }
}

/// Inspect each file in turn. A file that fails is logged and skipped.
async fn inspect_all(files: &[PathBuf], config: &ProcessingConfig) -> (Vec<InspectReport>, usize) {
    let mut reports = Vec::with_capacity(files.len());
    let mut failed = 0;
    for file in files {
        match inspect(file, config).await {
            Ok(report) => reports.push(report),
            Err(e) => {
                error!("Failed to inspect {}: {}", file.display(), e);
                eprintln!("{} {}: {}", red("✗"), file.display(), e);
                failed += 1;
            }
        }
    }
    (reports, failed)
}

/// The PDFs an input path refers to: itself, or the PDFs inside it.
fn input_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        mantra2audio::pipeline::extract::collect_pdf_files(input)
            .with_context(|| format!("Failed to list {}", input.display()))
    } else {
        Ok(vec![input.to_path_buf()])
    }
}

fn print_inspect(report: &InspectReport) {
    println!("File:         {}", report.source);
    println!("Pages:        {}", report.pages);
    println!("Spans:        {} ({} ink)", report.spans, report.ink_spans);
    println!("Passages:     {}", report.passages.len());
    for p in &report.passages {
        match &p.cleaned {
            Some(c) => println!(
                "  {} {:>3}  {}  {}",
                green("✓"),
                p.index,
                bold(&c.filename_token),
                dim(&c.body)
            ),
            None => println!(
                "  {} {:>3}  {}  {}",
                yellow("–"),
                p.index,
                p.raw.raw_title,
                dim("(filtered)")
            ),
        }
    }
    println!();
}

fn print_document_summary(output: &DocumentOutput) {
    let s = &output.stats;
    eprintln!(
        "{}  {}: {}/{} passages  {} audio  {}ms  →  {}",
        if s.audio_failed == 0 {
            green("✔")
        } else {
            yellow("⚠")
        },
        output.source,
        s.passages_accepted,
        s.passages_found,
        s.audio_written,
        s.duration_ms,
        bold(&output.output_dir.display().to_string()),
    );
    if s.audio_failed > 0 {
        eprintln!("   {} passages without audio", red(&s.audio_failed.to_string()));
    }
}

fn print_batch_summary(batch: &BatchOutput, elapsed: Duration) {
    for doc in &batch.documents {
        print_document_summary(doc);
    }
    for failure in &batch.failures {
        eprintln!(
            "{}  {}: {}",
            red("✘"),
            failure.path.display(),
            red(&failure.error)
        );
    }
    eprintln!(
        "{} documents, {} failed, {} passages, {} audio files in {:.1}s",
        bold(&batch.documents.len().to_string()),
        batch.failures.len(),
        batch.total_accepted(),
        batch.total_audio_written(),
        elapsed.as_secs_f64(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colour_forms() {
        assert_eq!(parse_color("0"), Ok(0));
        assert_eq!(parse_color("0x0000FF"), Ok(0x0000FF));
        assert_eq!(parse_color("#ff0000"), Ok(0xFF0000));
        assert_eq!(parse_color("255"), Ok(255));
        assert!(parse_color("0x1000000").is_err());
        assert!(parse_color("black").is_err());
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["mantra2audio"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("pdf"));
        assert_eq!(cli.output, PathBuf::from("output"));
        assert_eq!(cli.lang, "ro");
        assert_eq!(cli.ink_color, 0);
        assert_eq!(cli.delay_ms, 1000);
    }

    #[tokio::test]
    async fn inspect_all_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = dir.path().join("a.pdf");
        std::fs::write(&garbage, b"not a pdf").unwrap();
        let files = vec![garbage, dir.path().join("missing.pdf")];

        let (reports, failed) = inspect_all(&files, &ProcessingConfig::default()).await;
        assert!(reports.is_empty());
        assert_eq!(failed, 2);
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = Cli::try_parse_from([
            "mantra2audio",
            "book.pdf",
            "--lang",
            "hi",
            "--ink-color",
            "#112233",
            "--no-audio",
            "--flat",
            "--proxy",
            "http://127.0.0.1:8080",
        ])
        .unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.language, "hi");
        assert_eq!(config.ink_color, 0x112233);
        assert!(!config.synthesize_audio);
        assert!(!config.subdir_per_document);
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:8080"));
    }
}
