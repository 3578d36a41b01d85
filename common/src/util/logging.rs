use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{info, LevelFilter, SetLoggerError};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static MULTI: OnceLock<MultiProgress> = OnceLock::new();


pub fn init(log_level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = env_logger::builder()
        .filter_level(log_level)
        .parse_default_env() // Allow overriding log level through RUST_LOG env var
        .build();
    let max_level = logger.filter();

    let multi = MULTI.get_or_init(MultiProgress::new).clone();

    LogWrapper::new(multi, logger).try_init()?;
    log::set_max_level(max_level);

    Ok(())
}


pub fn run_with_spinner<'a, F, Out>(
    target: &'a str, task_desc: &'a str, function: F,
) -> Out where
    F: FnOnce() -> Out,
{
    let start_time = Instant::now();

    let pb = ProgressBar::new_spinner()
        .with_message(format!("{}...", task_desc))
        .with_style(
            ProgressStyle::with_template("{spinner:.white} [{elapsed:.green}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
        );
    pb.enable_steady_tick(Duration::from_millis(100));

    // Set up connection with log library so that progress bars don't jump around
    let pb = attach(pb);

    let out = function();

    detach(&pb);
    let elapsed = indicatif::HumanDuration(start_time.elapsed());
    info!(target: target, "{} finished (took {})", task_desc, elapsed);

    out
}

pub fn run_with_pb<'a, F, Out>(
    target: &'a str, task_desc: &'a str, total: u64, print_message: bool, function: F,
) -> Out where
    F: FnOnce(ProgressBar) -> Out,
{
    let start_time = Instant::now();

    let pb = ProgressBar::new(total)
        .with_message(format!("{}...", task_desc))
        .with_style(
            ProgressStyle::with_template("[{elapsed:.green}] {msg} [{wide_bar:.cyan/blue}] {human_pos}/{human_len} [{eta}]")
                .map(|style| style.progress_chars("=> "))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
        );
    pb.enable_steady_tick(Duration::from_secs(1));

    let pb = attach(pb);

    let out = function(pb.clone());

    detach(&pb);
    if print_message {
        let elapsed = indicatif::HumanDuration(start_time.elapsed());
        info!(target: target, "{} finished (took {})", task_desc, elapsed);
    }

    out
}

// Without an initialized logger (e.g. in tests) bars are drawn on their own
fn attach(pb: ProgressBar) -> ProgressBar {
    match MULTI.get() {
        Some(multi) => multi.add(pb),
        None => pb,
    }
}

fn detach(pb: &ProgressBar) {
    pb.finish_and_clear();
    if let Some(multi) = MULTI.get() {
        multi.remove(pb);
    }
}
