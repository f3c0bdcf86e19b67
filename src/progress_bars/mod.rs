//! Terminal progress display for the download queue, built on `indicatif`.
use indicatif::{
    HumanBytes, MultiProgress, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle,
};
use owo_colors::OwoColorize;
use std::{fmt::Write, time::Duration};

use crate::progress::{DownloadProgressUpdater, LogType, ProgressListener};

const PROGRESS_CHARS: &str = "━━";

struct BarTemplates {
    pub main: &'static str,
    pub download: &'static str,
}

impl Default for BarTemplates {
    fn default() -> Self {
        Self {
            main: "{spinner:.blue.bold} {elapsed_precise:.bold} {wide_bar:.blue/white.dim} {percent:.bold}  {pos:.bold} (eta. {eta})",
            download: "{spinner:.blue.bold} {bar:40.blue/white.dim} {percent:.bold} | {byte_progress:21.bold.green} @ {bytes_per_sec:>13.blue} (eta. {eta:<4})",
        }
    }
}

/// Draws one bar for the whole job and one per running transfer.
#[derive(Debug)]
pub struct IndicatifProgressHandler {
    main_bar: ProgressBar,
    multi_pb: MultiProgress,
}

impl IndicatifProgressHandler {
    /// Initialize the main progress bar with `initial_len` expected files.
    ///
    /// The extractor raises the length as it finds more posts.
    pub fn new(initial_len: u64) -> Self {
        let template = BarTemplates::default();
        let bar = ProgressBar::new(initial_len).with_style(master_progress_style(&template));
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.enable_steady_tick(Duration::from_millis(100));

        let multi = MultiProgress::new();
        let main = multi.add(bar);

        Self {
            main_bar: main,
            multi_pb: multi,
        }
    }

    /// Number of files handled so far.
    pub fn position(&self) -> u64 {
        self.main_bar.position()
    }
}

#[derive(Debug)]
struct IndicatifDownloadProgressUpdater {
    bar: ProgressBar,
}

impl DownloadProgressUpdater for IndicatifDownloadProgressUpdater {
    fn set_progress(&self, bytes_downloaded: u64) {
        self.bar.set_position(bytes_downloaded);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressListener for IndicatifProgressHandler {
    fn inc_main_total(&self, delta: u64) {
        self.main_bar.inc_length(delta);
    }

    fn main_tick(&self) {
        self.main_bar.inc(1);
    }

    fn main_done(&self) {
        self.main_bar.finish_and_clear();
    }

    fn add_download_task(
        &self,
        name: String,
        total_size: Option<u64>,
    ) -> Box<dyn DownloadProgressUpdater> {
        let style = download_progress_style(&BarTemplates::default());

        let pb = ProgressBar::new(total_size.unwrap_or(0))
            .with_style(style)
            .with_message(name);
        pb.set_draw_target(ProgressDrawTarget::stderr());

        let managed_pb = self.multi_pb.add(pb);

        Box::new(IndicatifDownloadProgressUpdater { bar: managed_pb })
    }

    fn log_event(&self, log_type: LogType, target: &str, message: &str) {
        let formatted_message = match log_type {
            LogType::Info => format!("{} {}", target.bold(), message),
            LogType::Skip => format!(
                "{} {} {}",
                target.blue().italic(),
                message.green().bold(),
                "Skipping...".green().bold()
            ),
            LogType::Remove => format!(
                "{} {} {}",
                target.blue().italic(),
                message.red().bold(),
                "Removed.".red().bold()
            ),
            LogType::Error => format!(
                "{} {} {}",
                target.blue().italic(),
                message.red().bold(),
                "Error.".red().bold()
            ),
        };

        self.main_bar.println(formatted_message);
    }
}

fn master_progress_style(templates: &BarTemplates) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(templates.main)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("pos", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{}/{}", state.pos(), state.len().unwrap_or(0));
        })
        .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:>3.0}%", state.fraction() * 100_f32);
        })
        .progress_chars(PROGRESS_CHARS)
}

fn download_progress_style(templates: &BarTemplates) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(templates.download)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:>3.0}%", state.fraction() * 100_f32);
        })
        .with_key(
            "byte_progress",
            |state: &ProgressState, w: &mut dyn Write| {
                let _ = write!(
                    w,
                    "{}/{}",
                    HumanBytes(state.pos()),
                    HumanBytes(state.len().unwrap_or(0))
                );
            },
        )
        .progress_chars(PROGRESS_CHARS)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn counts_handled_files() {
        let handler = IndicatifProgressHandler::new(0);
        handler.inc_main_total(3);
        handler.main_tick();
        handler.main_tick();

        assert_eq!(handler.position(), 2);

        let task = handler.add_download_task(String::from("file.jpg"), None);
        task.set_progress(10);
        task.finish();
        handler.main_done();
    }
}
