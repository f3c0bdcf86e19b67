#![deny(clippy::all)]
use clap::Parser;
use color_eyre::eyre::{bail, Result};
use gelbooru_downloader::cli::Cli;
use gelbooru_downloader::config::serialize::load_config;
use gelbooru_downloader::http::HttpFetcher;
use gelbooru_downloader::progress::ProgressListener;
use gelbooru_downloader::progress_bars::IndicatifProgressHandler;
use gelbooru_downloader::{GelbooruExtractor, Queue};
use log::debug;
use owo_colors::OwoColorize;
use std::sync::Arc;
use tokio::sync::mpsc::{channel, unbounded_channel};
use tokio::{self, join};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    env_logger::builder().format_timestamp(None).init();
    color_eyre::install()?;

    let config = load_config(args.config.as_deref())?;
    debug!("Using server {}", config.server);

    let fetcher = HttpFetcher::new(&config.server)?;
    let client = fetcher.client();

    let mut ext = GelbooruExtractor::from_url(&args.url, fetcher, config.server)?;
    ext.set_limit(args.limit);

    // Channel for records from extractor to consumer
    let (posts_sender, mut posts_receiver) = unbounded_channel();

    if args.simulate {
        let ext_task = ext.setup_fetch_thread(posts_sender, None);

        while let Some(message) = posts_receiver.recv().await {
            println!("{}", serde_json::to_string(&message)?);
        }

        ext_task.await??;
        return Ok(());
    }

    let dirname = args.generate_save_path()?;

    // Channel for total post count from extractor to progress handler
    let (length_sender, mut length_receiver) = channel::<u64>(1);

    let progress_handler = Arc::new(IndicatifProgressHandler::new(0));

    let progress_total_updater_task = tokio::spawn({
        let progress_handler = progress_handler.clone();
        async move {
            while let Some(total_posts) = length_receiver.recv().await {
                progress_handler.inc_main_total(total_posts);
            }
        }
    });

    let ext_task = ext.setup_fetch_thread(posts_sender, Some(length_sender));

    let qw = Queue::new(
        client,
        args.simultaneous_downloads,
        dirname,
        &config.output,
        Some(progress_handler),
    );

    let downloader_task = qw.setup_async_downloader(posts_receiver);

    let (Ok(found), Ok(results), Ok(())) =
        join!(ext_task, downloader_task, progress_total_updater_task)
    else {
        bail!("Failed starting threads!")
    };

    print_results(results?, found?);

    Ok(())
}

fn print_results(total_down: u64, total_found: u64) {
    println!(
        "{} {} {}",
        total_down.to_string().bold().blue(),
        "files".bold().blue(),
        "downloaded".bold()
    );

    let skipped = total_found.saturating_sub(total_down);
    if skipped > 0 {
        println!(
            "{} {}",
            skipped.to_string().bold().yellow(),
            "posts were already saved or could not be downloaded."
                .bold()
                .yellow()
        );
    }
}
