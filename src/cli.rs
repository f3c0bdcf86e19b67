use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "Gelbooru Downloader", author, version, about, long_about = None)]
pub struct Cli {
    /// Gelbooru URL of a tag search, a pool or a single post
    #[clap(value_name = "URL")]
    pub url: String,

    /// Where to save files (If the path doesn't exist, it will be created.)
    #[clap(short = 'o', value_name = "PATH", help_heading = "SAVE")]
    pub output: Option<PathBuf>,

    /// Number of simultaneous downloads
    ///
    /// [max: 20]
    #[clap(
        short = 'd',
        value_name = "NUMBER",
        value_parser(clap::value_parser!(u8).range(1..=20)),
        default_value_t = 5,
        help_heading = "DOWNLOAD"
    )]
    pub simultaneous_downloads: u8,

    /// Set a max number of posts to download.
    #[clap(short, long, value_parser, help_heading = "DOWNLOAD")]
    pub limit: Option<u16>,

    /// Print every extracted record as a JSON line instead of downloading
    #[clap(short = 'j', long, value_parser, default_value_t = false, help_heading = "GENERAL")]
    pub simulate: bool,

    /// Read settings from this TOML file
    #[clap(long, value_name = "FILE", help_heading = "GENERAL")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn generate_save_path(&self) -> Result<PathBuf, std::io::Error> {
        if let Some(output_path) = &self.output {
            Ok(output_path.clone())
        } else {
            std::env::current_dir()
        }
    }
}
