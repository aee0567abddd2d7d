//! songbase-inspect - read-only library inspection tool
//!
//! Lists and searches a song library, decodes captured tag-reader messages
//! and reports which portable-device families this machine supports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use songbase_common::db::{count_songs, list_songs, search_songs};
use songbase_common::wire::{TagReaderMessage, TagReaderPayload};
use songbase_common::{CodecContext, Song, SongbaseConfig};
use songbase_devices::{DeviceCodecs, DeviceFamily};
use songbase_inspect::db::connect_readonly;
use songbase_inspect::logging;
use songbase_inspect::report::{find_duplicates, group_albums, SongSummary};
use tracing::{debug, info};
use tracing_subscriber::util::SubscriberInitExt;

/// Command-line arguments for songbase-inspect
#[derive(Parser, Debug)]
#[command(name = "songbase-inspect")]
#[command(about = "Inspect a songbase library")]
#[command(version)]
struct Args {
    /// Config file (overrides SONGBASE_CONFIG and the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether files have a supported music extension
    Probe {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List songs in a library
    Songs {
        #[arg(long, env = "SONGBASE_DB")]
        db: PathBuf,
        #[arg(short, long)]
        limit: Option<i64>,
        #[arg(long)]
        json: bool,
    },
    /// Full-text search over tag fields
    Search {
        #[arg(long, env = "SONGBASE_DB")]
        db: PathBuf,
        text: String,
        #[arg(long)]
        json: bool,
    },
    /// List albums with their song counts
    Albums {
        #[arg(long, env = "SONGBASE_DB")]
        db: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Songs sharing title and artist
    Duplicates {
        #[arg(long, env = "SONGBASE_DB")]
        db: PathBuf,
    },
    /// Decode a captured tag-reader message (JSON)
    Message { file: PathBuf },
    /// Show which device families are available
    Devices,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (subscriber, log_control) = logging::subscriber(
        tracing_subscriber::EnvFilter::try_from_default_env().ok(),
        std::io::stderr,
    );
    subscriber.init();

    let config = SongbaseConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    log_control.apply_level(&config.log_level)?;

    debug!("Configuration: {:?}", config);
    let ctx = config.codec_context();

    match args.command {
        Command::Probe { paths } => probe(&paths),
        Command::Songs { db, limit, json } => {
            let pool = connect_readonly(&db).await?;
            let total = count_songs(&pool).await?;
            let songs = list_songs(&pool, limit, &ctx).await?;
            info!("Showing {} of {} songs", songs.len(), total);
            print_songs(&songs, json)
        }
        Command::Search { db, text, json } => {
            let pool = connect_readonly(&db).await?;
            let songs = search_songs(&pool, &text, &ctx).await?;
            info!("{} songs match '{}'", songs.len(), text);
            print_songs(&songs, json)
        }
        Command::Albums { db, json } => {
            let pool = connect_readonly(&db).await?;
            let albums = group_albums(&list_songs(&pool, None, &ctx).await?);
            if json {
                return print_json(&albums);
            }
            for album in albums {
                let marker = if album.compilation { " (compilation)" } else { "" };
                println!("{:>4}  {} - {}{}", album.songs, album.albumartist, album.album, marker);
            }
            Ok(())
        }
        Command::Duplicates { db } => {
            let pool = connect_readonly(&db).await?;
            let groups = find_duplicates(&list_songs(&pool, None, &ctx).await?);
            if groups.is_empty() {
                println!("No duplicates");
            }
            for group in groups {
                for summary in group {
                    println!("{}", summary);
                }
                println!();
            }
            Ok(())
        }
        Command::Message { file } => decode_message(&file, &ctx),
        Command::Devices => {
            let codecs = DeviceCodecs::detect(&config.device_library_dirs);
            for family in DeviceFamily::ALL {
                match codecs.library_path(family) {
                    Some(path) => println!("{:<5} available ({})", family.to_string(), path.display()),
                    None => println!("{:<5} unavailable", family.to_string()),
                }
            }
            Ok(())
        }
    }
}

fn probe(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        let song = Song::from_file_partial(path);
        let status = if song.is_valid() { "music" } else { "unsupported" };
        println!("{:<12} {}", status, song.url());
    }
    Ok(())
}

fn decode_message(file: &Path, ctx: &CodecContext) -> Result<()> {
    let json = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let message = TagReaderMessage::from_json(&json).context("Not a tag-reader message")?;

    let direction = if message.payload.is_request() { "request" } else { "response" };
    println!("Message {} ({})", message.id, direction);

    match &message.payload {
        TagReaderPayload::ReadFile { filename } | TagReaderPayload::IsMediaFile { filename } => {
            println!("File: {}", filename);
        }
        TagReaderPayload::SaveFile { filename, metadata } => {
            println!("File: {}", filename);
            print_json(&SongSummary::from(&metadata.to_song(ctx)))?;
        }
        TagReaderPayload::ReadFileResponse { metadata } => {
            print_json(&SongSummary::from(&metadata.to_song(ctx)))?;
        }
        TagReaderPayload::SaveFileResponse { success } | TagReaderPayload::IsMediaFileResponse { success } => {
            println!("Success: {}", success);
        }
    }
    Ok(())
}

fn print_songs(songs: &[Song], json: bool) -> Result<()> {
    let summaries: Vec<SongSummary> = songs.iter().map(SongSummary::from).collect();
    if json {
        return print_json(&summaries);
    }
    for summary in summaries {
        println!("{}", summary);
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
