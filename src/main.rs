//! # vkpack CLI
//!
//! Command-line interface for the vkpack library.

use std::path::Path;
use std::process;
use std::sync::Arc;

use clap::Parser as ClapParser;

use vkpack::api::HttpTransport;
use vkpack::archive;
use vkpack::attachment::{audio_links, photo_links};
use vkpack::cli::{Action, Args};
use vkpack::download::HttpDownloader;
use vkpack::history::{History, Peer};
use vkpack::progress::{Progress, ProgressCallback};
use vkpack::render::template;
use vkpack::render::text::{transcript, TranscriptOptions};
use vkpack::VkpackError;

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), VkpackError> {
    let args = <Args as ClapParser>::parse();

    // Print header
    println!("📦 vkpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("👤 Peer:    {}", args.peer_id);
    println!("🎬 Action:  {}", args.action);
    println!();

    let history = History::new(HttpTransport::new(&args.token));

    if args.action == Action::Json {
        let path = history.save_json(Path::new("."), &args.peer_id, &fetch_progress())?;
        println!("✅ Done! Raw dump saved to {}", path.display());
        return Ok(());
    }

    let peer = Peer::user(args.peer_id.clone());
    let messages = history.fetch_all(&peer, &fetch_progress())?;
    eprintln!();

    let participants = if args.action.needs_participants() {
        println!("👥 Resolving participants (1s per profile)...");
        Some(history.participants(&messages)?)
    } else {
        None
    };

    let media = if args.action.needs_media_links() {
        Some((audio_links(&messages), photo_links(&messages)))
    } else {
        None
    };

    match args.action {
        Action::Text => {
            let participants = participants.unwrap_or_default();
            for line in transcript(&messages, &participants, &TranscriptOptions::new())? {
                println!("{line}");
            }
        }
        Action::Audio => {
            for url in audio_links(&messages).iter().filter_map(|a| a.url.as_deref()) {
                println!("{url}");
            }
        }
        Action::Photo => {
            for url in photo_links(&messages).iter().filter_map(|p| p.biggest.as_deref()) {
                println!("{url}");
            }
        }
        Action::Html => {
            let participants = participants.unwrap_or_default();
            let (audios, photos) = media.unwrap_or_default();
            let path = template::render(
                Path::new("."),
                &args.peer_id,
                &messages,
                &participants,
                &audios,
                &photos,
            )?;
            println!("✅ Done! HTML saved to {}", path.display());
        }
        Action::Archive => {
            let participants = participants.unwrap_or_default();
            let (audios, photos) = media.unwrap_or_default();
            let stats = archive::make(
                Path::new("."),
                &args.peer_id,
                &messages,
                &participants,
                &audios,
                &photos,
                &HttpDownloader::new(),
                &download_progress(),
            )?;
            println!();
            println!("✅ Done! Archive written to ./{}", args.peer_id);
            println!();
            println!("📊 Summary:");
            println!("   Messages:    {}", messages.len());
            println!("   Downloaded:  {} files", stats.downloaded());
            if stats.skipped() > 0 {
                println!("   Skipped:     {} files (already present)", stats.skipped());
            }
        }
        // handled by the early return above
        Action::Json => unreachable!(),
    }

    Ok(())
}

/// Message-count progress on stderr, overwriting one status line.
fn fetch_progress() -> ProgressCallback {
    Arc::new(|progress: Progress| {
        if let Some(total) = progress.total_items {
            eprint!("\r⬇️  Fetching messages: {}/{}", progress.items_processed, total);
        }
    })
}

/// File-count progress on stderr; byte-level snapshots are ignored to keep
/// the output readable.
fn download_progress() -> ProgressCallback {
    Arc::new(|progress: Progress| {
        if let Some(total) = progress.total_items {
            eprint!("\r⬇️  Downloading media: {}/{}", progress.items_processed, total);
        }
    })
}
