//! On-disk folder archives: HTML transcript plus downloaded media.
//!
//! [`make`] lays out `<root>/<peer_id>/{photo,audio}`, writes the HTML
//! transcript, then streams every referenced photo and audio file into the
//! matching subfolder, strictly one at a time. Files that already exist
//! under their computed name are skipped without re-downloading, which
//! makes interrupted runs cheap to resume (names only, not content
//! verified).

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::attachment::{Audio, Photo};
use crate::download::Downloader;
use crate::error::Result;
use crate::message::{Message, Participants};
use crate::progress::{Progress, ProgressCallback};
use crate::render::template;

const CHUNK_SIZE: usize = 8 * 1024;

/// What one archive run did, per media kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub photos_downloaded: usize,
    pub photos_skipped: usize,
    pub audios_downloaded: usize,
    pub audios_skipped: usize,
}

impl ArchiveStats {
    /// Total files written by this run.
    pub fn downloaded(&self) -> usize {
        self.photos_downloaded + self.audios_downloaded
    }

    /// Total files already present and left alone.
    pub fn skipped(&self) -> usize {
        self.photos_skipped + self.audios_skipped
    }
}

/// Builds the full archive for one conversation.
///
/// The progress callback receives item snapshots (one per media file
/// handled) and byte snapshots (within the file currently streaming);
/// consumers filter on whichever dimension they display.
pub fn make(
    root: &Path,
    peer_id: &str,
    msgs: &[Message],
    participants: &Participants,
    audios: &[Audio],
    photos: &[Photo],
    downloader: &dyn Downloader,
    progress: &ProgressCallback,
) -> Result<ArchiveStats> {
    let peer_dir = root.join(peer_id);
    let photo_dir = peer_dir.join("photo");
    let audio_dir = peer_dir.join("audio");
    fs::create_dir_all(&photo_dir)?;
    fs::create_dir_all(&audio_dir)?;

    template::render(&peer_dir, peer_id, msgs, participants, audios, photos)?;

    let photo_urls: Vec<&str> = photos.iter().filter_map(|p| p.biggest.as_deref()).collect();
    let playable: Vec<(&Audio, &str)> = audios
        .iter()
        .filter_map(|a| a.url.as_deref().map(|url| (a, url)))
        .collect();

    let total = photo_urls.len() + playable.len();
    let mut handled = 0usize;
    let mut stats = ArchiveStats::default();
    progress(Progress::items(0, Some(total)));

    for url in photo_urls {
        // the filename comes from the redirect-resolved URL, so the
        // request is opened before the existence check; the body stays
        // unread on a skip
        let download = downloader.get(url)?;
        let filename = filename_from_url(&download.final_url).to_string();
        let dest = photo_dir.join(&filename);
        if dest.is_file() {
            debug!(filename, "photo already present, skipping");
            stats.photos_skipped += 1;
        } else {
            info!(filename, "downloading photo");
            write_stream(download.body, &dest, download.content_length, progress)?;
            stats.photos_downloaded += 1;
        }
        handled += 1;
        progress(Progress::items(handled, Some(total)));
    }

    for (audio, url) in playable {
        let filename = audio_filename(audio.artist.as_deref(), audio.title.as_deref());
        let dest = audio_dir.join(&filename);
        if dest.is_file() {
            debug!(filename, "audio already present, skipping");
            stats.audios_skipped += 1;
        } else {
            info!(filename, "downloading audio");
            let download = downloader.get(url)?;
            write_stream(download.body, &dest, download.content_length, progress)?;
            stats.audios_downloaded += 1;
        }
        handled += 1;
        progress(Progress::items(handled, Some(total)));
    }

    Ok(stats)
}

/// Last path segment of a URL, query string and all — the original feed
/// serves bare file paths here.
pub fn filename_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// `"<artist> - <title>.mp3"` with the title cut to 30 characters and path
/// separators replaced so the result stays a single valid filename.
pub fn audio_filename(artist: Option<&str>, title: Option<&str>) -> String {
    let title: String = title.unwrap_or_default().chars().take(30).collect();
    let name = format!("{} - {}.mp3", artist.unwrap_or_default(), title);
    name.replace(['/', '\\'], ".")
}

fn write_stream(
    mut body: Box<dyn Read>,
    dest: &Path,
    total: Option<u64>,
    progress: &ProgressCallback,
) -> Result<u64> {
    let mut file = fs::File::create(dest)?;
    let mut buf = [0u8; CHUNK_SIZE];
    let mut written = 0u64;
    loop {
        let n = body.read(&mut buf)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])?;
        written += n as u64;
        progress(Progress::bytes(written, total));
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::{from_value, json};

    use crate::download::Download;
    use crate::message::User;
    use crate::progress::no_progress;

    /// Serves canned bodies and counts both requests and bytes actually
    /// read off the wire.
    struct FakeDownloader {
        bodies: HashMap<String, (String, Vec<u8>)>, // url -> (final_url, bytes)
        requests: AtomicUsize,
        bytes_served: Arc<AtomicU64>,
    }

    impl FakeDownloader {
        fn new(entries: &[(&str, &str, &[u8])]) -> Self {
            Self {
                bodies: entries
                    .iter()
                    .map(|(url, final_url, bytes)| {
                        ((*url).to_string(), ((*final_url).to_string(), bytes.to_vec()))
                    })
                    .collect(),
                requests: AtomicUsize::new(0),
                bytes_served: Arc::new(AtomicU64::new(0)),
            }
        }
    }

    struct CountingBody {
        inner: Cursor<Vec<u8>>,
        counter: Arc<AtomicU64>,
    }

    impl Read for CountingBody {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.inner.read(buf)?;
            self.counter.fetch_add(n as u64, Ordering::SeqCst);
            Ok(n)
        }
    }

    impl Downloader for FakeDownloader {
        fn get(&self, url: &str) -> Result<Download> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let (final_url, bytes) = self
                .bodies
                .get(url)
                .unwrap_or_else(|| panic!("unexpected url {url}"))
                .clone();
            Ok(Download {
                final_url,
                content_length: Some(bytes.len() as u64),
                body: Box::new(CountingBody {
                    inner: Cursor::new(bytes),
                    counter: self.bytes_served.clone(),
                }),
            })
        }
    }

    fn participants() -> Participants {
        [from_value::<User>(
            json!({"uid": 10, "first_name": "Ivan", "last_name": "Petrov"}),
        )
        .unwrap()]
        .into_iter()
        .collect()
    }

    fn messages() -> Vec<Message> {
        from_value(json!([{
            "date": 0, "body": "hi", "from_id": 10,
            "attachments": [
                {"type": "photo", "photo": {"src": "http://cdn/p/photo1.jpg"}},
                {"type": "audio", "audio": {"artist": "Kino", "title": "Zvezda", "url": "http://cdn/a/1"}}
            ]
        }]))
        .unwrap()
    }

    fn media() -> (Vec<Audio>, Vec<Photo>) {
        let msgs = messages();
        (
            crate::attachment::audio_links(&msgs),
            crate::attachment::photo_links(&msgs),
        )
    }

    fn downloader() -> FakeDownloader {
        FakeDownloader::new(&[
            (
                "http://cdn/p/photo1.jpg",
                "http://cdn-7/store/photo1.jpg",
                b"jpegdata",
            ),
            ("http://cdn/a/1", "http://cdn/a/1", b"mp3data"),
        ])
    }

    #[test]
    fn test_audio_filename_truncates_and_sanitizes() {
        let long = "a".repeat(64);
        let name = audio_filename(Some("AC/DC"), Some(&long));
        assert!(name.starts_with("AC.DC - "));
        assert!(!name.contains('/'));
        assert!(name.ends_with(".mp3"));
        // 30-char title cap
        assert_eq!(name.matches('a').count(), 30);
    }

    #[test]
    fn test_audio_filename_handles_missing_fields() {
        assert_eq!(audio_filename(None, None), " - .mp3");
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url("http://x/a/b/c.jpg"), "c.jpg");
        assert_eq!(filename_from_url("nopath"), "nopath");
    }

    #[test]
    fn test_make_creates_layout_and_downloads() {
        let dir = tempfile::tempdir().unwrap();
        let msgs = messages();
        let (audios, photos) = media();
        let dl = downloader();

        let stats = make(
            dir.path(),
            "123",
            &msgs,
            &participants(),
            &audios,
            &photos,
            &dl,
            &no_progress(),
        )
        .unwrap();

        assert_eq!(stats.downloaded(), 2);
        assert_eq!(stats.skipped(), 0);

        let peer = dir.path().join("123");
        assert!(peer.join("123.html").is_file());
        // photo named after the redirect-resolved URL
        assert!(peer.join("photo/photo1.jpg").is_file());
        assert!(peer.join("audio/Kino - Zvezda.mp3").is_file());
        assert_eq!(fs::read(peer.join("photo/photo1.jpg")).unwrap(), b"jpegdata");
    }

    #[test]
    fn test_second_run_downloads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let msgs = messages();
        let (audios, photos) = media();

        let dl = downloader();
        make(
            dir.path(),
            "123",
            &msgs,
            &participants(),
            &audios,
            &photos,
            &dl,
            &no_progress(),
        )
        .unwrap();
        let first_bytes = dl.bytes_served.load(Ordering::SeqCst);
        assert!(first_bytes > 0);

        let stats = make(
            dir.path(),
            "123",
            &msgs,
            &participants(),
            &audios,
            &photos,
            &dl,
            &no_progress(),
        )
        .unwrap();

        assert_eq!(stats.downloaded(), 0);
        assert_eq!(stats.skipped(), 2);
        // the photo request reopens (the name needs the final URL) but no
        // body bytes move on the second run
        assert_eq!(dl.bytes_served.load(Ordering::SeqCst), first_bytes);
    }

    #[test]
    fn test_existing_directories_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("123/photo")).unwrap();
        fs::write(dir.path().join("123/photo/keep.txt"), b"x").unwrap();

        let dl = FakeDownloader::new(&[]);
        make(
            dir.path(),
            "123",
            &[],
            &Participants::new(),
            &[],
            &[],
            &dl,
            &no_progress(),
        )
        .unwrap();

        assert!(dir.path().join("123/photo/keep.txt").is_file());
        assert_eq!(dl.requests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_urlless_audio_is_not_requested() {
        let dir = tempfile::tempdir().unwrap();
        let audios = vec![Audio {
            artist: Some("A".into()),
            title: Some("T".into()),
            content_restricted: true,
            url: None,
        }];

        let dl = FakeDownloader::new(&[]);
        let stats = make(
            dir.path(),
            "9",
            &[],
            &Participants::new(),
            &audios,
            &[],
            &dl,
            &no_progress(),
        )
        .unwrap();

        assert_eq!(dl.requests.load(Ordering::SeqCst), 0);
        assert_eq!(stats.downloaded(), 0);
    }
}
