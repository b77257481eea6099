//! Property-based tests for vkpack.
//!
//! These tests generate random inputs to pin down the normalizer and
//! filename-synthesis invariants.

use proptest::prelude::*;

use serde_json::json;

use vkpack::archive::audio_filename;
use vkpack::attachment::{normalize, normalize_all, Photo};
use vkpack::message::{RawAttachment, RawPhoto};

/// An optional URL field: either absent or a short marker string.
fn arb_url(marker: &'static str) -> impl Strategy<Value = Option<String>> {
    prop::option::of(Just(format!("http://x/{marker}.jpg")))
}

/// All 64 presence combinations of the six resolution fields.
fn arb_photo() -> impl Strategy<Value = RawPhoto> {
    (
        arb_url("src"),
        arb_url("small"),
        arb_url("big"),
        arb_url("xbig"),
        arb_url("xxbig"),
        arb_url("xxxbig"),
    )
        .prop_map(|(src, src_small, src_big, src_xbig, src_xxbig, src_xxxbig)| {
            serde_json::from_value(json!({
                "src": src,
                "src_small": src_small,
                "src_big": src_big,
                "src_xbig": src_xbig,
                "src_xxbig": src_xxbig,
                "src_xxxbig": src_xxxbig,
            }))
            .unwrap()
        })
}

/// A kind tag drawn from recognized and unrecognized values.
fn arb_kind() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "photo".to_string(),
        "audio".to_string(),
        "sticker".to_string(),
        "doc".to_string(),
        "video".to_string(),
        "link".to_string(),
        "wall".to_string(),
        "gift".to_string(),
        "poll".to_string(),
        "money_transfer".to_string(),
    ])
}

/// A raw attachment whose payload matches its tag (when recognized).
fn arb_attachment() -> impl Strategy<Value = RawAttachment> {
    arb_kind().prop_map(|kind| {
        let payload = match kind.as_str() {
            "photo" => json!({"src": "http://p"}),
            "audio" => json!({"artist": "A", "title": "T"}),
            "sticker" => json!({"photo_256": "http://s"}),
            "doc" => json!({"title": "d", "url": "http://d"}),
            "video" => json!({"title": "v"}),
            "link" => json!({"url": "http://l"}),
            "wall" => json!({"text": "w"}),
            _ => json!({}),
        };
        let mut object = serde_json::Map::new();
        object.insert("type".to_string(), json!(kind));
        object.insert(kind, payload);
        serde_json::from_value(serde_json::Value::Object(object)).unwrap()
    })
}

const RECOGNIZED: [&str; 7] = ["photo", "audio", "sticker", "doc", "video", "link", "wall"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // ============================================
    // PHOTO "BIGGEST" SELECTION
    // ============================================

    /// `biggest` is the first non-null field in priority order.
    #[test]
    fn biggest_is_first_in_priority_order(raw in arb_photo()) {
        let expected = raw.src_xxxbig.clone()
            .or_else(|| raw.src_xxbig.clone())
            .or_else(|| raw.src_xbig.clone())
            .or_else(|| raw.src_big.clone())
            .or_else(|| raw.src.clone())
            .or_else(|| raw.src_small.clone());

        let photo = Photo::from_raw(&raw);
        prop_assert_eq!(photo.biggest, expected);
    }

    /// With exactly one field populated, that field wins regardless of
    /// its priority position.
    #[test]
    fn biggest_picks_the_only_field(index in 0usize..6) {
        let fields = ["src", "src_small", "src_big", "src_xbig", "src_xxbig", "src_xxxbig"];
        let mut object = serde_json::Map::new();
        object.insert(fields[index].to_string(), json!("http://only"));
        let raw: RawPhoto = serde_json::from_value(serde_json::Value::Object(object)).unwrap();

        let photo = Photo::from_raw(&raw);
        prop_assert_eq!(photo.biggest.as_deref(), Some("http://only"));
    }

    /// Normalization never invents a URL.
    #[test]
    fn biggest_absent_when_all_fields_absent(_dummy in Just(())) {
        let photo = Photo::from_raw(&RawPhoto::default());
        prop_assert!(photo.biggest.is_none());
    }

    // ============================================
    // AUDIO FILENAME SYNTHESIS
    // ============================================

    /// The synthesized name never contains a path separator and always
    /// keeps the `.mp3` suffix.
    #[test]
    fn audio_filename_is_a_single_path_segment(
        artist in ".{0,40}",
        title in ".{0,80}",
    ) {
        let name = audio_filename(Some(&artist), Some(&title));
        prop_assert!(!name.contains('/'));
        prop_assert!(!name.contains('\\'));
        prop_assert!(name.ends_with(".mp3"));
    }

    /// Titles are cut to at most 30 characters.
    #[test]
    fn audio_filename_truncates_title(title in ".{0,80}") {
        let name = audio_filename(Some("Artist"), Some(&title));
        // strip the fixed parts: "Artist - " prefix and ".mp3" suffix
        let kept = name
            .strip_prefix("Artist - ")
            .and_then(|rest| rest.strip_suffix(".mp3"))
            .map(|rest| rest.chars().count());
        prop_assert!(kept.is_some());
        prop_assert!(kept.unwrap_or(0) <= 30);
    }

    // ============================================
    // NORMALIZER KIND FILTERING
    // ============================================

    /// Normalizing then re-deriving the kind per element yields exactly
    /// the recognized subset of the input, in the original order.
    #[test]
    fn normalize_keeps_recognized_kinds_in_order(raws in prop::collection::vec(arb_attachment(), 0..12)) {
        let expected: Vec<String> = raws
            .iter()
            .map(|raw| raw.kind.clone())
            .filter(|kind| RECOGNIZED.contains(&kind.as_str()))
            .collect();

        let normalized = normalize_all(&raws);
        let kinds: Vec<String> = normalized.iter().map(|a| a.kind().to_string()).collect();
        prop_assert_eq!(kinds, expected);
    }

    /// Single-attachment normalization agrees with the list version.
    #[test]
    fn normalize_one_matches_normalize_all(raw in arb_attachment()) {
        let one = normalize(&raw);
        let all = normalize_all(std::slice::from_ref(&raw));
        match one {
            Some(attachment) => prop_assert_eq!(all, vec![attachment]),
            None => prop_assert!(all.is_empty()),
        }
    }
}
