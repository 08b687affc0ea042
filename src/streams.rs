//! Typed records for the per-stream fragments of ffmpeg's diagnostic output.
//!
//! Each parser takes one raw comma-delimited fragment (the text after
//! `Audio:`, `Video:` or `Subtitle:`) plus an already-normalized language tag
//! and produces a record. ffmpeg's format is only semi-structured, so every
//! non-mandatory field is an `Option`: a slot that is missing or malformed
//! leaves its field absent instead of failing the fragment.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static BITRATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+) kb/s$").unwrap());
static DAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"DAR (\d+:\d+)").unwrap());
static FPS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.?\d*)\s*fps").unwrap());

/// Splits a fragment on commas, tolerating optional surrounding whitespace.
fn split_slots(raw: &str) -> Vec<&str> {
    raw.split(',').map(str::trim).collect()
}

/// Extracts the leading digit run of a token, e.g. `"48000 Hz"` -> 48000.
fn leading_digits(token: &str) -> Option<u32> {
    let digits: &str = token.split(|c: char| !c.is_ascii_digit()).next()?;
    digits.parse().ok()
}

/// Matches an explicit `<digits> kb/s` slot; anything else is absent.
fn parse_bitrate(slot: Option<&&str>) -> Option<u32> {
    let caps = BITRATE_RE.captures(slot?)?;
    caps[1].parse().ok()
}

/// One audio track, e.g. from `"aac, 48000 Hz, stereo, fltp, 128 kb/s"`.
#[derive(Debug, Clone, Serialize)]
pub struct AudioStream {
    pub language: Option<String>,
    pub codec: String,
    /// Sample rate in Hz; 0 when the rate slot carries no digits.
    pub sample_rate: u32,
    /// Raw channel description slot, e.g. `"stereo"` or `"2 channels"`.
    pub channel_layout: Option<String>,
    pub bitrate: Option<u32>,
}

impl AudioStream {
    /// Parses one audio fragment. Returns `None` only when the mandatory
    /// codec slot is empty; every other field degrades to absent.
    pub fn parse(language: Option<String>, raw: &str) -> Option<Self> {
        let slots = split_slots(raw);
        let codec = slots.first().filter(|s| !s.is_empty())?.to_string();

        let sample_rate = slots
            .get(1)
            .and_then(|s| leading_digits(s))
            .unwrap_or(0);
        let channel_layout = slots.get(2).map(ToString::to_string);
        let bitrate = parse_bitrate(slots.get(4));

        Some(Self {
            language,
            codec,
            sample_rate,
            channel_layout,
            bitrate,
        })
    }

    /// Channel count derived from the layout description.
    ///
    /// The checks are ordered and the first hit wins: an explicit
    /// `N channels` count beats the named layouts, and an unrecognized
    /// description yields `None` rather than a guess.
    pub fn channels(&self) -> Option<u32> {
        let layout = self.channel_layout.as_deref()?;
        if layout.contains("channels") {
            leading_digits(layout)
        } else if layout.contains("mono") {
            Some(1)
        } else if layout.contains("stereo") {
            Some(2)
        } else if layout.contains("5.1") {
            Some(6)
        } else {
            None
        }
    }
}

/// One video track, e.g. from
/// `"h264 (High), yuv420p, 1920x1080 [PAR 1:1 DAR 16:9], 5000 kb/s, 23.98 fps"`.
#[derive(Debug, Clone, Serialize)]
pub struct VideoStream {
    pub language: Option<String>,
    pub codec: String,
    pub colorspace: Option<String>,
    /// `"<width>x<height>"` with any `[PAR .. DAR ..]` annotation stripped.
    pub resolution: Option<String>,
    /// Display aspect ratio as `"W:H"`, scanned anywhere in the fragment.
    pub dar: Option<String>,
    pub frame_rate: Option<f64>,
    pub bitrate: Option<u32>,
}

impl VideoStream {
    /// Parses one video fragment. Returns `None` only when the mandatory
    /// codec slot is empty.
    ///
    /// The frame rate and DAR slots move around between formats, so both are
    /// scanned over the whole fragment rather than read positionally.
    pub fn parse(language: Option<String>, raw: &str) -> Option<Self> {
        let slots = split_slots(raw);
        let codec = slots.first().filter(|s| !s.is_empty())?.to_string();

        let colorspace = slots.get(1).map(ToString::to_string);
        let resolution = slots
            .get(2)
            .and_then(|s| s.split_whitespace().next())
            .map(ToString::to_string);
        let bitrate = slots
            .iter()
            .find_map(|slot| parse_bitrate(Some(slot)));
        let dar = DAR_RE.captures(raw).map(|caps| caps[1].to_string());
        let frame_rate = FPS_RE
            .captures(raw)
            .and_then(|caps| caps[1].parse().ok());

        Some(Self {
            language,
            codec,
            colorspace,
            resolution,
            dar,
            frame_rate,
            bitrate,
        })
    }
}

/// One subtitle track. The payload stays verbatim; ffmpeg's subtitle
/// descriptions carry no structure worth decomposing.
#[derive(Debug, Clone, Serialize)]
pub struct Subtitle {
    pub language: Option<String>,
    pub raw: String,
}

impl Subtitle {
    pub fn parse(language: Option<String>, raw: &str) -> Self {
        Self {
            language,
            raw: raw.to_string(),
        }
    }
}
