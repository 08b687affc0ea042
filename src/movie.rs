//! Movie descriptor: one probe invocation parsed into a typed description.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{FfmovieError, Result};
use crate::language::LanguageMap;
use crate::probe::{escape_path, FfmpegProber, MovieProber};
use crate::streams::{AudioStream, Subtitle, VideoStream};
use crate::text;

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Duration: (\d{2}):(\d{2}):(\d{2}\.\d)").unwrap());
static START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"start: (\d*\.\d*)").unwrap());
static BITRATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"bitrate: (\d+)").unwrap());
// One combined scan for all stream lines keeps the cross-type ordering that
// ffmpeg printed; the type keyword is dispatched afterwards.
static STREAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\((\w+)\))?: (\w+): (.+)").unwrap());

/// Structured description of one media file, built from a single run of the
/// analysis tool. Immutable once constructed.
#[derive(Debug, Clone, Serialize)]
pub struct Movie {
    /// Path escaped for safe interpolation into quoted contexts.
    pub path: String,
    /// Total duration in seconds; 0.0 when the tool reported none.
    pub duration: f64,
    /// Start offset in seconds; 0.0 when the tool reported none.
    pub start_time: f64,
    /// Container bitrate in kb/s, absent when unreported.
    pub bitrate: Option<u32>,
    pub audio_streams: Vec<AudioStream>,
    pub video_streams: Vec<VideoStream>,
    pub subtitles: Vec<Subtitle>,
    /// Always true. The upstream heuristic (scanning for the tool's
    /// "estimating duration from bitrate" notice) never shipped, and
    /// inventing one here would silently change consumer behavior.
    pub uncertain_duration: bool,
    #[serde(skip)]
    fs_path: PathBuf,
}

impl Movie {
    /// Inspects `path` with the default `ffmpeg` prober and language table.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, &FfmpegProber::new(), &LanguageMap::default())
    }

    /// Inspects `path` through an injected prober and language table.
    ///
    /// Stages run in a fixed order: existence check, path sanitization,
    /// probe, text decoding, container-field extraction, stream scan. The
    /// existence check runs before the prober so a missing file never
    /// launches a process.
    pub fn open_with<P: MovieProber>(
        path: &Path,
        prober: &P,
        languages: &LanguageMap,
    ) -> Result<Self> {
        if !path.exists() {
            return Err(FfmovieError::InputNotFound(path.to_path_buf()));
        }
        let escaped = escape_path(&path.to_string_lossy());
        let output = text::decode_output(prober.probe(path)?);
        Ok(Self::build(path.to_path_buf(), escaped, &output, languages))
    }

    fn build(fs_path: PathBuf, path: String, output: &str, languages: &LanguageMap) -> Self {
        let duration = parse_duration(output);
        let start_time = parse_start_time(output);
        let bitrate = parse_bitrate(output);

        let mut audio_streams = Vec::new();
        let mut video_streams = Vec::new();
        let mut subtitles = Vec::new();

        for line in output.lines() {
            let Some(caps) = STREAM_RE.captures(line) else {
                continue;
            };
            let language = languages.normalize(caps.get(1).map(|m| m.as_str()));
            let raw = &caps[3];
            match &caps[2] {
                "Audio" => {
                    if let Some(stream) = AudioStream::parse(language, raw) {
                        audio_streams.push(stream);
                    }
                }
                "Video" => {
                    if let Some(stream) = VideoStream::parse(language, raw) {
                        video_streams.push(stream);
                    }
                }
                "Subtitle" => subtitles.push(Subtitle::parse(language, raw)),
                other => {
                    log::debug!("skipping unrecognized stream type '{other}'");
                }
            }
        }

        log::trace!(
            "parsed {}: {} audio, {} video, {} subtitle stream(s)",
            path,
            audio_streams.len(),
            video_streams.len(),
            subtitles.len()
        );

        Self {
            path,
            duration,
            start_time,
            bitrate,
            audio_streams,
            video_streams,
            subtitles,
            uncertain_duration: true,
            fs_path,
        }
    }

    /// False only when the file has neither audio nor video streams.
    /// Subtitle-only files are not considered valid media.
    pub fn is_valid(&self) -> bool {
        !(self.audio_streams.is_empty() && self.video_streams.is_empty())
    }

    /// Resolution of the first video stream, e.g. `"1920x1080"`.
    pub fn resolution(&self) -> Option<&str> {
        self.video_streams.first()?.resolution.as_deref()
    }

    /// Frame width in pixels; 0 when the resolution is absent or malformed.
    pub fn width(&self) -> u32 {
        self.resolution_part(0)
    }

    /// Frame height in pixels; 0 when the resolution is absent or malformed.
    pub fn height(&self) -> u32 {
        self.resolution_part(1)
    }

    fn resolution_part(&self, index: usize) -> u32 {
        self.resolution()
            .and_then(|res| res.split('x').nth(index))
            .and_then(|part| part.parse().ok())
            .unwrap_or(0)
    }

    /// Display aspect ratio annotation of the first video stream.
    pub fn dar(&self) -> Option<&str> {
        self.video_streams.first()?.dar.as_deref()
    }

    /// Aspect ratio as a float: the annotated DAR when present, otherwise
    /// width over height. Absent whenever an operand is zero or missing, so
    /// callers never see NaN or infinity.
    pub fn calculated_aspect_ratio(&self) -> Option<f64> {
        if let Some(dar) = self.dar() {
            let (w, h) = dar.split_once(':')?;
            ratio(w.parse().ok()?, h.parse().ok()?)
        } else {
            ratio(f64::from(self.width()), f64::from(self.height()))
        }
    }

    /// File size in bytes, from a filesystem stat of the original path.
    pub fn size(&self) -> Result<u64> {
        Ok(fs::metadata(&self.fs_path)?.len())
    }
}

fn ratio(w: f64, h: f64) -> Option<f64> {
    if w == 0.0 || h == 0.0 {
        None
    } else {
        Some(w / h)
    }
}

/// `Duration: HH:MM:SS.D` summed into seconds; missing components count as 0.
fn parse_duration(output: &str) -> f64 {
    let Some(caps) = DURATION_RE.captures(output) else {
        return 0.0;
    };
    let hours: f64 = caps[1].parse().unwrap_or(0.0);
    let minutes: f64 = caps[2].parse().unwrap_or(0.0);
    let seconds: f64 = caps[3].parse().unwrap_or(0.0);
    hours * 3600.0 + minutes * 60.0 + seconds
}

fn parse_start_time(output: &str) -> f64 {
    START_RE
        .captures(output)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0.0)
}

fn parse_bitrate(output: &str) -> Option<u32> {
    BITRATE_RE
        .captures(output)
        .and_then(|caps| caps[1].parse().ok())
}
