// Integration tests driving Movie::open_with through an injected prober,
// so no ffmpeg install is required.

use std::cell::RefCell;
use std::io::Write;
use std::path::Path;

use ffmovie::{FfmovieError, LanguageMap, Movie, MovieProber, Result};

/// Canned-output prober that records every invocation.
struct MockProber {
    output: Vec<u8>,
    calls: RefCell<usize>,
}

impl MockProber {
    fn new(output: &str) -> Self {
        Self {
            output: output.as_bytes().to_vec(),
            calls: RefCell::new(0),
        }
    }

    fn from_bytes(output: &[u8]) -> Self {
        Self {
            output: output.to_vec(),
            calls: RefCell::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

impl MovieProber for MockProber {
    fn probe(&self, _path: &Path) -> Result<Vec<u8>> {
        *self.calls.borrow_mut() += 1;
        Ok(self.output.clone())
    }
}

const MKV_OUTPUT: &str = "\
Input #0, matroska,webm, from 'movie.mkv':
  Metadata:
    encoder         : libebml v1.3.0
  Duration: 01:02:03.4, start: 0.000000, bitrate: 1205 kb/s
    Stream #0:0(eng): Video: h264 (High), yuv420p, 1920x1080 [PAR 1:1 DAR 16:9], 5000 kb/s, 23.98 fps
    Stream #0:1(eng): Audio: aac, 48000 Hz, stereo, fltp, 128 kb/s
    Stream #0:2(deu): Audio: ac3, 48000 Hz, 5.1(side), fltp, 448 kb/s
    Stream #0:3(und): Subtitle: subrip
";

fn temp_movie_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"not really a movie").unwrap();
    file
}

#[test]
fn test_open_with_parses_full_descriptor() {
    let _ = env_logger::builder().is_test(true).try_init();
    let file = temp_movie_file();
    let prober = MockProber::new(MKV_OUTPUT);
    let movie = Movie::open_with(file.path(), &prober, &LanguageMap::default()).unwrap();

    assert!((movie.duration - 3723.4).abs() < 1e-9);
    assert_eq!(movie.start_time, 0.0);
    assert_eq!(movie.bitrate, Some(1205));
    assert_eq!(movie.video_streams.len(), 1);
    assert_eq!(movie.audio_streams.len(), 2);
    assert_eq!(movie.subtitles.len(), 1);
    assert!(movie.is_valid());
    assert!(movie.uncertain_duration);

    let video = &movie.video_streams[0];
    assert_eq!(video.codec, "h264 (High)");
    assert_eq!(video.dar.as_deref(), Some("16:9"));
    assert_eq!(movie.width(), 1920);
    assert_eq!(movie.height(), 1080);

    assert_eq!(movie.audio_streams[0].language.as_deref(), Some("eng"));
    assert_eq!(movie.audio_streams[1].language.as_deref(), Some("ger"));
    assert_eq!(movie.audio_streams[1].channels(), Some(6));
    assert_eq!(movie.subtitles[0].language, None);

    assert_eq!(prober.calls(), 1);
}

#[test]
fn test_missing_file_fails_before_any_probe() {
    let prober = MockProber::new(MKV_OUTPUT);
    let err = Movie::open_with(
        Path::new("/no/such/file.mkv"),
        &prober,
        &LanguageMap::default(),
    )
    .unwrap_err();

    assert!(matches!(err, FfmovieError::InputNotFound(_)));
    assert_eq!(prober.calls(), 0);
}

#[test]
fn test_audio_only_file_is_valid() {
    let file = temp_movie_file();
    let output = "\
Input #0, mp3, from 'song.mp3':
  Duration: 00:03:21.0, start: 0.000000, bitrate: 192 kb/s
    Stream #0:0: Audio: mp3, 44100 Hz, stereo, s16p, 192 kb/s
";
    let prober = MockProber::new(output);
    let movie = Movie::open_with(file.path(), &prober, &LanguageMap::default()).unwrap();

    assert!(movie.is_valid());
    assert_eq!(movie.video_streams.len(), 0);
    assert_eq!(movie.resolution(), None);
    assert_eq!(movie.calculated_aspect_ratio(), None);
}

#[test]
fn test_output_without_streams_is_invalid() {
    let file = temp_movie_file();
    let prober = MockProber::new("whatever.txt: Invalid data found when processing input\n");
    let movie = Movie::open_with(file.path(), &prober, &LanguageMap::default()).unwrap();

    assert!(!movie.is_valid());
    assert_eq!(movie.duration, 0.0);
    assert_eq!(movie.bitrate, None);
}

#[test]
fn test_latin1_metadata_does_not_break_parsing() {
    let file = temp_movie_file();
    let mut output = b"Input #0, avi, from 'alt.avi':\n  Metadata:\n    title: caf\xe9\n".to_vec();
    output.extend_from_slice(
        b"  Duration: 00:10:00.0, start: 0.000000, bitrate: 900 kb/s\n    Stream #0:0: Video: mpeg4, yuv420p, 640x480, 25 fps\n",
    );
    let prober = MockProber::from_bytes(&output);
    let movie = Movie::open_with(file.path(), &prober, &LanguageMap::default()).unwrap();

    assert_eq!(movie.duration, 600.0);
    assert_eq!(movie.video_streams.len(), 1);
    assert_eq!(movie.video_streams[0].frame_rate, Some(25.0));
}

#[test]
fn test_custom_language_table_is_used() {
    let file = temp_movie_file();
    let output = "    Stream #0:0(fre): Audio: aac, 48000 Hz, stereo, fltp, 128 kb/s\n";
    let mut languages = LanguageMap::default();
    languages.insert("fre", Some("fra"));
    let prober = MockProber::new(output);
    let movie = Movie::open_with(file.path(), &prober, &languages).unwrap();

    assert_eq!(movie.audio_streams[0].language.as_deref(), Some("fra"));
}

#[test]
fn test_size_stats_the_original_path() {
    let file = temp_movie_file();
    let prober = MockProber::new(MKV_OUTPUT);
    let movie = Movie::open_with(file.path(), &prober, &LanguageMap::default()).unwrap();

    assert_eq!(movie.size().unwrap(), "not really a movie".len() as u64);
}

#[test]
fn test_path_is_escaped_in_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("it's a \"movie\".mkv");
    std::fs::write(&path, b"x").unwrap();
    let prober = MockProber::new(MKV_OUTPUT);
    let movie = Movie::open_with(&path, &prober, &LanguageMap::default()).unwrap();

    assert!(movie.path.contains("\\\"movie\\\""));
    assert!(movie.path.contains("it\\'s"));
    // Embedding in a double-quoted context must not end the framing early.
    assert!(!movie.path.replace("\\\"", "").contains('"'));
}
