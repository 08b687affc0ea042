//! Media file inspection by parsing ffmpeg's diagnostic output.
//!
//! ffmpeg prints a human-oriented description of any input file on stderr:
//! container duration and bitrate plus one line per audio, video or subtitle
//! stream. This crate runs `ffmpeg -i <path>`, captures that output and
//! parses it into a typed [`Movie`] descriptor, tolerating the format's
//! optional fields, shifting slots and occasional non-UTF-8 metadata.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use ffmovie::Movie;
//! use std::path::Path;
//!
//! let movie = Movie::open(Path::new("/path/to/movie.mkv")).unwrap();
//! if movie.is_valid() {
//!     println!(
//!         "{}s, {:?}, {} audio stream(s)",
//!         movie.duration,
//!         movie.resolution(),
//!         movie.audio_streams.len()
//!     );
//! }
//! ```

pub mod error;
pub mod language;
pub mod movie;
pub mod probe;
pub mod streams;
pub mod text;

pub use error::{FfmovieError, Result};
pub use language::LanguageMap;
pub use movie::Movie;
pub use probe::{escape_path, FfmpegProber, MovieProber};
pub use streams::{AudioStream, Subtitle, VideoStream};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
