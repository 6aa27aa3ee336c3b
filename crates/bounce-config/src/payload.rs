//! Concrete payload types carried by the export graph.
//!
//! The graph core treats these as opaque and only clones them. Nothing here is
//! validated: a range whose end precedes its start is carried as written.

use std::fmt;

use bounce_core::{ExportSchema, Level, Payload};
use serde::{Deserialize, Serialize};

/// A named span of the session timeline, in samples.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRange {
    /// Label used in filenames (`{range}`).
    pub name: String,
    /// First sample.
    pub start: u64,
    /// One past the last sample.
    pub end: u64,
}

impl TimeRange {
    /// Create a range.
    pub fn new(name: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Number of samples covered. Zero for inverted ranges.
    pub fn length(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

/// Channel routing for one export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Display name (`{channels}` in filenames).
    pub name: String,
    /// Output channel count.
    pub channels: u32,
    /// Write one file per channel instead of one interleaved file.
    #[serde(default)]
    pub split: bool,
}

impl ChannelConfig {
    /// Interleaved routing with `channels` outputs.
    pub fn new(name: impl Into<String>, channels: u32) -> Self {
        Self {
            name: name.into(),
            channels,
            split: false,
        }
    }
}

/// Output codec.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    /// RIFF WAVE, uncompressed PCM.
    Wav,
    /// Free Lossless Audio Codec.
    Flac,
    /// Ogg Vorbis.
    Ogg,
    /// MPEG-1 Layer III.
    Mp3,
}

impl Codec {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Codec::Wav => "wav",
            Codec::Flac => "flac",
            Codec::Ogg => "ogg",
            Codec::Mp3 => "mp3",
        }
    }

    /// Lossy codecs ignore `bit_depth`.
    pub fn is_lossy(self) -> bool {
        matches!(self, Codec::Ogg | Codec::Mp3)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encoding settings for one export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormatSpec {
    /// Display name (`{format}` in filenames).
    pub name: String,
    /// Output codec.
    pub codec: Codec,
    /// Output sample rate in Hz (defaults to 48000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Bits per sample for PCM codecs (defaults to 24).
    #[serde(default = "default_bit_depth")]
    pub bit_depth: u16,
    /// Peak-normalize before encoding.
    #[serde(default)]
    pub normalize: bool,
}

fn default_sample_rate() -> u32 {
    48000
}

fn default_bit_depth() -> u16 {
    24
}

impl FormatSpec {
    /// A format with default rate and depth.
    pub fn new(name: impl Into<String>, codec: Codec) -> Self {
        Self {
            name: name.into(),
            codec,
            sample_rate: default_sample_rate(),
            bit_depth: default_bit_depth(),
            normalize: false,
        }
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the bit depth.
    pub fn with_bit_depth(mut self, bit_depth: u16) -> Self {
        self.bit_depth = bit_depth;
        self
    }
}

/// Where an export is written and how its file is named.
///
/// `template` may use `{session}`, `{range}`, `{channels}`, `{format}` and
/// `{rate}`; the codec's extension is appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilenamePattern {
    /// Output folder, relative to the export root. Empty means the root.
    #[serde(default)]
    pub folder: String,
    /// Name template without extension.
    pub template: String,
}

impl FilenamePattern {
    /// A pattern writing into the export root.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            folder: String::new(),
            template: template.into(),
        }
    }

    /// Set the output folder.
    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Expands the template for one job into a `/`-separated relative path.
    ///
    /// Placeholders are `{session}`, `{range}`, `{channels}`, `{format}` and
    /// `{rate}`. Anything else in braces is kept verbatim.
    ///
    /// ```rust
    /// use bounce_config::{ChannelConfig, Codec, FilenamePattern, FormatSpec, TimeRange};
    ///
    /// let pattern = FilenamePattern::new("{session}-{range}").in_folder("masters");
    /// let path = pattern.render(
    ///     "album",
    ///     &TimeRange::new("track1", 0, 480_000),
    ///     &ChannelConfig::new("stereo", 2),
    ///     &FormatSpec::new("CD", Codec::Wav),
    /// );
    /// assert_eq!(path, "masters/album-track1.wav");
    /// ```
    pub fn render(
        &self,
        session: &str,
        range: &TimeRange,
        channels: &ChannelConfig,
        format: &FormatSpec,
    ) -> String {
        let rate = format.sample_rate.to_string();
        let value = |key: &str| match key {
            "session" => Some(session),
            "range" => Some(range.name.as_str()),
            "channels" => Some(channels.name.as_str()),
            "format" => Some(format.name.as_str()),
            "rate" => Some(rate.as_str()),
            _ => None,
        };

        // Single pass: substituted text is never scanned for placeholders.
        let mut stem = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some(open) = rest.find('{') {
            stem.push_str(&rest[..open]);
            let tail = &rest[open + 1..];
            let placeholder = tail
                .find('}')
                .and_then(|close| value(&tail[..close]).map(|text| (close, text)));
            match placeholder {
                Some((close, text)) => {
                    stem.push_str(text);
                    rest = &tail[close + 1..];
                }
                None => {
                    stem.push('{');
                    rest = tail;
                }
            }
        }
        stem.push_str(rest);

        let file = format!("{stem}.{}", format.codec.extension());
        if self.folder.is_empty() {
            file
        } else {
            format!("{}/{file}", self.folder.trim_end_matches('/'))
        }
    }
}

/// Binds the payload types above to the graph's four levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileSchema;

impl ExportSchema for ProfileSchema {
    type TimeRange = TimeRange;
    type ChannelConfig = ChannelConfig;
    type Format = FormatSpec;
    type Filename = FilenamePattern;
}

/// A replacement payload as written in a profile.
///
/// Externally tagged by level name, e.g. `[operations.with.format]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum NodeValue {
    /// Time ranges of a root.
    Timespan(Vec<TimeRange>),
    /// Channel routing.
    ChannelConfig(ChannelConfig),
    /// Encoding settings.
    Format(FormatSpec),
    /// Output naming.
    Filename(FilenamePattern),
}

impl NodeValue {
    /// The level this value belongs to.
    pub fn level(&self) -> Level {
        match self {
            NodeValue::Timespan(_) => Level::Timespan,
            NodeValue::ChannelConfig(_) => Level::ChannelConfig,
            NodeValue::Format(_) => Level::Format,
            NodeValue::Filename(_) => Level::Filename,
        }
    }
}

impl From<NodeValue> for Payload<ProfileSchema> {
    fn from(value: NodeValue) -> Self {
        match value {
            NodeValue::Timespan(ranges) => Payload::Timespan(ranges),
            NodeValue::ChannelConfig(c) => Payload::ChannelConfig(c),
            NodeValue::Format(f) => Payload::Format(f),
            NodeValue::Filename(f) => Payload::Filename(f),
        }
    }
}
