//! Audio source for playing individual sounds

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use std::sync::Arc;

use rodio::{Decoder, Sink, Source, mixer::Mixer};

/// A decoded stream ready to append to a sink
pub type DecodedSource = Box<dyn Source + Send>;

/// Playback state of an audio source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Audio is playing
    Playing,
    /// Audio is paused
    Paused,
    /// Audio has stopped
    #[default]
    Stopped,
}

/// How a source should play once started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    /// Restart from the beginning whenever the stream ends
    pub looping: bool,
    /// Volume before the master volume is applied
    pub volume: f32,
}

impl Playback {
    /// Play once at full volume
    pub const ONCE: Self = Self {
        looping: false,
        volume: 1.0,
    };

    /// Loop forever at full volume
    pub const LOOP: Self = Self {
        looping: true,
        volume: 1.0,
    };

    #[must_use]
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.max(0.0);
        self
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::ONCE
    }
}

/// Decode an encoded stream (WAV, MP3, OGG, FLAC)
///
/// # Errors
///
/// Returns [`AudioError::DecodeError`] if the format is not recognized
pub fn decode<R>(reader: R, looping: bool) -> Result<DecodedSource, AudioError>
where
    R: Read + Seek + Send + Sync + 'static,
{
    let source: DecodedSource = if looping {
        Box::new(Decoder::new_looped(reader).map_err(|e| AudioError::DecodeError(e.to_string()))?)
    } else {
        Box::new(Decoder::new(reader).map_err(|e| AudioError::DecodeError(e.to_string()))?)
    };
    Ok(source)
}

/// Open and decode an audio file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn decode_file(path: impl AsRef<Path>, looping: bool) -> Result<DecodedSource, AudioError> {
    let path = path.as_ref();
    let file =
        File::open(path).map_err(|e| AudioError::IoError(format!("{}: {e}", path.display())))?;
    decode(BufReader::new(file), looping)
}

/// Decode audio held in memory
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded
pub fn decode_bytes(bytes: Arc<[u8]>, looping: bool) -> Result<DecodedSource, AudioError> {
    decode(Cursor::new(bytes), looping)
}

/// An audio source that can play sounds
pub struct AudioSource {
    /// The audio sink for playback control
    sink: Sink,
    /// Current playback state
    state: PlaybackState,
    /// Whether this source loops
    looping: bool,
    /// Source name for debugging
    name: String,
}

impl AudioSource {
    /// Wrap a decoded stream in a paused sink on `mixer`
    pub fn new(mixer: &Mixer, source: DecodedSource, name: impl Into<String>, looping: bool) -> Self {
        let sink = Sink::connect_new(mixer);
        sink.append(source);
        sink.pause(); // Start paused

        Self {
            sink,
            state: PlaybackState::Stopped,
            looping,
            name: name.into(),
        }
    }

    /// Play the audio
    pub fn play(&mut self) {
        self.sink.play();
        self.state = PlaybackState::Playing;
    }

    /// Stop the audio (cannot be resumed)
    pub fn stop(&mut self) {
        self.sink.stop();
        self.state = PlaybackState::Stopped;
    }

    /// Set the volume (0.0 = silent, 1.0 = normal, >1.0 = amplified)
    pub fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume.max(0.0));
    }

    /// Get the current volume
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.sink.volume()
    }

    /// Get the current playback state
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        if self.sink.empty() && self.state == PlaybackState::Playing {
            PlaybackState::Stopped
        } else {
            self.state
        }
    }
}

impl std::fmt::Debug for AudioSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSource")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("looping", &self.looping)
            .field("volume", &self.sink.volume())
            .finish()
    }
}

/// Errors that can occur during audio operations
#[derive(Debug, Clone)]
pub enum AudioError {
    /// IO error reading file
    IoError(String),
    /// Error decoding audio data
    DecodeError(String),
    /// No audio device available
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DecodeError(e) => write!(f, "Decode error: {e}"),
            Self::NoDevice => write!(f, "No audio output device available"),
        }
    }
}

impl std::error::Error for AudioError {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mono 16-bit PCM WAV with `samples` frames of silence
    fn silent_wav(samples: u32) -> Arc<[u8]> {
        let data_len = samples * 2;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&8000u32.to_le_bytes());
        wav.extend_from_slice(&16000u32.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(wav.len() + data_len as usize, 0);
        wav.into()
    }

    #[test]
    fn test_decode_once_ends() {
        let source = decode_bytes(silent_wav(100), false).unwrap();
        assert_eq!(source.count(), 100);
    }

    #[test]
    fn test_decode_looping_keeps_going() {
        let source = decode_bytes(silent_wav(100), true).unwrap();
        assert_eq!(source.take(350).count(), 350);
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode_bytes(Arc::from(&b"definitely not audio"[..]), false);
        assert!(matches!(result, Err(AudioError::DecodeError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = decode_file("no/such/track.mp3", true);
        assert!(matches!(result, Err(AudioError::IoError(_))));
    }

    #[test]
    fn test_playback_presets() {
        assert!(Playback::LOOP.looping);
        assert!(!Playback::default().looping);
        assert_eq!(Playback::LOOP.with_volume(-1.0).volume, 0.0);
    }
}
