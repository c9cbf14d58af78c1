//! Audio manager for managing audio output and sources

use std::path::Path;

use rodio::{OutputStream, OutputStreamBuilder, mixer::Mixer};
use rustc_hash::FxHashMap;

use super::source::{AudioError, AudioSource, DecodedSource, Playback, decode_file};

/// Volume a sink should actually play at
#[must_use]
pub fn effective_volume(source_volume: f32, master_volume: f32, muted: bool) -> f32 {
    if muted {
        0.0
    } else {
        source_volume.max(0.0) * master_volume.max(0.0)
    }
}

/// Manages audio output and all audio sources
pub struct AudioManager {
    /// The output stream (must be kept alive)
    _stream: OutputStream,
    /// The mixer for creating sinks
    mixer: Mixer,
    /// Named audio sources
    sources: FxHashMap<String, AudioSource>,
    /// Per-source volume settings (before master volume applied)
    source_volumes: FxHashMap<String, f32>,
    /// Master volume
    master_volume: f32,
    /// Whether audio is muted
    muted: bool,
}

impl AudioManager {
    /// Open the default output device
    ///
    /// # Errors
    ///
    /// Returns an error if no audio output device is available
    pub fn new() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::from_default_device()
            .map_err(|_| AudioError::NoDevice)?
            .open_stream()
            .map_err(|_| AudioError::NoDevice)?;
        let mixer = stream.mixer().clone();

        Ok(Self {
            _stream: stream,
            mixer,
            sources: FxHashMap::default(),
            source_volumes: FxHashMap::default(),
            master_volume: 1.0,
            muted: false,
        })
    }

    /// Load an audio file and store it with a name
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded
    pub fn load(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
        playback: Playback,
    ) -> Result<(), AudioError> {
        let source = decode_file(path, playback.looping)?;
        self.insert(name.into(), source, playback);
        Ok(())
    }

    fn insert(&mut self, name: String, source: DecodedSource, playback: Playback) {
        let mut source = AudioSource::new(&self.mixer, source, name.clone(), playback.looping);
        source.set_volume(effective_volume(playback.volume, self.master_volume, self.muted));
        log::debug!("Loaded audio '{}' (looping: {})", name, playback.looping);

        self.sources.insert(name.clone(), source);
        self.source_volumes.insert(name, playback.volume);
    }

    /// Play an audio source by name
    pub fn play(&mut self, name: &str) -> bool {
        let volume = self.volume_for(name);
        if let Some(source) = self.sources.get_mut(name) {
            source.set_volume(volume);
            source.play();
            true
        } else {
            false
        }
    }

    /// Stop all audio sources
    pub fn stop_all(&mut self) {
        for source in self.sources.values_mut() {
            source.stop();
        }
    }

    /// Set the master volume (affects all sources)
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.max(0.0);
        self.apply_volumes();
    }

    /// Get the master volume
    #[must_use]
    pub const fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Mute all audio
    pub fn mute(&mut self) {
        self.muted = true;
        self.apply_volumes();
    }

    /// Unmute all audio
    pub fn unmute(&mut self) {
        self.muted = false;
        self.apply_volumes();
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.unmute();
        } else {
            self.mute();
        }
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
    }

    /// Check if audio is muted
    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    fn volume_for(&self, name: &str) -> f32 {
        let source_volume = self.source_volumes.get(name).copied().unwrap_or(1.0);
        effective_volume(source_volume, self.master_volume, self.muted)
    }

    fn apply_volumes(&mut self) {
        for (name, source) in &mut self.sources {
            let source_volume = self.source_volumes.get(name).copied().unwrap_or(1.0);
            source.set_volume(effective_volume(source_volume, self.master_volume, self.muted));
        }
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("source_count", &self.sources.len())
            .field("master_volume", &self.master_volume)
            .field("muted", &self.muted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        assert_eq!(effective_volume(0.5, 0.5, false), 0.25);
        assert_eq!(effective_volume(1.0, 1.0, true), 0.0);
        assert_eq!(effective_volume(-1.0, 1.0, false), 0.0);
    }
}
