/// Background music via rodio.
///
/// The track is opened lazily on the first successful play() and loops
/// forever; pause/resume act on the same Sink so playback continues where it
/// stopped.
///
/// Compile without the "sound" feature to drop rodio entirely: the stub
/// player refuses every play() with `PlaybackError::Unavailable`.

#[cfg(feature = "sound")]
mod inner {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::PathBuf;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use crate::sim::audio::{Playback, PlaybackError};

    pub struct MusicPlayer {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sink: Option<Sink>,
        track: PathBuf,
        volume: f32,
    }

    impl MusicPlayer {
        pub fn open(track: PathBuf) -> Result<Self, PlaybackError> {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|e| PlaybackError::NoDevice(e.to_string()))?;
            Ok(MusicPlayer {
                _stream: stream,
                handle,
                sink: None,
                track,
                volume: 1.0,
            })
        }

        fn start(&self) -> Result<Sink, PlaybackError> {
            let file = File::open(&self.track).map_err(|source| PlaybackError::Track {
                path: self.track.clone(),
                source,
            })?;
            let source = Decoder::new(BufReader::new(file))
                .map_err(|e| PlaybackError::Decode(e.to_string()))?;
            let sink = Sink::try_new(&self.handle)
                .map_err(|e| PlaybackError::NoDevice(e.to_string()))?;
            sink.set_volume(self.volume);
            sink.append(source.repeat_infinite());
            Ok(sink)
        }
    }

    impl Playback for MusicPlayer {
        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
            if let Some(sink) = &self.sink {
                sink.set_volume(volume);
            }
        }

        fn play(&mut self) -> Result<(), PlaybackError> {
            if let Some(sink) = &self.sink {
                sink.play();
                return Ok(());
            }
            let sink = self.start()?;
            self.sink = Some(sink);
            Ok(())
        }

        fn pause(&mut self) {
            if let Some(sink) = &self.sink {
                sink.pause();
            }
        }

        fn is_paused(&self) -> bool {
            self.sink.as_ref().map_or(true, |s| s.is_paused())
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: stub player when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::MusicPlayer;

#[cfg(not(feature = "sound"))]
pub struct MusicPlayer;

#[cfg(not(feature = "sound"))]
impl MusicPlayer {
    pub fn open(_track: std::path::PathBuf) -> Result<Self, crate::sim::audio::PlaybackError> {
        Err(crate::sim::audio::PlaybackError::Unavailable)
    }
}

#[cfg(not(feature = "sound"))]
impl crate::sim::audio::Playback for MusicPlayer {
    fn set_volume(&mut self, _volume: f32) {}
    fn play(&mut self) -> Result<(), crate::sim::audio::PlaybackError> {
        Err(crate::sim::audio::PlaybackError::Unavailable)
    }
    fn pause(&mut self) {}
    fn is_paused(&self) -> bool { true }
}
