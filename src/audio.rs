//! Music playback boundary
//!
//! The session only ever starts the song (on every start or restart) and
//! stops it (on death and restart). Browsers stream it through an
//! `HtmlAudioElement`; headless runs use `SilentAudio`.

/// Music sink driven by the session
pub trait AudioSink {
    /// Start `track` from `start_offset` seconds
    fn play(&mut self, track: &str, loop_forever: bool, start_offset: f32);
    fn stop(&mut self);
}

/// Logs playback requests instead of making sound
#[derive(Debug, Clone, Default)]
pub struct SilentAudio {
    /// Track currently "playing"
    pub playing: Option<String>,
    pub offset: f32,
    pub plays: u32,
    pub stops: u32,
}

impl AudioSink for SilentAudio {
    fn play(&mut self, track: &str, loop_forever: bool, start_offset: f32) {
        log::debug!(
            "play {:?} from {:.2}s (loop: {})",
            track,
            start_offset,
            loop_forever
        );
        self.playing = Some(track.to_string());
        self.offset = start_offset;
        self.plays += 1;
    }

    fn stop(&mut self) {
        self.playing = None;
        self.stops += 1;
    }
}

/// Music level with a mute switch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: f32,
    muted: bool,
}

impl Volume {
    pub fn new(level: f32) -> Self {
        Self {
            level: level.clamp(0.0, 1.0),
            muted: false,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level actually applied to the output
    pub fn effective(&self) -> f32 {
        if self.muted { 0.0 } else { self.level }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::MusicPlayer;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::HtmlAudioElement;

    use super::{AudioSink, Volume};

    /// Streams the song from `<track>.wav` next to the page
    pub struct MusicPlayer {
        element: Option<HtmlAudioElement>,
        volume: Volume,
    }

    impl MusicPlayer {
        pub fn new(level: f32) -> Self {
            Self {
                element: None,
                volume: Volume::new(level),
            }
        }

        /// Silence the song without losing its position
        pub fn set_muted(&mut self, muted: bool) {
            self.volume.set_muted(muted);
            if let Some(el) = &self.element {
                el.set_volume(self.volume.effective() as f64);
            }
        }
    }

    impl AudioSink for MusicPlayer {
        fn play(&mut self, track: &str, loop_forever: bool, start_offset: f32) {
            self.stop();
            let element = match HtmlAudioElement::new_with_src(&format!("{track}.wav")) {
                Ok(el) => el,
                Err(e) => {
                    log::warn!("Failed to create audio element: {:?}", e);
                    return;
                }
            };
            element.set_loop(loop_forever);
            element.set_volume(self.volume.effective() as f64);
            element.set_current_time(start_offset as f64);
            // Rejected until the first user gesture; the next restart retries
            if let Err(e) = element.play() {
                log::warn!("Music playback refused: {:?}", e);
            }
            self.element = Some(element);
        }

        fn stop(&mut self) {
            if let Some(el) = self.element.take() {
                let _ = el.pause();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_audio_records_requests() {
        let mut audio = SilentAudio::default();
        audio.play("Aeternus", true, 12.5);
        assert_eq!(audio.playing.as_deref(), Some("Aeternus"));
        assert_eq!(audio.offset, 12.5);
        audio.stop();
        assert!(audio.playing.is_none());
        assert_eq!((audio.plays, audio.stops), (1, 1));
    }

    #[test]
    fn test_mute_keeps_level() {
        let mut volume = Volume::new(1.5);
        assert_eq!(volume.effective(), 1.0);
        volume.set_muted(true);
        assert!(volume.is_muted());
        assert_eq!(volume.effective(), 0.0);
        volume.set_muted(false);
        assert_eq!(volume.effective(), 1.0);
    }
}
