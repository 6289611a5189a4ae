use crate::audio::{Playback, TickGate};
use crate::config::{Config, SoundConfig};
use gtk::prelude::*;
use gtk4 as gtk;
use std::path::PathBuf;
use std::time::Duration;

pub struct MediaPlayback(gtk::MediaFile);

impl Playback for MediaPlayback {
    fn is_playing(&self) -> bool {
        self.0.is_playing()
    }

    fn position(&self) -> Duration {
        Duration::from_micros(self.0.timestamp().max(0) as u64)
    }
}

#[derive(Debug, Clone)]
struct Cue {
    path: PathBuf,
    volume: f64,
}

impl Cue {
    fn from_config(config: &Config, sound: &SoundConfig) -> Option<Self> {
        sound.file.as_deref().map(|f| Self {
            path: config.resolve(f),
            volume: sound.volume,
        })
    }

    fn play(&self) -> gtk::MediaFile {
        let media = gtk::MediaFile::for_filename(&self.path);
        media.set_volume(self.volume);
        media.play();
        media
    }
}

/// Tick and finish sounds. Playback handles are held so sounds are not cut
/// short when the handle would otherwise be dropped.
pub struct Sounds {
    tick: Option<Cue>,
    finished: Option<Cue>,
    gate: TickGate<MediaPlayback>,
    finished_playback: Option<gtk::MediaFile>,
}

impl Sounds {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tick: Cue::from_config(config, &config.tick),
            finished: Cue::from_config(config, &config.finished),
            gate: TickGate::default(),
            finished_playback: None,
        }
    }

    pub fn tick(&mut self) {
        let Some(cue) = &self.tick else {
            return;
        };
        self.gate.fire(|| Some(MediaPlayback(cue.play())));
    }

    pub fn finished(&mut self) {
        if let Some(cue) = &self.finished {
            self.finished_playback = Some(cue.play());
        }
    }
}
