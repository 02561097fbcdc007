#![allow(
    // Sample-rate and time conversions between f32 and f64 lose nothing audible
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]

use anyhow::Result;
use bevy_ecs::system::Resource;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use crossbeam_channel::{Receiver, Sender, bounded};
use fundsp::hacker32::*;
use log::{error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::config::AudioConfig;

// Theme melody as (frequency in Hz, length in beats). A zero frequency is a rest.
const THEME: &[(f32, f32)] = &[
    (659.25, 1.0),
    (493.88, 0.5),
    (523.25, 0.5),
    (587.33, 1.0),
    (523.25, 0.5),
    (493.88, 0.5),
    (440.00, 1.0),
    (440.00, 0.5),
    (523.25, 0.5),
    (659.25, 1.0),
    (587.33, 0.5),
    (523.25, 0.5),
    (493.88, 1.5),
    (523.25, 0.5),
    (587.33, 1.0),
    (659.25, 1.0),
    (523.25, 1.0),
    (440.00, 1.0),
    (440.00, 1.5),
    (0.0, 0.5),
    (587.33, 1.5),
    (698.46, 0.5),
    (880.00, 1.0),
    (783.99, 0.5),
    (698.46, 0.5),
    (659.25, 1.5),
    (523.25, 0.5),
    (659.25, 1.0),
    (587.33, 0.5),
    (523.25, 0.5),
    (493.88, 1.0),
    (493.88, 0.5),
    (523.25, 0.5),
    (587.33, 1.0),
    (659.25, 1.0),
    (523.25, 1.0),
    (440.00, 1.0),
    (440.00, 2.0),
];

const THEME_BPM: f32 = 144.0;

/// A finite melody. Played to its end and then re-triggered by `TrackPlayer`.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundTrack {
    notes: &'static [(f32, f32)],
    beat_secs: f32,
}

impl BackgroundTrack {
    #[must_use]
    pub fn theme() -> Self {
        Self::new(THEME, THEME_BPM)
    }

    #[must_use]
    pub fn new(notes: &'static [(f32, f32)], bpm: f32) -> Self {
        Self {
            notes,
            beat_secs: 60.0 / bpm,
        }
    }

    /// Length of one pass through the melody, in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        f64::from(self.notes.iter().map(|(_, beats)| beats).sum::<f32>() * self.beat_secs)
    }

    /// The note sounding at `t` seconds as (frequency, time into the note, note length).
    #[must_use]
    pub fn note_at(&self, t: f32) -> Option<(f32, f32, f32)> {
        let mut start = 0.0;
        for &(freq, beats) in self.notes {
            let length = beats * self.beat_secs;
            if t < start + length {
                return Some((freq, t - start, length));
            }
            start += length;
        }
        None
    }

    #[must_use]
    pub fn frequency_at(&self, t: f32) -> f32 {
        self.note_at(t).map_or(0.0, |(freq, _, _)| freq)
    }

    /// Short attack, then a linear decay to silence at the end of each note.
    #[must_use]
    pub fn envelope_at(&self, t: f32) -> f32 {
        match self.note_at(t) {
            Some((freq, into, length)) if freq > 0.0 => {
                let attack = (into / 0.01).min(1.0);
                let release = (1.0 - into / length).max(0.0);
                attack * release
            }
            _ => 0.0,
        }
    }

    fn voice(self) -> Box<dyn AudioUnit> {
        let pitch = lfo(move |t| self.frequency_at(t)) >> sine();
        let gain = lfo(move |t| self.envelope_at(t));
        Box::new(pitch * gain * 0.2)
    }
}

/// Playback position within one pass of a track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackClock {
    pub position: f64,
    pub duration: f64,
    pub plays: u32,
}

impl TrackClock {
    #[must_use]
    pub fn new(duration: f64) -> Self {
        Self {
            position: 0.0,
            duration,
            plays: 1,
        }
    }

    /// Moves forward by `dt` seconds. Returns true when the track reached its
    /// natural end and was started again from the beginning.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.position += dt;
        if self.position >= self.duration {
            self.position = 0.0;
            self.plays += 1;
            true
        } else {
            false
        }
    }
}

/// Renders a track sample by sample, re-triggering it whenever it ends.
pub struct TrackPlayer {
    unit: Box<dyn AudioUnit>,
    clock: TrackClock,
    sample_rate: f64,
}

impl TrackPlayer {
    #[must_use]
    pub fn new(track: BackgroundTrack, sample_rate: f64) -> Self {
        let mut unit = track.voice();
        unit.set_sample_rate(sample_rate);
        Self {
            unit,
            clock: TrackClock::new(track.duration()),
            sample_rate,
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let sample = self.unit.get_mono();
        if self.clock.advance(1.0 / self.sample_rate) {
            self.unit.reset();
        }
        sample
    }

    #[must_use]
    pub fn plays(&self) -> u32 {
        self.clock.plays
    }
}

// Command to control the audio thread
enum AudioCommand {
    Quit,
}

// Global audio state
#[derive(Resource)]
pub struct AudioState {
    sender: Option<Sender<AudioCommand>>,
    available: Arc<AtomicBool>,
}

impl AudioState {
    /// Starts the audio thread and begins playing the theme at the configured
    /// volume. With music disabled no thread is started.
    pub fn new(config: &AudioConfig) -> Self {
        if !config.music_enabled {
            info!("Music disabled in config");
            return Self::silent();
        }

        let (sender, receiver) = bounded(1);
        let available = Arc::new(AtomicBool::new(true));
        let volume = config.volume.clamp(0.0, 1.0);

        let thread_available = Arc::clone(&available);
        thread::spawn(move || {
            if let Err(e) = run_audio_thread(&receiver, volume) {
                error!("Audio thread error: {e}");
                thread_available.store(false, Ordering::Relaxed);
            }
        });

        Self {
            sender: Some(sender),
            available,
        }
    }

    /// An audio state with no output thread.
    pub fn silent() -> Self {
        Self {
            sender: None,
            available: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_audio_available(&self) -> bool {
        self.sender.is_some() && self.available.load(Ordering::Relaxed)
    }
}

impl Drop for AudioState {
    fn drop(&mut self) {
        if let Some(sender) = &self.sender {
            let _ = sender.try_send(AudioCommand::Quit);
        }
    }
}

fn run_audio_thread(receiver: &Receiver<AudioCommand>, volume: f32) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No audio output device found"))?;
    let config = device.default_output_config()?;

    let _stream = match config.sample_format() {
        cpal::SampleFormat::F32 => run_audio_stream::<f32>(&device, &config.into(), volume)?,
        cpal::SampleFormat::I16 => run_audio_stream::<i16>(&device, &config.into(), volume)?,
        cpal::SampleFormat::U16 => run_audio_stream::<u16>(&device, &config.into(), volume)?,
        _ => return Err(anyhow::anyhow!("Unsupported audio format")),
    };
    info!("Background music started");

    // Keep the stream alive until told to quit or the game side hangs up
    let _ = receiver.recv();

    Ok(())
}

fn run_audio_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    volume: f32,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = f64::from(config.sample_rate.0);
    let channels = config.channels as usize;

    let mut player = TrackPlayer::new(BackgroundTrack::theme(), sample_rate);
    let mut next_value = move || (player.next_sample() * volume).clamp(-1.0, 1.0);

    let err_fn = |err| error!("Error in audio stream: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let value = T::from_sample(next_value());
                for sample in frame.iter_mut() {
                    *sample = value;
                }
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok(stream)
}
