//! Eight-bit chip sound engine
//!
//! Four NES-style channels (two pulse, one triangle, one noise) behind a
//! master gain. Playing a note on a channel cuts whatever that channel was
//! playing and retriggers a short attack/decay envelope. Sound cues from the
//! simulation are voiced as one or more channel notes.
//!
//! The voicing and waveform math is platform independent; the Web Audio
//! binding only exists on wasm32.

use rand::Rng;

use crate::sim::SoundCue;

/// Master output gain
pub const MASTER_GAIN: f32 = 0.2;
/// Envelope attack time (seconds)
pub const ATTACK_SECS: f64 = 0.005;
/// Level the envelope decays to by the end of a note
pub const RELEASE_FLOOR: f32 = 0.001;
/// Note length when none is given (seconds)
pub const DEFAULT_DURATION: f64 = 0.2;
/// Fourier terms used to build a pulse wave
pub const PULSE_HARMONICS: usize = 32;

/// Channel waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Pulse,
    Triangle,
    Noise,
}

/// The four chip channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Pulse1,
    Pulse2,
    Triangle,
    Noise,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Pulse1,
        Channel::Pulse2,
        Channel::Triangle,
        Channel::Noise,
    ];

    pub fn waveform(&self) -> Waveform {
        match self {
            Channel::Pulse1 | Channel::Pulse2 => Waveform::Pulse,
            Channel::Triangle => Waveform::Triangle,
            Channel::Noise => Waveform::Noise,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Channel::Pulse1 => "pulse1",
            Channel::Pulse2 => "pulse2",
            Channel::Triangle => "triangle",
            Channel::Noise => "noise",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Fourier coefficients `(real, imag)` of a pulse wave with the given duty cycle
pub fn pulse_wave_coefficients(duty: f32) -> (Vec<f32>, Vec<f32>) {
    use std::f32::consts::PI;

    let duty = duty.clamp(0.0, 1.0);
    let real = vec![0.0; PULSE_HARMONICS];
    let mut imag = vec![0.0; PULSE_HARMONICS];
    for (i, coeff) in imag.iter_mut().enumerate().skip(1) {
        let n = i as f32;
        *coeff = (2.0 / (n * PI)) * (n * PI * duty).sin();
    }
    (real, imag)
}

/// White noise samples in [-1, 1)
pub fn noise_samples<R: Rng>(rng: &mut R, len: usize) -> Vec<f32> {
    (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect()
}

/// Gain envelope key points for a note starting at `start`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub start: f64,
    pub peak_at: f64,
    pub peak: f32,
    pub end: f64,
}

impl Envelope {
    pub fn new(start: f64, duration: f64, peak: f32) -> Self {
        let duration = duration.max(ATTACK_SECS * 2.0);
        Self {
            start,
            peak_at: start + ATTACK_SECS,
            // An exponential ramp cannot start from or reach zero
            peak: peak.clamp(RELEASE_FLOOR, 1.0),
            end: start + duration,
        }
    }
}

/// A single note on one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub channel: Channel,
    /// Hz (ignored by the noise channel)
    pub frequency: f32,
    /// Seconds
    pub duration: f64,
    pub volume: f32,
}

/// How each cue sounds on the chip, with the cue's volume and pitch applied
pub fn voicing(cue: SoundCue) -> Vec<Note> {
    let notes: &[(Channel, f32, f64)] = match cue {
        SoundCue::Shoot => &[(Channel::Pulse1, 880.0, 0.08)],
        SoundCue::Explosion => &[(Channel::Noise, 0.0, 0.35), (Channel::Triangle, 110.0, 0.25)],
        SoundCue::PowerUp => &[(Channel::Pulse2, 660.0, 0.12), (Channel::Triangle, 990.0, 0.2)],
        SoundCue::SuperMeteor => &[(Channel::Pulse2, 1320.0, DEFAULT_DURATION)],
    };
    notes
        .iter()
        .map(|&(channel, frequency, duration)| Note {
            channel,
            frequency: frequency * cue.pitch(),
            duration,
            volume: cue.volume(),
        })
        .collect()
}

/// Duty cycles the pulse channels start with
pub fn default_duty(channel: Channel) -> f32 {
    match channel {
        Channel::Pulse2 => 0.25,
        _ => 0.5,
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{AudioManager, ChipEngine};

#[cfg(target_arch = "wasm32")]
mod web {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use web_sys::{
        AudioContext, AudioContextState, AudioScheduledSourceNode, GainNode, OscillatorType,
    };

    use super::*;

    /// Slot in `ChipEngine::channels` (same order as `Channel::ALL`)
    fn slot(channel: Channel) -> usize {
        match channel {
            Channel::Pulse1 => 0,
            Channel::Pulse2 => 1,
            Channel::Triangle => 2,
            Channel::Noise => 3,
        }
    }

    struct ChannelState {
        waveform: Waveform,
        gain: GainNode,
        duty: f32,
        source: Option<AudioScheduledSourceNode>,
    }

    /// Web Audio chip engine
    pub struct ChipEngine {
        ctx: AudioContext,
        // Kept alive for the lifetime of the engine
        _master: GainNode,
        channels: Vec<ChannelState>,
        noise_rng: Pcg32,
    }

    impl ChipEngine {
        pub fn new() -> Option<Self> {
            let ctx = AudioContext::new().ok()?;
            let master = ctx.create_gain().ok()?;
            master.gain().set_value(MASTER_GAIN);
            master.connect_with_audio_node(&ctx.destination()).ok()?;

            let mut channels = Vec::with_capacity(Channel::ALL.len());
            for channel in Channel::ALL {
                let gain = ctx.create_gain().ok()?;
                gain.gain().set_value(0.0);
                gain.connect_with_audio_node(&master).ok()?;
                channels.push(ChannelState {
                    waveform: channel.waveform(),
                    gain,
                    duty: default_duty(channel),
                    source: None,
                });
            }

            Some(Self {
                ctx,
                _master: master,
                channels,
                noise_rng: Pcg32::seed_from_u64(js_sys::Date::now() as u64),
            })
        }

        pub fn set_duty(&mut self, channel: Channel, duty: f32) {
            self.channels[slot(channel)].duty = duty.clamp(0.0, 1.0);
        }

        /// Cut the channel and play one note on it
        pub fn play(&mut self, channel: Channel, frequency: f32, duration: f64, volume: f32) {
            if self.ctx.state() == AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }
            if self.start_note(channel, frequency, duration, volume).is_none() {
                log::warn!("Failed to play {} note", channel.name());
            }
        }

        fn start_note(
            &mut self,
            channel: Channel,
            frequency: f32,
            duration: f64,
            volume: f32,
        ) -> Option<()> {
            let now = self.ctx.current_time();
            let state = &mut self.channels[slot(channel)];

            if let Some(previous) = state.source.take() {
                previous.stop().ok();
                previous.disconnect().ok();
            }

            let source: AudioScheduledSourceNode = match state.waveform {
                Waveform::Pulse => {
                    let osc = self.ctx.create_oscillator().ok()?;
                    let (mut real, mut imag) = pulse_wave_coefficients(state.duty);
                    let wave = self.ctx.create_periodic_wave(&mut real, &mut imag).ok()?;
                    osc.set_periodic_wave(&wave);
                    osc.frequency().set_value_at_time(frequency, now).ok()?;
                    osc.connect_with_audio_node(&state.gain).ok()?;
                    osc.into()
                }
                Waveform::Triangle => {
                    let osc = self.ctx.create_oscillator().ok()?;
                    osc.set_type(OscillatorType::Triangle);
                    osc.frequency().set_value_at_time(frequency, now).ok()?;
                    osc.connect_with_audio_node(&state.gain).ok()?;
                    osc.into()
                }
                Waveform::Noise => {
                    let rate = self.ctx.sample_rate();
                    let frames = ((rate as f64 * duration) as usize).max(1);
                    let buffer = self.ctx.create_buffer(1, frames as u32, rate).ok()?;
                    let mut samples = noise_samples(&mut self.noise_rng, frames);
                    buffer.copy_to_channel(&mut samples, 0).ok()?;
                    let src = self.ctx.create_buffer_source().ok()?;
                    src.set_buffer(Some(&buffer));
                    src.connect_with_audio_node(&state.gain).ok()?;
                    src.into()
                }
            };

            let env = Envelope::new(now, duration, volume);
            let gain = state.gain.gain();
            gain.cancel_scheduled_values(now).ok()?;
            gain.set_value_at_time(0.0, env.start).ok()?;
            gain.linear_ramp_to_value_at_time(env.peak, env.peak_at).ok()?;
            gain.exponential_ramp_to_value_at_time(RELEASE_FLOOR, env.end)
                .ok()?;

            source.start_with_when(now).ok()?;
            source.stop_with_when(env.end).ok()?;
            state.source = Some(source);
            Some(())
        }
    }

    /// Plays simulation cues through the chip engine
    pub struct AudioManager {
        engine: Option<ChipEngine>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            let engine = ChipEngine::new();
            if engine.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { engine }
        }

        pub fn play(&mut self, cue: SoundCue) {
            let Some(engine) = self.engine.as_mut() else {
                return;
            };
            for note in voicing(cue) {
                engine.play(note.channel, note.frequency, note.duration, note.volume);
            }
        }
    }
}

/// Native builds have no audio output; cues are only logged
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct AudioManager {
    played: u64,
}

#[cfg(not(target_arch = "wasm32"))]
impl AudioManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, cue: SoundCue) {
        self.played += 1;
        for note in voicing(cue) {
            log::trace!(
                "sound cue {}: {} {:.0}Hz for {:.2}s at {:.1}",
                cue.name(),
                note.channel.name(),
                note.frequency,
                note.duration,
                note.volume
            );
        }
    }

    /// Cues requested so far
    pub fn played(&self) -> u64 {
        self.played
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_channel_names_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(Channel::from_name(channel.name()), Some(channel));
        }
        assert_eq!(Channel::from_name("sawtooth"), None);
        assert_eq!(Channel::Pulse2.waveform(), Waveform::Pulse);
        assert_eq!(Channel::Noise.waveform(), Waveform::Noise);
    }

    #[test]
    fn test_square_wave_has_only_odd_harmonics() {
        let (real, imag) = pulse_wave_coefficients(0.5);
        assert_eq!(real.len(), PULSE_HARMONICS);
        assert!(real.iter().all(|&r| r == 0.0));
        assert_eq!(imag[0], 0.0);
        assert!((imag[1] - 2.0 / std::f32::consts::PI).abs() < 1e-6);
        assert!(imag[2].abs() < 1e-6);
        assert!(imag[4].abs() < 1e-6);
        // Odd harmonics alternate in sign
        assert!((imag[3] + 2.0 / (3.0 * std::f32::consts::PI)).abs() < 1e-6);
    }

    #[test]
    fn test_narrow_pulse_differs_from_square() {
        let (_, square) = pulse_wave_coefficients(0.5);
        let (_, narrow) = pulse_wave_coefficients(0.125);
        assert!(narrow[2].abs() > 1e-3);
        assert!(narrow[1] < square[1]);
    }

    #[test]
    fn test_noise_in_range() {
        let mut rng = Pcg32::seed_from_u64(8);
        let samples = noise_samples(&mut rng, 4096);
        assert_eq!(samples.len(), 4096);
        assert!(samples.iter().all(|s| (-1.0..1.0).contains(s)));
        assert!(samples.iter().any(|&s| s < -0.5));
        assert!(samples.iter().any(|&s| s > 0.5));
    }

    #[test]
    fn test_envelope_timing() {
        let env = Envelope::new(2.0, 0.2, 0.5);
        assert_eq!(env.peak_at, 2.0 + ATTACK_SECS);
        assert_eq!(env.end, 2.2);
        assert_eq!(env.peak, 0.5);

        // Never silent at the peak, never shorter than the attack
        let env = Envelope::new(0.0, 0.0, 0.0);
        assert_eq!(env.peak, RELEASE_FLOOR);
        assert!(env.end > env.peak_at);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_manager_counts_cues() {
        let mut audio = AudioManager::new();
        audio.play(SoundCue::Shoot);
        audio.play(SoundCue::PowerUp);
        assert_eq!(audio.played(), 2);
    }

    #[test]
    fn test_cue_voicing() {
        let shoot = voicing(SoundCue::Shoot);
        assert_eq!(shoot.len(), 1);
        assert_eq!(shoot[0].channel, Channel::Pulse1);
        assert_eq!(shoot[0].volume, 0.5);

        let boom = voicing(SoundCue::Explosion);
        assert!(boom.iter().any(|n| n.channel == Channel::Noise));

        for cue in [SoundCue::PowerUp, SoundCue::SuperMeteor] {
            assert!(voicing(cue).iter().all(|n| n.volume == 1.0));
        }
    }
}
