use std::collections::VecDeque;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use cpal::Sample;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::Time;

use crate::events::types::AppEvent;
use crate::player::clock::EngineClock;
use crate::player::commands::{PlayerCommand, codes};

struct AudioOutput {
    ring_buffer: Arc<Mutex<VecDeque<f32>>>,
    spec: SignalSpec,
    _stream: cpal::Stream,
    paused: Arc<AtomicBool>,
}

impl AudioOutput {
    fn new(spec: SignalSpec, clock: Arc<EngineClock>) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("No output device available")?;

        let channels = spec.channels.count();
        let config = cpal::StreamConfig {
            channels: channels as u16,
            sample_rate: cpal::SampleRate(spec.rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let buffer_capacity = spec.rate as usize * channels * 5;
        let ring_buffer = Arc::new(Mutex::new(VecDeque::with_capacity(buffer_capacity)));
        let ring_buffer_clone = ring_buffer.clone();
        let paused = Arc::new(AtomicBool::new(true));
        let paused_clone = paused.clone();

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if paused_clone.load(Ordering::Relaxed) {
                    data.fill(Sample::EQUILIBRIUM);
                    return;
                }

                let gain = clock.gain();
                let mut played = 0u64;
                match ring_buffer_clone.lock() {
                    Ok(mut buffer) => {
                        for sample in data.iter_mut() {
                            *sample = match buffer.pop_front() {
                                Some(s) => {
                                    played += 1;
                                    s * gain
                                }
                                None => Sample::EQUILIBRIUM,
                            };
                        }
                    }
                    Err(_) => data.fill(Sample::EQUILIBRIUM),
                }
                clock.advance(played / channels as u64);
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;

        Ok(AudioOutput {
            ring_buffer,
            spec,
            _stream: stream,
            paused,
        })
    }

    fn write_samples(&self, samples: &[f32]) {
        if let Ok(mut buffer) = self.ring_buffer.lock() {
            buffer.extend(samples.iter().copied());
        }
    }

    fn buffer_len(&self) -> usize {
        self.ring_buffer.lock().map(|b| b.len()).unwrap_or(0)
    }

    fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    fn clear_buffer(&self) {
        if let Ok(mut buffer) = self.ring_buffer.lock() {
            buffer.clear();
        }
    }
}

struct PlaybackContext {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
    track_id: u32,
    audio_output: AudioOutput,
    sample_buf: SampleBuffer<f32>,
    total_duration: Option<Duration>,
    draining: bool,
}

impl PlaybackContext {
    fn seek(&mut self, position: Duration, mode: SeekMode) -> Result<()> {
        self.audio_output.clear_buffer();

        let seek_to = SeekTo::Time {
            time: Time::from(position.as_secs_f64()),
            track_id: Some(self.track_id),
        };
        self.format
            .seek(mode, seek_to)
            .map_err(|e| anyhow!("Seek error: {}", e))?;
        self.decoder.reset();
        self.draining = false;
        Ok(())
    }
}

fn send_state(event_tx: &mpsc::Sender<AppEvent>, code: i32) {
    let _ = event_tx.send(AppEvent::EngineState(code));
}

pub fn spawn(
    cmd_rx: mpsc::Receiver<PlayerCommand>,
    event_tx: mpsc::Sender<AppEvent>,
    clock: Arc<EngineClock>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut ctx: Option<PlaybackContext> = None;
        let mut loaded: Option<PathBuf> = None;
        let mut is_paused = true;

        loop {
            match cmd_rx.try_recv() {
                Ok(cmd) => match cmd {
                    PlayerCommand::Load { path } => {
                        ctx = None;
                        is_paused = true;
                        send_state(&event_tx, codes::BUFFERING);

                        match load_audio(&path, Duration::ZERO, clock.clone()) {
                            Ok(new_ctx) => {
                                clock.reset(new_ctx.audio_output.spec.rate, new_ctx.total_duration);
                                tracing::info!(path = %path.display(), "media loaded");
                                ctx = Some(new_ctx);
                                loaded = Some(path);
                                let _ = event_tx.send(AppEvent::EngineReady);
                                send_state(&event_tx, codes::CUED);
                            }
                            Err(e) => {
                                tracing::error!(path = %path.display(), "failed to load media: {:#}", e);
                                let _ = event_tx.send(AppEvent::PlayerError(format!("{:#}", e)));
                                send_state(&event_tx, codes::UNSTARTED);
                            }
                        }
                    }

                    PlayerCommand::Play => {
                        // Replay from the top once a track has ended.
                        if ctx.is_none() {
                            if let Some(ref path) = loaded {
                                match load_audio(path, Duration::ZERO, clock.clone()) {
                                    Ok(new_ctx) => {
                                        clock.set_position(Duration::ZERO);
                                        ctx = Some(new_ctx);
                                    }
                                    Err(e) => {
                                        tracing::error!(path = %path.display(), "failed to reload media: {:#}", e);
                                        let _ = event_tx
                                            .send(AppEvent::PlayerError(format!("{:#}", e)));
                                    }
                                }
                            }
                        }

                        match ctx {
                            Some(ref c) => {
                                c.audio_output.set_paused(false);
                                is_paused = false;
                                send_state(&event_tx, codes::PLAYING);
                            }
                            // The caller has already flipped to playing.
                            None => send_state(&event_tx, codes::PAUSED),
                        }
                    }

                    PlayerCommand::Pause => {
                        if let Some(ref c) = ctx {
                            c.audio_output.set_paused(true);
                            is_paused = true;
                            send_state(&event_tx, codes::PAUSED);
                        }
                    }

                    PlayerCommand::Stop => {
                        if let Some(ref mut c) = ctx {
                            c.audio_output.set_paused(true);
                            if let Err(e) = c.seek(Duration::ZERO, SeekMode::Coarse) {
                                tracing::warn!("rewind on stop failed: {:#}", e);
                            }
                        }
                        is_paused = true;
                        clock.set_position(Duration::ZERO);
                        send_state(&event_tx, codes::CUED);
                    }

                    PlayerCommand::Seek {
                        position,
                        allow_seek_ahead,
                    } => {
                        let position = match clock.duration_secs() {
                            d if d > 0.0 => position.min(Duration::from_secs_f64(d)),
                            _ => position,
                        };

                        if ctx.is_none() {
                            if let Some(ref path) = loaded {
                                match load_audio(path, position, clock.clone()) {
                                    Ok(new_ctx) => ctx = Some(new_ctx),
                                    Err(e) => {
                                        let _ = event_tx
                                            .send(AppEvent::PlayerError(format!("{:#}", e)));
                                        continue;
                                    }
                                }
                            }
                        }

                        if let Some(ref mut c) = ctx {
                            let mode = if allow_seek_ahead {
                                SeekMode::Accurate
                            } else {
                                SeekMode::Coarse
                            };
                            match c.seek(position, mode) {
                                Ok(()) => clock.set_position(position),
                                Err(e) => {
                                    let _ = event_tx.send(AppEvent::PlayerError(e.to_string()));
                                }
                            }
                        }
                    }

                    PlayerCommand::Shutdown => break,
                },

                Err(TryRecvError::Empty) => {}

                Err(TryRecvError::Disconnected) => break,
            }

            let Some(ref mut c) = ctx else {
                std::thread::sleep(Duration::from_millis(20));
                continue;
            };

            if is_paused {
                std::thread::sleep(Duration::from_millis(20));
                continue;
            }

            if c.draining {
                if c.audio_output.buffer_len() == 0 {
                    ctx = None;
                    is_paused = true;
                    send_state(&event_tx, codes::ENDED);
                } else {
                    std::thread::sleep(Duration::from_millis(20));
                }
                continue;
            }

            // Throttle if buffer is full
            let max_buffer =
                c.audio_output.spec.rate as usize * c.audio_output.spec.channels.count() * 3;
            if c.audio_output.buffer_len() > max_buffer {
                std::thread::sleep(Duration::from_millis(10));
                continue;
            }

            match c.format.next_packet() {
                Ok(packet) => {
                    if packet.track_id() != c.track_id {
                        continue;
                    }

                    match c.decoder.decode(&packet) {
                        Ok(decoded) => {
                            let needed = decoded.capacity() * decoded.spec().channels.count();
                            if c.sample_buf.capacity() < needed {
                                c.sample_buf =
                                    SampleBuffer::new(decoded.capacity() as u64, *decoded.spec());
                            }
                            c.sample_buf.copy_interleaved_ref(decoded);
                            c.audio_output.write_samples(c.sample_buf.samples());
                        }
                        Err(SymphoniaError::DecodeError(e)) => {
                            tracing::warn!(error = e, "skipping undecodable packet");
                        }
                        Err(e) => {
                            let _ = event_tx.send(AppEvent::PlayerError(format!("Decode error: {}", e)));
                        }
                    }
                }

                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    c.draining = true;
                }

                Err(e) => {
                    let _ = event_tx.send(AppEvent::PlayerError(format!("Read error: {}", e)));
                    ctx = None;
                    is_paused = true;
                    send_state(&event_tx, codes::ENDED);
                }
            }
        }

        tracing::debug!("engine thread exiting");
    })
}

fn load_audio(
    path: &Path,
    start_position: Duration,
    clock: Arc<EngineClock>,
) -> Result<PlaybackContext> {
    let codecs = symphonia::default::get_codecs();
    let probe = symphonia::default::get_probe();

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = probe
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Unsupported media format")?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No playable track found")?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let total_duration = codec_params.time_base.and_then(|tb| {
        codec_params.n_frames.map(|frames| {
            let time = tb.calc_time(frames);
            Duration::from_secs_f64(time.seconds as f64 + time.frac)
        })
    });

    let mut decoder = codecs
        .make(&codec_params, &DecoderOptions::default())
        .context("No decoder for track codec")?;

    if start_position > Duration::ZERO {
        let seek_to = SeekTo::Time {
            time: Time::from(start_position.as_secs_f64()),
            track_id: Some(track_id),
        };
        format.seek(SeekMode::Accurate, seek_to)?;
        decoder.reset();
    }

    // Decode packets until we get valid audio (handles decoder warm-up after seek)
    let (spec, first_samples) = loop {
        let packet = format.next_packet()?;

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let mut sample_buf = SampleBuffer::new(decoded.capacity() as u64, spec);
                sample_buf.copy_interleaved_ref(decoded);
                break (spec, sample_buf);
            }
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        }
    };

    let audio_output = AudioOutput::new(spec, clock)?;
    audio_output.write_samples(first_samples.samples());

    let sample_buf = SampleBuffer::new(first_samples.capacity() as u64, spec);

    Ok(PlaybackContext {
        format,
        decoder,
        track_id,
        audio_output,
        sample_buf,
        total_duration,
        draining: false,
    })
}
