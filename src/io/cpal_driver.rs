//! cpal-backed implementation of the [`AudioDriver`] contract.
//!
//! cpal hands us interleaved f32 frames at whatever channel count the
//! device wants; the engine renders mono S16. The output callback renders
//! into a preallocated scratch block, converts once, and duplicates the
//! mono signal across channels. Completion is reported to the controlling
//! thread through an rtrb ring buffer so the audio thread never blocks.

use std::fmt;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, RingBuffer};

use crate::engine::Playback;
use crate::io::AudioDriver;

/// Frames rendered per engine call inside the output callback.
const RENDER_BLOCK: usize = 512;

#[derive(Debug)]
pub enum DriverError {
    NoOutputDevice,
    ConfigEnumeration(cpal::SupportedStreamConfigsError),
    SampleRateUnsupported { requested: u32 },
    BuildStream(cpal::BuildStreamError),
    PlayStream(cpal::PlayStreamError),
    PauseStream(cpal::PauseStreamError),
    NotPlaying,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::NoOutputDevice => write!(f, "no default audio output device"),
            DriverError::ConfigEnumeration(err) => {
                write!(f, "could not enumerate output configs: {err}")
            }
            DriverError::SampleRateUnsupported { requested } => {
                write!(f, "device does not support {requested} Hz f32 output")
            }
            DriverError::BuildStream(err) => write!(f, "could not build stream: {err}"),
            DriverError::PlayStream(err) => write!(f, "could not start stream: {err}"),
            DriverError::PauseStream(err) => write!(f, "could not pause stream: {err}"),
            DriverError::NotPlaying => write!(f, "no stream is playing"),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::ConfigEnumeration(err) => Some(err),
            DriverError::BuildStream(err) => Some(err),
            DriverError::PlayStream(err) => Some(err),
            DriverError::PauseStream(err) => Some(err),
            _ => None,
        }
    }
}

pub struct CpalDriver {
    device: cpal::Device,
    config: cpal::StreamConfig,
    stream: Option<cpal::Stream>,
    finished: Option<Consumer<Playback>>,
}

impl CpalDriver {
    /// Open the default output device at the requested sample rate.
    pub fn new(sample_rate: u32) -> Result<Self, DriverError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(DriverError::NoOutputDevice)?;

        let config = device
            .supported_output_configs()
            .map_err(DriverError::ConfigEnumeration)?
            .filter(|range| range.sample_format() == cpal::SampleFormat::F32)
            .find(|range| {
                range.min_sample_rate().0 <= sample_rate
                    && sample_rate <= range.max_sample_rate().0
            })
            .map(|range| range.with_sample_rate(cpal::SampleRate(sample_rate)))
            .ok_or(DriverError::SampleRateUnsupported {
                requested: sample_rate,
            })?;

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            finished: None,
        })
    }

    /// Block the calling thread until the render callback reports
    /// completion.
    pub fn wait_until_complete(&mut self) {
        let Some(finished) = &mut self.finished else {
            return;
        };
        while finished.pop().is_err() {
            std::thread::sleep(Duration::from_millis(50));
        }
    }
}

impl AudioDriver for CpalDriver {
    type Error = DriverError;

    fn play<F>(&mut self, mut render: F) -> Result<(), DriverError>
    where
        F: FnMut(&mut [i16]) -> Playback + Send + 'static,
    {
        let channels = self.config.channels as usize;
        let (mut done_tx, done_rx) = RingBuffer::<Playback>::new(1);
        let mut scratch = vec![0i16; RENDER_BLOCK];
        let mut song_over = false;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(RENDER_BLOCK);
                        let block = &mut scratch[..frames];

                        if song_over {
                            // The contract says we stop asking; the device
                            // keeps ticking, so it gets silence.
                            block.fill(0);
                        } else if render(block) == Playback::Complete {
                            song_over = true;
                            let _ = done_tx.push(Playback::Complete);
                        }

                        let offset = frames_written * channels;
                        for (i, &sample) in block.iter().enumerate() {
                            let value = sample as f32 / 32_768.0;
                            for ch in 0..channels {
                                data[offset + i * channels + ch] = value;
                            }
                        }
                        frames_written += frames;
                    }
                },
                move |err| log::error!("audio stream error: {err}"),
                None,
            )
            .map_err(DriverError::BuildStream)?;

        stream.play().map_err(DriverError::PlayStream)?;
        self.stream = Some(stream);
        self.finished = Some(done_rx);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), DriverError> {
        let stream = self.stream.as_ref().ok_or(DriverError::NotPlaying)?;
        stream.pause().map_err(DriverError::PauseStream)
    }

    fn resume(&mut self) -> Result<(), DriverError> {
        let stream = self.stream.as_ref().ok_or(DriverError::NotPlaying)?;
        stream.play().map_err(DriverError::PlayStream)
    }
}
