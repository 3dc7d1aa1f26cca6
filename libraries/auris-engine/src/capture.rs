//! CPAL capture backend
//!
//! The production [`AudioBackend`]: acquires the default input device (the
//! microphone), downmixes its feed to mono, and drives the correction
//! processor from the default output device's callback. Samples travel from
//! the input callback to the output callback through a bounded channel, so
//! neither real-time thread ever blocks on the other.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::backend::{ActiveStream, AudioBackend, SessionParams};
use crate::error::{EngineError, Result};
use crate::processor::{downmix_to_mono, CorrectionProcessor};

/// Capacity of the input-to-output sample queue (~170 ms at 48 kHz)
const FEED_QUEUE_LEN: usize = 8192;

/// Default-host CPAL backend
#[derive(Debug, Default)]
pub struct CpalBackend;

impl CpalBackend {
    /// Create a backend using the system default host.
    pub fn new() -> Self {
        Self
    }

    fn build_input_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        sample_format: SampleFormat,
        feed_tx: Sender<f32>,
    ) -> Result<Stream> {
        let channels = config.channels as usize;
        let err_fn = |err| warn!("input stream error: {err}");

        let stream = match sample_format {
            SampleFormat::F32 => {
                let mut mono = Vec::new();
                device.build_input_stream(
                    config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        downmix_to_mono(data, channels, &mut mono);
                        for &sample in &mono {
                            // Queue full means the output side stalled; drop
                            // rather than block the capture callback
                            let _ = feed_tx.try_send(sample);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::I16 => {
                let mut mono = Vec::new();
                let mut converted = Vec::new();
                device.build_input_stream(
                    config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        converted.resize(data.len(), 0.0);
                        for (out, &sample) in converted.iter_mut().zip(data.iter()) {
                            *out = f32::from(sample) / f32::from(i16::MAX);
                        }
                        downmix_to_mono(&converted, channels, &mut mono);
                        for &sample in &mono {
                            let _ = feed_tx.try_send(sample);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            other => {
                return Err(EngineError::Construction(format!(
                    "Unsupported input sample format: {other:?}"
                )))
            }
        };

        Ok(stream)
    }

    fn build_output_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        mut processor: CorrectionProcessor,
        feed_rx: Receiver<f32>,
    ) -> Result<Stream> {
        let mut mono = Vec::new();
        let stream = device.build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let frames = data.len() / 2;
                mono.resize(frames, 0.0);
                for sample in mono.iter_mut() {
                    // Underrun reads as silence, never stale data
                    *sample = feed_rx.try_recv().unwrap_or(0.0);
                }
                processor.process_block(&mono, data);
            },
            |err| warn!("output stream error: {err}"),
            None,
        )?;
        Ok(stream)
    }
}

impl AudioBackend for CpalBackend {
    fn open(&mut self, params: SessionParams) -> Result<Box<dyn ActiveStream>> {
        let host = cpal::default_host();

        let input_device = host
            .default_input_device()
            .ok_or_else(|| EngineError::Device("No input device available".into()))?;
        let output_device = host
            .default_output_device()
            .ok_or_else(|| EngineError::Device("No output device available".into()))?;

        let input_config = input_device.default_input_config()?;
        if input_config.channels() == 0 {
            return Err(EngineError::Construction(
                "Input device reports zero channels".into(),
            ));
        }

        let sample_rate = input_config.sample_rate().0;
        debug!(
            device = %input_device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate,
            channels = input_config.channels(),
            "acquired input device"
        );

        let processor = CorrectionProcessor::new(
            sample_rate,
            params.config.filter_q,
            &params.settings,
            params.left_enabled,
            params.right_enabled,
            params.commands,
            params.tap,
        );

        let (feed_tx, feed_rx) = bounded(FEED_QUEUE_LEN);

        let input_stream = Self::build_input_stream(
            &input_device,
            &input_config.config(),
            input_config.sample_format(),
            feed_tx,
        )?;

        // Stereo output at the capture rate keeps the graph resampler-free;
        // devices that cannot do this surface a Construction error.
        let output_config = StreamConfig {
            channels: 2,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };
        let output_stream =
            Self::build_output_stream(&output_device, &output_config, processor, feed_rx)?;

        input_stream.play()?;
        output_stream.play()?;

        Ok(Box::new(CpalSession {
            _input: input_stream,
            _output: output_stream,
        }))
    }
}

/// Running CPAL session; dropping it stops both streams and releases the
/// input device.
struct CpalSession {
    _input: Stream,
    _output: Stream,
}

// SAFETY: CPAL's Stream is !Send only because of a PhantomData marker; the
// underlying handles use thread-safe primitives. The session is moved between
// control threads, never shared.
#[allow(unsafe_code)]
unsafe impl Send for CpalSession {}

impl ActiveStream for CpalSession {}
