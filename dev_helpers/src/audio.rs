use log::{debug, info};
use portaudio as pa;

/// Capacity of each of the queues between the audio thread and the main thread.
const MESSAGE_QUEUE_CAPACITY: usize = 1000;

pub trait AudioProcessor<S> {
    /// Return false to stop the audio stream, true otherwise.
    fn process(
        &mut self,
        in_buffer: &[f32],
        out_buffer: &mut [f32],
        frame_count: usize,
        to_main_thread: &mut rtrb::Producer<S>,
        from_main_thread: &mut rtrb::Consumer<S>,
    ) -> bool;
}

/// Pushes `message` to `queue`. A full queue drops the message and logs it
/// at debug level. Returns true if the message was queued.
pub fn push_or_log<S>(queue: &mut rtrb::Producer<S>, message: S, description: &str) -> bool {
    match queue.push(message) {
        Ok(()) => true,
        Err(_) => {
            debug!("Message queue full, dropped {}", description);
            false
        }
    }
}

/// Mono duplex parameters for the default input and output devices.
fn default_duplex_settings(
    pa: &pa::PortAudio,
    sample_rate: f32,
    frames_per_buffer: u32,
) -> Result<pa::DuplexStreamSettings<f32, f32>, pa::Error> {
    let input_device = pa.default_input_device()?;
    let output_device = pa.default_output_device()?;
    let input_info = pa.device_info(input_device)?;
    info!(
        "Input device \"{}\", {} Hz, {} frames per buffer",
        input_info.name, sample_rate, frames_per_buffer
    );

    let latency = input_info.default_low_input_latency;
    let interleaved = true;
    Ok(pa::DuplexStreamSettings::new(
        pa::StreamParameters::new(input_device, 1, interleaved, latency),
        pa::StreamParameters::new(output_device, 1, interleaved, latency),
        sample_rate as f64,
        frames_per_buffer,
    ))
}

/// Runs an [AudioProcessor] on a mono duplex stream of the default devices,
/// with message queues to and from the main thread.
pub struct AudioEngine<S> {
    stream: pa::Stream<pa::NonBlocking, pa::Duplex<f32, f32>>,
    pub to_audio_thread: rtrb::Producer<S>,
    pub from_audio_thread: rtrb::Consumer<S>,
}

impl<S> AudioEngine<S>
where
    S: 'static,
{
    /// Opens and starts the stream. The processor is called with buffers of
    /// `frames_per_buffer` frames.
    pub fn new<T: AudioProcessor<S> + 'static>(
        sample_rate: f32,
        frames_per_buffer: u32,
        mut processor: T,
    ) -> Result<Self, pa::Error> {
        let (to_audio_thread, mut audio_inbox) = rtrb::RingBuffer::<S>::new(MESSAGE_QUEUE_CAPACITY).split();
        let (mut audio_outbox, from_audio_thread) = rtrb::RingBuffer::<S>::new(MESSAGE_QUEUE_CAPACITY).split();

        let pa = pa::PortAudio::new()?;
        let settings = default_duplex_settings(&pa, sample_rate, frames_per_buffer)?;
        let callback = move |pa::DuplexStreamCallbackArgs {
                                 in_buffer,
                                 out_buffer,
                                 frames,
                                 ..
                             }| {
            let keep_running =
                processor.process(in_buffer, out_buffer, frames, &mut audio_outbox, &mut audio_inbox);
            if keep_running {
                pa::Continue
            } else {
                pa::Complete
            }
        };

        let mut stream = pa.open_non_blocking_stream(settings, callback)?;
        stream.start()?;
        Ok(AudioEngine {
            stream,
            to_audio_thread,
            from_audio_thread,
        })
    }

    pub fn stop(&mut self) -> Result<(), pa::Error> {
        self.stream.stop()
    }
}
