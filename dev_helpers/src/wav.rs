use std::path::Path;

/// Decoded samples of a WAV file, interleaved if there is more than one channel.
pub struct WavData {
    pub channel_count: u16,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl WavData {
    /// The samples of the first channel.
    pub fn first_channel(&self) -> Vec<f32> {
        self.samples
            .iter()
            .step_by(self.channel_count.max(1) as usize)
            .cloned()
            .collect()
    }
}

/// Reads a 16 bit integer or 32 bit float WAV file, scaling integer samples to [-1, 1].
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<WavData, hound::Error> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1. / (i16::MAX as f32);
            reader
                .samples::<i16>()
                .map(|sample| sample.map(|sample| (sample as f32) * scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(WavData {
        channel_count: spec.channels,
        sample_rate: spec.sample_rate,
        samples,
    })
}
