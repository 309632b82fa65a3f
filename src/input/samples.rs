use std::io::{ErrorKind, Read};

use super::IqSample;
use crate::error::RenderResult;
use crate::format::SampleType;

/// Reads interleaved little-endian complex samples from a byte source
pub struct IqSampleReader<R: Read> {
    reader: R,
    sample_type: SampleType,
    buffer: Vec<u8>,
}

impl<R: Read> IqSampleReader<R> {
    pub fn new(reader: R, sample_type: SampleType) -> Self {
        Self {
            reader,
            sample_type,
            buffer: Vec::new(),
        }
    }

    /// Read `num_samples` complex samples.
    /// Returns None once the source cannot supply a full chunk.
    pub fn read_chunk(&mut self, num_samples: usize) -> RenderResult<Option<Vec<IqSample>>> {
        let bytes_per_sample = self.sample_type.bytes_per_sample();
        self.buffer.resize(num_samples * bytes_per_sample, 0);

        match self.reader.read_exact(&mut self.buffer) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let samples = self
            .buffer
            .chunks_exact(bytes_per_sample)
            .map(|chunk| {
                let (i, q) = chunk.split_at(bytes_per_sample / 2);
                IqSample::new(decode(self.sample_type, i), decode(self.sample_type, q))
            })
            .collect();

        Ok(Some(samples))
    }
}

/// Decode one component, normalizing integer types to roughly [-1.0, 1.0].
fn decode(sample_type: SampleType, b: &[u8]) -> f32 {
    match sample_type {
        SampleType::Uint8 => (b[0] as f32 - 127.5) / 127.5,
        SampleType::Int8 => (b[0] as i8) as f32 / 128.0,
        SampleType::Uint16 => (u16::from_le_bytes([b[0], b[1]]) as f32 - 32767.5) / 32767.5,
        SampleType::Int16 => i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0,
        SampleType::Uint32 => {
            let v = u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64;
            ((v - 2147483647.5) / 2147483647.5) as f32
        }
        SampleType::Int32 => i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32 / 2147483648.0,
        SampleType::Float32 => f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        SampleType::Float64 => {
            f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_float32_pairs() {
        let mut bytes = Vec::new();
        for v in [0.5f32, -0.25, 1.0, 0.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let mut reader = IqSampleReader::new(bytes.as_slice(), SampleType::Float32);
        let chunk = reader.read_chunk(2).unwrap().unwrap();
        assert_eq!(chunk.len(), 2);
        assert_eq!((chunk[0].i, chunk[0].q), (0.5, -0.25));
        assert_eq!((chunk[1].i, chunk[1].q), (1.0, 0.0));
        assert!(reader.read_chunk(1).unwrap().is_none());
    }

    #[test]
    fn normalizes_int16() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&i16::MIN.to_le_bytes());
        bytes.extend_from_slice(&16384i16.to_le_bytes());
        let mut reader = IqSampleReader::new(bytes.as_slice(), SampleType::Int16);
        let chunk = reader.read_chunk(1).unwrap().unwrap();
        assert_eq!(chunk[0].i, -1.0);
        assert_eq!(chunk[0].q, 0.5);
    }

    #[test]
    fn centers_uint8_around_zero() {
        let bytes = [0u8, 255];
        let mut reader = IqSampleReader::new(&bytes[..], SampleType::Uint8);
        let chunk = reader.read_chunk(1).unwrap().unwrap();
        assert_eq!(chunk[0].i, -1.0);
        assert_eq!(chunk[0].q, 1.0);
    }

    #[test]
    fn short_read_ends_the_stream() {
        let bytes = [0u8; 6];
        let mut reader = IqSampleReader::new(&bytes[..], SampleType::Float32);
        assert!(reader.read_chunk(1).unwrap().is_none());
    }
}
