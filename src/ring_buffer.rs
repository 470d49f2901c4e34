//! A fixed capacity sample FIFO for exactly one writer and one reader.
//!
//! The writer (typically an audio capture callback) and the reader (the
//! analysis thread) may live on different threads. Neither side takes a
//! lock: the read and write cursors are published with acquire/release
//! atomics by [`rtrb`], so samples are visible to the reader before the
//! write cursor advancing past them is.
//!
//! Writes never block and never grow the buffer. A write that does not fit
//! is truncated, dropping the newest samples.

use rtrb::chunks::ReadChunk;
use rtrb::{Consumer, Producer, RingBuffer};

/// Creates a sample ring buffer holding at most `capacity` samples and
/// returns its writing and reading ends.
pub fn sample_ring_buffer(capacity: usize) -> (SampleProducer, SampleConsumer) {
    let (producer, consumer) = RingBuffer::new(capacity);
    (
        SampleProducer { producer, capacity },
        SampleConsumer { consumer, capacity },
    )
}

/// The writing end of a sample ring buffer.
pub struct SampleProducer {
    producer: Producer<f32>,
    capacity: usize,
}

impl SampleProducer {
    /// Copies as many of `samples` as fit into the free space and returns the
    /// number of samples written. Samples that don't fit are dropped.
    pub fn write(&mut self, samples: &[f32]) -> usize {
        let count = samples.len().min(self.producer.slots());
        if count == 0 {
            return 0;
        }
        match self.producer.write_chunk_uninit(count) {
            Ok(chunk) => chunk.fill_from_iter(samples[..count].iter().copied()),
            Err(_) => 0,
        }
    }

    /// The number of samples that can currently be written.
    pub fn available_to_write(&self) -> usize {
        self.producer.slots()
    }

    /// The number of samples currently waiting to be read. The reader may
    /// concurrently consume samples, so this is an upper bound.
    pub fn available_to_read(&self) -> usize {
        self.capacity - self.producer.slots()
    }

    /// The total number of samples the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// The reading end of a sample ring buffer.
pub struct SampleConsumer {
    consumer: Consumer<f32>,
    capacity: usize,
}

impl SampleConsumer {
    /// Returns a view of all currently readable samples without copying or
    /// consuming them. Returns an empty region if nothing is readable.
    pub fn peek_readable(&mut self) -> ReadableRegion<'_> {
        let count = self.consumer.slots();
        ReadableRegion {
            chunk: self.consumer.read_chunk(count).ok(),
        }
    }

    /// Advances the read cursor by at most `count` samples, freeing their space
    /// for the writer. Returns the number of samples consumed.
    pub fn consume(&mut self, count: usize) -> usize {
        self.peek_readable().consume(count)
    }

    /// The number of samples currently readable. The writer may concurrently
    /// add samples, so this is a lower bound.
    pub fn available_to_read(&self) -> usize {
        self.consumer.slots()
    }

    /// The total number of samples the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// The samples readable at the time of [`SampleConsumer::peek_readable`].
/// Dropping the region without consuming leaves the samples in the buffer.
pub struct ReadableRegion<'a> {
    chunk: Option<ReadChunk<'a, f32>>,
}

impl<'a> ReadableRegion<'a> {
    /// The number of readable samples.
    pub fn len(&self) -> usize {
        self.chunk.as_ref().map_or(0, |chunk| chunk.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The readable samples, oldest first, as two contiguous slices. The
    /// second slice is non-empty only if the region wraps around the end
    /// of the underlying storage.
    pub fn as_slices(&self) -> (&[f32], &[f32]) {
        match &self.chunk {
            Some(chunk) => chunk.as_slices(),
            None => (&[][..], &[][..]),
        }
    }

    /// Copies the newest `dst.len()` samples of the region into `dst` and
    /// returns the number of samples copied. If the region is shorter than
    /// `dst`, nothing is copied and 0 is returned.
    pub fn copy_latest(&self, dst: &mut [f32]) -> usize {
        let count = dst.len();
        if self.len() < count {
            return 0;
        }
        let (first, second) = self.as_slices();
        if second.len() >= count {
            dst.copy_from_slice(&second[second.len() - count..]);
        } else {
            let from_first = count - second.len();
            dst[..from_first].copy_from_slice(&first[first.len() - from_first..]);
            dst[from_first..].copy_from_slice(second);
        }
        count
    }

    /// Consumes the oldest `count` samples of the region (or all of them if
    /// the region is shorter). Returns the number of samples consumed.
    pub fn consume(self, count: usize) -> usize {
        match self.chunk {
            Some(chunk) => {
                let count = count.min(chunk.len());
                chunk.commit(count);
                count
            }
            None => 0,
        }
    }

    /// Consumes the whole region. Returns the number of samples consumed.
    pub fn consume_all(self) -> usize {
        match self.chunk {
            Some(chunk) => {
                let count = chunk.len();
                chunk.commit_all();
                count
            }
            None => 0,
        }
    }
}
