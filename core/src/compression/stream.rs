//! compression/stream.rs
//! Bounded streaming compression session over one backend compressor.
//!
//! State machine: `Idle -> Accepting -> Draining <-> Accepting -> Finishing -> Closed`.
//!
//! - Input and output are held in fixed-capacity [`StreamBuffer`]s.
//! - A short write by the sink keeps the unwritten bytes buffered and
//!   surfaces `CodecError::IncompleteWrite`; the next drain resumes at the
//!   first byte the sink did not take.
//! - The backend compressor is released exactly once, by `finish` or `close`
//!   (or when the session is dropped).
use std::io::{self, Write};

use crate::compression::buffer::StreamBuffer;
use crate::compression::provider::{validate_dictionary, CodecProvider};
use crate::compression::types::{CodecError, Compressor, Flush};
use crate::constants::STREAM_BUFFER_SIZE;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Accepting,
    Draining,
    Finishing,
    Closed,
}

pub struct StreamingSession<W: Write> {
    codec: &'static str,
    encoder: Option<Box<dyn Compressor>>,
    input: StreamBuffer,
    output: StreamBuffer,
    sink: W,
    state: SessionState,
    backend_done: bool,
    bytes_in: u64,
    bytes_out: u64,
}

impl<W: Write> StreamingSession<W> {
    /// Open a session with the default 64 KiB buffers.
    pub fn open(codec: &dyn CodecProvider, sink: W, quality: i32, dictionary: Option<&[u8]>) -> Result<Self, CodecError> {
        Self::with_capacity(codec, sink, quality, dictionary, STREAM_BUFFER_SIZE)
    }

    /// Open a session whose input and output buffers each hold `capacity` bytes.
    pub fn with_capacity(
        codec: &dyn CodecProvider,
        sink: W,
        quality: i32,
        dictionary: Option<&[u8]>,
        capacity: usize,
    ) -> Result<Self, CodecError> {
        codec.validate_quality(quality)?;
        let dictionary = validate_dictionary(codec.name(), dictionary)?;
        if capacity == 0 {
            return Err(CodecError::Configuration { codec: codec.name(), msg: "stream buffer capacity is zero".into() });
        }

        let mut encoder = codec.new_compressor(quality)?;
        if let Some(dict) = dictionary {
            encoder.set_dictionary(dict)?;
        }

        Ok(Self {
            codec: codec.name(),
            encoder: Some(encoder),
            input: StreamBuffer::with_capacity(capacity),
            output: StreamBuffer::with_capacity(capacity),
            sink,
            state: SessionState::Idle,
            backend_done: false,
            bytes_in: 0,
            bytes_out: 0,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Compressed bytes waiting for the sink.
    pub fn pending_output(&self) -> usize {
        self.output.len()
    }

    /// Caller bytes handed to the backend so far.
    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    /// Compressed bytes accepted by the sink so far.
    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Absorb `chunk`, compressing and draining as buffer space requires.
    ///
    /// Returns how many bytes of `chunk` were absorbed. On a stalled sink the
    /// error is `IncompleteWrite` whose `consumed` field carries that count;
    /// the caller retries with `chunk[consumed..]`.
    pub fn push(&mut self, chunk: &[u8]) -> Result<usize, CodecError> {
        self.ensure_open()?;
        if self.state == SessionState::Finishing {
            return Err(CodecError::StateError("push after finish started".into()));
        }

        if !self.output.is_empty() {
            self.state = SessionState::Draining;
            self.drain_pending()?;
        }

        let mut consumed = 0usize;
        loop {
            self.state = SessionState::Accepting;
            consumed += self.input.fill_from(&chunk[consumed..]);

            match self.pump(Flush::None) {
                Ok(()) => {}
                Err(CodecError::IncompleteWrite { written, pending, .. }) => {
                    self.state = SessionState::Draining;
                    return Err(CodecError::IncompleteWrite { consumed, written, pending });
                }
                Err(CodecError::Sink(e)) if consumed > 0 => {
                    // Absorbed bytes stay buffered; the sink error resurfaces on the next drain.
                    log::warn!("{} session: sink error after absorbing {} bytes: {}", self.codec, consumed, e);
                    self.state = SessionState::Draining;
                    return Ok(consumed);
                }
                Err(e) => return Err(e),
            }

            if consumed == chunk.len() {
                return Ok(consumed);
            }
        }
    }

    /// Hand pending compressed bytes to the sink.
    ///
    /// Returns the number of bytes the sink accepted during this call.
    pub fn drain(&mut self) -> Result<usize, CodecError> {
        self.ensure_open()?;
        let finishing = self.state == SessionState::Finishing;
        if !finishing {
            self.state = SessionState::Draining;
        }
        let written = self.drain_pending()?;
        if !finishing {
            self.state = SessionState::Accepting;
        }
        Ok(written)
    }

    /// Flush all buffered input, emit the stream trailer, drain everything
    /// and release the backend. Retry after `IncompleteWrite` to resume.
    pub fn finish(&mut self) -> Result<(), CodecError> {
        self.ensure_open()?;
        self.state = SessionState::Finishing;

        if !self.backend_done {
            self.pump(Flush::Finish)?;
        }
        self.drain_pending()?;
        self.sink.flush()?;

        self.release();
        Ok(())
    }

    /// Release the backend without finishing. The sink may hold an
    /// incomplete stream.
    pub fn close(&mut self) -> Result<(), CodecError> {
        self.ensure_open()?;
        self.release();
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), CodecError> {
        if self.state == SessionState::Closed {
            Err(CodecError::ClosedSession)
        } else {
            Ok(())
        }
    }

    fn release(&mut self) {
        self.encoder = None;
        self.input.clear();
        self.output.clear();
        self.state = SessionState::Closed;
    }

    /// Feed buffered input to the backend until it is consumed (`None`) or
    /// the trailer is complete (`Finish`).
    fn pump(&mut self, flush: Flush) -> Result<(), CodecError> {
        loop {
            if self.output.is_full() {
                self.drain_pending()?;
            }

            let encoder = self.encoder.as_mut().ok_or(CodecError::ClosedSession)?;
            let progress = encoder.compress(self.input.pending(), self.output.spare_mut(), flush)?;
            self.input.consume(progress.consumed);
            self.output.commit(progress.produced);
            self.bytes_in += progress.consumed as u64;

            match flush {
                Flush::None if self.input.is_empty() => return Ok(()),
                Flush::Finish if progress.done => {
                    self.backend_done = true;
                    return Ok(());
                }
                _ => {}
            }

            if progress.is_stalled() && !self.output.is_full() {
                return Err(CodecError::Resource { codec: self.codec, msg: "backend made no progress".into() });
            }
        }
    }

    fn drain_pending(&mut self) -> Result<usize, CodecError> {
        let mut written = 0usize;
        while !self.output.is_empty() {
            let offered = self.output.len();
            match self.sink.write(self.output.pending()) {
                Ok(n) => {
                    let n = n.min(offered);
                    self.output.consume(n);
                    self.bytes_out += n as u64;
                    written += n;
                    if n < offered {
                        return Err(CodecError::IncompleteWrite { consumed: 0, written, pending: self.output.len() });
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    return Err(CodecError::IncompleteWrite { consumed: 0, written, pending: self.output.len() });
                }
                Err(e) => return Err(CodecError::Sink(e)),
            }
        }
        Ok(written)
    }
}

impl<W: Write> Write for StreamingSession<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.push(buf) {
            Ok(n) => Ok(n),
            Err(CodecError::IncompleteWrite { consumed, .. }) if consumed > 0 => Ok(consumed),
            Err(CodecError::IncompleteWrite { .. }) => Err(io::ErrorKind::WouldBlock.into()),
            Err(CodecError::Sink(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.drain() {
            Ok(_) => self.sink.flush(),
            Err(CodecError::IncompleteWrite { .. }) => Err(io::ErrorKind::WouldBlock.into()),
            Err(CodecError::Sink(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    }
}
