use crate::codec::INIT_HEAD_SIZE;
use crate::emit::ResponseEmitter;
use crate::protocol::ConfigError;
use crate::protocol::body::DEFAULT_CHUNK_SIZE;
use crate::utils::ensure;

/// Tunables of a [`ResponseEmitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitterConfig {
    chunk_size: usize,
    head_buffer_capacity: usize,
}

impl EmitterConfig {
    /// Bytes moved per read/write call while copying a body.
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Initial capacity of the buffer the head is encoded into.
    #[inline]
    pub fn head_buffer_capacity(&self) -> usize {
        self.head_buffer_capacity
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, head_buffer_capacity: INIT_HEAD_SIZE }
    }
}

#[derive(Debug, Clone)]
pub struct ResponseEmitterBuilder {
    config: EmitterConfig,
}

impl ResponseEmitterBuilder {
    pub(crate) fn new() -> Self {
        Self { config: EmitterConfig::default() }
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    pub fn head_buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.head_buffer_capacity = capacity;
        self
    }

    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the chunk size or the head buffer capacity is zero.
    pub fn build(self) -> Result<ResponseEmitter, ConfigError> {
        ensure!(self.config.chunk_size > 0, ConfigError::ZeroChunkSize);
        ensure!(self.config.head_buffer_capacity > 0, ConfigError::ZeroHeadBuffer);
        Ok(ResponseEmitter::with_config(self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let emitter = ResponseEmitter::builder().build().unwrap();
        assert_eq!(emitter.config().chunk_size(), 4096);
        assert_eq!(emitter.config().head_buffer_capacity(), 4 * 1024);
    }

    #[test]
    fn test_rejects_zero() {
        assert!(matches!(ResponseEmitter::builder().chunk_size(0).build(), Err(ConfigError::ZeroChunkSize)));
        assert!(matches!(
            ResponseEmitter::builder().head_buffer_capacity(0).build(),
            Err(ConfigError::ZeroHeadBuffer)
        ));

        let emitter = ResponseEmitter::builder().chunk_size(16).build().unwrap();
        assert_eq!(emitter.config().chunk_size(), 16);
    }
}
