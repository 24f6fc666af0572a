#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    payload: TestPayload,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, payload: TestPayload) -> Self {
        Self { name, group, payload }
    }

    pub fn small(name: &'static str, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Small, payload)
    }

    pub fn normal(name: &'static str, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Normal, payload)
    }

    pub fn large(name: &'static str, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Large, payload)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn payload(&self) -> &TestPayload {
        &self.payload
    }
}

/// A response body of `body_size` bytes, of which the headers announce `declared` bytes.
#[derive(Debug, Copy, Clone)]
pub struct TestPayload {
    body_size: usize,
    declared: Option<u64>,
}

impl TestPayload {
    pub const fn new(body_size: usize, declared: Option<u64>) -> Self {
        Self { body_size, declared }
    }

    pub const fn unbounded(body_size: usize) -> Self {
        Self::new(body_size, None)
    }

    pub fn body_size(&self) -> usize {
        self.body_size
    }

    pub fn declared(&self) -> Option<u64> {
        self.declared
    }

    /// Bytes the emitter is expected to write for this payload.
    pub fn expected_len(&self) -> u64 {
        let size = self.body_size as u64;
        self.declared.map_or(size, |declared| declared.min(size))
    }

    pub fn content(&self) -> Vec<u8> {
        const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
        (0..self.body_size).map(|i| ALPHABET[i % ALPHABET.len()]).collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}
