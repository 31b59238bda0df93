//! Identifiers tying copy buttons to the code they copy.
//!
//! Ids are unique within one render pass by construction (a counter) and
//! unlikely to collide across passes on the same page (a random 9-character
//! base36 prefix, 36^9 possibilities). They are never used for security
//! decisions.
use rand::RngExt;

/// 36^9, the keyspace of the random prefix.
const PREFIX_SPACE: u64 = 101_559_956_668_416;
const PREFIX_LEN: usize = 9;

#[allow(
  clippy::cast_possible_truncation,
  reason = "Remainder is always below 36"
)]
fn to_base36(mut n: u64) -> String {
  const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
  if n == 0 {
    return "0".to_string();
  }
  let mut buf = Vec::with_capacity(13);
  while n > 0 {
    buf.push(DIGITS[(n % 36) as usize]);
    n /= 36;
  }
  buf.reverse();
  buf.into_iter().map(char::from).collect()
}

/// Per-render-pass id source.
#[derive(Debug, Clone)]
pub struct IdGenerator {
  prefix:  String,
  counter: u64,
}

impl Default for IdGenerator {
  fn default() -> Self {
    Self::new()
  }
}

impl IdGenerator {
  /// Create a generator with a fresh random prefix.
  #[must_use]
  pub fn new() -> Self {
    let raw = rand::rng().random::<u64>() % PREFIX_SPACE;
    Self::with_prefix(&format!("{:0>PREFIX_LEN$}", to_base36(raw)))
  }

  /// Create a generator with a fixed prefix, for reproducible output.
  #[must_use]
  pub fn with_prefix(prefix: &str) -> Self {
    Self {
      prefix:  prefix.to_string(),
      counter: 0,
    }
  }

  /// Next id for a code block, e.g. `code-k3j2h1x9a-0`.
  pub fn next_block_id(&mut self) -> String {
    self.next_id("code")
  }

  /// Next id for an inline code span, e.g. `inline-k3j2h1x9a-1`.
  pub fn next_inline_id(&mut self) -> String {
    self.next_id("inline")
  }

  fn next_id(&mut self, kind: &str) -> String {
    let id = format!("{kind}-{}-{}", self.prefix, to_base36(self.counter));
    self.counter += 1;
    id
  }
}
