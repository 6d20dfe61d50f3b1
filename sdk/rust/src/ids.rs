//! Record identifiers and creation timestamps.

use chrono::{DateTime, SubsecRound, Utc};
use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Kind of record an identifier is minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Purchase,
    Lead,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Purchase => "PURCH",
            IdKind::Lead => "LEAD",
        }
    }
}

/// Current time at millisecond precision, the resolution records are stamped with.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Generate `<PREFIX>_<unix millis>_<base36 suffix>` for a record created at `at`.
///
/// Uniqueness is probabilistic: two ids minted in the same millisecond only
/// collide if their random suffixes also match.
pub fn generate_id(kind: IdKind, at: DateTime<Utc>) -> String {
    format!("{}_{}_{}", kind.prefix(), at.timestamp_millis(), random_suffix())
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}
