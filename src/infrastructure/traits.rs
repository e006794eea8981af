//! I/O boundary traits for testability
//!
//! Time and identifier minting are the only ambient inputs of the split
//! model. Abstracting them keeps services deterministic under test.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{MemberId, SplitId};

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Mints identifiers unique within a session.
pub trait IdGenerator: Send + Sync {
    fn next_split_id(&self) -> SplitId;

    fn next_member_id(&self) -> MemberId;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Local wall-clock date.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_split_id(&self) -> SplitId {
        SplitId::from(Uuid::new_v4().to_string())
    }

    fn next_member_id(&self) -> MemberId {
        MemberId::from(Uuid::new_v4().to_string())
    }
}

/// Monotonic counters: `s1, s2, ...` for splits, `m1, m2, ...` for members.
#[derive(Debug, Default)]
pub struct SequentialIds {
    splits: AtomicU64,
    members: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_split_id(&self) -> SplitId {
        let n = self.splits.fetch_add(1, Ordering::Relaxed) + 1;
        SplitId::from(format!("s{n}"))
    }

    fn next_member_id(&self) -> MemberId {
        let n = self.members.fetch_add(1, Ordering::Relaxed) + 1;
        MemberId::from(format!("m{n}"))
    }
}

// ============================================================
// TEST IMPLEMENTATIONS
// ============================================================

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
