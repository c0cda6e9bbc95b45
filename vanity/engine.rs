//! Suffix search over derived witness addresses.
//!
//! Every candidate runs the same pipeline: build `m/44/153/{account}/0/{index}`,
//! derive the child public key, encode its witness address, compare the
//! address tail. Candidates whose derivation degenerates are skipped;
//! malformed input and encoding failures abort the search.

use std::{
    ops::{Add, Range},
    str::FromStr,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use bytom::{BytomDerivationPath, BytomExtendedPublicKey, BytomFormat, BytomNetwork};
use rayon::prelude::*;
use tracing::{debug, info, trace, warn};
use vanity_model::{
    derivation_path::{ChildIndex, DerivationPathError},
    extended_public_key::ExtendedPublicKey,
};

use crate::{
    error::SearchError,
    result::SearchResult,
    sink::MatchSink,
    space::{IndexPairs, IndexSpace},
};

/// Linear positions claimed by a worker at a time.
const BATCH_SIZE: u128 = 1024;

/// Batches between progress reports.
const PROGRESS_INTERVAL: u64 = 256;

/// How the index space is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One thread, strictly increasing positions, matches in order.
    Sequential,
    /// A pool of workers claiming batches from a shared cursor. Zero threads
    /// means one per available CPU.
    Parallel { threads: usize },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Parallel { threads: 0 }
    }
}

/// Limits that end a search before the space is exhausted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Budget {
    pub max_matches: Option<u64>,
    pub max_candidates: Option<u64>,
    pub timeout: Option<Duration>,
}

/// Cancellation flag shared between a running search and its caller.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Exhausted,
    MatchLimit,
    CandidateLimit,
    Timeout,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    /// Candidates taken from the space, skipped ones included.
    pub evaluated: u128,
    pub skipped: u128,
    pub matches: u64,
    pub reason: StopReason,
    pub elapsed: Duration,
}

impl SearchSummary {
    pub fn rate(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.evaluated as f64 / seconds
        } else {
            0.0
        }
    }
}

/// What one candidate produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Match(SearchResult),
    Miss,
    Skipped,
}

pub struct SearchEngine<N: BytomNetwork> {
    xpub: BytomExtendedPublicKey<N>,
    suffix: String,
    format: BytomFormat,
}

impl<N: BytomNetwork> SearchEngine<N> {
    /// Parses the extended key once; a malformed key fails here and no
    /// candidate is ever evaluated.
    pub fn new(xpub: &str, suffix: &str, format: BytomFormat) -> Result<Self, SearchError> {
        let xpub = BytomExtendedPublicKey::from_str(xpub).map_err(SearchError::BadKeyFormat)?;
        Ok(Self::from_key(xpub, suffix, format))
    }

    pub fn from_key(xpub: BytomExtendedPublicKey<N>, suffix: &str, format: BytomFormat) -> Self {
        Self {
            xpub,
            suffix: suffix.to_owned(),
            format,
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Runs one candidate through the full five-level derivation.
    pub fn evaluate(&self, account: u64, address_index: u64) -> Result<Candidate, SearchError> {
        let path = BytomDerivationPath::bip44(account, address_index)?;
        let child = match self.xpub.derive(&path) {
            Ok(child) => child,
            Err(error) if error.is_degenerate() => {
                trace!(account, address_index, %error, "skipping degenerate candidate");
                return Ok(Candidate::Skipped);
            }
            Err(error) => return Err(SearchError::Derivation(error)),
        };
        self.check(&child, path)
    }

    /// Lazily yields matches in outer-major order on the calling thread.
    pub fn matches(&self, space: &IndexSpace) -> Matches<'_, N> {
        Matches {
            worker: Worker::new(self),
            pairs: space.iter(),
            failed: false,
        }
    }

    /// Walks `space` with `strategy` until it is exhausted or `budget` or
    /// `stop` ends it, streaming every match into `sink`.
    pub fn run<S: MatchSink>(
        &self,
        space: &IndexSpace,
        strategy: Strategy,
        budget: &Budget,
        stop: &StopSignal,
        sink: &S,
    ) -> Result<SearchSummary, SearchError> {
        let started = Instant::now();
        let limit = match budget.max_candidates {
            Some(max) => space.len().min(max as u128),
            None => space.len(),
        };
        let shared = Shared {
            space,
            limit,
            cursor: AtomicU64::new(0),
            matches: AtomicU64::new(0),
            max_matches: budget.max_matches,
            deadline: budget.timeout.map(|timeout| started + timeout),
            timed_out: AtomicBool::new(false),
            halt: AtomicBool::new(false),
            stop,
        };

        info!(
            suffix = %self.suffix,
            network = N::NAME,
            format = %self.format,
            candidates = %limit,
            expected_per_match = %expected_work(&self.suffix),
            "starting search"
        );

        let stats = match strategy {
            Strategy::Sequential => Worker::new(self).work(&shared, sink)?,
            Strategy::Parallel { threads } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|index| format!("vanity-worker-{}", index))
                    .build()?;
                let workers = pool.current_num_threads();
                debug!(workers, "spawned worker pool");
                pool.install(|| {
                    (0..workers)
                        .into_par_iter()
                        .map(|_| Worker::new(self).work(&shared, sink))
                        .try_reduce(WorkerStats::default, |a, b| Ok(a + b))
                })?
            }
        };

        let matches = shared.matches.load(Ordering::SeqCst);
        let reason = if shared.max_matches.map_or(false, |max| matches >= max) {
            StopReason::MatchLimit
        } else if stop.is_stopped() {
            StopReason::Cancelled
        } else if shared.timed_out.load(Ordering::SeqCst) {
            StopReason::Timeout
        } else if limit < space.len() {
            StopReason::CandidateLimit
        } else {
            StopReason::Exhausted
        };
        let summary = SearchSummary {
            evaluated: stats.evaluated,
            skipped: stats.skipped,
            matches: matches.min(budget.max_matches.unwrap_or(u64::MAX)),
            reason,
            elapsed: started.elapsed(),
        };

        info!(
            evaluated = %summary.evaluated,
            skipped = %summary.skipped,
            matches = summary.matches,
            reason = ?summary.reason,
            elapsed = ?summary.elapsed,
            rate = %format!("{:.0}/s", summary.rate()),
            "search finished"
        );
        Ok(summary)
    }

    fn check(
        &self,
        child: &BytomExtendedPublicKey<N>,
        path: BytomDerivationPath,
    ) -> Result<Candidate, SearchError> {
        let address = child.to_address(&self.format)?;
        if !address.as_str().ends_with(self.suffix.as_str()) {
            return Ok(Candidate::Miss);
        }
        match path {
            BytomDerivationPath::BIP44 {
                account,
                address_index,
            } => Ok(Candidate::Match(SearchResult {
                address: address.to_string(),
                account: account.to_index(),
                address_index: address_index.to_index(),
                path,
            })),
            BytomDerivationPath::BIP32(_) => {
                Err(SearchError::IndexRange(DerivationPathError::ExpectedBIP44Path))
            }
        }
    }
}

/// Expected number of candidates per match: each bech32 character carries
/// five bits.
pub fn expected_work(suffix: &str) -> u128 {
    u32::try_from(suffix.len())
        .ok()
        .and_then(|length| 1u128.checked_shl(length.saturating_mul(5)))
        .unwrap_or(u128::MAX)
}

struct Shared<'a> {
    space: &'a IndexSpace,
    limit: u128,
    cursor: AtomicU64,
    matches: AtomicU64,
    max_matches: Option<u64>,
    deadline: Option<Instant>,
    timed_out: AtomicBool,
    halt: AtomicBool,
    stop: &'a StopSignal,
}

impl<'a> Shared<'a> {
    fn halted(&self) -> bool {
        self.halt.load(Ordering::Relaxed) || self.stop.is_stopped()
    }

    /// Claims the next batch of positions, or `None` once the limit is reached.
    fn claim(&self) -> Option<(u64, Range<u128>)> {
        let batch = self.cursor.fetch_add(1, Ordering::Relaxed);
        let start = batch as u128 * BATCH_SIZE;
        if start >= self.limit {
            return None;
        }
        Some((batch, start..(start + BATCH_SIZE).min(self.limit)))
    }

    fn past_deadline(&self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.timed_out.store(true, Ordering::SeqCst);
                self.halt.store(true, Ordering::SeqCst);
                true
            }
            _ => false,
        }
    }

    /// Hands a match to the sink unless the match limit is already spent.
    fn emit<S: MatchSink>(&self, sink: &S, result: SearchResult) -> Result<(), SearchError> {
        let previous = self.matches.fetch_add(1, Ordering::SeqCst);
        if let Some(max) = self.max_matches {
            if previous >= max {
                self.halt.store(true, Ordering::SeqCst);
                return Ok(());
            }
            if previous + 1 == max {
                self.halt.store(true, Ordering::SeqCst);
            }
        }
        debug!(address = %result.address, "match");
        sink.accept(result)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct WorkerStats {
    evaluated: u128,
    skipped: u128,
}

impl Add for WorkerStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            evaluated: self.evaluated + other.evaluated,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Evaluates candidates, keeping the `m/44/153/{account}/0` key of the
/// current account so each candidate costs a single child derivation.
struct Worker<'e, N: BytomNetwork> {
    engine: &'e SearchEngine<N>,
    branch: Option<(u64, Option<BytomExtendedPublicKey<N>>)>,
}

impl<'e, N: BytomNetwork> Worker<'e, N> {
    fn new(engine: &'e SearchEngine<N>) -> Self {
        Self {
            engine,
            branch: None,
        }
    }

    fn branch(&mut self, account: u64) -> Result<Option<&BytomExtendedPublicKey<N>>, SearchError> {
        if self.branch.as_ref().map(|(cached, _)| *cached) != Some(account) {
            let indices = BytomDerivationPath::branch(ChildIndex::new(account)?);
            let key = match self.engine.xpub.derive_indices(&indices) {
                Ok(key) => Some(key),
                Err(error) if error.is_degenerate() => {
                    warn!(account, %error, "account branch is degenerate, skipping its addresses");
                    None
                }
                Err(error) => return Err(SearchError::Derivation(error)),
            };
            self.branch = Some((account, key));
        }
        Ok(self.branch.as_ref().and_then(|(_, key)| key.as_ref()))
    }

    fn evaluate(&mut self, account: u64, address_index: u64) -> Result<Candidate, SearchError> {
        let path = BytomDerivationPath::bip44(account, address_index)?;
        let child = match self.branch(account)? {
            Some(branch) => branch.derive_child(ChildIndex::new(address_index)?),
            None => return Ok(Candidate::Skipped),
        };
        match child {
            Ok(child) => self.engine.check(&child, path),
            Err(error) if error.is_degenerate() => {
                trace!(account, address_index, %error, "skipping degenerate candidate");
                Ok(Candidate::Skipped)
            }
            Err(error) => Err(SearchError::Derivation(error)),
        }
    }

    fn work<S: MatchSink>(mut self, shared: &Shared, sink: &S) -> Result<WorkerStats, SearchError> {
        let result = self.scan(shared, sink);
        if result.is_err() {
            shared.halt.store(true, Ordering::SeqCst);
        }
        result
    }

    fn scan<S: MatchSink>(
        &mut self,
        shared: &Shared,
        sink: &S,
    ) -> Result<WorkerStats, SearchError> {
        let mut stats = WorkerStats::default();
        while !shared.halted() && !shared.past_deadline() {
            let (batch, positions) = match shared.claim() {
                Some(claim) => claim,
                None => break,
            };
            debug!(batch, start = %positions.start, "claimed batch");
            for (account, address_index) in shared.space.iter_range(positions) {
                if shared.halted() {
                    break;
                }
                stats.evaluated += 1;
                match self.evaluate(account, address_index)? {
                    Candidate::Match(result) => shared.emit(sink, result)?,
                    Candidate::Miss => {}
                    Candidate::Skipped => stats.skipped += 1,
                }
            }
            if batch > 0 && batch % PROGRESS_INTERVAL == 0 {
                info!(
                    searched = %(batch as u128 * BATCH_SIZE),
                    of = %shared.limit,
                    matches = shared.matches.load(Ordering::Relaxed),
                    "progress"
                );
            }
        }
        Ok(stats)
    }
}

/// Lazy, sequential stream of matches. Stops after the first error.
pub struct Matches<'e, N: BytomNetwork> {
    worker: Worker<'e, N>,
    pairs: IndexPairs,
    failed: bool,
}

impl<'e, N: BytomNetwork> Iterator for Matches<'e, N> {
    type Item = Result<SearchResult, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for (account, address_index) in self.pairs.by_ref() {
            match self.worker.evaluate(account, address_index) {
                Ok(Candidate::Match(result)) => return Some(Ok(result)),
                Ok(Candidate::Miss) | Ok(Candidate::Skipped) => {}
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
        None
    }
}
