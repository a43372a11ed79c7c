//! Inverse search
//!
//! Finds the parameter vectors whose simulated curves best reproduce a
//! drawn target curve. The search is a bounded brute-force sweep:
//!
//! 1. The control points are densified into a target [`ResponseCurve`].
//! 2. A [`CandidateGenerator`] enumerates the coarse parameter grid.
//! 3. Worker threads each score a contiguous slice of the enumeration and
//!    keep a private best-`k` buffer.
//! 4. The per-worker lists are merged into the final [`SearchResult`].
//!
//! Workers check a [`CancellationToken`] between batches, so a newer
//! request can preempt a search that is still running.

mod grid;
mod rank;
mod score;

pub use grid::{generate, CandidateGenerator, CoarseGrid};
pub use rank::{merge_top_k, rank};
pub use score::{Candidate, CandidateId, Scorer};

use serde::Serialize;
use std::ops::Range;
use std::thread;
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::model::ResponseCurve;
use crate::target::TargetCurve;
use rank::TopK;

/// Best-matching candidates of one search, ascending by error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// At most `top_k` candidates, best first
    pub candidates: Vec<Candidate>,
    /// Number of candidates scored
    pub evaluated: usize,
}

impl SearchResult {
    /// Number of candidates returned
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True when nothing was scored
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Lowest-error candidate
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Look up a candidate by its identity
    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Candidates, best first
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }
}

impl IntoIterator for SearchResult {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

/// Search for the parameters that best match drawn control points, using
/// the default configuration
pub fn invert(
    control_points: &[f64],
    min_voltage: f64,
    max_voltage: f64,
) -> EngineResult<SearchResult> {
    InverseSearch::new(EngineConfig::default())?.invert(control_points, min_voltage, max_voltage)
}

/// A configured inverse search.
///
/// Each search can be preempted through its own request token (see
/// [`InverseSearch::invert_with_cancellation`]). The instance token from
/// [`InverseSearch::cancellation_token`] stops every search on the instance,
/// current and future, and is shared by clones.
#[derive(Debug, Clone)]
pub struct InverseSearch {
    config: EngineConfig,
    cancel: CancellationToken,
}

impl InverseSearch {
    /// Validate `config` and build a search over it
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// Use an externally owned instance token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Handle that cancels every search run by this instance
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Tunables this search runs with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Densify the control points and search the coarse grid over
    /// `[min_voltage, max_voltage]`
    pub fn invert(
        &self,
        control_points: &[f64],
        min_voltage: f64,
        max_voltage: f64,
    ) -> EngineResult<SearchResult> {
        self.invert_with_cancellation(
            control_points,
            min_voltage,
            max_voltage,
            &CancellationToken::new(),
        )
    }

    /// Like [`InverseSearch::invert`], abandoned when `request` is cancelled.
    ///
    /// Cancelling `request` affects only this search; later searches on the
    /// same instance run normally.
    pub fn invert_with_cancellation(
        &self,
        control_points: &[f64],
        min_voltage: f64,
        max_voltage: f64,
        request: &CancellationToken,
    ) -> EngineResult<SearchResult> {
        let grid = CoarseGrid::new(&self.config, min_voltage, max_voltage)?;
        let target = TargetCurve::new(control_points.to_vec(), &self.config)?.densify()?;
        self.run_with_cancellation(&grid, &target, request)
    }

    /// Score every candidate of `generator` against `target`.
    ///
    /// Fails with `InvalidParameter` on the first out-of-range candidate a
    /// worker meets.
    pub fn run<G: CandidateGenerator>(
        &self,
        generator: &G,
        target: &ResponseCurve,
    ) -> EngineResult<SearchResult> {
        self.run_with_cancellation(generator, target, &CancellationToken::new())
    }

    /// Like [`InverseSearch::run`], abandoned when `request` is cancelled
    pub fn run_with_cancellation<G: CandidateGenerator>(
        &self,
        generator: &G,
        target: &ResponseCurve,
        request: &CancellationToken,
    ) -> EngineResult<SearchResult> {
        let total = generator.len();
        let workers = self.config.worker_count().clamp(1, total.max(1));
        let chunk = total.div_ceil(workers);
        let scorer = Scorer::from_config(&self.config);
        let cancel = Cancellation {
            instance: &self.cancel,
            request,
        };

        tracing::debug!(
            "Inverse search: {} candidates across {} workers (batch {})",
            total,
            workers,
            self.config.batch_size
        );

        let partials: Vec<EngineResult<Vec<Candidate>>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|w| {
                    let start = (w * chunk).min(total);
                    let end = (start + chunk).min(total);
                    let worker = Worker {
                        config: &self.config,
                        scorer: &scorer,
                        target,
                        cancel,
                    };
                    scope.spawn(move || worker.scan(generator, start..end))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(partial) => partial,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        let mut lists = Vec::with_capacity(partials.len());
        for partial in partials {
            match partial {
                Ok(list) => lists.push(list),
                Err(e) => {
                    tracing::warn!("Inverse search abandoned: {e}");
                    return Err(e);
                }
            }
        }

        let candidates = merge_top_k(lists, self.config.top_k);
        if let Some(best) = candidates.first() {
            tracing::info!(
                "Inverse search scored {} candidates, best {} error {:.3}",
                total,
                best.id,
                best.error
            );
        }
        Ok(SearchResult {
            candidates,
            evaluated: total,
        })
    }
}

/// Instance and per-search tokens; either one stops the search
#[derive(Clone, Copy)]
struct Cancellation<'a> {
    instance: &'a CancellationToken,
    request: &'a CancellationToken,
}

impl Cancellation<'_> {
    fn is_cancelled(&self) -> bool {
        self.instance.is_cancelled() || self.request.is_cancelled()
    }
}

/// Read-only state shared by one search's workers
#[derive(Clone, Copy)]
struct Worker<'a> {
    config: &'a EngineConfig,
    scorer: &'a Scorer,
    target: &'a ResponseCurve,
    cancel: Cancellation<'a>,
}

impl Worker<'_> {
    /// Score one slice of the enumeration, checking for cancellation
    /// between batches
    fn scan<G: CandidateGenerator>(
        &self,
        generator: &G,
        range: Range<usize>,
    ) -> EngineResult<Vec<Candidate>> {
        let mut top = TopK::new(self.config.top_k);
        let mut start = range.start;
        while start < range.end {
            if self.cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            let end = (start + self.config.batch_size).min(range.end);
            for index in start..end {
                let params = generator.candidate(index);
                params.validate(self.config)?;
                top.push(self.scorer.score(CandidateId(index as u64), &params, self.target));
            }
            start = end;
        }
        Ok(top.into_sorted())
    }
}
