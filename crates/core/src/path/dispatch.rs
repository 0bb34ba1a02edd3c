//! Queued, budgeted path requests. Callers hand in a start, an end and a
//! callback from any thread; searches run synchronously inside `drain`, and
//! callbacks always fire from a later `drain` than the one that ran the
//! search, so callers never observe a result mid-request.

use std::collections::VecDeque;
use std::sync::Mutex;

use glam::Vec2;

use super::astar::{PathFinder, SearchSettings};
use super::grid::PathGrid;
use super::smooth::PathPlan;

/// Searches run per drain. One keeps a tick's worst case bounded to a single
/// grid-sized search regardless of how many requests are queued.
pub const MAX_ACTIVE_SEARCHES: usize = 1;

#[derive(Debug)]
pub enum PathOutcome {
    Found(PathPlan),
    Failed,
}

impl PathOutcome {
    pub fn success(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn plan(&self) -> Option<&PathPlan> {
        match self {
            Self::Found(plan) => Some(plan),
            Self::Failed => None,
        }
    }
}

type Callback = Box<dyn FnOnce(PathOutcome) + Send>;

struct PendingRequest {
    start: Vec2,
    end: Vec2,
    on_complete: Callback,
}

struct FinishedRequest {
    outcome: PathOutcome,
    on_complete: Callback,
}

/// What a single `drain` call did, mostly for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub callbacks_fired: usize,
    pub searches_run: usize,
}

pub struct PathRequestDispatcher {
    finder: PathFinder,
    settings: SearchSettings,
    requests: Mutex<VecDeque<PendingRequest>>,
    results: Mutex<VecDeque<FinishedRequest>>,
}

impl PathRequestDispatcher {
    pub fn new(grid: &PathGrid, settings: SearchSettings) -> Self {
        Self {
            finder: PathFinder::new(grid),
            settings,
            requests: Mutex::new(VecDeque::new()),
            results: Mutex::new(VecDeque::new()),
        }
    }

    /// Enqueues a request. Safe from any thread; the callback runs on the
    /// thread that calls `drain`.
    pub fn request(&self, start: Vec2, end: Vec2, on_complete: impl FnOnce(PathOutcome) + Send + 'static) {
        self.requests
            .lock()
            .expect("request queue lock poisoned")
            .push_back(PendingRequest { start, end, on_complete: Box::new(on_complete) });
    }

    pub fn pending(&self) -> usize {
        self.requests.lock().expect("request queue lock poisoned").len()
    }

    /// Tick entry point. Fires every finished callback from earlier drains in
    /// request order, then runs up to [`MAX_ACTIVE_SEARCHES`] queued searches
    /// whose results wait for the next drain.
    pub fn drain(&mut self, grid: &mut PathGrid) -> DrainReport {
        let mut report = DrainReport::default();

        let finished: Vec<FinishedRequest> = self
            .results
            .lock()
            .expect("result queue lock poisoned")
            .drain(..)
            .collect();
        for finished in finished {
            (finished.on_complete)(finished.outcome);
            report.callbacks_fired += 1;
        }

        while report.searches_run < MAX_ACTIVE_SEARCHES {
            let Some(pending) = self.requests.lock().expect("request queue lock poisoned").pop_front()
            else {
                break;
            };
            let outcome = match self.finder.find_path(grid, pending.start, pending.end, &self.settings)
            {
                Some(plan) => PathOutcome::Found(plan),
                None => PathOutcome::Failed,
            };
            self.results
                .lock()
                .expect("result queue lock poisoned")
                .push_back(FinishedRequest { outcome, on_complete: pending.on_complete });
            report.searches_run += 1;
        }

        report
    }
}
