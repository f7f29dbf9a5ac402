//! Execution of 3D plane kernels
//!
//! This module provides the dispatcher that runs a per-plane kernel over a
//! [`PlaneSchedule`], either on the calling thread or on a rayon thread pool.
//!
//! # Design Philosophy
//!
//! - **Disjoint Writes**: each plane visit receives its own `&mut` window of
//!   the output, carved out of `y` before any work starts
//! - **Pass Barriers**: passes run one after another; a pass completes only
//!   when every worker has joined
//! - **Interchangeable Paths**: sequential and parallel dispatch visit the
//!   same passes in the same order and produce identical bits

mod schedule;

pub use schedule::{split_windows, PlaneSchedule, PlaneWindow};

use crate::grid::Extent3;
use crate::{Error, Result};
#[cfg(feature = "parallel")]
use std::sync::Arc;
use tracing::trace;

/// Execution strategy for plane passes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Process planes on the calling thread
    Sequential,
    /// Process the planes of each pass on worker threads
    Parallel,
    /// Parallel when the machine has more than one core
    Auto,
}

impl Default for ExecutionStrategy {
    fn default() -> Self {
        Self::Auto
    }
}

/// Runs per-plane kernels pass by pass
///
/// Within a pass, workers claim planes by advancing a shared atomic cursor
/// by the schedule step, so no two workers ever hold overlapping windows.
#[derive(Clone, Debug)]
pub struct PlaneDispatcher {
    strategy: ExecutionStrategy,
    #[cfg(feature = "parallel")]
    thread_pool: Option<Arc<rayon::ThreadPool>>,
}

impl Default for PlaneDispatcher {
    fn default() -> Self {
        Self::new(ExecutionStrategy::default())
    }
}

impl PlaneDispatcher {
    /// Create a dispatcher with the given strategy and the global pool
    pub fn new(strategy: ExecutionStrategy) -> Self {
        Self {
            strategy,
            #[cfg(feature = "parallel")]
            thread_pool: None,
        }
    }

    /// Dispatcher that never leaves the calling thread
    pub fn sequential() -> Self {
        Self::new(ExecutionStrategy::Sequential)
    }

    /// Dispatcher that runs each pass on worker threads
    ///
    /// Without the `parallel` feature this degrades to sequential dispatch.
    pub fn parallel() -> Self {
        Self::new(ExecutionStrategy::Parallel)
    }

    /// Parallel dispatcher with a dedicated pool of `num_threads` workers
    #[cfg(feature = "parallel")]
    pub fn with_num_threads(num_threads: usize) -> Result<Self> {
        if num_threads == 0 {
            return Err(Error::InvalidParameter(
                "number of threads must be positive".to_string(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("diffusion-plane-{i}"))
            .build()
            .map_err(|e| Error::Execution(format!("Failed to create thread pool: {e}")))?;
        Ok(Self {
            strategy: ExecutionStrategy::Parallel,
            thread_pool: Some(Arc::new(pool)),
        })
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Whether passes will actually run on worker threads
    pub fn is_parallel(&self) -> bool {
        if !cfg!(feature = "parallel") {
            return false;
        }
        match self.strategy {
            ExecutionStrategy::Sequential => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Auto => num_cpus::get() > 1,
        }
    }

    /// Number of workers spawned per pass
    pub fn num_threads(&self) -> usize {
        if !self.is_parallel() {
            return 1;
        }
        #[cfg(feature = "parallel")]
        {
            match &self.thread_pool {
                Some(pool) => pool.current_num_threads(),
                None => rayon::current_num_threads(),
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            1
        }
    }

    /// Run `kernel` once for every plane of `schedule`
    ///
    /// `y` holds the output samples of a grid with extents `extent`. The
    /// kernel receives the write window of the visited plane and must not
    /// write outside it. The schedule and buffer length are validated before
    /// any plane is visited, so an error leaves `y` untouched.
    pub fn run<F>(
        &self,
        schedule: &PlaneSchedule,
        extent: Extent3,
        y: &mut [f32],
        kernel: F,
    ) -> Result<()>
    where
        F: Fn(&mut PlaneWindow<'_>) + Sync,
    {
        schedule.validate()?;
        if y.len() != extent.len() {
            return Err(Error::length_mismatch(extent.len(), y.len(), "plane dispatch output"));
        }
        let plane_len = extent.plane_len();
        let parallel = self.is_parallel();
        for pass in 0..schedule.step {
            let planes: Vec<usize> = schedule.pass(pass).collect();
            if planes.is_empty() {
                continue;
            }
            trace!(pass, planes = planes.len(), parallel, "dispatching plane pass");
            let mut windows = split_windows(&mut *y, plane_len, extent.n3, schedule, &planes)?;
            if parallel && windows.len() > 1 {
                self.run_pass_parallel(schedule.start + pass, schedule.step, windows, &kernel)?;
            } else {
                for window in windows.iter_mut() {
                    kernel(window);
                }
            }
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn run_pass_parallel<F>(
        &self,
        first_plane: usize,
        step: usize,
        windows: Vec<PlaneWindow<'_>>,
        kernel: &F,
    ) -> Result<()>
    where
        F: Fn(&mut PlaneWindow<'_>) + Sync,
    {
        use std::panic::{self, AssertUnwindSafe};
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::{Mutex, PoisonError};

        let n = windows.len();
        let stop = first_plane + n * step;
        // Each slot is claimed by exactly one worker.
        let slots: Vec<Mutex<PlaneWindow<'_>>> = windows.into_iter().map(Mutex::new).collect();
        let cursor = AtomicUsize::new(first_plane);
        let workers = self.num_threads().clamp(1, n);

        let worker = || loop {
            let i3 = cursor.fetch_add(step, Ordering::Relaxed);
            if i3 >= stop {
                break;
            }
            let mut window = slots[(i3 - first_plane) / step]
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            debug_assert_eq!(window.plane(), i3);
            kernel(&mut *window);
        };

        // The scope returns only after every worker has finished: this is the
        // barrier between passes.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| match &self.thread_pool {
            Some(pool) => pool.scope(|scope| {
                for _ in 0..workers {
                    scope.spawn(|_| worker());
                }
            }),
            None => rayon::scope(|scope| {
                for _ in 0..workers {
                    scope.spawn(|_| worker());
                }
            }),
        }));
        outcome.map_err(|payload| Error::worker_panicked(payload.as_ref()))
    }

    #[cfg(not(feature = "parallel"))]
    fn run_pass_parallel<F>(
        &self,
        _first_plane: usize,
        _step: usize,
        mut windows: Vec<PlaneWindow<'_>>,
        kernel: &F,
    ) -> Result<()>
    where
        F: Fn(&mut PlaneWindow<'_>) + Sync,
    {
        for window in windows.iter_mut() {
            kernel(window);
        }
        Ok(())
    }
}
