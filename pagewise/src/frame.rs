//! Render frames and post-frame callbacks.
//!
//! Work that must not run while a render pass is building slots (such as
//! asking a source for the next page) is queued with
//! [`FrameScheduler::add_post_frame_callback`] and runs when the frame ends.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use log::trace;

/// Callback run once after the frame it was queued in.
pub type PostFrameCallback = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct FrameInner {
    queue: Mutex<VecDeque<PostFrameCallback>>,
    frame: AtomicU64,
    in_frame: AtomicBool,
}

/// Shared frame clock with a post-frame callback queue.
///
/// Clones share the same queue and frame counter.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    inner: Arc<FrameInner>,
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("frame", &self.frame())
            .field("in_frame", &self.in_frame())
            .field("pending", &self.pending())
            .finish()
    }
}

impl FrameScheduler {
    /// Create a scheduler at frame 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a render pass and return its frame number (starting at 1).
    pub fn begin_frame(&self) -> u64 {
        self.inner.in_frame.store(true, Ordering::SeqCst);
        self.inner.frame.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Close the current render pass and run the callbacks queued so far.
    ///
    /// Callbacks run in the order they were queued. Callbacks queued while
    /// this runs are left for the next frame. Returns how many callbacks ran.
    pub fn end_frame(&self) -> usize {
        self.inner.in_frame.store(false, Ordering::SeqCst);

        let batch: Vec<PostFrameCallback> = match self.inner.queue.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        };

        let count = batch.len();
        for callback in batch {
            callback();
        }
        if count > 0 {
            trace!("Frame {} ran {} post-frame callbacks", self.frame(), count);
        }
        count
    }

    /// Queue `callback` to run when the current frame ends.
    pub fn add_post_frame_callback(&self, callback: impl FnOnce() + Send + 'static) {
        match self.inner.queue.lock() {
            Ok(mut queue) => queue.push_back(Box::new(callback)),
            Err(poisoned) => poisoned.into_inner().push_back(Box::new(callback)),
        }
    }

    /// Number of the most recently started frame.
    pub fn frame(&self) -> u64 {
        self.inner.frame.load(Ordering::SeqCst)
    }

    /// Returns `true` between `begin_frame` and `end_frame`.
    pub fn in_frame(&self) -> bool {
        self.inner.in_frame.load(Ordering::SeqCst)
    }

    /// Number of callbacks waiting for the end of the frame.
    pub fn pending(&self) -> usize {
        self.inner.queue.lock().map(|q| q.len()).unwrap_or(0)
    }
}

/// Runs detached asynchronous work such as page fetches.
pub trait Spawn: Send + Sync {
    /// Start `task`. The caller never waits for it.
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

impl Spawn for tokio::runtime::Handle {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        drop(tokio::runtime::Handle::spawn(self, task));
    }
}

/// Runs each task to completion on the calling thread.
///
/// Meant for headless tools and tests where sources resolve immediately.
/// Must not be used from inside an async runtime worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockingSpawner;

impl Spawn for BlockingSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        futures::executor::block_on(task);
    }
}

/// Frame scheduler and task spawner shared by the views of one render loop.
#[derive(Clone)]
pub struct RenderLoop {
    scheduler: FrameScheduler,
    spawner: Arc<dyn Spawn>,
}

impl fmt::Debug for RenderLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderLoop")
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl RenderLoop {
    /// Create a render loop that spawns fetches with `spawner`.
    pub fn new(spawner: impl Spawn + 'static) -> Self {
        Self {
            scheduler: FrameScheduler::new(),
            spawner: Arc::new(spawner),
        }
    }

    /// Render loop backed by the current tokio runtime.
    ///
    /// Panics outside a tokio runtime, like `tokio::spawn`.
    pub fn tokio() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }

    /// Render loop that completes every fetch before `end_frame` returns.
    pub fn blocking() -> Self {
        Self::new(BlockingSpawner)
    }

    /// The shared frame scheduler.
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// The shared spawner.
    pub fn spawner(&self) -> &Arc<dyn Spawn> {
        &self.spawner
    }

    /// Open a render pass.
    pub fn begin_frame(&self) -> u64 {
        self.scheduler.begin_frame()
    }

    /// Close the render pass and run its post-frame callbacks.
    pub fn end_frame(&self) -> usize {
        self.scheduler.end_frame()
    }
}
