//! Pagination behavior of the list and grid views.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::BoxFuture;
use pagewise::prelude::*;

// ============================================================================
// Fixtures
// ============================================================================

/// Source whose snapshot is set by the test and which records requests.
#[derive(Default)]
struct ScriptedSource {
    value: Mutex<PagedValue<String, char>>,
    initial_loads: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl ScriptedSource {
    fn new(value: PagedValue<String, char>) -> Arc<Self> {
        let source = Self::default();
        *source.value.lock().unwrap() = value;
        Arc::new(source)
    }

    fn set(&self, value: PagedValue<String, char>) {
        *self.value.lock().unwrap() = value;
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PagedSource for ScriptedSource {
    type Key = String;
    type Item = char;

    fn value(&self) -> PagedValue<String, char> {
        self.value.lock().unwrap().clone()
    }

    async fn initial_load(&self) {
        self.initial_loads.fetch_add(1, Ordering::SeqCst);
    }

    async fn load_more(&self, key: String) {
        self.requested.lock().unwrap().push(key);
    }
}

/// Spawner that holds tasks until the test runs them, keeping fetches in
/// flight across frames.
#[derive(Clone, Default)]
struct QueuedSpawner {
    tasks: Arc<Mutex<Vec<BoxFuture<'static, ()>>>>,
}

impl QueuedSpawner {
    fn run_all(&self) -> usize {
        let tasks: Vec<_> = self.tasks.lock().unwrap().drain(..).collect();
        let count = tasks.len();
        for task in tasks {
            futures::executor::block_on(task);
        }
        count
    }
}

impl Spawn for QueuedSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        self.tasks.lock().unwrap().push(task);
    }
}

/// Renders every node as a short label.
struct Labels;

impl PagedBuilder<char> for Labels {
    type Node = String;

    fn item(&self, _cx: &BuildContext<'_>, items: &[char], index: usize) -> String {
        items[index].to_string()
    }

    fn empty(&self, _cx: &BuildContext<'_>) -> String {
        "empty".to_string()
    }

    fn loading(&self, _cx: &BuildContext<'_>) -> String {
        "loading".to_string()
    }

    fn error(&self, _cx: &BuildContext<'_>, error: &PageError) -> String {
        format!("error: {}", error)
    }

    fn load_more_indicator(&self, _cx: &BuildContext<'_>) -> String {
        "more".to_string()
    }

    fn load_more_error(&self, _cx: &BuildContext<'_>, error: &PageError) -> String {
        format!("retry: {}", error)
    }
}

impl SeparatedBuilder<char> for Labels {
    fn separator(&self, _cx: &BuildContext<'_>, _index: usize) -> String {
        "-".to_string()
    }
}

fn letters(count: usize) -> Vec<char> {
    ('a'..='z').take(count).collect()
}

fn page(count: usize, next: Option<&str>, error: Option<&str>) -> PagedValue<String, char> {
    PagedValue::Data {
        items: letters(count),
        next_page_key: next.map(str::to_string),
        error: error.map(PageError::new),
    }
}

fn labels(frame: &ListFrame<String>) -> Vec<(usize, &str)> {
    frame.slots.iter().map(|(i, s)| (*i, s.as_str())).collect()
}

// ============================================================================
// Scheduling
// ============================================================================

#[test]
fn test_trigger_slot_schedules_one_deferred_fetch() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, Some("p2"), None));
    let list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);
    let mut host = WindowedList::new(20).unwrap();

    render_loop.begin_frame();
    let frame = list.render(&mut host).into_items().unwrap();

    // Slot 7 scheduled the fetch, but nothing is requested mid-frame.
    assert!(list.binding().is_fetch_in_flight());
    assert!(source.requested().is_empty());
    assert_eq!(render_loop.scheduler().pending(), 1);

    assert_eq!(frame.slot_count, 11);
    assert_eq!(frame.slots.last(), Some(&(10, "more".to_string())));

    assert_eq!(render_loop.end_frame(), 1);
    assert_eq!(source.requested(), vec!["p2".to_string()]);
    assert!(!list.binding().is_fetch_in_flight());
}

#[test]
fn test_slots_before_trigger_do_not_schedule() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, Some("p2"), None));
    let list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);
    let mut host = WindowedList::new(5).unwrap();

    render_loop.begin_frame();
    let frame = list.render(&mut host).into_items().unwrap();
    render_loop.end_frame();

    assert_eq!(labels(&frame), vec![(0, "a"), (1, "b"), (2, "c"), (3, "d"), (4, "e")]);
    assert!(source.requested().is_empty());
}

#[test]
fn test_in_flight_fetch_blocks_rescheduling() {
    let spawner = QueuedSpawner::default();
    let render_loop = RenderLoop::new(spawner.clone());
    let source = ScriptedSource::new(page(10, Some("p2"), None));
    let list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);
    let mut host = WindowedList::new(20).unwrap();
    spawner.run_all();

    render_loop.begin_frame();
    list.render(&mut host);
    assert_eq!(render_loop.end_frame(), 1);
    assert!(list.binding().is_fetch_in_flight());

    // An unrelated re-render hits slot 7 again while the fetch is pending.
    render_loop.begin_frame();
    list.render(&mut host);
    assert_eq!(render_loop.scheduler().pending(), 0);
    assert_eq!(render_loop.end_frame(), 0);

    assert_eq!(spawner.run_all(), 1);
    assert_eq!(source.requested(), vec!["p2".to_string()]);
    assert!(!list.binding().is_fetch_in_flight());
}

#[test]
fn test_trailing_error_skips_fetch_and_clears_latch() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, Some("p2"), Some("offline")));
    let list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);
    let mut host = WindowedList::new(20).unwrap();

    render_loop.begin_frame();
    let frame = list.render(&mut host).into_items().unwrap();
    assert_eq!(frame.slots.last(), Some(&(10, "retry: offline".to_string())));
    assert!(list.binding().is_fetch_in_flight());

    render_loop.end_frame();
    assert!(source.requested().is_empty());
    assert!(!list.binding().is_fetch_in_flight());
}

#[test]
fn test_error_checked_when_callback_runs() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, Some("p2"), None));
    let list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);
    let mut host = WindowedList::new(20).unwrap();

    render_loop.begin_frame();
    list.render(&mut host);
    source.set(page(10, Some("p2"), Some("offline")));
    render_loop.end_frame();

    assert!(source.requested().is_empty());
    assert!(!list.binding().is_fetch_in_flight());
}

#[test]
fn test_cleared_error_lets_fetch_resume() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, Some("p2"), Some("offline")));
    let list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);
    let mut host = WindowedList::new(20).unwrap();

    render_loop.begin_frame();
    list.render(&mut host);
    render_loop.end_frame();
    assert!(source.requested().is_empty());

    source.set(page(10, Some("p2"), None));
    render_loop.begin_frame();
    list.render(&mut host);
    render_loop.end_frame();
    assert_eq!(source.requested(), vec!["p2".to_string()]);
}

#[test]
fn test_trigger_beyond_item_count_never_fires() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(2, Some("p2"), None));
    let list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);
    let mut host = WindowedList::new(20).unwrap();

    render_loop.begin_frame();
    let frame = list.render(&mut host).into_items().unwrap();
    assert_eq!(render_loop.end_frame(), 0);

    assert_eq!(labels(&frame), vec![(0, "a"), (1, "b"), (2, "more")]);
    assert!(source.requested().is_empty());
}

#[test]
fn test_custom_trigger_index() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, Some("p2"), None));
    let config = PagedViewConfig::new().load_more_trigger_index(1);
    let list = PagedListView::with_config(Arc::clone(&source), Labels, config, &render_loop).unwrap();
    let mut host = WindowedList::new(10).unwrap();

    // Slot 9 is the trigger; the footer stays off screen.
    render_loop.begin_frame();
    list.render(&mut host);
    render_loop.end_frame();
    assert_eq!(source.requested(), vec!["p2".to_string()]);
}

#[test]
fn test_unbounded_cache_extent_rejected() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, Some("p2"), None));
    let config = PagedViewConfig::new().scroll(ScrollConfig::new().cache_extent(f32::INFINITY));

    let list = PagedListView::with_config(Arc::clone(&source), Labels, config.clone(), &render_loop);
    assert!(matches!(list, Err(PagerError::InvalidConfig { field: "cache_extent", .. })));
    let grid = PagedGridView::with_config(source, Labels, GridDelegate::fixed(3), config, &render_loop);
    assert!(matches!(grid, Err(PagerError::InvalidConfig { field: "cache_extent", .. })));
}

#[test]
fn test_large_cache_extent_renders_whole_list() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, Some("p2"), None));
    let config = PagedViewConfig::new().scroll(ScrollConfig::new().cache_extent(f32::MAX));
    let list = PagedListView::with_config(Arc::clone(&source), Labels, config, &render_loop).unwrap();
    let mut host = WindowedList::new(2).unwrap();
    host.scroll_to(4);

    render_loop.begin_frame();
    let frame = list.render(&mut host).into_items().unwrap();
    render_loop.end_frame();

    assert_eq!(frame.slots.len(), 11);
    assert_eq!(source.requested(), vec!["p2".to_string()]);
}

#[test]
fn test_set_config_validates_like_constructors() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, Some("p2"), None));
    let mut list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);
    assert!(list.config().validate().is_ok());

    let bad = PagedViewConfig::new().scroll(ScrollConfig::new().cache_extent(-1.0));
    assert!(list.set_config(bad).is_err());
    assert_eq!(list.config(), &PagedViewConfig::default());
}

// ============================================================================
// States
// ============================================================================

#[test]
fn test_empty_items_bypass_host() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(0, Some("p2"), None));
    let list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);
    let mut host = WindowedList::new(20).unwrap();

    render_loop.begin_frame();
    let frame = list.render(&mut host);
    assert_eq!(frame, PagedFrame::Empty("empty".to_string()));
    assert_eq!(render_loop.end_frame(), 0);
    assert!(source.requested().is_empty());
}

#[test]
fn test_exhausted_list_has_no_footer() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, None, None));
    let list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);
    let mut host = WindowedList::new(20).unwrap();

    render_loop.begin_frame();
    let frame = list.render(&mut host).into_items().unwrap();
    assert_eq!(render_loop.end_frame(), 0);

    assert_eq!(frame.slot_count, 10);
    assert_eq!(frame.slots.last(), Some(&(9, "j".to_string())));
    assert_eq!(frame.separators.len(), 9);
}

#[test]
fn test_loading_and_initial_error_views() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(PagedValue::Loading);
    let list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);
    let mut host = WindowedList::new(20).unwrap();

    assert_eq!(list.render(&mut host), PagedFrame::Loading("loading".to_string()));

    source.set(PagedValue::Error(PageError::new("unreachable")));
    assert_eq!(
        list.render(&mut host),
        PagedFrame::Error("error: unreachable".to_string())
    );
    assert_eq!(render_loop.end_frame(), 0);
}

// ============================================================================
// Rebinding
// ============================================================================

#[test]
fn test_rebind_resets_latch_and_loads_once() {
    let spawner = QueuedSpawner::default();
    let render_loop = RenderLoop::new(spawner.clone());
    let first = ScriptedSource::new(page(10, Some("p2"), None));
    let mut list = PagedListView::new(Arc::clone(&first), Labels, &render_loop);
    let mut host = WindowedList::new(20).unwrap();
    spawner.run_all();
    assert_eq!(first.initial_loads.load(Ordering::SeqCst), 1);

    render_loop.begin_frame();
    list.render(&mut host);
    render_loop.end_frame();
    assert!(list.binding().is_fetch_in_flight());

    let second = ScriptedSource::new(PagedValue::Loading);
    assert!(list.set_source(Arc::clone(&second)));
    assert!(!list.binding().is_fetch_in_flight());

    // Old fetch plus the new session's initial load.
    assert_eq!(spawner.run_all(), 2);
    assert_eq!(second.initial_loads.load(Ordering::SeqCst), 1);
    assert_eq!(first.initial_loads.load(Ordering::SeqCst), 1);
    assert!(!list.binding().is_fetch_in_flight());
}

#[test]
fn test_rebind_same_source_keeps_session() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, Some("p2"), None));
    let mut list = PagedListView::new(Arc::clone(&source), Labels, &render_loop);

    assert!(!list.set_source(Arc::clone(&source)));
    assert_eq!(source.initial_loads.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Grid
// ============================================================================

#[test]
fn test_grid_shares_trigger_rules() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(page(10, Some("p2"), None));
    let grid = PagedGridView::new(Arc::clone(&source), Labels, GridDelegate::fixed(3), &render_loop).unwrap();
    let mut host = WindowedGrid::new(10, 300.0).unwrap();

    render_loop.begin_frame();
    let frame = grid.render(&mut host).into_items().unwrap();
    assert!(grid.binding().is_fetch_in_flight());
    render_loop.end_frame();

    assert_eq!(frame.rows.len(), 4);
    assert_eq!(frame.rows[3], vec![(9, "j".to_string()), (10, "more".to_string())]);
    assert_eq!(source.requested(), vec!["p2".to_string()]);
}

#[test]
fn test_grid_rejects_zero_columns() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(PagedValue::Loading);
    let result = PagedGridView::new(source, Labels, GridDelegate::fixed(0), &render_loop);
    assert!(matches!(result, Err(PagerError::ZeroCrossAxisCount)));
}

#[test]
fn test_grid_semantic_child_count_forwarded() {
    let render_loop = RenderLoop::blocking();
    let source = ScriptedSource::new(PagedValue::Loading);
    let grid = PagedGridView::new(source, Labels, GridDelegate::fixed(2), &render_loop)
        .unwrap()
        .semantic_child_count(40);
    assert_eq!(grid.layout().semantic_child_count, Some(40));
}

// ============================================================================
// Notifier end to end
// ============================================================================

/// Serves the alphabet five letters at a time, keyed by offset.
struct Alphabet;

#[async_trait]
impl PageFetcher<usize, char> for Alphabet {
    async fn fetch_page(&self, key: Option<usize>) -> Result<Page<usize, char>, PageError> {
        let offset = key.unwrap_or(0);
        let all = letters(26);
        let end = (offset + 5).min(all.len());
        let page = Page::new(all[offset..end].to_vec());
        Ok(if end < all.len() { page.with_next_key(end) } else { page })
    }
}

impl PagedBuilder<char> for Alphabet {
    type Node = char;

    fn item(&self, _cx: &BuildContext<'_>, items: &[char], index: usize) -> char {
        items[index]
    }

    fn empty(&self, _cx: &BuildContext<'_>) -> char {
        '0'
    }

    fn loading(&self, _cx: &BuildContext<'_>) -> char {
        '~'
    }

    fn error(&self, _cx: &BuildContext<'_>, _error: &PageError) -> char {
        '!'
    }

    fn load_more_indicator(&self, _cx: &BuildContext<'_>) -> char {
        '+'
    }

    fn load_more_error(&self, _cx: &BuildContext<'_>, _error: &PageError) -> char {
        '?'
    }
}

impl SeparatedBuilder<char> for Alphabet {
    fn separator(&self, _cx: &BuildContext<'_>, _index: usize) -> char {
        ' '
    }
}

#[test]
fn test_scrolling_loads_every_page() {
    let render_loop = RenderLoop::blocking();
    let notifier = Arc::new(PagedValueNotifier::<usize, char, _>::new(Alphabet));
    let list = PagedListView::new(Arc::clone(&notifier), Alphabet, &render_loop);
    let mut host = WindowedList::new(4).unwrap();

    for _ in 0..20 {
        render_loop.begin_frame();
        list.render(&mut host);
        render_loop.end_frame();
        host.scroll_to_end();
    }

    let value = notifier.value();
    assert_eq!(value.items(), letters(26).as_slice());
    assert!(!value.has_more());

    render_loop.begin_frame();
    let frame = list.render(&mut host).into_items().unwrap();
    render_loop.end_frame();
    assert_eq!(frame.slot_count, 26);
    assert_eq!(frame.slots.last(), Some(&(25, 'z')));
}
