//! Observable values and the recompute bus.
//!
//! An [`Observable`] is a shared, single-threaded cell that notifies its
//! subscribers when its value changes. The [`RecomputeBus`] collects what
//! changed as [`Dirty`] flags and releases them once per batch, so any number
//! of input changes inside one batch lead to a single layout pass.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

bitflags::bitflags! {
    /// Inputs of the layout pass that changed since the last pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Dirty: u16 {
        const SCROLL = 1 << 0;
        const VIEWPORT = 1 << 1;
        const SIZES = 1 << 2;
        const DATA = 1 << 3;
        const COLUMNS = 1 << 4;
        const SORT = 1 << 5;
        const FILTER = 1 << 6;
        const FOCUS = 1 << 7;
        const CONFIG = 1 << 8;
    }
}

impl Dirty {
    /// Changes that require the derived row list to be rebuilt.
    pub const ROWS: Self = Self::DATA.union(Self::SORT).union(Self::FILTER);
}

/// Handle returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: T,
    version: u64,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
}

/// Shared value with change notification. Clones share the same value.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Read the value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Number of changes so far.
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Store `value` and notify subscribers. Setting an equal value is a
    /// no-op; returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        let listeners = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return false;
            }
            inner.value = value.clone();
            inner.version += 1;
            inner
                .listeners
                .iter()
                .map(|(_, l)| Rc::clone(l))
                .collect::<Vec<_>>()
        };
        // the borrow is released so listeners may read or subscribe
        for listener in listeners {
            listener(&value);
        }
        true
    }

    /// Apply `f` to a copy of the value and store the result.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut value = self.get();
        f(&mut value);
        self.set(value)
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(sid, _)| *sid != id);
        inner.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Cloneable handle that marks inputs dirty on a [`RecomputeBus`]. Used from
/// observable subscriptions.
#[derive(Debug, Clone, Default)]
pub struct DirtyMarker {
    pending: Rc<Cell<Dirty>>,
}

impl DirtyMarker {
    pub fn mark(&self, flags: Dirty) {
        self.pending.set(self.pending.get() | flags);
    }
}

/// Coalesces input changes into layout passes.
#[derive(Debug, Default)]
pub struct RecomputeBus {
    marker: DirtyMarker,
    depth: usize,
    passes: u64,
}

impl RecomputeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self, flags: Dirty) {
        self.marker.mark(flags);
    }

    pub fn marker(&self) -> DirtyMarker {
        self.marker.clone()
    }

    pub fn pending(&self) -> Dirty {
        self.marker.pending.get()
    }

    pub fn in_batch(&self) -> bool {
        self.depth > 0
    }

    pub fn begin_batch(&mut self) {
        self.depth += 1;
    }

    /// Close a batch. Returns true when the outermost batch closed.
    pub fn end_batch(&mut self) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth == 0
    }

    /// Take the pending flags for a pass, unless a batch is still open or
    /// nothing changed.
    pub fn take(&mut self) -> Option<Dirty> {
        if self.in_batch() {
            return None;
        }
        let pending = self.marker.pending.replace(Dirty::empty());
        if pending.is_empty() {
            return None;
        }
        self.passes += 1;
        Some(pending)
    }

    /// Drop `flags` from the pending set without running a pass. Used for
    /// changes a pass makes to its own inputs.
    pub fn settle(&self, flags: Dirty) {
        let pending = self.marker.pending.get();
        self.marker.pending.set(pending.difference(flags));
    }

    /// Number of passes released so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}
