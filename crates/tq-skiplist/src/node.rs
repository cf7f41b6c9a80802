#![expect(
    unsafe_code,
    reason = "reconstruct lifetimes erased for storage in an AtomicPtr, and assert that the \
              backing Herd outlives the references handed out of it",
)]

//! The arena-allocated node type: ordered skip-list pointers plus the FIFO chain pointers.

use std::ptr;
use std::sync::atomic::Ordering;

use bumpalo_herd::Member;

use crate::height::MAX_HEIGHT;
use crate::maybe_loom::AtomicPtr;


/// A node reference, or the absence of one, with its lifetime erased for storage inside an
/// [`AtomicPtr`].
pub(crate) type Link<'herd> = Option<&'herd Node<'herd>>;

/// An [`AtomicPtr`]-backed cell holding a [`Link`], with the lifetime parameter erased so that a
/// fixed-size array of these can be stored as a field of [`Node`] itself.
///
/// # Invariants relied on by unsafe code
/// The wrapped pointer is either null, or was obtained by type-erasing a `&'herd Node<'herd>`
/// allocated out of a [`bumpalo_herd::Herd`] that has not been dropped or moved since.
#[derive(Debug)]
pub(crate) struct AtomicLink(AtomicPtr<()>);

impl AtomicLink {
    #[inline]
    pub(crate) fn null() -> Self {
        Self(AtomicPtr::new(ptr::null_mut()))
    }

    #[inline]
    pub(crate) fn is_null(&self, order: Ordering) -> bool {
        self.0.load(order).is_null()
    }

    /// # Safety
    /// If this cell holds a non-null pointer, the [`bumpalo_herd::Herd`] that the referenced
    /// node (and everything reachable from it) was allocated in must still be valid for at least
    /// `'herd`, starting from when the pointer was stored.
    #[inline]
    pub(crate) unsafe fn load<'herd>(&self, order: Ordering) -> Link<'herd> {
        let raw = self.0.load(order);
        if raw.is_null() {
            None
        } else {
            // SAFETY: the caller guarantees the backing Herd outlives 'herd, and `raw` was
            // produced from a `&Node<'_>` by `Self::store`, so the pointee is a valid `Node`.
            Some(unsafe { &*raw.cast::<Node<'herd>>() })
        }
    }

    #[inline]
    pub(crate) fn store(&self, link: Link<'_>, order: Ordering) {
        let raw = link.map_or_else(ptr::null_mut, |node| {
            ptr::from_ref(node).cast::<()>().cast_mut()
        });
        self.0.store(raw, order);
    }
}

impl Default for AtomicLink {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

/// One entry in the two-queue skip list, allocated out of the arena and never moved or mutated
/// except through the atomic cells below.
///
/// `node_size` is the byte-accounting unit used by hot/cold budgeting (`spec.md` §3, invariant 4):
/// the node's own header plus its height-dependent pointer tail plus the encoded entry length.
#[derive(Debug)]
pub(crate) struct Node<'herd> {
    entry:     &'herd [u8],
    node_size: usize,
    skips:     &'herd [AtomicLink],
    follow:    AtomicLink,
    precede:   AtomicLink,
}

impl<'herd> Node<'herd> {
    /// Allocate a new node of the given `height`, whose entry bytes are already resident in the
    /// arena (`entry`). `node_size` must already include `entry.len()`.
    pub(crate) fn new(
        member:    &Member<'herd>,
        height:    usize,
        entry:     &'herd [u8],
        node_size: usize,
    ) -> &'herd Self {
        debug_assert!(height >= 1 && height <= MAX_HEIGHT, "node height out of range");

        let skips = member.alloc_slice_fill_default(height);
        member.alloc(Self {
            entry,
            node_size,
            skips,
            follow: AtomicLink::null(),
            precede: AtomicLink::null(),
        })
    }

    #[inline]
    pub(crate) fn entry(&self) -> &'herd [u8] {
        self.entry
    }

    #[inline]
    pub(crate) fn node_size(&self) -> usize {
        self.node_size
    }

    #[inline]
    pub(crate) fn height(&self) -> usize {
        self.skips.len()
    }

    /// # Safety
    /// See [`AtomicLink::load`]: the backing `Herd` must outlive `'herd`.
    #[inline]
    pub(crate) unsafe fn load_skip(&self, level: usize, order: Ordering) -> Link<'herd> {
        // SAFETY: forwarded to the caller's obligation.
        unsafe { self.skips[level].load(order) }
    }

    pub(crate) fn store_skip(&self, level: usize, link: Link<'_>, order: Ordering) {
        self.skips[level].store(link, order);
    }

    /// # Safety
    /// See [`AtomicLink::load`]: the backing `Herd` must outlive `'herd`.
    #[inline]
    pub(crate) unsafe fn load_follow(&self, order: Ordering) -> Link<'herd> {
        // SAFETY: forwarded to the caller's obligation.
        unsafe { self.follow.load(order) }
    }

    pub(crate) fn store_follow(&self, link: Link<'_>, order: Ordering) {
        self.follow.store(link, order);
    }

    /// # Safety
    /// See [`AtomicLink::load`]: the backing `Herd` must outlive `'herd`.
    #[inline]
    pub(crate) unsafe fn load_precede<'a>(&self, order: Ordering) -> Link<'a> {
        // SAFETY: forwarded to the caller's obligation.
        unsafe { self.precede.load(order) }
    }

    pub(crate) fn store_precede(&self, link: Link<'_>, order: Ordering) {
        self.precede.store(link, order);
    }
}
