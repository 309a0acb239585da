use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

/// Binding-site configuration errors, failed fast at the point of use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingRenderFn,
    MissingKeyFn,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRenderFn => f.write_str("binding site has no render function"),
            Self::MissingKeyFn => f.write_str("binding site has no key function"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Render function supplied by the view-binding layer:
/// `(item, index) -> fragment`.
pub type RenderFn<T, V> = Arc<dyn Fn(&T, usize) -> V + Send + Sync>;

/// Key function supplied by the view-binding layer:
/// `(item, index) -> stable identity`.
pub type SiteKeyFn<T, K> = Arc<dyn Fn(&T, usize) -> K + Send + Sync>;

/// Per-site view-binding configuration.
///
/// The engine stores these and hands them back on request; it never invokes
/// the render function itself. The view-binding layer does, for exactly the
/// indices the range-change protocol names.
pub struct BindingConfig<T, V, K = u64> {
    render: Option<RenderFn<T, V>>,
    key: Option<SiteKeyFn<T, K>>,
}

impl<T, V, K> BindingConfig<T, V, K> {
    pub fn new() -> Self {
        Self {
            render: None,
            key: None,
        }
    }

    pub fn with_render(mut self, render: impl Fn(&T, usize) -> V + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn with_key(mut self, key: impl Fn(&T, usize) -> K + Send + Sync + 'static) -> Self {
        self.key = Some(Arc::new(key));
        self
    }

    pub fn set_render(&mut self, render: impl Fn(&T, usize) -> V + Send + Sync + 'static) {
        self.render = Some(Arc::new(render));
    }

    pub fn set_key(&mut self, key: impl Fn(&T, usize) -> K + Send + Sync + 'static) {
        self.key = Some(Arc::new(key));
    }

    /// The site's render function; an unconfigured site is a caller bug and
    /// fails here rather than rendering nothing.
    pub fn render(&self) -> Result<&RenderFn<T, V>, ConfigError> {
        self.render.as_ref().ok_or(ConfigError::MissingRenderFn)
    }

    pub fn key(&self) -> Result<&SiteKeyFn<T, K>, ConfigError> {
        self.key.as_ref().ok_or(ConfigError::MissingKeyFn)
    }
}

impl<T, V, K> Default for BindingConfig<T, V, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V, K> Clone for BindingConfig<T, V, K> {
    fn clone(&self) -> Self {
        Self {
            render: self.render.clone(),
            key: self.key.clone(),
        }
    }
}

impl<T, V, K> fmt::Debug for BindingConfig<T, V, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingConfig")
            .field("render", &self.render.is_some())
            .field("key", &self.key.is_some())
            .finish()
    }
}

/// Handle to one binding site's state in a [`BindingArena`].
///
/// Handles are generational: a handle taken before a `remove` never aliases
/// a site created later in the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot<S> {
    generation: u32,
    state: Option<S>,
}

/// Explicit store for per-binding-site state.
///
/// View-binding layers typically key transient state off a host node and
/// rely on automatic collection; this arena replaces that with explicit
/// insert/remove, so teardown is visible and nothing outlives it.
#[derive(Debug)]
pub struct BindingArena<S> {
    slots: Vec<Slot<S>>,
    free: Vec<u32>,
    len: usize,
}

impl<S> BindingArena<S> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, state: S) -> BindingHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.state = Some(state);
            return BindingHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            state: Some(state),
        });
        BindingHandle {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, handle: BindingHandle) -> Option<&S> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.state.as_ref())
    }

    pub fn get_mut(&mut self, handle: BindingHandle) -> Option<&mut S> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.state.as_mut())
    }

    /// Tears a binding site down. Handles to it are dead from here on; the
    /// slot is recycled under a new generation.
    pub fn remove(&mut self, handle: BindingHandle) -> Option<S> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let state = slot.state.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.slots.iter().filter_map(|slot| slot.state.as_ref())
    }
}

impl<S> Default for BindingArena<S> {
    fn default() -> Self {
        Self::new()
    }
}
