//! Document loader contract
//!
//! The geometry kernel sits behind this seam. The core never inspects the
//! parsed model; it only moves an opaque, cheaply clonable handle from the
//! worker thread into the shared context.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

// ----------------------------------------------------------------------------
// Document Handle
// ----------------------------------------------------------------------------

/// Opaque shared handle to a successfully parsed CAD document.
///
/// Produced by the loader on its worker thread, stored in the shared context
/// and read by the scheduler to drive scene initialization. The concrete
/// model type belongs to the renderer/loader pair; the core never looks
/// inside.
#[derive(Clone)]
pub struct DocumentHandle {
    inner: Arc<dyn Any + Send + Sync>,
}

impl DocumentHandle {
    /// Wrap a parsed document model.
    pub fn new<T: Any + Send + Sync>(model: T) -> Self {
        Self {
            inner: Arc::new(model),
        }
    }

    /// Wrap an already shared document model.
    pub fn from_arc<T: Any + Send + Sync>(model: Arc<T>) -> Self {
        Self { inner: model }
    }

    /// Recover the concrete model type, typically inside the renderer.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }
}

impl fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentHandle").finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Document Loader
// ----------------------------------------------------------------------------

/// Completion callback for a load request.
///
/// Invoked exactly once: with a handle on success, with `None` on failure.
pub type LoadCallback = Box<dyn FnOnce(Option<DocumentHandle>) + Send + 'static>;

/// Contract for the external document-loading collaborator.
///
/// `load` may block the calling thread for the duration of the parse (the
/// background load task runs it on a dedicated blocking thread) or complete
/// asynchronously; either way `on_complete` fires exactly once.
pub trait DocumentLoader: Send + Sync {
    /// Parse raw document content and report the result through the callback.
    fn load(&self, raw: &str, on_complete: LoadCallback);

    /// Version string of the underlying geometry kernel.
    fn kernel_version(&self) -> String;
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
