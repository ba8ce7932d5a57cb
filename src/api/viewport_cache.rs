use tracing::{trace, warn};

use crate::error::ChartResult;
use crate::interaction::ViewportState;
use crate::render::{DrawingLibrary, RenderAdapter, RenderInstanceHandle};

/// Carries cursor and zoom across calls that would otherwise reset them.
///
/// The state is read right before the wrapped call and written back right
/// after it, clamped to whatever data the instance now shows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportStateCache {
    last_saved: Option<ViewportState>,
}

impl ViewportStateCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State captured by the most recent `save`.
    #[must_use]
    pub fn last_saved(&self) -> Option<ViewportState> {
        self.last_saved
    }

    pub fn save<L: DrawingLibrary>(
        &mut self,
        adapter: &RenderAdapter<L>,
        handle: &RenderInstanceHandle<L::Surface>,
    ) -> ViewportState {
        let state = adapter.save_viewport(handle);
        self.last_saved = Some(state);
        state
    }

    /// Writes `state` back, moving an out-of-range cursor onto the last
    /// sample. Returns the state actually written.
    pub fn restore<L: DrawingLibrary>(
        &mut self,
        adapter: &mut RenderAdapter<L>,
        handle: &mut RenderInstanceHandle<L::Surface>,
        state: ViewportState,
    ) -> ChartResult<ViewportState> {
        let clamped = state.clamped_to_len(handle.data_len());
        if clamped.cursor_index != state.cursor_index {
            trace!(
                surface = %handle.surface_id(),
                saved = ?state.cursor_index,
                restored = ?clamped.cursor_index,
                "clamped cursor after dataset shrank"
            );
        }
        adapter.restore_viewport(handle, clamped)?;
        Ok(clamped)
    }

    /// Runs `op` between a save and a restore.
    ///
    /// The restore runs even when `op` fails, and also when nothing was
    /// saved, so a cursor the library placed on its own is cleared again.
    /// A failed restore is logged and does not replace the result of `op`.
    pub fn around<L, T, F>(
        &mut self,
        adapter: &mut RenderAdapter<L>,
        handle: &mut RenderInstanceHandle<L::Surface>,
        op: F,
    ) -> ChartResult<T>
    where
        L: DrawingLibrary,
        F: FnOnce(&mut RenderAdapter<L>, &mut RenderInstanceHandle<L::Surface>) -> ChartResult<T>,
    {
        let saved = self.save(adapter, handle);
        let result = op(adapter, handle);
        if let Err(err) = self.restore(adapter, handle, saved) {
            warn!(
                surface = %handle.surface_id(),
                error = %err,
                "failed to restore viewport state"
            );
        }
        result
    }
}
