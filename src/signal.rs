use crate::error::Result;
use signal_hook::consts::SIGWINCH;
use signal_hook::SigId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Remembers that the terminal window was resized since the last check. Screen polls it once per
// input tick and re-queries the window size
pub struct ResizeWatcher {
    resized: Arc<AtomicBool>,
    id: SigId,
}

impl ResizeWatcher {
    pub fn new() -> Result<Self> {
        let resized = Arc::new(AtomicBool::new(false));
        let id = signal_hook::flag::register(SIGWINCH, Arc::clone(&resized))?;
        log::trace!("Watching SIGWINCH");
        Ok(Self { resized, id })
    }

    // Returns true only once per burst of SIGWINCH
    pub fn take_resized(&self) -> bool {
        self.resized.swap(false, Ordering::Relaxed)
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        signal_hook::low_level::unregister(self.id);
    }
}
