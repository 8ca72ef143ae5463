use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation shared between the engine and whoever may ask
/// it to stop. Once set it stays set; a new run needs a new token.
#[derive(Clone, Debug, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = StopToken::new();
        let remote = token.clone();
        assert!(!token.is_stopped());
        std::thread::spawn(move || remote.stop()).join().unwrap();
        assert!(token.is_stopped());
    }
}
