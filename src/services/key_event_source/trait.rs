use crate::config::Config;
use crate::error::Result;
use crate::events::KeyEvent;
use std::sync::Arc;
use tracing::warn;

/// Callback receiving every global key event, called on the source's worker thread
pub type KeyEventCallback = Box<dyn FnMut(KeyEvent) + Send + 'static>;

/// Trait for global key event sources
pub trait KeyEventSource: Send {
    /// Start delivering events to `callback` on a dedicated thread.
    ///
    /// A source can be started only once.
    fn start(&mut self, callback: KeyEventCallback) -> Result<()>;

    /// Stop delivery and release the underlying session
    fn stop(&mut self);
}

/// Factory function to create an appropriate key event source based on the dry_run flag
pub fn create_key_event_source(
    config: Arc<Config>,
    dry_run: bool,
) -> Result<Box<dyn KeyEventSource>> {
    if dry_run {
        warn!("Dry-run режим: устройство ввода не открывается, аккорд не отслеживается");
        Ok(Box::new(super::ScriptedKeyEventSource::new(Vec::new())))
    } else {
        Ok(Box::new(super::EvdevKeyEventSource::new(&config)?))
    }
}
