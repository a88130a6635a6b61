use crate::error::Result;
use crate::events::KeyEvent;
use crate::launcher_error;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

use super::r#trait::{KeyEventCallback, KeyEventSource};
use super::WORKER_THREAD_NAME;

/// Источник с заранее заданной последовательностью событий (dry-run и тесты).
///
/// После доставки всех событий поток завершается и освобождает callback.
pub struct ScriptedKeyEventSource {
    script: Option<Vec<KeyEvent>>,
    worker: Option<JoinHandle<()>>,
}

impl ScriptedKeyEventSource {
    pub fn new(script: Vec<KeyEvent>) -> Self {
        info!("Инициализация ScriptedKeyEventSource ({} событий)", script.len());
        Self {
            script: Some(script),
            worker: None,
        }
    }
}

impl KeyEventSource for ScriptedKeyEventSource {
    fn start(&mut self, mut callback: KeyEventCallback) -> Result<()> {
        let script = self
            .script
            .take()
            .ok_or_else(|| launcher_error!(internal, "источник событий уже был запущен"))?;

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                for event in script {
                    debug!("Сценарное событие: {}", event);
                    callback(event);
                }
            })?;

        self.worker = Some(handle);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("Поток сценарного источника завершился паникой");
            }
        }
    }
}
