//! Глобальный источник событий клавиатуры.
//!
//! Отвечает только за доставку нажатий/отпусканий в исходном порядке
//! в переданный callback на выделенном потоке. Логика аккорда живёт в `ChordDetector`.

mod evdev_source;
mod scripted_source;
mod r#trait;

pub use self::evdev_source::EvdevKeyEventSource;
pub use self::r#trait::{create_key_event_source, KeyEventCallback, KeyEventSource};
pub use self::scripted_source::ScriptedKeyEventSource;

pub(crate) const WORKER_THREAD_NAME: &str = "key-event-source";
