use crate::config::Config;
use crate::error::Result;
use crate::events::KeyEvent;
use crate::launcher_error;
use crate::trace_if_enabled;
use crate::utils::DeviceFinder;
use evdev::{Device, EventType, InputEvent};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::r#trait::{KeyEventCallback, KeyEventSource};
use super::WORKER_THREAD_NAME;

const STOP_TIMEOUT: Duration = Duration::from_millis(250);

/// Источник событий на evdev: читает клавиатуру напрямую, независимо от фокуса окон.
///
/// Устройство открывается только на чтение и не захватывается эксклюзивно,
/// остальные программы продолжают получать ввод.
pub struct EvdevKeyEventSource {
    device: Option<Device>,
    device_path: PathBuf,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl EvdevKeyEventSource {
    pub fn new(config: &Config) -> Result<Self> {
        info!("Инициализация EvdevKeyEventSource");

        let device_path = DeviceFinder::find_keyboard_device(&config.input.device_path)
            .map_err(|e| launcher_error!(event_source, "{}", e))?;

        let device = Device::open(&device_path).map_err(|e| {
            launcher_error!(
                event_source,
                "не удалось открыть устройство {:?}: {}",
                device_path,
                e
            )
        })?;

        Self::log_opened_device(&device, &device_path);

        Ok(Self {
            device: Some(device),
            device_path,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        })
    }

    fn run_blocking(mut device: Device, stop: Arc<AtomicBool>, mut callback: KeyEventCallback) {
        info!("Поток чтения событий запущен");

        let fetch = || {
            device
                .fetch_events()
                .map(|events| events.filter_map(|e| Self::translate(&e)).collect())
        };
        if let Err(e) = pump_events(fetch, &stop, &mut callback) {
            error!("Ошибка чтения событий, отслеживание аккорда прекращено: {}", e);
        }

        info!("Поток чтения событий остановлен, устройство освобождается");
    }

    fn translate(event: &InputEvent) -> Option<KeyEvent> {
        if event.event_type() != EventType::KEY {
            return None;
        }

        let key_event = KeyEvent::from_raw(event.code(), event.value());
        if key_event.is_none() {
            debug!(
                "Отброшено событие с неизвестным значением {} (код {})",
                event.value(),
                event.code()
            );
        }
        key_event
    }

    fn log_opened_device(device: &Device, device_path: &Path) {
        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Путь: {}", device_path.display());
        info!("Физический путь: {:?}", device.physical_path());
    }
}

/// Доставляет пачки событий в callback до флага остановки.
///
/// Ошибка чтения завершает цикл без повторов: устройство, скорее всего, отключено.
fn pump_events<F>(mut fetch: F, stop: &AtomicBool, callback: &mut KeyEventCallback) -> io::Result<()>
where
    F: FnMut() -> io::Result<Vec<KeyEvent>>,
{
    while !stop.load(Ordering::Acquire) {
        for key_event in fetch()? {
            if stop.load(Ordering::Acquire) {
                break;
            }
            trace_if_enabled!("Событие клавиши: {}", key_event);
            callback(key_event);
        }
    }
    Ok(())
}

impl KeyEventSource for EvdevKeyEventSource {
    fn start(&mut self, callback: KeyEventCallback) -> Result<()> {
        let device = self
            .device
            .take()
            .ok_or_else(|| launcher_error!(internal, "источник событий уже был запущен"))?;

        let stop = self.stop.clone();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || Self::run_blocking(device, stop, callback))?;

        self.worker = Some(handle);
        Ok(())
    }

    fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);

        let Some(handle) = self.worker.take() else {
            return;
        };

        // Поток может быть заблокирован в чтении до следующего события
        let deadline = Instant::now() + STOP_TIMEOUT;
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }

        if handle.is_finished() {
            if handle.join().is_err() {
                error!("Поток чтения событий завершился паникой");
            }
            info!("Устройство {} освобождено", self.device_path.display());
        } else {
            warn!(
                "Поток чтения событий ожидает ввода; устройство {} будет освобождено при выходе",
                self.device_path.display()
            );
        }
    }
}

impl Drop for EvdevKeyEventSource {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::KeyId;
    use parking_lot::Mutex;

    #[test]
    fn test_read_error_ends_pump_without_retry() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let mut callback: KeyEventCallback = Box::new(move |e| sink.lock().push(e));
        let stop = AtomicBool::new(false);

        let mut calls = 0;
        let fetch = || {
            calls += 1;
            match calls {
                1 => Ok(vec![KeyEvent::press(KeyId(29)), KeyEvent::release(KeyId(29))]),
                _ => Err(io::Error::from_raw_os_error(19)),
            }
        };

        let result = pump_events(fetch, &stop, &mut callback);
        assert!(result.is_err());
        assert_eq!(calls, 2);
        assert_eq!(received.lock().len(), 2);
    }

    #[test]
    fn test_stop_flag_ends_pump() {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let mut callback: KeyEventCallback = Box::new(move |_| flag.store(true, Ordering::Release));

        let mut calls = 0;
        let fetch = || {
            calls += 1;
            Ok(vec![KeyEvent::press(KeyId(42)), KeyEvent::press(KeyId(29))])
        };

        assert!(pump_events(fetch, &stop, &mut callback).is_ok());
        assert_eq!(calls, 1);
    }
}
