use crate::error::{LauncherError, Result};
use crate::launcher_error;
use evdev::{Device, KeyCode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BY_ID_DIR: &str = "/dev/input/by-id";
const INPUT_DIR: &str = "/dev/input";

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти клавиатуру: явный путь или `auto`
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                LauncherError::device_not_found(format!(
                    "Указанное устройство не найдено: {:?}",
                    path
                ))
            };
        }

        info!("Автопоиск клавиатурного устройства...");

        if let Some(device) = Self::find_by_id()? {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        if let Some(device) = Self::find_by_event_devices()? {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        LauncherError::device_not_found(
            "Не удалось найти клавиатурное устройство. \
             Убедитесь, что пользователь добавлен в группу 'input'",
        )
    }

    /// `/dev/input/by-id/*-event-kbd`; каталога может не быть (виртуальные машины)
    fn find_by_id() -> Result<Option<PathBuf>> {
        let by_id_dir = Path::new(BY_ID_DIR);
        if !by_id_dir.exists() {
            debug!("Каталог {} не существует", BY_ID_DIR);
            return Ok(None);
        }

        let mut candidates: Vec<PathBuf> = Self::list_dir(by_id_dir)?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| name.ends_with("event-kbd"))
            })
            .collect();
        candidates.sort();

        Ok(candidates.into_iter().find(|path| Self::is_keyboard_device(path)))
    }

    fn find_by_event_devices() -> Result<Option<PathBuf>> {
        let mut event_devices: Vec<PathBuf> = Self::list_dir(Path::new(INPUT_DIR))?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| name.starts_with("event"))
            })
            .collect();

        // event2 раньше event10
        event_devices.sort_by_key(|path| Self::event_number(path));

        Ok(event_devices
            .into_iter()
            .find(|path| Self::is_keyboard_device(path)))
    }

    fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir)
            .map_err(|e| launcher_error!(permission, "Нет доступа к {}: {}", dir.display(), e))?;

        Ok(entries.flatten().map(|entry| entry.path()).collect())
    }

    fn event_number(path: &Path) -> u32 {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(|name| name.strip_prefix("event"))
            .and_then(|n| n.parse().ok())
            .unwrap_or(u32::MAX)
    }

    /// Клавиатура - устройство с буквами, пробелом, Enter и модификаторами
    fn is_keyboard_device(device_path: &Path) -> bool {
        match Device::open(device_path) {
            Ok(device) => {
                let is_keyboard = device.supported_keys().is_some_and(|keys| {
                    [
                        KeyCode::KEY_A,
                        KeyCode::KEY_SPACE,
                        KeyCode::KEY_ENTER,
                        KeyCode::KEY_LEFTCTRL,
                        KeyCode::KEY_LEFTSHIFT,
                    ]
                    .into_iter()
                    .all(|key| keys.contains(key))
                });

                debug!(
                    "Устройство {:?} ({}): клавиатура = {}",
                    device_path,
                    device.name().unwrap_or("Unknown"),
                    is_keyboard
                );
                is_keyboard
            }
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                false
            }
        }
    }
}
