use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Не удалось определить каталог конфигурации: переменные XDG_CONFIG_HOME и HOME не заданы")]
    HomeNotFound,

    #[error("Глобальный источник событий клавиатуры недоступен: {0}")]
    EventSourceUnavailable(String),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Переменная PATH не задана или пуста")]
    SearchPathUnset,

    #[error("В PATH нет ни одного читаемого каталога")]
    NoUsableSearchPath,

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl LauncherError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(LauncherError::DeviceNotFound(msg.into()))
    }

    /// Ошибки, после которых работа невозможна (см. `main`)
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            LauncherError::SearchPathUnset | LauncherError::NoUsableSearchPath
        )
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! launcher_error {
    (event_source, $($arg:tt)*) => {
        $crate::error::LauncherError::EventSourceUnavailable(format!($($arg)*))
    };
    (device_not_found, $($arg:tt)*) => {
        $crate::error::LauncherError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::LauncherError::Permission(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::LauncherError::Internal(format!($($arg)*))
    };
}
