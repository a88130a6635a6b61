use crate::error::Result;
use crate::launcher_error;
use std::fs;
use std::path::Path;
use tracing::info;

const INPUT_DIR: &str = "/dev/input";

/// Проверить доступ к устройствам ввода.
///
/// Без него глобальные события клавиатуры получить нельзя - это фатальная ошибка запуска.
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");
    check_input_devices_access(Path::new(INPUT_DIR))?;
    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access(input_dir: &Path) -> Result<()> {
    if !input_dir.exists() {
        return Err(launcher_error!(
            event_source,
            "каталог {} не существует",
            input_dir.display()
        ));
    }

    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", input_dir.display());
            Ok(())
        }
        Err(e) => Err(launcher_error!(
            event_source,
            "нет доступа к {}: {}. Добавьте пользователя в группу 'input': {}",
            input_dir.display(),
            e,
            setup_command()
        )),
    }
}

/// Команда для настройки прав доступа
pub fn setup_command() -> &'static str {
    "sudo usermod -a -G input $USER"
}
