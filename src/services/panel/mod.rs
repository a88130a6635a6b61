//! Панель ввода команды.
//!
//! Панель только отображает состояние и отдаёт события ввода контроллеру
//! (`PanelEvent`). Решения о запуске принимает исключительно `LauncherController`.

mod console_panel;
mod r#trait;

pub use self::console_panel::{forward_input, ConsolePanel};
pub use self::r#trait::{create_panel, Panel};
