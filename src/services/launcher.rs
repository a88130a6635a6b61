use crate::config::TerminalConfig;
use parking_lot::Mutex;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Запрос на запуск команды в терминале
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub terminal_program: String,
    pub terminal_exec_flag: String,
    pub command: String,
}

impl LaunchRequest {
    pub fn new(terminal: &TerminalConfig, command: &str) -> Self {
        Self {
            terminal_program: terminal.program.clone(),
            terminal_exec_flag: terminal.exec_flag.clone(),
            command: command.to_string(),
        }
    }
}

/// Внешний запуск процессов: неблокирующий, по принципу best-effort.
/// Ошибки запуска логируются и не возвращаются вызывающему.
pub trait ProcessLauncher: Send {
    fn launch(&self, request: &LaunchRequest);
}

/// Factory function to create a launcher based on the dry_run flag
pub fn create_process_launcher(dry_run: bool) -> Box<dyn ProcessLauncher> {
    if dry_run {
        Box::new(DryRunLauncher::new())
    } else {
        Box::new(TerminalLauncher)
    }
}

pub struct TerminalLauncher;

impl TerminalLauncher {
    fn command(request: &LaunchRequest) -> Command {
        let mut command = Command::new(&request.terminal_program);
        if !request.terminal_exec_flag.is_empty() {
            command.arg(&request.terminal_exec_flag);
        }
        command
            .arg(&request.command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

impl ProcessLauncher for TerminalLauncher {
    fn launch(&self, request: &LaunchRequest) {
        info!(
            "Запуск '{}' в {} {}",
            request.command, request.terminal_program, request.terminal_exec_flag
        );

        match Self::command(request).spawn() {
            Ok(mut child) => {
                let pid = child.id();
                // Не ждём процесс; отдельный поток только собирает код возврата
                let spawned = std::thread::Builder::new()
                    .name(format!("reaper-{}", pid))
                    .spawn(move || match child.wait() {
                        Ok(status) => debug!("Процесс {} завершился: {}", pid, status),
                        Err(e) => debug!("Не удалось дождаться процесса {}: {}", pid, e),
                    });
                if let Err(e) = spawned {
                    debug!("Не удалось запустить поток ожидания для {}: {}", pid, e);
                }
            }
            Err(e) => error!(
                "Не удалось запустить {}: {}",
                request.terminal_program, e
            ),
        }
    }
}

/// Ничего не запускает, только логирует и запоминает запросы
#[derive(Default)]
pub struct DryRunLauncher {
    history: Arc<Mutex<Vec<LaunchRequest>>>,
}

impl DryRunLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Arc<Mutex<Vec<LaunchRequest>>> {
        self.history.clone()
    }
}

impl ProcessLauncher for DryRunLauncher {
    fn launch(&self, request: &LaunchRequest) {
        info!(
            "[DRY RUN] {} {} {}",
            request.terminal_program, request.terminal_exec_flag, request.command
        );
        self.history.lock().push(request.clone());
    }
}
