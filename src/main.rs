use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
mod config;
mod error;
mod events;
pub mod mappings;
mod services;
mod utils;

use config::Config;
use services::{
    create_key_event_source,
    create_panel,
    create_process_launcher,
    ExecutableIndex,
    LauncherController,
};

#[derive(Parser, Debug)]
#[command(name = "thrawn")]
#[command(about = "Панель запуска приложений по глобальному аккорду клавиш")]
struct Args {
    /// Путь к файлу конфигурации (по умолчанию $XDG_CONFIG_HOME/thrawn/thrawn.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Режим сухого запуска (без устройства ввода и без запуска процессов)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Инициализация системы логирования
    init_tracing(&args.log_level)?;

    info!("Запуск thrawn v{}", env!("CARGO_PKG_VERSION"));

    // Загрузка конфигурации
    let config_path = match args.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Arc::new(Config::load_or_init(&config_path)?);
    info!("Конфигурация загружена из: {}", config_path.display());

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else {
        // Проверка прав доступа
        utils::permissions::check_permissions()?;
    }

    // Отсутствие PATH не фатально: работаем с пустым индексом
    let index = match ExecutableIndex::from_env() {
        Ok(index) => index,
        Err(e) if !e.is_fatal() => {
            warn!("{}; автодополнение будет пустым", e);
            ExecutableIndex::default()
        }
        Err(e) => return Err(e.into()),
    };

    let key_event_source = create_key_event_source(config.clone(), args.dry_run)?;
    let launcher = create_process_launcher(args.dry_run);
    let (panel, panel_events) = create_panel(config.clone());
    let controller = LauncherController::new(config, index, panel, launcher);

    info!("Все компоненты инициализированы");

    controller.run(key_event_source, panel_events).await?;

    info!("thrawn завершил работу");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
        .init();

    Ok(())
}
