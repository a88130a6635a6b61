use crate::error::LauncherError;
use crate::events::KeyId;
use crate::mappings::KeyNames;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const CONFIG_DIR_NAME: &str = "thrawn";
const CONFIG_FILE_NAME: &str = "thrawn.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub chord: ChordConfig,
    pub terminal: TerminalConfig,
    pub panel: PanelConfig,
    pub input: InputConfig,
}

/// Набор клавиш, которые нужно удерживать одновременно
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChordConfig {
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TerminalConfig {
    pub program: String,
    pub exec_flag: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PanelConfig {
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InputConfig {
    pub device_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chord: ChordConfig::default(),
            terminal: TerminalConfig {
                program: "xfce4-terminal".to_string(),
                exec_flag: "-x".to_string(),
            },
            panel: PanelConfig { height: 24 },
            input: InputConfig {
                device_path: "auto".to_string(),
            },
        }
    }
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            keys: vec!["Control_L".to_string(), "Shift_L".to_string()],
        }
    }
}

impl ChordConfig {
    /// Коды клавиш аккорда в порядке конфигурации.
    ///
    /// Неизвестные имена пропускаются; `Config::validate` не пропускает их дальше загрузки.
    pub fn key_ids(&self) -> SmallVec<[KeyId; 4]> {
        self.keys
            .iter()
            .filter_map(|name| KeyNames::id_of(name))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.keys.len() < 2 {
            anyhow::bail!(
                "Аккорд должен содержать минимум 2 клавиши, задано: {}",
                self.keys.len()
            );
        }

        let mut seen = HashSet::new();
        for key in &self.keys {
            if !KeyNames::is_known(key) {
                anyhow::bail!("Неизвестная клавиша аккорда: '{}'", key);
            }
            if !seen.insert(key.as_str()) {
                anyhow::bail!("Клавиша '{}' повторяется в аккорде", key);
            }
        }

        Ok(())
    }
}

impl Config {
    /// Путь по умолчанию: `$XDG_CONFIG_HOME/thrawn/thrawn.toml` или `~/.config/thrawn/thrawn.toml`
    pub fn default_path() -> std::result::Result<PathBuf, LauncherError> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or(LauncherError::HomeNotFound)
    }

    /// Загружает конфигурацию; если файла нет - сначала записывает конфигурацию по умолчанию
    pub fn load_or_init<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            warn!(
                "Файл конфигурации {:?} не найден, записываем конфигурацию по умолчанию",
                config_path
            );
            Config::default().save(config_path)?;
        }

        Self::load(config_path)
    }

    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("THRAWN_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    /// Явное сохранение; изменение полей само по себе ничего не пишет на диск
    pub fn save<P: AsRef<Path>>(&self, config_path: P) -> Result<()> {
        let config_path = config_path.as_ref();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Не удалось создать каталог {:?}", parent))?;
        }

        let contents = toml::to_string_pretty(self).context("Не удалось сериализовать конфигурацию")?;
        fs::write(config_path, contents)
            .with_context(|| format!("Не удалось записать конфигурацию в {:?}", config_path))?;

        info!("Конфигурация сохранена в {:?}", config_path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.chord.validate()?;

        if self.terminal.program.trim().is_empty() {
            anyhow::bail!("Не задана программа терминала");
        }

        if self.panel.height == 0 {
            anyhow::bail!("Высота панели должна быть больше 0");
        }

        if self.input.device_path.is_empty() {
            anyhow::bail!("Пустой путь к устройству ввода (используйте \"auto\")");
        }

        Ok(())
    }
}
