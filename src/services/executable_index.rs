use crate::error::{LauncherError, Result};
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Плоский список имён из каталогов PATH.
///
/// Порядок: каталоги в порядке PATH, внутри каталога - порядок перечисления
/// файловой системы. Дубликаты сохраняются, сортировки нет.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutableIndex {
    names: Vec<String>,
}

impl ExecutableIndex {
    pub fn build<I, P>(search_path: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self::scan(search_path).0
    }

    /// Индекс и число каталогов, которые удалось прочитать
    fn scan<I, P>(search_path: I) -> (Self, usize)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut names = Vec::new();
        let mut readable = 0;

        for directory in search_path {
            let directory = directory.as_ref();
            let entries = match fs::read_dir(directory) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("Пропускаем каталог {:?}: {}", directory, e);
                    continue;
                }
            };

            readable += 1;
            let before = names.len();
            names.extend(entries.flatten().filter_map(|entry| {
                entry
                    .file_name()
                    .into_string()
                    .map_err(|name| debug!("Пропускаем имя не в UTF-8: {:?}", name))
                    .ok()
            }));
            debug!("{:?}: {} записей", directory, names.len() - before);
        }

        info!(
            "Индекс исполняемых файлов построен: {} записей из {} каталогов",
            names.len(),
            readable
        );
        (Self { names }, readable)
    }

    /// Строит индекс по значению в формате PATH (`dir1:dir2:...`)
    pub fn from_search_path(value: &OsStr) -> Result<Self> {
        let directories: Vec<_> = env::split_paths(value)
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect();

        if directories.is_empty() {
            return Err(LauncherError::SearchPathUnset);
        }

        // Пустой, но читаемый каталог годится; ошибка - только если не прочитан ни один
        match Self::scan(directories) {
            (_, 0) => Err(LauncherError::NoUsableSearchPath),
            (index, _) => Ok(index),
        }
    }

    /// Индекс по переменной окружения PATH.
    ///
    /// Отсутствие PATH - ошибка конфигурации: вызывающий продолжает работу с пустым индексом.
    pub fn from_env() -> Result<Self> {
        match env::var_os("PATH") {
            Some(value) => Self::from_search_path(&value),
            None => Err(LauncherError::SearchPathUnset),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<Vec<String>> for ExecutableIndex {
    fn from(names: Vec<String>) -> Self {
        Self { names }
    }
}
