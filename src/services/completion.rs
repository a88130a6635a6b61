use crate::services::ExecutableIndex;

/// Подстрочное автодополнение по индексу исполняемых файлов
#[derive(Debug, Clone, Default)]
pub struct CompletionEngine {
    index: ExecutableIndex,
}

impl CompletionEngine {
    pub fn new(index: ExecutableIndex) -> Self {
        Self { index }
    }

    /// Все записи индекса, содержащие `query` (с учётом регистра), в порядке индекса.
    /// Пустой запрос ничего не предлагает.
    pub fn complete(&self, query: &str) -> Vec<String> {
        if query.is_empty() {
            return Vec::new();
        }

        self.index
            .names()
            .iter()
            .filter(|name| name.contains(query))
            .cloned()
            .collect()
    }

    /// Выбор при подтверждении: точное совпадение с запросом, иначе первый кандидат.
    /// `None` - запускать нечего.
    pub fn select<'a>(query: &str, matches: &'a [String]) -> Option<&'a str> {
        matches
            .iter()
            .find(|name| name.as_str() == query)
            .or_else(|| matches.first())
            .map(String::as_str)
    }
}
