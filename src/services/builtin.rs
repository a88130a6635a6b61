/// Встроенные команды, выполняемые самим лаунчером вместо запуска в терминале
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCommand {
    Quit,
}

impl BuiltinCommand {
    pub const ALL: &'static [BuiltinCommand] = &[BuiltinCommand::Quit];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinCommand::Quit => "thrawn_quit",
        }
    }

    /// Только точное совпадение имени
    pub fn parse(query: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|cmd| cmd.name() == query)
    }
}
