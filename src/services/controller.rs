use crate::config::{ChordConfig, Config};
use crate::error::Result;
use crate::events::{ChordTriggered, PanelEvent};
use crate::services::builtin::BuiltinCommand;
use crate::services::key_event_source::KeyEventSource;
use crate::services::launcher::{LaunchRequest, ProcessLauncher};
use crate::services::panel::Panel;
use crate::services::{ChordDetector, CompletionEngine, ExecutableIndex};
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error, info, warn};

/// Результат подтверждения ввода
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Launched(String),
    Builtin(BuiltinCommand),
    /// Кандидатов нет, запускать нечего
    Declined,
}

/// Запускает источник событий с детектором аккорда на его потоке.
///
/// Сигналы уходят в канал в порядке обнаружения; канал закрывается, когда
/// поток источника завершается.
pub fn spawn_chord_listener(
    source: &mut dyn KeyEventSource,
    chord: &ChordConfig,
) -> Result<UnboundedReceiver<ChordTriggered>> {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut detector = ChordDetector::new(chord);

    source.start(Box::new(move |event| {
        if detector.process(&event) && tx.send(ChordTriggered).is_err() {
            debug!("Получатель сигналов аккорда закрыт");
        }
    }))?;

    Ok(rx)
}

/// Связывает аккорд, панель, автодополнение и запуск процессов.
///
/// Живёт на главной задаче; состояние аккорда сюда не попадает, только сигнал.
pub struct LauncherController {
    config: Arc<Config>,
    engine: CompletionEngine,
    panel: Box<dyn Panel>,
    launcher: Box<dyn ProcessLauncher>,
    query: String,
    matches: Vec<String>,
}

impl LauncherController {
    pub fn new(
        config: Arc<Config>,
        index: ExecutableIndex,
        panel: Box<dyn Panel>,
        launcher: Box<dyn ProcessLauncher>,
    ) -> Self {
        info!("Инициализация LauncherController ({} кандидатов)", index.len());
        Self {
            config,
            engine: CompletionEngine::new(index),
            panel,
            launcher,
            query: String::new(),
            matches: Vec::new(),
        }
    }

    pub fn on_chord_triggered(&mut self) {
        info!("Аккорд: показываем панель");
        self.query.clear();
        self.matches.clear();
        self.panel.activate();
    }

    pub fn on_query_changed(&mut self, text: &str) {
        self.query = text.to_string();
        self.matches = self.engine.complete(&self.query);
        debug!("Запрос '{}': {} совпадений", self.query, self.matches.len());
        self.panel.show_matches(&self.matches);
    }

    pub fn on_commit(&mut self) -> CommitOutcome {
        if let Some(builtin) = BuiltinCommand::parse(&self.query) {
            info!("Встроенная команда: {}", builtin.name());
            return CommitOutcome::Builtin(builtin);
        }

        let Some(selection) = CompletionEngine::select(&self.query, &self.matches) else {
            debug!("Нет совпадений для '{}', запуск пропущен", self.query);
            return CommitOutcome::Declined;
        };

        let request = LaunchRequest::new(&self.config.terminal, selection);
        self.launcher.launch(&request);
        CommitOutcome::Launched(request.command)
    }

    fn handle_panel_event(&mut self, event: PanelEvent) -> ControlFlow<()> {
        match event {
            PanelEvent::QueryChanged(text) => self.on_query_changed(&text),
            PanelEvent::Commit => {
                if let CommitOutcome::Builtin(BuiltinCommand::Quit) = self.on_commit() {
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Главный цикл: до Ctrl+C, `thrawn_quit` или закрытия панели.
    /// Перед возвратом всегда останавливает источник событий.
    pub async fn run(
        mut self,
        mut source: Box<dyn KeyEventSource>,
        mut panel_events: UnboundedReceiver<PanelEvent>,
    ) -> Result<()> {
        let mut chords = spawn_chord_listener(source.as_mut(), &self.config.chord)?;
        info!("Контроллер запущен, ожидаем аккорд {}", self.config.chord.keys.join("+"));

        let shutdown = signal::ctrl_c();
        tokio::pin!(shutdown);
        let mut chords_open = true;

        loop {
            tokio::select! {
                chord = chords.recv(), if chords_open => match chord {
                    Some(ChordTriggered) => self.on_chord_triggered(),
                    None => {
                        warn!("Источник событий клавиатуры завершился, аккорд больше не отслеживается");
                        chords_open = false;
                    }
                },
                event = panel_events.recv() => match event {
                    Some(event) => {
                        if self.handle_panel_event(event).is_break() {
                            break;
                        }
                    }
                    None => {
                        info!("Панель закрыта");
                        break;
                    }
                },
                result = &mut shutdown => {
                    match result {
                        Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                        Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
                    }
                    break;
                }
            }
        }

        info!("Остановка источника событий клавиатуры");
        // stop() может ждать поток чтения, не занимаем им рабочий поток runtime
        if let Err(e) = tokio::task::spawn_blocking(move || source.stop()).await {
            error!("Остановка источника событий завершилась ошибкой: {}", e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{KeyEvent, KeyId};
    use crate::services::key_event_source::{KeyEventCallback, ScriptedKeyEventSource};
    use crate::services::launcher::DryRunLauncher;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    const CTRL: KeyId = KeyId(29);
    const SHIFT: KeyId = KeyId(42);

    #[derive(Debug, Clone, PartialEq)]
    enum PanelCall {
        Activate,
        Show(Vec<String>),
    }

    #[derive(Clone, Default)]
    struct RecordingPanel(Arc<Mutex<Vec<PanelCall>>>);

    impl Panel for RecordingPanel {
        fn activate(&mut self) {
            self.0.lock().push(PanelCall::Activate);
        }

        fn show_matches(&mut self, matches: &[String]) {
            self.0.lock().push(PanelCall::Show(matches.to_vec()));
        }
    }

    /// Сценарный источник, запоминающий вызов stop()
    struct StopTrackingSource {
        inner: ScriptedKeyEventSource,
        stopped: Arc<AtomicBool>,
    }

    impl StopTrackingSource {
        fn new(script: Vec<KeyEvent>) -> (Box<Self>, Arc<AtomicBool>) {
            let stopped = Arc::new(AtomicBool::new(false));
            let source = Box::new(Self {
                inner: ScriptedKeyEventSource::new(script),
                stopped: stopped.clone(),
            });
            (source, stopped)
        }
    }

    impl KeyEventSource for StopTrackingSource {
        fn start(&mut self, callback: KeyEventCallback) -> Result<()> {
            self.inner.start(callback)
        }

        fn stop(&mut self) {
            self.inner.stop();
            self.stopped.store(true, Ordering::Release);
        }
    }

    struct Fixture {
        controller: LauncherController,
        panel: RecordingPanel,
        launched: Arc<Mutex<Vec<LaunchRequest>>>,
    }

    fn fixture(names: &[&str]) -> Fixture {
        let panel = RecordingPanel::default();
        let launcher = DryRunLauncher::new();
        let launched = launcher.history();
        let index = ExecutableIndex::from(names.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        let controller = LauncherController::new(
            Arc::new(Config::default()),
            index,
            Box::new(panel.clone()),
            Box::new(launcher),
        );
        Fixture {
            controller,
            panel,
            launched,
        }
    }

    #[test]
    fn test_query_updates_panel_matches() {
        let mut f = fixture(&["ab", "abc", "xabcx"]);
        f.controller.on_query_changed("abc");
        f.controller.on_query_changed("");

        assert_eq!(
            *f.panel.0.lock(),
            vec![
                PanelCall::Show(vec!["abc".to_string(), "xabcx".to_string()]),
                PanelCall::Show(vec![]),
            ]
        );
    }

    #[test]
    fn test_commit_launches_exact_match_in_terminal() {
        let mut f = fixture(&["xabcx", "abc"]);
        f.controller.on_query_changed("abc");

        assert_eq!(f.controller.on_commit(), CommitOutcome::Launched("abc".to_string()));
        assert_eq!(
            f.launched.lock().as_slice(),
            &[LaunchRequest {
                terminal_program: "xfce4-terminal".to_string(),
                terminal_exec_flag: "-x".to_string(),
                command: "abc".to_string(),
            }]
        );
    }

    #[test]
    fn test_commit_without_matches_is_declined() {
        let mut f = fixture(&["ab"]);
        f.controller.on_query_changed("zz");

        assert_eq!(f.controller.on_commit(), CommitOutcome::Declined);
        assert!(f.launched.lock().is_empty());
    }

    #[test]
    fn test_chord_clears_stale_query() {
        let mut f = fixture(&["htop"]);
        f.controller.on_query_changed("ht");
        f.controller.on_chord_triggered();

        assert_eq!(f.panel.0.lock().last(), Some(&PanelCall::Activate));
        assert_eq!(f.controller.on_commit(), CommitOutcome::Declined);
        assert!(f.launched.lock().is_empty());
    }

    #[test]
    fn test_builtin_quit_is_not_launched() {
        let mut f = fixture(&["thrawn_quit"]);
        f.controller.on_query_changed("thrawn_quit");

        assert_eq!(
            f.controller.on_commit(),
            CommitOutcome::Builtin(BuiltinCommand::Quit)
        );
        assert!(f.launched.lock().is_empty());
    }

    #[tokio::test]
    async fn test_chord_listener_fires_once_per_chord() {
        let script = vec![
            KeyEvent::press(SHIFT),
            KeyEvent::press(SHIFT),
            KeyEvent::press(CTRL),
            KeyEvent::release(CTRL),
            KeyEvent::release(SHIFT),
            KeyEvent::press(CTRL),
            KeyEvent::release(CTRL),
            KeyEvent::press(SHIFT),
        ];
        let mut source = ScriptedKeyEventSource::new(script);
        let mut chords = spawn_chord_listener(&mut source, &ChordConfig::default()).unwrap();

        assert_eq!(chords.recv().await, Some(ChordTriggered));
        // Поток источника завершился, канал закрыт без второго сигнала
        assert_eq!(chords.recv().await, None);
        source.stop();
    }

    #[tokio::test]
    async fn test_run_stops_on_builtin_quit() {
        let f = fixture(&["htop"]);
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(PanelEvent::QueryChanged("thrawn_quit".to_string())).unwrap();
        tx.send(PanelEvent::Commit).unwrap();

        let (source, stopped) = StopTrackingSource::new(Vec::new());
        f.controller.run(source, rx).await.unwrap();

        assert!(f.launched.lock().is_empty());
        assert!(stopped.load(Ordering::Acquire));
        // Отправитель ещё жив: выход произошёл именно по команде
        drop(tx);
    }

    #[tokio::test]
    async fn test_run_activates_panel_on_chord_and_launches() {
        let f = fixture(&["htop", "top"]);
        let panel = f.panel.clone();
        let launched = f.launched.clone();
        let (tx, rx) = mpsc::unbounded_channel();

        let (source, stopped) = StopTrackingSource::new(vec![
            KeyEvent::press(CTRL),
            KeyEvent::press(SHIFT),
        ]);
        let handle = tokio::spawn(f.controller.run(source, rx));

        for _ in 0..200 {
            if panel.0.lock().contains(&PanelCall::Activate) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(panel.0.lock().contains(&PanelCall::Activate));

        tx.send(PanelEvent::QueryChanged("top".to_string())).unwrap();
        tx.send(PanelEvent::Commit).unwrap();
        drop(tx);
        handle.await.unwrap().unwrap();

        let launched = launched.lock();
        assert_eq!(launched.len(), 1);
        assert_eq!(launched[0].command, "top");
        assert!(stopped.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn test_run_stops_source_when_panel_closes() {
        let f = fixture(&["htop"]);
        let (tx, rx) = mpsc::unbounded_channel::<PanelEvent>();
        drop(tx);

        let (source, stopped) = StopTrackingSource::new(Vec::new());
        f.controller.run(source, rx).await.unwrap();

        assert!(stopped.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn test_run_keeps_serving_panel_after_source_ends() {
        let f = fixture(&["htop"]);
        let launched = f.launched.clone();
        let (tx, rx) = mpsc::unbounded_channel();

        // Пустой сценарий: поток источника сразу завершается и закрывает канал аккордов
        let (source, stopped) = StopTrackingSource::new(Vec::new());
        let handle = tokio::spawn(f.controller.run(source, rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());

        tx.send(PanelEvent::QueryChanged("htop".to_string())).unwrap();
        tx.send(PanelEvent::Commit).unwrap();
        drop(tx);
        handle.await.unwrap().unwrap();

        assert_eq!(launched.lock().len(), 1);
        assert!(stopped.load(Ordering::Acquire));
    }
}
