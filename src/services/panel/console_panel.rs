use crate::config::PanelConfig;
use crate::events::PanelEvent;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

const PROMPT: &str = "thrawn>";

/// Панель в терминале: непустая строка заменяет запрос, пустая - подтверждает выбор
pub struct ConsolePanel {
    out: Box<dyn Write + Send>,
    config: PanelConfig,
}

impl ConsolePanel {
    pub fn new(out: Box<dyn Write + Send>, config: PanelConfig) -> Self {
        info!("Инициализация ConsolePanel (высота: {})", config.height);
        Self { out, config }
    }

    pub fn stdout(config: PanelConfig) -> Self {
        Self::new(Box::new(std::io::stdout()), config)
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            debug!("Не удалось вывести строку панели: {}", e);
        }
    }
}

impl super::Panel for ConsolePanel {
    fn activate(&mut self) {
        debug!("Панель активирована (высота: {})", self.config.height);
        self.write_line(PROMPT);
    }

    fn show_matches(&mut self, matches: &[String]) {
        self.write_line(&matches.join(" "));
    }
}

fn parse_line(line: &str) -> PanelEvent {
    let line = line.trim_end_matches('\r');
    if line.is_empty() {
        PanelEvent::Commit
    } else {
        PanelEvent::QueryChanged(line.to_string())
    }
}

/// Читает строки ввода и пересылает их контроллеру до EOF или закрытия канала
pub async fn forward_input<R>(reader: R, tx: UnboundedSender<PanelEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(parse_line(&line)).is_err() {
                    debug!("Контроллер закрыл канал панели");
                    break;
                }
            }
            Ok(None) => {
                info!("Ввод панели закрыт (EOF)");
                break;
            }
            Err(e) => {
                debug!("Ошибка чтения ввода панели: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::panel::Panel;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_panel_output() {
        let buffer = SharedBuffer::default();
        let mut panel = ConsolePanel::new(Box::new(buffer.clone()), PanelConfig { height: 24 });

        panel.activate();
        panel.show_matches(&["abc".to_string(), "xabcx".to_string()]);
        panel.show_matches(&[]);

        let text = String::from_utf8(buffer.0.lock().clone()).unwrap();
        assert_eq!(text, "thrawn>\nabc xabcx\n\n");
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line(""), PanelEvent::Commit);
        assert_eq!(parse_line("\r"), PanelEvent::Commit);
        assert_eq!(parse_line("fire\r"), PanelEvent::QueryChanged("fire".to_string()));
    }

    #[tokio::test]
    async fn test_forward_input_until_eof() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"fire\n\nhtop\n";

        forward_input(input, tx).await;

        assert_eq!(rx.recv().await, Some(PanelEvent::QueryChanged("fire".to_string())));
        assert_eq!(rx.recv().await, Some(PanelEvent::Commit));
        assert_eq!(rx.recv().await, Some(PanelEvent::QueryChanged("htop".to_string())));
        // Отправитель закрыт после EOF
        assert_eq!(rx.recv().await, None);
    }
}
