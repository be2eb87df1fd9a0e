use chrono::Local;
use yansi::{Paint, Color};

/// A structure for using Logger.
///
/// By using new, you can get ready to use it.
///
/// ## Usage
///
/// ```rust
/// let logger = Logger::new(Some("scheduler"));
///
/// //Infomation
/// logger.info("infomation");
///
/// //Caution
/// logger.caut("caution");
///
/// //Error (written to stderr)
/// logger.error("error");
/// ```

#[derive(Debug, Clone)]
pub struct Logger { scope: Option<&'static str> }

#[allow(dead_code)]
impl Logger {
    pub fn new(scope: Option<&'static str>) -> Self {
        Self { scope }
    }

    fn line(&self, level: &str, level_color: Color, msg: impl Into<String>) -> String {
        let scope = match self.scope {
            Some(value) => format!("[ {:<12} ] ", Paint::green(value)),
            None => "".to_string()
        };

        format!("[{}] [ {:^4} ] {}{}",
                Local::now().format("%H:%M:%S - %m/%d"),
                Paint::new(format!("{:<5}", level)).fg(level_color),
                scope, msg.into())
    }

    pub fn info(&self, msg: impl Into<String>) {
        println!("{}", self.line("Info", Color::Cyan, msg));
    }

    pub fn caut(&self, msg: impl Into<String>) {
        println!("{}", self.line("Caut", Color::Yellow, msg));
    }

    pub fn warn(&self, msg: impl Into<String>) {
        println!("{}", self.line("Warn", Color::Magenta, msg));
    }

    pub fn error(&self, msg: impl Into<String>) {
        eprintln!("{}", self.line("Error", Color::Red, msg));
    }

    pub fn debug(&self, msg: impl Into<String>) {
        println!("{}", self.line("Debug", Color::Blue, msg));
    }

    /// Logs every layer of an `anyhow` chain, outermost first.
    pub fn error_chain(&self, reason: &anyhow::Error) {
        self.error(format!("{}", reason));
        reason.chain().skip(1)
            .for_each(|cause| self.error(format!("  caused by: {}", cause)));
    }
}
