//! Forwards `tracing` events to the browser devtools console.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::error::CalculatorError;

#[derive(Debug, Default)]
struct ConsoleLine {
    message: String,
    fields: String,
}

impl ConsoleLine {
    fn render(&self, target: &str) -> String {
        format!("{}: {}{}", target, self.message, self.fields)
    }
}

impl Visit for ConsoleLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

pub struct ConsoleLayer {
    max_level: Level,
}

impl ConsoleLayer {
    pub fn new(max_level: Level) -> Self {
        Self { max_level }
    }

    fn enabled_for(&self, level: &Level) -> bool {
        *level <= self.max_level
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let level = meta.level();
        if !self.enabled_for(level) {
            return;
        }

        let mut line = ConsoleLine::default();
        event.record(&mut line);
        let text = line.render(meta.target());

        if *level == Level::ERROR {
            gloo::console::error!(text);
        } else if *level == Level::WARN {
            gloo::console::warn!(text);
        } else if *level == Level::INFO {
            gloo::console::info!(text);
        } else {
            gloo::console::debug!(text);
        }
    }
}

/// Installs the console layer as the global subscriber. Call once, from the browser.
pub fn init(max_level: Level) -> Result<(), CalculatorError> {
    let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new(max_level));
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| CalculatorError::Logging(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filter_keeps_less_verbose_events() {
        let layer = ConsoleLayer::new(Level::INFO);
        assert!(layer.enabled_for(&Level::ERROR));
        assert!(layer.enabled_for(&Level::INFO));
        assert!(!layer.enabled_for(&Level::DEBUG));
        assert!(!layer.enabled_for(&Level::TRACE));
    }

    #[test]
    fn line_renders_target_message_and_fields() {
        let line = ConsoleLine {
            message: "stake fixed".into(),
            fields: " leg=2".into(),
        };
        assert_eq!(line.render("surebet::state"), "surebet::state: stake fixed leg=2");
    }
}
