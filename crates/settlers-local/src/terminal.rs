//! Line-based terminal protocol.
//!
//! Input is one pointer event per line: `up X Y`, `down X Y` or `quit`.
//! Output is one JSON object per game event, tagged with `type` and `payload`.

use settlers_core::{GameEvent, InputEvent, InputSource, RenderSink};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("expected two integer coordinates")]
    BadCoordinates,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<InputEvent>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let event = match command.to_ascii_lowercase().as_str() {
        "quit" | "q" => InputEvent::Quit,
        "up" => {
            let (x, y) = coordinates(&mut words)?;
            InputEvent::PointerUp { x, y }
        }
        "down" => {
            let (x, y) = coordinates(&mut words)?;
            InputEvent::PointerDown { x, y }
        }
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(event))
}

fn coordinates<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<(i32, i32), ParseError> {
    let mut next = || {
        words
            .next()
            .and_then(|w| w.parse().ok())
            .ok_or(ParseError::BadCoordinates)
    };
    let x = next()?;
    let y = next()?;
    if words.next().is_some() {
        return Err(ParseError::BadCoordinates);
    }
    Ok((x, y))
}

/// Pointer events read from a line stream; end of input quits
pub struct LineInput<R> {
    reader: R,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn next_event(&mut self) -> InputEvent {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    debug!("end of input");
                    return InputEvent::Quit;
                }
                Ok(_) => match parse_line(&line) {
                    Ok(Some(event)) => return event,
                    Ok(None) => continue,
                    Err(e) => warn!("Ignoring input line {:?}: {}", line.trim_end(), e),
                },
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    return InputEvent::Quit;
                }
            }
        }
    }
}

/// Writes each event as a JSON line and flushes it straight away
pub struct JsonSink<W> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// The first write failure, if any. Nothing more is written after one.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_event(&mut self, event: &GameEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write> RenderSink for JsonSink<W> {
    fn notify(&mut self, event: GameEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_event(&event) {
            warn!("Failed to write event: {}", e);
            self.error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("up 10 20"), Ok(Some(InputEvent::PointerUp { x: 10, y: 20 })));
        assert_eq!(
            parse_line("  DOWN -5 7\n"),
            Ok(Some(InputEvent::PointerDown { x: -5, y: 7 }))
        );
        assert_eq!(parse_line("quit"), Ok(Some(InputEvent::Quit)));
        assert_eq!(parse_line("   \n"), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_line("click 1 2"),
            Err(ParseError::UnknownCommand("click".into()))
        );
        assert_eq!(parse_line("up 1"), Err(ParseError::BadCoordinates));
        assert_eq!(parse_line("up a b"), Err(ParseError::BadCoordinates));
        assert_eq!(parse_line("up 1 2 3"), Err(ParseError::BadCoordinates));
    }

    #[test]
    fn test_line_input_skips_bad_lines_and_quits_at_end() {
        let mut input = LineInput::new(Cursor::new("nonsense\n\nup 3 4\n"));
        assert_eq!(input.next_event(), InputEvent::PointerUp { x: 3, y: 4 });
        assert_eq!(input.next_event(), InputEvent::Quit);
    }

    #[test]
    fn test_json_sink_writes_tagged_lines() {
        let mut sink = JsonSink::new(Vec::new());
        sink.notify(GameEvent::DiceRolled {
            player: 2,
            total: 8,
        });
        sink.notify(GameEvent::TurnTextChanged {
            text: "roll".into(),
        });

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"type":"DiceRolled","payload":{"player":2,"total":8}}"#,
                r#"{"type":"TurnTextChanged","payload":{"text":"roll"}}"#,
            ]
        );
    }
}
