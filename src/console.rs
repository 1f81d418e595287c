//! Line-oriented front end.
//!
//! Each input line is one command. Pointer events take image coordinates:
//!
//! ```text
//! down X Y     press at (X, Y)
//! move X Y     move pointer to (X, Y)
//! up X Y       release at (X, Y)
//! esc          cancel the box being drawn
//! keep on|off  carry annotations forward to the next image
//! save         write the current label file
//! list         show boxes and interactions
//! help         show commands and key bindings
//! quit         save and exit
//! <key>        any bound single-key shortcut
//! ```
//!
//! Label prompts are answered inline with an option number or name; an
//! empty line abandons the prompt.

use std::io::{BufRead, Write};

use thiserror::Error;

use crate::editor::{EditorOutcome, LabelPicker, LabelRequest};
use crate::keybindings::{KeyAction, KeyBindings};
use crate::model::{LabelKind, Point};
use crate::session::{ImageProbe, Navigation, Session, SessionError, Step};

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("Invalid arguments for '{command}': {message}")]
    InvalidArgument { command: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ConsoleError {
    fn invalid_argument(command: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            command: command.to_string(),
            message: message.into(),
        }
    }
}

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleCommand {
    Down(Point),
    Move(Point),
    Up(Point),
    Escape,
    Keep(bool),
    Save,
    List,
    Help,
    Quit,
    Key(char),
}

impl ConsoleCommand {
    /// Parse a line. Blank lines are `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ConsoleError> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = parts.collect();

        let parsed = match command.to_lowercase().as_str() {
            "down" => ConsoleCommand::Down(parse_point(command, &args)?),
            "move" => ConsoleCommand::Move(parse_point(command, &args)?),
            "up" => ConsoleCommand::Up(parse_point(command, &args)?),
            "esc" => ConsoleCommand::Escape,
            "keep" => match args.as_slice() {
                ["on"] => ConsoleCommand::Keep(true),
                ["off"] => ConsoleCommand::Keep(false),
                _ => return Err(ConsoleError::invalid_argument(command, "expected 'on' or 'off'")),
            },
            "save" => ConsoleCommand::Save,
            "list" => ConsoleCommand::List,
            "help" => ConsoleCommand::Help,
            "quit" => ConsoleCommand::Quit,
            _ => {
                let mut chars = command.chars();
                match (chars.next(), chars.next()) {
                    (Some(key), None) if args.is_empty() => ConsoleCommand::Key(key),
                    _ => return Err(ConsoleError::UnknownCommand(command.to_string())),
                }
            }
        };
        Ok(Some(parsed))
    }
}

fn parse_point(command: &str, args: &[&str]) -> Result<Point, ConsoleError> {
    let [x, y] = *args else {
        return Err(ConsoleError::invalid_argument(command, "expected X Y"));
    };
    let coord = |s: &str| {
        s.parse::<f32>()
            .map_err(|e| ConsoleError::invalid_argument(command, format!("'{}': {}", s, e)))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

/// Answers label prompts from the console.
pub struct ConsolePicker<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> ConsolePicker<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, request: &LabelRequest) -> std::io::Result<Option<String>> {
        writeln!(self.output, "{}:", request.title())?;
        for (i, option) in request.options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option)?;
        }
        write!(self.output, "label> ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim();
        if answer.is_empty() {
            return Ok(None);
        }
        let label = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| request.options.get(i).cloned())
            .unwrap_or_else(|| answer.to_string());
        Ok(Some(label))
    }
}

impl<R: BufRead, W: Write> LabelPicker for ConsolePicker<'_, R, W> {
    fn pick(&mut self, request: &LabelRequest) -> Option<String> {
        match self.ask(request) {
            Ok(answer) => answer,
            Err(e) => {
                log::error!("Failed to read label: {}", e);
                None
            }
        }
    }
}

fn describe_outcome(outcome: &EditorOutcome) -> String {
    match outcome {
        EditorOutcome::Unchanged => "nothing to do".to_string(),
        EditorOutcome::Updated => "ok".to_string(),
        EditorOutcome::LabelRequested(request) => format!("waiting for {}", request.title()),
        EditorOutcome::Suspended => "label prompt pending".to_string(),
        EditorOutcome::BoxCommitted(index) => format!("box {} created", index),
        EditorOutcome::LinkCommitted(index) => format!("interaction {} created", index),
        EditorOutcome::Abandoned => "abandoned".to_string(),
        EditorOutcome::Aborted(err) => format!("aborted: {}", err),
    }
}

fn write_listing<P: ImageProbe, W: Write>(session: &Session<P>, output: &mut W) -> std::io::Result<()> {
    let store = session.editor().store();
    if let Some(image) = session.active_image() {
        writeln!(
            output,
            "{} ({}x{}) {}",
            image.file_name,
            image.width,
            image.height,
            session.progress()
        )?;
    }
    for (i, entry) in store.boxes().iter().enumerate() {
        let b = entry.bbox;
        writeln!(
            output,
            "  box {}: {} [{:.0}, {:.0}, {:.0}, {:.0}]",
            i, entry.tag, b.x1, b.y1, b.x2, b.y2
        )?;
    }
    for link in store.links() {
        writeln!(
            output,
            "  {} -> {}: {}",
            link.subject, link.object, link.interaction
        )?;
    }
    Ok(())
}

fn write_help<W: Write>(keys: &KeyBindings, output: &mut W) -> std::io::Result<()> {
    writeln!(output, "commands: down X Y | move X Y | up X Y | esc | keep on|off | save | list | help | quit")?;
    for line in keys.describe() {
        writeln!(output, "  {}", line)?;
    }
    Ok(())
}

fn run_key<P: ImageProbe, W: Write>(
    session: &mut Session<P>,
    action: KeyAction,
    output: &mut W,
) -> Result<(), ConsoleError> {
    let step = match action {
        KeyAction::PreviousImage => Step::Previous,
        KeyAction::NextImage => Step::Next,
        KeyAction::SelectPerson | KeyAction::SelectObject | KeyAction::SelectInteraction => {
            let kind = match action {
                KeyAction::SelectPerson => LabelKind::Person,
                KeyAction::SelectObject => LabelKind::Object,
                _ => LabelKind::Interaction,
            };
            if session.editor_mut().set_label_kind(kind) {
                writeln!(output, "mode: {}", kind.name())?;
            } else {
                writeln!(output, "finish the label prompt first")?;
            }
            return Ok(());
        }
        KeyAction::Reset => {
            session.reset();
            writeln!(output, "annotations cleared")?;
            return Ok(());
        }
    };

    match session.advance(step)? {
        Navigation::Moved(outcome) => writeln!(
            output,
            "image {} ({})",
            session.progress(),
            outcome.name()
        )?,
        Navigation::AtBoundary => writeln!(output, "no more images, saved")?,
    }
    Ok(())
}

/// Drive `session` from `input` until `quit` or end of input. The active
/// image is saved on exit.
pub fn run<P, R, W>(
    session: &mut Session<P>,
    keys: &KeyBindings,
    mut input: R,
    mut output: W,
) -> Result<(), ConsoleError>
where
    P: ImageProbe,
    R: BufRead,
    W: Write,
{
    write_help(keys, &mut output)?;
    loop {
        write!(
            output,
            "[{} {}] > ",
            session.progress(),
            session.editor().label_kind().name()
        )?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match ConsoleCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "{}", e)?;
                continue;
            }
        };
        log::trace!("Console command: {:?}", command);

        let result = match command {
            ConsoleCommand::Down(p) => {
                let mut picker = ConsolePicker::new(&mut input, &mut output);
                let outcome = session.editor_mut().pointer_down_with(p, &mut picker);
                writeln!(output, "{}", describe_outcome(&outcome)).map_err(ConsoleError::from)
            }
            ConsoleCommand::Move(p) => {
                let hint = session.editor_mut().pointer_move(p);
                writeln!(output, "cursor: {:?}", hint).map_err(ConsoleError::from)
            }
            ConsoleCommand::Up(p) => {
                let outcome = session.editor_mut().pointer_up(p);
                writeln!(output, "{}", describe_outcome(&outcome)).map_err(ConsoleError::from)
            }
            ConsoleCommand::Escape => {
                let outcome = session.editor_mut().cancel();
                writeln!(output, "{}", describe_outcome(&outcome)).map_err(ConsoleError::from)
            }
            ConsoleCommand::Keep(enabled) => {
                session.set_carry_forward(enabled);
                Ok(())
            }
            ConsoleCommand::Save => session
                .save()
                .map_err(ConsoleError::from)
                .and_then(|path| writeln!(output, "saved {:?}", path).map_err(ConsoleError::from)),
            ConsoleCommand::List => write_listing(session, &mut output).map_err(ConsoleError::from),
            ConsoleCommand::Help => write_help(keys, &mut output).map_err(ConsoleError::from),
            ConsoleCommand::Quit => break,
            ConsoleCommand::Key(key) => match keys.action_for_key(key) {
                Some(action) => run_key(session, action, &mut output),
                None => Err(ConsoleError::UnknownCommand(key.to_string())),
            },
        };

        match result {
            Ok(()) => {}
            Err(ConsoleError::Io(e)) => return Err(ConsoleError::Io(e)),
            Err(e) => {
                log::error!("{}", e);
                writeln!(output, "error: {}", e)?;
            }
        }
    }

    session.save()?;
    Ok(())
}
