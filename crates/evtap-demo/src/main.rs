#![forbid(unsafe_code)]

//! Interactive inspector demo.
//!
//! Runs a raw-mode terminal loop, translates crossterm input into evtap
//! events against a live text field, and prints the inspector transcript as
//! it grows. Deferred echoes drain whenever the input goes quiet for a
//! poll interval, so `Timeout` lines show the field state a beat later.
//!
//! Usage:
//!
//! ```text
//! evtap-demo [--only CAT[,CAT...]] [--trace PATH[.gz]]
//! ```
//!
//! Type into the field; Esc or Ctrl+C exits and prints the per-kind counts.
//! Set `RUST_LOG=debug` to see the tracing feed on stderr.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton as CtMouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use evtap::{
    Clock, Error, EventCategory, EventKind, InputEvent, Inspector, Modifiers, MouseButton, Result,
    SystemClock, TextFieldState, TraceWriter,
};
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let options = Options::parse(std::env::args().skip(1))?;

    let mut inspector = Inspector::new();
    match &options.only {
        Some(categories) => {
            for &category in categories {
                inspector.set_category_enabled(category, true);
            }
        }
        None => inspector.set_all_enabled(true),
    }

    let mut recorder = match &options.trace_path {
        Some(path) => Some(open_trace(path)?),
        None => None,
    };

    print!("evtap demo: type, click, or paste; Esc or Ctrl+C exits.\r\n\r\n");

    enable_raw_mode()?;
    let _guard = RawGuard;
    crossterm::execute!(io::stdout(), EnableMouseCapture, EnableBracketedPaste)?;

    let result = run(&mut inspector, recorder.as_mut());

    if let Some(recorder) = recorder {
        recorder.finish()?;
    }

    print!("\r\nEvent counts:\r\n");
    for (kind, count) in inspector.counters().snapshot() {
        print!("  {kind}: {count}\r\n");
    }
    io::stdout().flush().map_err(Error::from)?;

    result
}

/// Command-line options.
struct Options {
    only: Option<Vec<EventCategory>>,
    trace_path: Option<String>,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut only = None;
        let mut trace_path = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--only" => {
                    let list = args.next().unwrap_or_default();
                    let mut categories = Vec::new();
                    for name in list.split(',').filter(|s| !s.is_empty()) {
                        let category = EventCategory::ALL
                            .into_iter()
                            .find(|c| c.as_str() == name)
                            .ok_or_else(|| {
                                Error::from(io::Error::new(
                                    io::ErrorKind::InvalidInput,
                                    format!("unknown category: {name}"),
                                ))
                            })?;
                        categories.push(category);
                    }
                    only = Some(categories);
                }
                "--trace" => {
                    trace_path = args.next();
                }
                other => {
                    return Err(Error::from(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("unknown argument: {other}"),
                    )));
                }
            }
        }
        Ok(Self { only, trace_path })
    }
}

/// Trace writer over a boxed sink so plain and gzip share one type.
fn open_trace(path: &str) -> Result<TraceWriter<Box<dyn Write>>> {
    let file = std::fs::File::create(path).map_err(Error::from)?;
    let sink: Box<dyn Write> = if path.ends_with(".gz") {
        Box::new(flate2::write::GzEncoder::new(
            file,
            flate2::Compression::fast(),
        ))
    } else {
        Box::new(file)
    };
    TraceWriter::from_writer(sink, "evtap-demo").map_err(Error::from)
}

/// Restore the terminal no matter how the loop ends.
struct RawGuard;

impl Drop for RawGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(io::stdout(), DisableMouseCapture, DisableBracketedPaste);
        let _ = disable_raw_mode();
    }
}

fn run(
    inspector: &mut Inspector,
    mut recorder: Option<&mut TraceWriter<Box<dyn Write>>>,
) -> Result<()> {
    let clock = SystemClock;
    let mut field = TextFieldState::new();
    let mut printed = 0;

    loop {
        if event::poll(POLL_INTERVAL).map_err(Error::from)? {
            let ct_event = event::read().map_err(Error::from)?;
            if should_exit(&ct_event) {
                inspector.flush_deferred(Some(&field));
                printed = print_new_lines(inspector, printed)?;
                return Ok(());
            }
            for event in translate(&ct_event, &mut field) {
                let observed = inspector.observe(&event, Some(&field));
                if let (Some(ordinal), Some(recorder)) = (observed, recorder.as_deref_mut()) {
                    recorder
                        .record(&event, clock.now_ms(), ordinal)
                        .map_err(Error::from)?;
                }
            }
        } else {
            // Quiet poll: this is "later" for the deferred echoes.
            inspector.flush_deferred(Some(&field));
        }
        printed = print_new_lines(inspector, printed)?;
    }
}

fn print_new_lines(inspector: &Inspector, printed: usize) -> Result<usize> {
    let lines = inspector.transcript().lines();
    let mut stdout = io::stdout();
    for line in &lines[printed..] {
        write!(stdout, "{line}\r\n").map_err(Error::from)?;
    }
    stdout.flush().map_err(Error::from)?;
    Ok(lines.len())
}

fn should_exit(event: &CtEvent) -> bool {
    matches!(
        event,
        CtEvent::Key(KeyEvent {
            code: KeyCode::Esc,
            kind: KeyEventKind::Press,
            ..
        })
    ) || matches!(
        event,
        CtEvent::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL)
    )
}

/// Translate one terminal event into the evtap events it implies, applying
/// edits to the field along the way (the terminal has no text field of its
/// own, so the demo maintains one).
fn translate(ct_event: &CtEvent, field: &mut TextFieldState) -> Vec<InputEvent> {
    match ct_event {
        CtEvent::Key(key) => translate_key(key, field),
        CtEvent::Mouse(mouse) => translate_mouse(mouse),
        CtEvent::Paste(text) => {
            field.insert(text);
            vec![
                InputEvent::clipboard(EventKind::Paste, Some(text.clone())),
                InputEvent::edit(EventKind::Input, Some(text.clone()), "insertFromPaste", false),
            ]
        }
        CtEvent::FocusGained | CtEvent::FocusLost | CtEvent::Resize(..) => Vec::new(),
    }
}

fn translate_key(key: &KeyEvent, field: &mut TextFieldState) -> Vec<InputEvent> {
    let modifiers = convert_modifiers(key.modifiers);
    let (code, name, legacy) = describe_key(key.code);

    if key.kind == KeyEventKind::Release {
        return vec![
            InputEvent::key(EventKind::KeyUp, code, name, legacy).with_modifiers(modifiers),
        ];
    }

    let mut events =
        vec![InputEvent::key(EventKind::KeyDown, code.clone(), name.clone(), legacy)
            .with_modifiers(modifiers)];

    match key.code {
        KeyCode::Char('a') if modifiers.contains(Modifiers::CTRL) => {
            field.select_all();
            events.push(InputEvent::selection(EventKind::SelectStart));
            events.push(InputEvent::selection(EventKind::SelectionChange));
        }
        KeyCode::Char(c) if !modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => {
            let text = c.to_string();
            events.push(
                InputEvent::key(EventKind::KeyPress, code, name, legacy)
                    .with_modifiers(modifiers),
            );
            events.push(InputEvent::edit(
                EventKind::BeforeInput,
                Some(text.clone()),
                "insertText",
                false,
            ));
            field.insert(&text);
            events.push(InputEvent::edit(
                EventKind::Input,
                Some(text),
                "insertText",
                false,
            ));
        }
        KeyCode::Backspace => {
            events.push(InputEvent::edit(
                EventKind::BeforeInput,
                None,
                "deleteContentBackward",
                false,
            ));
            if field.backspace() {
                events.push(InputEvent::edit(
                    EventKind::Input,
                    None,
                    "deleteContentBackward",
                    false,
                ));
            }
        }
        KeyCode::Delete => {
            events.push(InputEvent::edit(
                EventKind::BeforeInput,
                None,
                "deleteContentForward",
                false,
            ));
            if field.delete_forward() {
                events.push(InputEvent::edit(
                    EventKind::Input,
                    None,
                    "deleteContentForward",
                    false,
                ));
            }
        }
        KeyCode::Left => {
            field.set_cursor(field.cursor_pos().saturating_sub(1));
            events.push(InputEvent::selection(EventKind::SelectionChange));
        }
        KeyCode::Right => {
            field.set_cursor(field.cursor_pos() + 1);
            events.push(InputEvent::selection(EventKind::SelectionChange));
        }
        KeyCode::Home => {
            field.set_cursor(0);
            events.push(InputEvent::selection(EventKind::SelectionChange));
        }
        KeyCode::End => {
            field.set_cursor(field.grapheme_len());
            events.push(InputEvent::selection(EventKind::SelectionChange));
        }
        _ => {}
    }

    events
}

fn translate_mouse(mouse: &MouseEvent) -> Vec<InputEvent> {
    let x = i32::from(mouse.column);
    let y = i32::from(mouse.row);
    match mouse.kind {
        MouseEventKind::Down(button) => vec![InputEvent::mouse(
            EventKind::MouseDown,
            x,
            y,
            convert_button(button),
        )],
        MouseEventKind::Up(button) => {
            let button = convert_button(button);
            let mut events = vec![InputEvent::mouse(EventKind::MouseUp, x, y, button)];
            if button == MouseButton::Left {
                events.push(InputEvent::mouse(EventKind::Click, x, y, button));
            }
            events
        }
        MouseEventKind::Drag(button) => vec![InputEvent::mouse(
            EventKind::MouseMove,
            x,
            y,
            convert_button(button),
        )],
        MouseEventKind::Moved => vec![InputEvent::mouse(
            EventKind::MouseMove,
            x,
            y,
            MouseButton::Left,
        )],
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => Vec::new(),
    }
}

fn convert_modifiers(ct: KeyModifiers) -> Modifiers {
    let mut modifiers = Modifiers::NONE;
    if ct.contains(KeyModifiers::SHIFT) {
        modifiers |= Modifiers::SHIFT;
    }
    if ct.contains(KeyModifiers::ALT) {
        modifiers |= Modifiers::ALT;
    }
    if ct.contains(KeyModifiers::CONTROL) {
        modifiers |= Modifiers::CTRL;
    }
    if ct.contains(KeyModifiers::SUPER) || ct.contains(KeyModifiers::META) {
        modifiers |= Modifiers::META;
    }
    modifiers
}

fn convert_button(button: CtMouseButton) -> MouseButton {
    match button {
        CtMouseButton::Left => MouseButton::Left,
        CtMouseButton::Right => MouseButton::Right,
        CtMouseButton::Middle => MouseButton::Middle,
    }
}

/// DOM-style (code, key, legacy keyCode) triple for a terminal key.
fn describe_key(code: KeyCode) -> (String, String, u16) {
    match code {
        KeyCode::Char(c) => {
            let code = if c.is_ascii_alphabetic() {
                format!("Key{}", c.to_ascii_uppercase())
            } else if c.is_ascii_digit() {
                format!("Digit{c}")
            } else {
                "Unidentified".to_string()
            };
            let legacy = if c.is_ascii() {
                u16::from(c.to_ascii_uppercase() as u8)
            } else {
                0
            };
            (code, c.to_string(), legacy)
        }
        KeyCode::Enter => ("Enter".into(), "Enter".into(), 13),
        KeyCode::Esc => ("Escape".into(), "Escape".into(), 27),
        KeyCode::Backspace => ("Backspace".into(), "Backspace".into(), 8),
        KeyCode::Tab => ("Tab".into(), "Tab".into(), 9),
        KeyCode::Delete => ("Delete".into(), "Delete".into(), 46),
        KeyCode::Insert => ("Insert".into(), "Insert".into(), 45),
        KeyCode::Home => ("Home".into(), "Home".into(), 36),
        KeyCode::End => ("End".into(), "End".into(), 35),
        KeyCode::PageUp => ("PageUp".into(), "PageUp".into(), 33),
        KeyCode::PageDown => ("PageDown".into(), "PageDown".into(), 34),
        KeyCode::Left => ("ArrowLeft".into(), "ArrowLeft".into(), 37),
        KeyCode::Up => ("ArrowUp".into(), "ArrowUp".into(), 38),
        KeyCode::Right => ("ArrowRight".into(), "ArrowRight".into(), 39),
        KeyCode::Down => ("ArrowDown".into(), "ArrowDown".into(), 40),
        KeyCode::F(n) => (format!("F{n}"), format!("F{n}"), 111 + u16::from(n)),
        _ => ("Unidentified".into(), "Unidentified".into(), 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_a_char_emits_the_full_sequence() {
        let mut field = TextFieldState::new();
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        let events = translate_key(&key, &mut field);
        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [
                EventKind::KeyDown,
                EventKind::KeyPress,
                EventKind::BeforeInput,
                EventKind::Input,
            ]
        );
        assert_eq!(field.value(), "a");
    }

    #[test]
    fn ctrl_char_does_not_edit_the_field() {
        let mut field = TextFieldState::new();
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        let events = translate_key(&key, &mut field);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::KeyDown);
        assert_eq!(field.value(), "");
    }

    #[test]
    fn backspace_on_empty_field_skips_the_input_event() {
        let mut field = TextFieldState::new();
        let key = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        let kinds: Vec<EventKind> = translate_key(&key, &mut field)
            .iter()
            .map(|e| e.kind)
            .collect();
        assert_eq!(kinds, [EventKind::KeyDown, EventKind::BeforeInput]);
    }

    #[test]
    fn left_mouse_up_also_clicks() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Up(CtMouseButton::Left),
            column: 2,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        let kinds: Vec<EventKind> = translate_mouse(&mouse).iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [EventKind::MouseUp, EventKind::Click]);
    }

    #[test]
    fn describe_key_maps_dom_names() {
        assert_eq!(
            describe_key(KeyCode::Char('a')),
            ("KeyA".to_string(), "a".to_string(), 65)
        );
        assert_eq!(
            describe_key(KeyCode::Char('7')),
            ("Digit7".to_string(), "7".to_string(), 55)
        );
        assert_eq!(describe_key(KeyCode::Enter).2, 13);
    }

    #[test]
    fn options_parse_only_and_trace() {
        let options = Options::parse(
            ["--only", "keyboard,mouse", "--trace", "out.jsonl.gz"]
                .into_iter()
                .map(String::from),
        )
        .unwrap();
        assert_eq!(
            options.only,
            Some(vec![EventCategory::Keyboard, EventCategory::Mouse])
        );
        assert_eq!(options.trace_path.as_deref(), Some("out.jsonl.gz"));
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(Options::parse(["--only", "gamepad"].into_iter().map(String::from)).is_err());
    }
}
