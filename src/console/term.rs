//! Raw-mode terminal plumbing shared by the menus and playback.

use std::io::{self, Stdout, Write};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode, KeyEventKind},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

/// Keeps the terminal in raw mode on the alternate screen until dropped.
pub struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            // The panic message is lost on the alternate screen
            let _ = leave(&mut io::stdout());
            previous(info);
        }));

        let mut stdout = io::stdout();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(TerminalGuard { stdout })
    }

    pub fn stdout(&mut self) -> &mut Stdout {
        &mut self.stdout
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = leave(&mut self.stdout) {
            tracing::warn!("[console] failed to restore terminal: {}", e);
        }
    }
}

fn leave(stdout: &mut Stdout) -> io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()
}

/// Blocks until a key is pressed. Repeats and releases are skipped.
pub fn next_key() -> io::Result<KeyCode> {
    loop {
        if let event::Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key.code);
            }
        }
    }
}

pub fn wait_for_esc() -> io::Result<()> {
    while next_key()? != KeyCode::Esc {}
    Ok(())
}

pub fn clear(stdout: &mut Stdout) -> io::Result<()> {
    queue!(stdout, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))
}

/// Raw mode does not return the carriage on `\n`, so every line gets an explicit `\r\n`.
pub fn print_block(stdout: &mut Stdout, text: &str) -> io::Result<()> {
    for line in text.lines() {
        stdout.queue(style::Print(format!("{}\r\n", line)))?;
    }
    stdout.flush()
}

pub fn print_message(stdout: &mut Stdout, msg: &str, color: Color) -> io::Result<()> {
    stdout.execute(style::PrintStyledContent(
        format!("{}\r\n", msg).with(color).attribute(Attribute::Bold),
    ))?;
    Ok(())
}

/// Menu cursor after `code`; wraps at both ends.
fn move_selection(selected: usize, len: usize, code: KeyCode) -> usize {
    match code {
        KeyCode::Up => selected.checked_sub(1).unwrap_or(len - 1),
        KeyCode::Down => (selected + 1) % len,
        _ => selected,
    }
}

/// Arrow-key menu below the cursor. `None` on Esc.
pub fn select<T: std::fmt::Display + Copy>(
    stdout: &mut Stdout,
    prompt: &str,
    options: &[T],
) -> io::Result<Option<T>> {
    if options.is_empty() {
        return Ok(None);
    }
    queue!(stdout, cursor::Hide, cursor::SavePosition)?;

    let mut selected = 0;
    let choice = loop {
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown)
        )?;
        stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;
        for (i, option) in options.iter().enumerate() {
            let line = format!("\r\n{}", option);
            if i == selected {
                stdout.queue(style::PrintStyledContent(line.attribute(Attribute::Reverse)))?;
            } else {
                stdout.queue(style::Print(line))?;
            }
        }
        stdout.flush()?;

        match next_key()? {
            KeyCode::Enter => break Some(options[selected]),
            KeyCode::Esc => break None,
            code => selected = move_selection(selected, options.len(), code),
        }
    };

    queue!(
        stdout,
        cursor::RestorePosition,
        terminal::Clear(ClearType::FromCursorDown)
    )?;
    if let Some(option) = choice {
        stdout.queue(style::PrintStyledContent(
            format!("{} {}\r\n", prompt, option).with(Color::Green),
        ))?;
    }
    stdout.flush()?;
    Ok(choice)
}

/// Applies an editing key to a single-word input line.
fn edit_line(input: &mut String, code: KeyCode) {
    match code {
        KeyCode::Char(c) if !c.is_whitespace() && !c.is_control() => input.push(c),
        KeyCode::Backspace => {
            input.pop();
        }
        _ => {}
    }
}

/// Reads one value, validating on every keystroke: green while `validate` accepts the
/// input, red with its message otherwise. Enter only submits a valid value; Esc gives `None`.
pub fn prompt<T>(
    stdout: &mut Stdout,
    label: &str,
    validate: impl Fn(&str) -> Result<T, String>,
) -> io::Result<Option<T>> {
    queue!(stdout, cursor::Hide, cursor::SavePosition)?;

    let mut input = String::new();
    let value = loop {
        let checked = validate(input.trim());
        let color = if checked.is_ok() {
            Color::Green
        } else {
            Color::Red
        };
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            style::PrintStyledContent(label.with(Color::Cyan).attribute(Attribute::Bold)),
            style::PrintStyledContent(input.as_str().with(color)),
            style::Print(" \r\n")
        )?;
        if let Err(msg) = &checked {
            stdout.queue(style::PrintStyledContent(
                msg.as_str().with(Color::DarkGrey).attribute(Attribute::Dim),
            ))?;
        }
        stdout.flush()?;

        match (next_key()?, checked) {
            (KeyCode::Enter, Ok(v)) => break Some(v),
            (KeyCode::Esc, _) => break None,
            (code, _) => edit_line(&mut input, code),
        }
    };

    queue!(
        stdout,
        cursor::RestorePosition,
        terminal::Clear(ClearType::FromCursorDown),
        cursor::Show
    )?;
    if value.is_some() {
        stdout.queue(style::PrintStyledContent(
            format!("{}{}\r\n", label, input.trim()).with(Color::Green),
        ))?;
    }
    stdout.flush()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        assert_eq!(move_selection(0, 3, KeyCode::Up), 2);
        assert_eq!(move_selection(2, 3, KeyCode::Down), 0);
        assert_eq!(move_selection(1, 3, KeyCode::Down), 2);
        assert_eq!(move_selection(1, 3, KeyCode::Char('j')), 1);
    }

    #[test]
    fn test_edit_line() {
        let mut input = String::new();
        for code in [
            KeyCode::Char('4'),
            KeyCode::Char(' '),
            KeyCode::Char('2'),
            KeyCode::Tab,
        ] {
            edit_line(&mut input, code);
        }
        assert_eq!(input, "42");
        edit_line(&mut input, KeyCode::Backspace);
        edit_line(&mut input, KeyCode::Backspace);
        edit_line(&mut input, KeyCode::Backspace);
        assert_eq!(input, "");
    }
}
