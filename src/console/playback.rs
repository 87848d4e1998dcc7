use std::io::{Stdout, Write};

use crossterm::{
    QueueableCommand,
    event::KeyCode,
    style::{self, Attribute, Color, Stylize},
};

use super::term;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    /// Show the next frame
    Forward,
    /// Show the previous frame
    Backward,
    /// Jump to the first frame
    First,
    /// Jump to the last frame
    Last,
    /// Leave playback
    Exit,
}

impl PlaybackAction {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => Some(Self::Forward),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => Some(Self::Backward),
            KeyCode::Home => Some(Self::First),
            KeyCode::End => Some(Self::Last),
            KeyCode::Esc | KeyCode::Char('q') => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Cursor over a fixed number of frames, for browsing a recorded process.
pub struct Playback {
    num_frames: usize,
    /// Always below `num_frames` unless there are no frames at all.
    index: usize,
}

impl Playback {
    pub fn new(num_frames: usize) -> Self {
        Playback {
            num_frames,
            index: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Moves the cursor. Returns false on [`PlaybackAction::Exit`].
    pub fn apply(&mut self, action: PlaybackAction) -> bool {
        let last = self.num_frames.saturating_sub(1);
        self.index = match action {
            PlaybackAction::Forward => (self.index + 1).min(last),
            PlaybackAction::Backward => self.index.saturating_sub(1),
            PlaybackAction::First => 0,
            PlaybackAction::Last => last,
            PlaybackAction::Exit => return false,
        };
        true
    }

    /// Interactive loop: draws the current frame with `render` and reacts to keys until Esc.
    pub fn run<F>(&mut self, stdout: &mut Stdout, title: &str, render: F) -> std::io::Result<()>
    where
        F: Fn(usize) -> String,
    {
        if self.num_frames == 0 {
            return Ok(());
        }
        tracing::debug!("[playback] {} with {} frames", title, self.num_frames);
        loop {
            term::clear(stdout)?;
            stdout.queue(style::PrintStyledContent(
                format!("{} - frame {}/{}\r\n", title, self.index + 1, self.num_frames)
                    .with(Color::Yellow)
                    .attribute(Attribute::Bold),
            ))?;
            stdout.queue(style::PrintStyledContent(
                "←/→: step  Home/End: jump  Esc: back to menu\r\n\r\n".with(Color::Cyan),
            ))?;
            for line in render(self.index).lines() {
                stdout.queue(style::Print(format!("{}\r\n", line)))?;
            }
            stdout.flush()?;

            if let Some(action) = PlaybackAction::from_key(term::next_key()?) {
                if !self.apply(action) {
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_stays_in_range() {
        let mut playback = Playback::new(3);
        assert!(playback.apply(PlaybackAction::Backward));
        assert_eq!(playback.index(), 0);
        playback.apply(PlaybackAction::Forward);
        playback.apply(PlaybackAction::Forward);
        playback.apply(PlaybackAction::Forward);
        assert_eq!(playback.index(), 2);
        playback.apply(PlaybackAction::First);
        assert_eq!(playback.index(), 0);
        playback.apply(PlaybackAction::Last);
        assert_eq!(playback.index(), 2);
        assert!(!playback.apply(PlaybackAction::Exit));
    }

    #[test]
    fn test_empty_playback() {
        let mut playback = Playback::new(0);
        playback.apply(PlaybackAction::Forward);
        playback.apply(PlaybackAction::Last);
        assert_eq!(playback.index(), 0);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            PlaybackAction::from_key(KeyCode::Right),
            Some(PlaybackAction::Forward)
        );
        assert_eq!(
            PlaybackAction::from_key(KeyCode::Esc),
            Some(PlaybackAction::Exit)
        );
        assert_eq!(PlaybackAction::from_key(KeyCode::Char('x')), None);
    }
}
