//! String-aware character scanners over raw filter text.
//!
//! Explicit state machines, not regexes: the comment and trailing-comma
//! detectors must never misfire inside string literals, so every character
//! is classified while tracking string/escape/comment state.

/// Scanner state a character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Structural text outside strings and comments.
    Normal,
    /// Inside a double-quoted string literal.
    InString,
    /// The character after a backslash inside a string.
    StringEscape,
    /// Inside a `//` comment.
    LineComment,
    /// Inside a `/* ... */` comment.
    BlockComment,
    /// Inside a block comment, just saw `*`; a `/` next closes it.
    BlockCommentStar,
}

impl State {
    const fn is_comment(self) -> bool {
        matches!(
            self,
            State::LineComment | State::BlockComment | State::BlockCommentStar
        )
    }
}

/// One transition: returns the state the current character is classified
/// under and the state the scanner moves to.
const fn step(state: State, c: char, peek: Option<char>) -> (State, State) {
    match state {
        State::Normal => match (c, peek) {
            ('"', _) => (State::Normal, State::InString),
            ('/', Some('/')) => (State::LineComment, State::LineComment),
            ('/', Some('*')) => (State::BlockComment, State::BlockComment),
            _ => (State::Normal, State::Normal),
        },
        State::InString => match c {
            '\\' => (State::InString, State::StringEscape),
            '"' => (State::InString, State::Normal),
            _ => (State::InString, State::InString),
        },
        State::StringEscape => (State::InString, State::InString),
        State::LineComment => {
            if c == '\n' {
                (State::Normal, State::Normal)
            } else {
                (State::LineComment, State::LineComment)
            }
        }
        State::BlockComment => {
            if c == '*' {
                (State::BlockComment, State::BlockCommentStar)
            } else {
                (State::BlockComment, State::BlockComment)
            }
        }
        State::BlockCommentStar => match c {
            '/' => (State::BlockComment, State::Normal),
            '*' => (State::BlockComment, State::BlockCommentStar),
            _ => (State::BlockComment, State::BlockComment),
        },
    }
}

fn states(text: &str) -> impl Iterator<Item = (usize, char, State)> + '_ {
    let mut state = State::Normal;
    let mut chars = text.char_indices().peekable();
    std::iter::from_fn(move || {
        let (index, c) = chars.next()?;
        let peek = chars.peek().map(|&(_, next)| next);
        let (classified, next_state) = step(state, c, peek);
        state = next_state;
        Some((index, c, classified))
    })
}

/// Byte offset of the first `//` or `/* ... */` marker outside string
/// literals, if any.
pub(crate) fn find_comment(text: &str) -> Option<usize> {
    states(text)
        .find(|(_, _, state)| state.is_comment())
        .map(|(index, _, _)| index)
}

/// Byte offset of the first comma that is followed, skipping only
/// whitespace, by a closing `]` or `}` — outside string literals.
pub(crate) fn find_trailing_comma(text: &str) -> Option<usize> {
    let mut pending: Option<usize> = None;
    for (index, c, state) in states(text) {
        if state == State::Normal {
            if c == ',' {
                pending = Some(index);
            } else if c == ']' || c == '}' {
                if pending.is_some() {
                    return pending;
                }
            } else if !c.is_whitespace() {
                pending = None;
            }
        } else {
            pending = None;
        }
    }
    None
}
