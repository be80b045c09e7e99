//! Path pattern utilities for sliceplan
//!
//! Slice contents may name paths with wildcards. Two declarations overlap when
//! a single concrete path would be matched by both of them, which can happen
//! even when both sides hold wildcards (`/usr/lib/*.so` and `/usr/**/libc.*`).

/// One unit of a path pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// `**`: any run of characters, separators included
    AnyPath,
    /// `*`: any run of characters within one path component
    AnyRun,
    /// `?`: exactly one character other than `/`
    AnyChar,
    Literal(char),
}

impl Token {
    /// Whether this token can stand for exactly the single character `ch`.
    fn accepts(self, ch: char) -> bool {
        match self {
            Token::AnyPath => true,
            Token::AnyRun | Token::AnyChar => ch != '/',
            Token::Literal(lit) => lit == ch,
        }
    }

    fn is_run(self) -> bool {
        matches!(self, Token::AnyPath | Token::AnyRun)
    }
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        let token = match ch {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                Token::AnyPath
            }
            '*' => Token::AnyRun,
            '?' => Token::AnyChar,
            other => Token::Literal(other),
        };
        tokens.push(token);
    }
    tokens
}

/// Returns whether the path contains any wildcard character.
pub fn has_wildcards(path: &str) -> bool {
    path.contains(['*', '?'])
}

/// Returns whether some concrete path is matched by both `a` and `b`.
///
/// `**` matches anything, `*` matches anything except `/`, `?` matches one
/// character except `/`. Every other character only matches itself.
pub fn glob_overlap(a: &str, b: &str) -> bool {
    let a = tokenize(a);
    let b = tokenize(b);
    let width = b.len() + 1;

    // reach[i * width + j]: a[..i] and b[..j] can describe the same string.
    let mut reach = vec![false; (a.len() + 1) * width];
    reach[0] = true;

    for i in 0..=a.len() {
        for j in 0..=b.len() {
            if !reach[i * width + j] {
                continue;
            }
            let ta = a.get(i).copied();
            let tb = b.get(j).copied();

            // A run may match nothing at all.
            if ta.is_some_and(Token::is_run) {
                reach[(i + 1) * width + j] = true;
            }
            if tb.is_some_and(Token::is_run) {
                reach[i * width + j + 1] = true;
            }

            let (Some(ta), Some(tb)) = (ta, tb) else {
                continue;
            };
            // A run swallows one unit of the other side and stays in place.
            if ta.is_run() && absorbs(ta, tb) {
                reach[i * width + j + 1] = true;
            }
            if tb.is_run() && absorbs(tb, ta) {
                reach[(i + 1) * width + j] = true;
            }
            // Both sides consume one character that they agree on.
            if !ta.is_run() && !tb.is_run() && single_overlap(ta, tb) {
                reach[(i + 1) * width + j + 1] = true;
            }
        }
    }

    reach[a.len() * width + b.len()]
}

/// Whether `run` can cover some string the other token stands for.
fn absorbs(run: Token, other: Token) -> bool {
    match (run, other) {
        (Token::AnyPath, _) => true,
        // Wildcards on the other side can always pick a separator-free string.
        (Token::AnyRun, Token::Literal(ch)) => ch != '/',
        (Token::AnyRun, _) => true,
        _ => false,
    }
}

/// Whether two single-character tokens share at least one character.
fn single_overlap(a: Token, b: Token) -> bool {
    match (a, b) {
        (Token::Literal(x), Token::Literal(y)) => x == y,
        (Token::Literal(ch), other) | (other, Token::Literal(ch)) => other.accepts(ch),
        // `?` against `?` always agrees on some non-separator character.
        _ => true,
    }
}
