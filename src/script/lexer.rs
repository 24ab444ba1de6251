//! Hand-written lexer for the Lua sources attached to tiles.
//!
//! Only breaks the raw text into `Token`s; keywords like `function`, `do`,
//! `end` all come out as `Name(..)` and the scanner on top interprets them.
//! The lexer is where the fiddly Lua surface lives: short strings with
//! escapes, long strings / long comments with bracket levels (`[==[ … ]==]`),
//! and line tracking so errors can point somewhere useful.

use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Identifier or keyword.
    Name(String),
    /// Numeric literal, kept as raw text.
    Number(String),
    /// String literal (short or long form), delimiters stripped.
    Str(String),
    /// Any operator or punctuation, e.g. `"=="`, `"("`, `"..."`.
    Sym(String),
}

#[derive(Clone)]
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
            line: 1,
        }
    }

    /// 1-based line of the most recently produced token or error.
    pub fn line(&self) -> usize {
        self.line
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, pred: F, buf: &mut String) {
        while let Some(c) = self.peek_char() {
            if pred(c) {
                buf.push(c);
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn read_name(&mut self, first: char) -> String {
        let mut id = String::new();
        id.push(first);
        self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_', &mut id);
        id
    }

    fn read_number(&mut self, first: char) -> String {
        let mut num = String::new();
        num.push(first);
        // Lenient: hex digits, dots and exponent markers are all accepted
        // here; we validate structure, not arithmetic.
        loop {
            match self.peek_char() {
                Some(c) if c.is_ascii_alphanumeric() || c == '.' => {
                    num.push(c);
                    self.next_char();
                }
                Some(c @ ('+' | '-'))
                    if matches!(num.chars().last(), Some('e' | 'E' | 'p' | 'P')) =>
                {
                    num.push(c);
                    self.next_char();
                }
                _ => break,
            }
        }
        num
    }

    /// Short string: `'…'` or `"…"`. Raw newlines are illegal in Lua short
    /// strings, a backslash escapes the next character.
    fn read_short_string(&mut self, quote: char) -> Result<String, String> {
        let mut txt = String::new();
        loop {
            match self.next_char() {
                None => return Err("unterminated string".into()),
                Some('\n') => return Err("unterminated string (newline before closing quote)".into()),
                Some(c) if c == quote => return Ok(txt),
                Some('\\') => match self.next_char() {
                    None => return Err("unterminated string".into()),
                    Some(esc) => {
                        txt.push('\\');
                        txt.push(esc);
                    }
                },
                Some(c) => txt.push(c),
            }
        }
    }

    /// Called after the opening `[` when the next chars may form a long
    /// bracket. Returns the level (number of `=` signs) if they do.
    fn try_open_long_bracket(&mut self) -> Option<usize> {
        let mut level = 0;
        let mut probe = self.chars.clone();
        while let Some('=') = probe.peek() {
            probe.next();
            level += 1;
        }
        if probe.peek() == Some(&'[') {
            // commit: consume the `=`s and the second `[`
            for _ in 0..=level {
                self.next_char();
            }
            Some(level)
        } else {
            None
        }
    }

    /// Body of a `[[ … ]]` string or `--[[ … ]]` comment, after the opening
    /// bracket of the given level has been consumed.
    fn read_long_bracket(&mut self, level: usize, what: &str) -> Result<String, String> {
        let mut txt = String::new();
        loop {
            match self.next_char() {
                None => return Err(format!("unterminated {what} (missing `]{}]`)", "=".repeat(level))),
                Some(']') => {
                    let mut eqs = 0;
                    while self.peek_char() == Some('=') {
                        self.next_char();
                        eqs += 1;
                    }
                    if eqs == level && self.peek_char() == Some(']') {
                        self.next_char();
                        return Ok(txt);
                    }
                    txt.push(']');
                    for _ in 0..eqs {
                        txt.push('=');
                    }
                }
                Some(c) => txt.push(c),
            }
        }
    }

    /// `--` already consumed; eat a line comment or a long comment.
    fn skip_comment(&mut self) -> Result<(), String> {
        if self.peek_char() == Some('[') {
            self.next_char();
            if let Some(level) = self.try_open_long_bracket() {
                return self.read_long_bracket(level, "comment").map(|_| ());
            }
            // `--[` not followed by a long bracket is still a line comment
        }
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.next_char();
        }
        Ok(())
    }
}

const SYMBOL_CHARS: &str = "+-*/%^#&~|<>=(){}[];:,.";

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // whitespace
            while let Some(c) = self.peek_char() {
                if c.is_whitespace() {
                    self.next_char();
                } else {
                    break;
                }
            }

            let ch = self.next_char()?;

            let tok = match ch {
                '-' if self.peek_char() == Some('-') => {
                    self.next_char();
                    match self.skip_comment() {
                        Ok(()) => continue,
                        Err(e) => Err(e),
                    }
                }
                '\'' | '"' => self.read_short_string(ch).map(Token::Str),
                '[' => match self.try_open_long_bracket() {
                    Some(level) => self.read_long_bracket(level, "string").map(Token::Str),
                    None => Ok(Token::Sym("[".into())),
                },
                c if c.is_ascii_digit() => Ok(Token::Number(self.read_number(c))),
                c if c.is_ascii_alphabetic() || c == '_' => Ok(Token::Name(self.read_name(c))),
                c if SYMBOL_CHARS.contains(c) => {
                    let mut sym = String::new();
                    sym.push(c);
                    // greedy multi-char operators: == ~= <= >= // .. ... :: << >>
                    match (c, self.peek_char()) {
                        ('=', Some('=')) | ('~', Some('=')) | ('<', Some('=')) | ('>', Some('='))
                        | ('<', Some('<')) | ('>', Some('>')) | ('/', Some('/'))
                        | (':', Some(':')) => {
                            sym.push(self.next_char().unwrap_or_default());
                        }
                        ('.', Some('.')) => {
                            sym.push(self.next_char().unwrap_or_default());
                            if self.peek_char() == Some('.') {
                                sym.push(self.next_char().unwrap_or_default());
                            }
                        }
                        _ => {}
                    }
                    Ok(Token::Sym(sym))
                }
                c => Err(format!("unexpected character `{c}`")),
            };

            return Some(tok);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Lexer, Token};

    fn lex(src: &str) -> Vec<Token> {
        Lexer::new(src).collect::<Result<Vec<_>, _>>().unwrap()
    }

    #[test]
    fn test_tokenisation() {
        assert_eq!(
            lex("function onStep(who)\n  hp = hp - 1\nend"),
            vec![
                Token::Name("function".into()),
                Token::Name("onStep".into()),
                Token::Sym("(".into()),
                Token::Name("who".into()),
                Token::Sym(")".into()),
                Token::Name("hp".into()),
                Token::Sym("=".into()),
                Token::Name("hp".into()),
                Token::Sym("-".into()),
                Token::Number("1".into()),
                Token::Name("end".into()),
            ],
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            lex("a = 1 -- trailing\n--[[ block\ncomment ]] b = 2"),
            vec![
                Token::Name("a".into()),
                Token::Sym("=".into()),
                Token::Number("1".into()),
                Token::Name("b".into()),
                Token::Sym("=".into()),
                Token::Number("2".into()),
            ],
        );
    }

    #[test]
    fn strings_short_and_long() {
        assert_eq!(
            lex(r#"s = "a\"b" .. [==[ raw ]] text ]==]"#),
            vec![
                Token::Name("s".into()),
                Token::Sym("=".into()),
                Token::Str("a\\\"b".into()),
                Token::Sym("..".into()),
                Token::Str(" raw ]] text ".into()),
            ],
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let res: Result<Vec<_>, _> = Lexer::new("s = \"oops\nend").collect();
        assert!(res.unwrap_err().contains("unterminated string"));
    }

    #[test]
    fn unterminated_long_comment_is_an_error() {
        let res: Result<Vec<_>, _> = Lexer::new("--[=[ never closed ]]").collect();
        assert!(res.unwrap_err().contains("unterminated comment"));
    }

    #[test]
    fn line_numbers_follow_newlines() {
        let mut lx = Lexer::new("a\nb\n\nc");
        while lx.next().is_some() {}
        assert_eq!(lx.line(), 4);
    }
}
