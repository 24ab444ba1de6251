//! Script validator for the Lua sources attached to tiles.
//!
//! Two jobs, both purely syntactic: check that a script scans and that its
//! blocks balance (`function`/`if`/`while`/`for`/`do`/`repeat` against
//! `end`/`until`), and extract the ordered list of top-level function names
//! the editing surface offers for binding as `step`/`interact` handlers.
//! Scripts are never executed here.

pub mod lexer;

use crate::error::{Error, Result};
use lexer::{Lexer, Token};

/// Check a script without caring about its functions.
pub fn validate(src: &str) -> Result<()> {
    scan(src).map(|_| ())
}

/// Names of top-level `function NAME(...)` declarations, in source order.
///
/// `local function` and dotted/method names (`a.b`, `a:b`) are left out:
/// the runtime resolves event handlers as plain globals, so only those are
/// bindable.
pub fn extract_functions(src: &str) -> Result<Vec<String>> {
    scan(src)
}

fn scan(src: &str) -> Result<Vec<String>> {
    let mut lx = Lexer::new(src);
    let mut tokens: Vec<(Token, usize)> = Vec::new();
    while let Some(res) = lx.next() {
        match res {
            Ok(tok) => tokens.push((tok, lx.line())),
            Err(message) => {
                return Err(Error::Parse {
                    line: lx.line(),
                    message,
                });
            }
        }
    }
    let last_line = lx.line();

    let mut names = Vec::new();
    let mut depth = 0usize;
    // depths at which a `while`/`for` head is still waiting for its `do`
    let mut pending_do: Vec<usize> = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let (tok, line) = &tokens[i];
        let line = *line;
        if let Token::Name(word) = tok {
            match word.as_str() {
                "function" => {
                    function_head(&tokens, i, depth == 0, &mut names, line)?;
                    depth += 1;
                }
                "local" if matches!(tokens.get(i + 1), Some((Token::Name(w), _)) if w == "function") => {
                    // `local function f` is a block opener too, just never a
                    // bindable handler
                    i += 1;
                    function_head(&tokens, i, false, &mut names, tokens[i].1)?;
                    depth += 1;
                }
                "if" | "repeat" => depth += 1,
                "while" | "for" => {
                    depth += 1;
                    pending_do.push(depth);
                }
                "do" => {
                    if pending_do.last() == Some(&depth) {
                        pending_do.pop();
                    } else {
                        depth += 1;
                    }
                }
                "end" => {
                    if pending_do.last() == Some(&depth) {
                        return Err(parse_err(line, "`do` expected before `end`"));
                    }
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| parse_err(line, "`end` with no matching block"))?;
                }
                "until" => {
                    if pending_do.last() == Some(&depth) {
                        return Err(parse_err(line, "`do` expected before `until`"));
                    }
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| parse_err(line, "`until` with no matching `repeat`"))?;
                }
                _ => {}
            }
        }
        i += 1;
    }

    if depth != 0 || !pending_do.is_empty() {
        return Err(parse_err(last_line, "missing `end` at end of script"));
    }
    Ok(names)
}

const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if",
    "in", "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Look ahead past a `function` keyword at `tokens[at]`: the head must be a
/// name or an open paren (anonymous). Plain top-level names are recorded.
fn function_head(
    tokens: &[(Token, usize)],
    at: usize,
    top_level: bool,
    names: &mut Vec<String>,
    line: usize,
) -> Result<()> {
    match tokens.get(at + 1) {
        // anonymous: `function (args)`
        Some((Token::Sym(s), _)) if s == "(" => Ok(()),
        Some((Token::Name(name), _)) if !KEYWORDS.contains(&name.as_str()) => {
            let dotted = matches!(
                tokens.get(at + 2),
                Some((Token::Sym(s), _)) if s == "." || s == ":"
            );
            if top_level && !dotted {
                names.push(name.clone());
            }
            Ok(())
        }
        _ => Err(parse_err(line, "function name expected after `function`")),
    }
}

fn parse_err(line: usize, message: &str) -> Error {
    Error::Parse {
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_top_level_functions_in_order() {
        let src = "\
function onStep(who)\n\
  who.hp = who.hp - 1\n\
end\n\
\n\
function onInteract()\n\
  say('hello')\n\
end\n";
        assert_eq!(extract_functions(src).unwrap(), vec!["onStep", "onInteract"]);
    }

    #[test]
    fn nested_and_local_functions_are_excluded() {
        let src = "\
local function helper() end\n\
function outer()\n\
  function inner() end\n\
end\n\
function a.b() end\n\
function a:c() end\n";
        assert_eq!(extract_functions(src).unwrap(), vec!["outer"]);
    }

    #[test]
    fn control_blocks_balance() {
        let src = "\
function tick()\n\
  for i = 1, 10 do\n\
    while alive do\n\
      if i == 2 then\n\
        break\n\
      elseif i == 3 then\n\
        return\n\
      else\n\
        i = i + 1\n\
      end\n\
    end\n\
  end\n\
  repeat\n\
    i = i - 1\n\
  until i == 0\n\
  do\n\
    local x = 1\n\
  end\n\
end\n";
        assert!(validate(src).is_ok());
    }

    #[test]
    fn missing_end_is_reported_with_line() {
        let err = validate("function f()\n  x = 1\n").unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("missing `end`"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stray_end_is_an_error() {
        assert!(matches!(
            validate("end"),
            Err(Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn while_without_do_is_an_error() {
        let err = validate("while x end").unwrap_err();
        assert!(err.to_string().contains("`do` expected"));
    }

    #[test]
    fn anonymous_function_in_loop_head_is_fine() {
        let src = "while (function() return true end)() do break end";
        assert!(validate(src).is_ok());
    }

    #[test]
    fn lexer_errors_become_parse_errors() {
        let err = validate("function f()\n  s = \"oops\nend").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn empty_script_has_no_functions() {
        assert_eq!(extract_functions("").unwrap(), Vec::<String>::new());
    }
}
