//! Text codec for the brace-section config file format.
//!
//! ```text
//! server {
//!   port = 0
//! }
//! application {
//!   osc_prefix = "/monome"
//!   host = "127.0.0.1"
//!   port = 8000
//! }
//! device {
//!   rotation = 0
//! }
//! ```
//!
//! A file is a sequence of entries.  An entry is either `name = value` or
//! `name { entries }`.  Values are integers (decimal or `0x` hex), floats,
//! booleans (`true`/`yes`/`on`, `false`/`no`/`off`), double-quoted strings
//! with backslash escapes, single-quoted strings taken literally, bare
//! words, or `{ value, value }` lists.  `#` and `//` start a line comment;
//! `/* */` is a block comment.  Commas and semicolons between entries are
//! ignored.  Indentation is free-form.
//!
//! [`parse`] keeps names exactly as written and keeps duplicates, so the
//! caller decides how to fold case and which duplicate wins.  Values come
//! back as [`toml::Value`] so serde can deserialize sections from them.
//!
//! [`render`] writes two-space indentation and one entry per line, which
//! is the layout libconfuse's `cfg_print` produces for existing installs.

use std::fmt::Write as _;

use thiserror::Error;

/// Malformed input, with the 1-based line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct FormatError {
    pub line: usize,
    pub message: String,
}

/// One `name = value` or `name { ... }` entry, as written.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub line: usize,
    pub node: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Value(toml::Value),
    Section(Vec<Entry>),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parses a whole file into its top-level entries.
///
/// # Errors
///
/// [`FormatError`] on the first token that does not fit the grammar,
/// including an unterminated string, comment or section.
pub fn parse(text: &str) -> Result<Vec<Entry>, FormatError> {
    let mut parser = Parser {
        lexer: Lexer::new(text),
        peeked: None,
    };
    parser.entries(None)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
    OpenBrace,
    CloseBrace,
    Equals,
    Separator,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_at(0)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> FormatError {
        FormatError {
            line: self.line,
            message: message.into(),
        }
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), FormatError> {
        loop {
            match (self.peek_at(0), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('#'), _) | (Some('/'), Some('/')) => {
                    while !matches!(self.bump(), None | Some('\n')) {}
                }
                (Some('/'), Some('*')) => {
                    let start = self.line;
                    self.pos += 2;
                    loop {
                        match (self.peek_at(0), self.peek_at(1)) {
                            (Some('*'), Some('/')) => {
                                self.pos += 2;
                                break;
                            }
                            (Some(_), _) => {
                                self.bump();
                            }
                            (None, _) => {
                                return Err(FormatError {
                                    line: start,
                                    message: "unterminated comment".to_string(),
                                })
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Returns the next token and the line it starts on.
    fn next_token(&mut self) -> Result<Option<(Token, usize)>, FormatError> {
        self.skip_trivia()?;
        let line = self.line;
        let Some(c) = self.bump() else {
            return Ok(None);
        };
        let token = match c {
            '{' => Token::OpenBrace,
            '}' => Token::CloseBrace,
            '=' => Token::Equals,
            ',' | ';' => Token::Separator,
            '"' => Token::Quoted(self.double_quoted(line)?),
            '\'' => Token::Quoted(self.single_quoted(line)?),
            first => {
                let mut word = String::from(first);
                while let Some(c) = self.peek_at(0) {
                    let comment = c == '/' && matches!(self.peek_at(1), Some('/' | '*'));
                    if !is_word_char(c) || comment {
                        break;
                    }
                    word.push(c);
                    self.pos += 1;
                }
                Token::Word(word)
            }
        };
        Ok(Some((token, line)))
    }

    fn double_quoted(&mut self, start: usize) -> Result<String, FormatError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(FormatError {
                        line: start,
                        message: "unterminated string".to_string(),
                    })
                }
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(other) => out.push(other),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn single_quoted(&mut self, start: usize) -> Result<String, FormatError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(FormatError {
                        line: start,
                        message: "unterminated string".to_string(),
                    })
                }
                Some('\'') => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '{' | '}' | '=' | ',' | ';' | '"' | '\'' | '#')
}

struct Parser {
    lexer: Lexer,
    peeked: Option<(Token, usize)>,
}

impl Parser {
    fn next(&mut self) -> Result<Option<(Token, usize)>, FormatError> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.lexer.next_token(),
        }
    }

    fn peek(&mut self) -> Result<Option<&Token>, FormatError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref().map(|(token, _)| token))
    }

    /// Reads entries until end of input (`open == None`) or the `}` that
    /// closes the section opened on line `open`.
    fn entries(&mut self, open: Option<usize>) -> Result<Vec<Entry>, FormatError> {
        let mut entries = Vec::new();
        loop {
            let Some((token, line)) = self.next()? else {
                return match open {
                    None => Ok(entries),
                    Some(line) => Err(FormatError {
                        line,
                        message: "section is never closed".to_string(),
                    }),
                };
            };
            match token {
                Token::CloseBrace if open.is_some() => return Ok(entries),
                Token::Separator => {}
                Token::Word(name) => entries.push(self.entry(name, line)?),
                other => {
                    return Err(FormatError {
                        line,
                        message: format!("expected a name, found {}", describe(&other)),
                    })
                }
            }
        }
    }

    fn entry(&mut self, name: String, line: usize) -> Result<Entry, FormatError> {
        let node = match self.next()? {
            Some((Token::Equals, _)) => Node::Value(self.value()?),
            Some((Token::OpenBrace, _)) => Node::Section(self.entries(Some(line))?),
            // `name "title" { ... }`
            Some((Token::Quoted(_) | Token::Word(_), at)) => match self.next()? {
                Some((Token::OpenBrace, _)) => Node::Section(self.entries(Some(line))?),
                _ => {
                    return Err(FormatError {
                        line: at,
                        message: format!("expected `{{` after the title of {name}"),
                    })
                }
            },
            Some((other, at)) => {
                return Err(FormatError {
                    line: at,
                    message: format!(
                        "expected `=` or `{{` after {name}, found {}",
                        describe(&other)
                    ),
                })
            }
            None => return Err(self.lexer.error(format!("{name} has no value"))),
        };
        Ok(Entry { name, line, node })
    }

    fn value(&mut self) -> Result<toml::Value, FormatError> {
        match self.next()? {
            Some((Token::Word(word), _)) => Ok(bare_value(word)),
            Some((Token::Quoted(text), _)) => Ok(toml::Value::String(text)),
            Some((Token::OpenBrace, _)) => self.list(),
            Some((other, line)) => Err(FormatError {
                line,
                message: format!("expected a value, found {}", describe(&other)),
            }),
            None => Err(self.lexer.error("expected a value, found end of file")),
        }
    }

    fn list(&mut self) -> Result<toml::Value, FormatError> {
        let mut items = Vec::new();
        loop {
            let (closes, separates) = match self.peek()? {
                Some(Token::CloseBrace) => (true, false),
                Some(Token::Separator) => (false, true),
                _ => (false, false),
            };
            if closes {
                self.next()?;
                return Ok(toml::Value::Array(items));
            }
            if separates {
                self.next()?;
            } else {
                items.push(self.value()?);
            }
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Word(word) => format!("`{word}`"),
        Token::Quoted(_) => "a string".to_string(),
        Token::OpenBrace => "`{`".to_string(),
        Token::CloseBrace => "`}`".to_string(),
        Token::Equals => "`=`".to_string(),
        Token::Separator => "a separator".to_string(),
    }
}

/// Types an unquoted value.
fn bare_value(word: String) -> toml::Value {
    if let Some(int) = parse_int(&word) {
        return toml::Value::Integer(int);
    }
    match word.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => return toml::Value::Boolean(true),
        "false" | "no" | "off" => return toml::Value::Boolean(false),
        _ => {}
    }
    match word.parse::<f64>() {
        Ok(float) if float.is_finite() => toml::Value::Float(float),
        _ => toml::Value::String(word),
    }
}

fn parse_int(word: &str) -> Option<i64> {
    let (negative, digits) = match word.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, word.strip_prefix('+').unwrap_or(word)),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse().ok()?
        }
        None => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}

// ── Rendering ─────────────────────────────────────────────────────────────────

const INDENT: &str = "  ";

/// Renders a table: nested tables become sections, everything else
/// becomes `key = value`.  Entry order follows the table's order.
pub fn render(table: &toml::Table) -> String {
    let mut out = String::new();
    render_into(&mut out, table, 0);
    out
}

fn render_into(out: &mut String, table: &toml::Table, depth: usize) {
    let indent = INDENT.repeat(depth);
    for (key, value) in table {
        match value {
            toml::Value::Table(inner) => {
                let _ = writeln!(out, "{indent}{key} {{");
                render_into(out, inner, depth + 1);
                let _ = writeln!(out, "{indent}}}");
            }
            other => {
                let _ = writeln!(out, "{indent}{key} = {}", render_value(other));
            }
        }
    }
}

fn render_value(value: &toml::Value) -> String {
    match value {
        toml::Value::Integer(int) => int.to_string(),
        toml::Value::Float(float) => format!("{float:?}"),
        toml::Value::Boolean(flag) => flag.to_string(),
        toml::Value::String(text) => quote(text),
        toml::Value::Datetime(datetime) => quote(&datetime.to_string()),
        toml::Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("{{{}}}", items.join(", "))
        }
        // Lists hold scalars only.
        toml::Value::Table(_) => "{}".to_string(),
    }
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(entries: &[Entry], name: &str) -> toml::Value {
        match entries.iter().find(|e| e.name == name).map(|e| &e.node) {
            Some(Node::Value(value)) => value.clone(),
            other => panic!("expected a value for {name}, got {other:?}"),
        }
    }

    fn section<'a>(entries: &'a [Entry], name: &str) -> &'a [Entry] {
        match entries.iter().find(|e| e.name == name).map(|e| &e.node) {
            Some(Node::Section(inner)) => inner,
            other => panic!("expected a section {name}, got {other:?}"),
        }
    }

    #[test]
    fn test_parses_sections_with_tab_indentation() {
        // Arrange
        let text = "server {\n\tport = 12002\n}\napplication {\n\tosc_prefix = \"/monome\"\n\
                    \thost = \"127.0.0.1\"\n\tport = 8000\n}\ndevice {\n\trotation = 90\n}\n";

        // Act
        let entries = parse(text).unwrap();

        // Assert
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["server", "application", "device"]);
        assert_eq!(
            value_of(section(&entries, "server"), "port"),
            toml::Value::Integer(12002)
        );
        assert_eq!(
            value_of(section(&entries, "application"), "host"),
            toml::Value::String("127.0.0.1".into())
        );
        assert_eq!(
            value_of(section(&entries, "device"), "rotation"),
            toml::Value::Integer(90)
        );
    }

    #[test]
    fn test_parses_single_line_section() {
        let entries = parse("server { port = 12002 }").unwrap();

        assert_eq!(
            value_of(section(&entries, "server"), "port"),
            toml::Value::Integer(12002)
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let text = "# saved by serialosc\ndevice {\n  // quarter turns * 90\n  \
                    rotation = /* right */ 270\n}\n";

        let entries = parse(text).unwrap();

        assert_eq!(
            value_of(section(&entries, "device"), "rotation"),
            toml::Value::Integer(270)
        );
    }

    #[test]
    fn test_bare_values_are_typed() {
        let entries =
            parse("a = -90\nb = 0x1F\nc = yes\nd = 1.5\ne = /monome\nf = localhost\n").unwrap();

        assert_eq!(value_of(&entries, "a"), toml::Value::Integer(-90));
        assert_eq!(value_of(&entries, "b"), toml::Value::Integer(31));
        assert_eq!(value_of(&entries, "c"), toml::Value::Boolean(true));
        assert_eq!(value_of(&entries, "d"), toml::Value::Float(1.5));
        assert_eq!(value_of(&entries, "e"), toml::Value::String("/monome".into()));
        assert_eq!(value_of(&entries, "f"), toml::Value::String("localhost".into()));
    }

    #[test]
    fn test_quoted_strings_unescape() {
        let entries = parse(r#"a = "say \"hi\"\\" b = 'c:\dir'"#).unwrap();

        assert_eq!(value_of(&entries, "a"), toml::Value::String(r#"say "hi"\"#.into()));
        assert_eq!(value_of(&entries, "b"), toml::Value::String(r"c:\dir".into()));
    }

    #[test]
    fn test_lists_and_titled_sections_parse() {
        let entries = parse("hosts = {\"a\", \"b\"}\nmidi \"grid\" {\n  channel = 1\n}\n").unwrap();

        assert_eq!(
            value_of(&entries, "hosts"),
            toml::Value::Array(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            value_of(section(&entries, "midi"), "channel"),
            toml::Value::Integer(1)
        );
    }

    #[test]
    fn test_duplicates_and_case_are_kept_as_written() {
        let entries = parse("Server { port = 1 }\nSERVER { PORT = 2 }\n").unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Server", "SERVER"]);
        assert_eq!(entries[1].line, 2);
    }

    #[test]
    fn test_unterminated_string_reports_its_line() {
        let err = parse("application {\n  osc_prefix = \"/gr").unwrap_err();

        assert_eq!(err.line, 2);
        assert!(err.message.contains("unterminated string"));
    }

    #[test]
    fn test_unclosed_section_is_an_error() {
        let err = parse("server {\n  port = 1\n").unwrap_err();

        assert_eq!(err.line, 1);
        assert!(err.message.contains("never closed"));
    }

    #[test]
    fn test_stray_tokens_are_errors() {
        assert!(parse("}").is_err());
        assert!(parse("= 3").is_err());
        assert!(parse("port 3").is_err());
        assert!(parse("port =").is_err());
        assert!(parse("/* open").is_err());
    }

    #[test]
    fn test_render_nests_tables_as_sections() {
        // Arrange
        let mut device = toml::Table::new();
        device.insert("rotation".into(), toml::Value::Integer(90));
        let mut table = toml::Table::new();
        table.insert("device".into(), toml::Value::Table(device));

        // Act
        let text = render(&table);

        // Assert
        assert_eq!(text, "device {\n  rotation = 90\n}\n");
    }

    #[test]
    fn test_render_quotes_and_escapes_strings() {
        let mut table = toml::Table::new();
        table.insert("host".into(), toml::Value::String("a \"b\" \\c".into()));

        let text = render(&table);

        assert_eq!(text, "host = \"a \\\"b\\\" \\\\c\"\n");
        assert_eq!(
            value_of(&parse(&text).unwrap(), "host"),
            toml::Value::String("a \"b\" \\c".into())
        );
    }
}
