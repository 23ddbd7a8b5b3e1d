//! # Lexer Module / 词法分析模块
//!
//! Tokenizer for the example language.
//!
//! Produces a flat token stream in which block structure is explicit:
//! `Newline` ends a logical line, `Indent`/`Dedent` open and close blocks.
//! Newlines inside brackets and after a trailing backslash are ignored.
//!
//! 示例语言的词法分析器。生成显式表示块结构的扁平词法单元流：
//! `Newline` 结束一个逻辑行，`Indent`/`Dedent` 开启和关闭块。
//! 括号内以及行尾反斜杠之后的换行会被忽略。

use crate::interp::error::{EvalError, EvalResult};

/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    And,
    Assert,
    Break,
    Class,
    Continue,
    Def,
    Elif,
    Else,
    False,
    For,
    If,
    In,
    Is,
    None,
    Not,
    Or,
    Pass,
    Raise,
    Return,
    True,
    While,
}

impl Keyword {
    fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "and" => Self::And,
            "assert" => Self::Assert,
            "break" => Self::Break,
            "class" => Self::Class,
            "continue" => Self::Continue,
            "def" => Self::Def,
            "elif" => Self::Elif,
            "else" => Self::Else,
            "False" => Self::False,
            "for" => Self::For,
            "if" => Self::If,
            "in" => Self::In,
            "is" => Self::Is,
            "None" => Self::None,
            "not" => Self::Not,
            "or" => Self::Or,
            "pass" => Self::Pass,
            "raise" => Self::Raise,
            "return" => Self::Return,
            "True" => Self::True,
            "while" => Self::While,
            _ => return None,
        };
        Some(keyword)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Name(String),
    Int(i64),
    Float(f64),
    Str(String),
    Keyword(Keyword),
    Op(&'static str),
    Newline,
    Indent,
    Dedent,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based line on which the token starts.
    pub line: usize,
}

/// Operators, longest first so that maximal munch falls out of a linear scan.
const OPERATORS: &[&str] = &[
    "**=", "//=", "**", "//", "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "%=", "+", "-",
    "*", "/", "%", "<", ">", "=", "(", ")", "[", "]", "{", "}", ",", ":", ".", ";",
];

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    indents: Vec<usize>,
    /// Open bracket depth; indentation and newlines are ignored while > 0.
    depth: usize,
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.replace("\r\n", "\n").chars().collect(),
            pos: 0,
            line: 1,
            indents: vec![0],
            depth: 0,
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole source. The stream always ends with `Eof`.
    pub fn tokenize(mut self) -> EvalResult<Vec<Token>> {
        loop {
            if self.at_line_start && self.depth == 0 {
                let width = self.measure_indent();
                match self.peek() {
                    None => break,
                    Some('\n') => {
                        self.advance();
                        self.line += 1;
                        continue;
                    }
                    Some('#') => {
                        self.skip_comment();
                        continue;
                    }
                    Some(_) => {
                        self.at_line_start = false;
                        self.apply_indent(width)?;
                    }
                }
            }

            let Some(c) = self.peek() else { break };
            match c {
                ' ' | '\t' | '\x0c' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    if self.depth == 0 {
                        self.push(TokenKind::Newline);
                        self.at_line_start = true;
                    }
                    self.line += 1;
                }
                '#' => self.skip_comment(),
                '\\' if self.peek_at(1) == Some('\n') => {
                    self.pos += 2;
                    self.line += 1;
                }
                '"' | '\'' => self.lex_string(c)?,
                c if c.is_ascii_digit() => self.lex_number()?,
                '.' if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => self.lex_number()?,
                c if c.is_alphabetic() || c == '_' => self.lex_word(),
                _ => self.lex_operator()?,
            }
        }

        if self
            .tokens
            .last()
            .is_some_and(|t| !matches!(t.kind, TokenKind::Newline))
        {
            self.push(TokenKind::Newline);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent);
        }
        self.push(TokenKind::Eof);
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token {
            kind,
            line: self.line,
        });
    }

    fn measure_indent(&mut self) -> usize {
        let mut width = 0;
        while let Some(c) = self.peek() {
            match c {
                ' ' => width += 1,
                '\t' => width = (width / 8 + 1) * 8,
                '\x0c' | '\r' => {}
                _ => break,
            }
            self.pos += 1;
        }
        width
    }

    fn apply_indent(&mut self, width: usize) -> EvalResult<()> {
        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.push(TokenKind::Indent);
            return Ok(());
        }
        while width < self.indents.last().copied().unwrap_or(0) {
            self.indents.pop();
            self.push(TokenKind::Dedent);
        }
        if self.indents.last().copied().unwrap_or(0) != width {
            return Err(EvalError::syntax(
                "unindent does not match any outer indentation level",
                self.line,
            ));
        }
        Ok(())
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn lex_word(&mut self) {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        let kind = match Keyword::from_word(&word) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Name(word),
        };
        self.push(kind);
    }

    fn lex_number(&mut self) -> EvalResult<()> {
        let start = self.pos;
        let mut is_float = false;
        self.eat_digits();
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.pos += 1;
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some('+' | '-')));
            if self.peek_at(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.pos += 1 + sign;
                self.eat_digits();
            }
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        let kind = if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| EvalError::syntax(format!("invalid float literal '{text}'"), self.line))?
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| EvalError::syntax("integer literal too large", self.line))?
        };
        self.push(kind);
        Ok(())
    }

    fn eat_digits(&mut self) {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '_')
        {
            self.pos += 1;
        }
    }

    fn lex_string(&mut self, quote: char) -> EvalResult<()> {
        let start_line = self.line;
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        let mut text = String::new();
        loop {
            let Some(c) = self.advance() else {
                return Err(EvalError::syntax("unterminated string literal", start_line));
            };
            match c {
                '\\' => {
                    let Some(escaped) = self.advance() else {
                        return Err(EvalError::syntax("unterminated string literal", start_line));
                    };
                    match escaped {
                        'n' => text.push('\n'),
                        't' => text.push('\t'),
                        'r' => text.push('\r'),
                        '0' => text.push('\0'),
                        '\\' => text.push('\\'),
                        '\'' => text.push('\''),
                        '"' => text.push('"'),
                        '\n' => self.line += 1,
                        other => {
                            text.push('\\');
                            text.push(other);
                        }
                    }
                }
                '\n' if !triple => {
                    return Err(EvalError::syntax("unterminated string literal", start_line));
                }
                '\n' => {
                    self.line += 1;
                    text.push('\n');
                }
                c if c == quote && !triple => break,
                c if c == quote && self.peek() == Some(quote) && self.peek_at(1) == Some(quote) => {
                    self.pos += 2;
                    break;
                }
                c => text.push(c),
            }
        }

        self.tokens.push(Token {
            kind: TokenKind::Str(text),
            line: start_line,
        });
        Ok(())
    }

    fn lex_operator(&mut self) -> EvalResult<()> {
        for op in OPERATORS {
            let matches = op
                .chars()
                .enumerate()
                .all(|(i, c)| self.peek_at(i) == Some(c));
            if matches {
                self.pos += op.chars().count();
                match *op {
                    "(" | "[" | "{" => self.depth += 1,
                    ")" | "]" | "}" => self.depth = self.depth.saturating_sub(1),
                    _ => {}
                }
                self.push(TokenKind::Op(op));
                return Ok(());
            }
        }
        let c = self.peek().unwrap_or('?');
        Err(EvalError::syntax(
            format!("invalid character '{c}'"),
            self.line,
        ))
    }
}

/// Tokenize `source` into a token stream.
pub fn tokenize(source: &str) -> EvalResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}
