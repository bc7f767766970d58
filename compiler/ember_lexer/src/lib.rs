//! Lexer for Ember using logos.
//!
//! Whitespace (including newlines) and `//` comments are skipped. `///` doc
//! comments are kept as tokens so the parser can attach them to the next
//! `fn` or `class`.

use std::fmt;

use ember_ir::{Name, Span};
use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // === Comments ===
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"///[^\n]*", |lex| lex.slice()[3..].trim().to_string())]
    DocComment(String),

    // === Keywords ===
    #[token("let")]
    Let,
    #[token("fn")]
    Fn,
    #[token("class")]
    Class,
    #[token("return")]
    Return,
    #[token("raise")]
    Raise,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("none")]
    None,

    // === Symbols ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,

    // === Operators ===
    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // === Literals ===
    #[regex(r"[0-9][0-9_]*", |lex| lex.slice().replace('_', "").parse::<i64>().ok())]
    Int(i64),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unescape(lex.slice()))]
    Str(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| Name::new(lex.slice()))]
    Ident(Name),
}

impl Token {
    /// Short human-readable description used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            Token::LineComment => "comment".to_string(),
            Token::DocComment(_) => "doc comment".to_string(),
            Token::Int(n) => format!("integer `{n}`"),
            Token::Str(_) => "string literal".to_string(),
            Token::Ident(name) => format!("identifier `{name}`"),
            other => format!("`{}`", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Token::Let => "let",
            Token::Fn => "fn",
            Token::Class => "class",
            Token::Return => "return",
            Token::Raise => "raise",
            Token::If => "if",
            Token::Else => "else",
            Token::And => "and",
            Token::Or => "or",
            Token::Not => "not",
            Token::True => "true",
            Token::False => "false",
            Token::None => "none",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::Semicolon => ";",
            Token::EqEq => "==",
            Token::Eq => "=",
            Token::NotEq => "!=",
            Token::LtEq => "<=",
            Token::Lt => "<",
            Token::GtEq => ">=",
            Token::Gt => ">",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::LineComment
            | Token::DocComment(_)
            | Token::Int(_)
            | Token::Str(_)
            | Token::Ident(_) => "",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A token with its source location.
#[derive(Clone, Debug, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}

/// Input that does not form a token (stray character, bad escape,
/// integer literal out of range).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized input `{text}` at {span}")]
pub struct LexError {
    pub text: String,
    pub span: Span,
}

/// Tokenize a whole source unit.
pub fn lex(source: &str) -> Result<Vec<Spanned>, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        match result {
            Ok(token) => tokens.push(Spanned { token, span }),
            Err(()) => {
                return Err(LexError {
                    text: lexer.slice().to_string(),
                    span,
                })
            }
        }
    }
    Ok(tokens)
}

/// Strip quotes and resolve `\n`, `\t`, `\\` and `\"`.
fn unescape(quoted: &str) -> Option<String> {
    let inner = quoted.get(1..quoted.len() - 1)?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            _ => return None,
        }
    }
    Some(out)
}
