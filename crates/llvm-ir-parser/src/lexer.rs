//! Lexer for the textual IR assembly format
//!
//! Tokenizes the subset of LLVM-style IR text the optimizer pipeline reads
//! and writes: function/global declarations, typed instructions, and
//! basic-block labels. `;` starts a line comment, as in real LLVM IR.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Define,
    Declare,
    Global,
    Constant,
    To,
    Volatile,
    Type,

    Void,
    Half,
    Float,
    Double,

    True,
    False,
    Null,
    Undef,
    Poison,

    // Opcodes
    Opcode(String),
    // icmp/fcmp predicates
    Predicate(String),

    IntType(u32),
    IntLit(i64),
    FloatLit(f64),

    GlobalIdent(String),
    LocalIdent(String),
    LabelIdent(String),

    Equals,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Star,
    Colon,
    Arrow,
    X, // the 'x' in "[4 x i32]"

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub pos: Position,
}

const OPCODES: &[&str] = &[
    "ret", "br", "switch", "indirectbr", "invoke", "resume", "unreachable",
    "add", "sub", "mul", "udiv", "sdiv", "urem", "srem",
    "shl", "lshr", "ashr", "and", "or", "xor",
    "fadd", "fsub", "fmul", "fdiv", "frem",
    "alloca", "load", "store", "getelementptr", "fence",
    "icmp", "fcmp",
    "trunc", "zext", "sext", "fptrunc", "fpext", "fptoui", "fptosi", "uitofp", "sitofp",
    "ptrtoint", "inttoptr", "bitcast",
    "extractelement", "insertelement", "shufflevector",
    "extractvalue", "insertvalue",
    "phi", "call", "select",
];

const INT_PREDICATES: &[&str] = &["eq", "ne", "ugt", "uge", "ult", "ule", "sgt", "sge", "slt", "sle"];
const FLOAT_PREDICATES: &[&str] =
    &["oeq", "ogt", "oge", "olt", "ole", "one", "ord", "uno", "ueq", "ugt", "uge", "ult", "ule", "une"];

pub struct Lexer<'a> {
    src: &'a str,
    chars: std::str::CharIndices<'a>,
    current: Option<(usize, char)>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut chars = src.char_indices();
        let current = chars.next();
        Self { src, chars, current, line: 1, column: 1 }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current.map(|(_, c)| c);
        if ch == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.current = self.chars.next();
        ch
    }

    fn peek(&self) -> Option<char> {
        self.current.map(|(_, c)| c)
    }

    fn pos(&self) -> Position {
        Position { line: self.line, column: self.column }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some(';') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_word(&mut self) -> String {
        let start = self.current.map(|(i, _)| i).unwrap_or(self.src.len());
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.advance();
            } else {
                break;
            }
        }
        let end = self.current.map(|(i, _)| i).unwrap_or(self.src.len());
        self.src[start..end].to_string()
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        let start = self.current.map(|(i, _)| i).unwrap_or(self.src.len());
        if self.peek() == Some('-') {
            self.advance();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !is_float {
                is_float = true;
                self.advance();
            } else if (c == 'e' || c == 'E') && is_float {
                self.advance();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.advance();
                }
            } else {
                break;
            }
        }
        let end = self.current.map(|(i, _)| i).unwrap_or(self.src.len());
        let text = &self.src[start..end];
        if is_float {
            text.parse::<f64>().map(Token::FloatLit).map_err(|_| LexError::InvalidNumber { text: text.to_string(), pos: self.pos() })
        } else {
            text.parse::<i64>().map(Token::IntLit).map_err(|_| LexError::InvalidNumber { text: text.to_string(), pos: self.pos() })
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let pos = self.pos();
            let Some(c) = self.peek() else {
                tokens.push(SpannedToken { token: Token::Eof, pos });
                break;
            };
            let token = match c {
                '=' => { self.advance(); Token::Equals }
                ',' => { self.advance(); Token::Comma }
                '(' => { self.advance(); Token::LParen }
                ')' => { self.advance(); Token::RParen }
                '{' => { self.advance(); Token::LBrace }
                '}' => { self.advance(); Token::RBrace }
                '[' => { self.advance(); Token::LBracket }
                ']' => { self.advance(); Token::RBracket }
                '*' => { self.advance(); Token::Star }
                ':' => { self.advance(); Token::Colon }
                '-' if self.peek_ahead() == Some('>') => {
                    self.advance();
                    self.advance();
                    Token::Arrow
                }
                '-' | '0'..='9' => self.lex_number()?,
                '@' => {
                    self.advance();
                    Token::GlobalIdent(self.lex_word())
                }
                '%' => {
                    self.advance();
                    Token::LocalIdent(self.lex_word())
                }
                c if c.is_alphabetic() || c == '_' => {
                    let word = self.lex_word();
                    self.keyword_or_ident(word, &mut tokens, pos)?;
                    continue;
                }
                other => return Err(LexError::UnexpectedChar { ch: other, pos }),
            };
            tokens.push(SpannedToken { token, pos });
        }
        Ok(tokens)
    }

    fn peek_ahead(&self) -> Option<char> {
        self.chars.clone().next().map(|(_, c)| c)
    }

    fn keyword_or_ident(&self, word: String, tokens: &mut Vec<SpannedToken>, pos: Position) -> Result<(), LexError> {
        let token = match word.as_str() {
            "define" => Token::Define,
            "declare" => Token::Declare,
            "global" => Token::Global,
            "constant" => Token::Constant,
            "to" => Token::To,
            "volatile" => Token::Volatile,
            "type" => Token::Type,
            "void" => Token::Void,
            "half" => Token::Half,
            "float" => Token::Float,
            "double" => Token::Double,
            "true" => Token::True,
            "false" => Token::False,
            "null" => Token::Null,
            "undef" => Token::Undef,
            "poison" => Token::Poison,
            "x" => Token::X,
            w if w.starts_with('i') && w[1..].chars().all(|c| c.is_ascii_digit()) && w.len() > 1 => {
                Token::IntType(w[1..].parse().map_err(|_| LexError::InvalidNumber { text: w.to_string(), pos })?)
            }
            w if OPCODES.contains(&w) => Token::Opcode(w.to_string()),
            w if INT_PREDICATES.contains(&w) || FLOAT_PREDICATES.contains(&w) => Token::Predicate(w.to_string()),
            _ => Token::LabelIdent(word),
        };
        tokens.push(SpannedToken { token, pos });
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {}:{}", pos.line, pos.column)]
    UnexpectedChar { ch: char, pos: Position },
    #[error("invalid numeric literal '{text}' at {}:{}", pos.line, pos.column)]
    InvalidNumber { text: String, pos: Position },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_lex_simple_add() {
        let toks = tokens("%x = add i32 %a, %b");
        assert_eq!(
            toks,
            vec![
                Token::LocalIdent("x".into()),
                Token::Equals,
                Token::Opcode("add".into()),
                Token::IntType(32),
                Token::LocalIdent("a".into()),
                Token::Comma,
                Token::LocalIdent("b".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_skips_comments() {
        let toks = tokens("; a comment\nret void");
        assert_eq!(toks, vec![Token::Opcode("ret".into()), Token::Void, Token::Eof]);
    }

    #[test]
    fn test_lex_negative_int() {
        let toks = tokens("-42");
        assert_eq!(toks, vec![Token::IntLit(-42), Token::Eof]);
    }
}
