//! Recursive-descent parser for commands, theory formulas, and queries.

use super::ast::{FormulaAst, QueryAst, Statement, TermAst};
use super::lexer::{LexError, Lexer, Token};

/// Parse error with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError {
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}

/// Parser state.
struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        let line = lexer.token_line();
        let column = lexer.token_column();
        Ok(Parser {
            lexer,
            current,
            line,
            column,
        })
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        self.line = self.lexer.token_line();
        self.column = self.lexer.token_column();
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if self.current == expected {
            self.advance()?;
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {:?}, found {:?}",
                expected, self.current
            )))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.current.clone() {
            Token::Ident(name) => {
                self.advance()?;
                Ok(name)
            }
            other => Err(self.error(format!("expected identifier, found {:?}", other))),
        }
    }

    fn expect_int(&mut self) -> Result<usize, ParseError> {
        match self.current {
            Token::Int(value) => {
                self.advance()?;
                Ok(value)
            }
            ref other => Err(self.error(format!("expected integer, found {:?}", other))),
        }
    }

    fn at_ident(&self, word: &str) -> bool {
        matches!(&self.current, Token::Ident(s) if s == word)
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            line: self.line,
            column: self.column,
        }
    }
}

/// Parse a whole source file into statements.
pub fn parse_file(source: &str) -> Result<Vec<Statement>, ParseError> {
    let mut parser = Parser::new(source)?;
    let mut statements = Vec::new();
    while parser.current != Token::Eof {
        statements.push(parse_statement(&mut parser)?);
    }
    Ok(statements)
}

/// Parse a single statement (the whole input must be consumed).
pub fn parse_statement_str(source: &str) -> Result<Statement, ParseError> {
    let mut parser = Parser::new(source)?;
    let stmt = parse_statement(&mut parser)?;
    if parser.current != Token::Eof {
        return Err(parser.error(format!("trailing input at {:?}", parser.current)));
    }
    Ok(stmt)
}

fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let keyword = match &parser.current {
        Token::Ident(s) => s.clone(),
        other => {
            return Err(parser.error(format!("expected a command, found {:?}", other)));
        }
    };
    match keyword.as_str() {
        "Sort" => {
            parser.advance()?;
            let name = parser.expect_ident()?;
            let rigid = if parser.at_ident("rigid") {
                parser.advance()?;
                true
            } else {
                false
            };
            Ok(Statement::SortDecl { name, rigid })
        }
        "Name" => {
            parser.advance()?;
            let name = parser.expect_ident()?;
            parser.expect(Token::Arrow)?;
            let sort = parser.expect_ident()?;
            Ok(Statement::NameDecl { name, sort })
        }
        "Fun" => {
            parser.advance()?;
            let name = parser.expect_ident()?;
            parser.expect(Token::Slash)?;
            let arity = parser.expect_int()?;
            if arity > u8::MAX as usize {
                return Err(parser.error(format!("arity {} is out of range", arity)));
            }
            parser.expect(Token::Arrow)?;
            let sort = parser.expect_ident()?;
            Ok(Statement::FunDecl {
                name,
                arity: arity as u8,
                sort,
            })
        }
        "Let" => {
            parser.advance()?;
            let name = parser.expect_ident()?;
            parser.expect(Token::Assign)?;
            let body = parse_formula(parser)?;
            Ok(Statement::Let { name, body })
        }
        "Assert" => {
            parser.advance()?;
            Ok(Statement::Assert(parse_query(parser)?))
        }
        "Refute" => {
            parser.advance()?;
            Ok(Statement::Refute(parse_query(parser)?))
        }
        "Sense" => {
            parser.advance()?;
            let mut actions = vec![parse_term(parser)?];
            while parser.current == Token::Colon {
                parser.advance()?;
                actions.push(parse_term(parser)?);
            }
            parser.expect(Token::Arrow)?;
            let result = match parser.expect_ident()?.as_str() {
                "true" => true,
                "false" => false,
                other => {
                    return Err(parser.error(format!(
                        "expected 'true' or 'false' as sensing result, found '{}'",
                        other
                    )));
                }
            };
            Ok(Statement::Sense { actions, result })
        }
        "static" => {
            parser.advance()?;
            parser.expect(Token::LParen)?;
            let phi = parse_formula(parser)?;
            parser.expect(Token::RParen)?;
            Ok(Statement::StaticDecl(phi))
        }
        "box" => {
            parser.advance()?;
            parser.expect(Token::LParen)?;
            let phi = parse_formula(parser)?;
            parser.expect(Token::RParen)?;
            Ok(Statement::BoxDecl(phi))
        }
        "belief" => Err(parser.error(
            "belief conditionals are not supported by this engine; use static() or box()".into(),
        )),
        other => Err(parser.error(format!("unknown command '{}'", other))),
    }
}

fn parse_query(parser: &mut Parser) -> Result<QueryAst, ParseError> {
    let globally = if parser.at_ident("G") {
        parser.advance()?;
        true
    } else {
        false
    };
    if !parser.at_ident("Know") {
        return Err(parser.error("queries must be of the form [G] Know<k> formula".into()));
    }
    parser.advance()?;
    parser.expect(Token::Lt)?;
    let k = parser.expect_int()?;
    parser.expect(Token::Gt)?;
    let body = parse_formula(parser)?;
    Ok(QueryAst { globally, k, body })
}

/// Formula grammar, loosest binding first:
/// iff ::= imp (`<->` imp)*
/// imp ::= or (`->` imp)?
/// or  ::= and (`v` and)*
/// and ::= unary (`^` unary)*
fn parse_formula(parser: &mut Parser) -> Result<FormulaAst, ParseError> {
    parse_iff(parser)
}

fn parse_iff(parser: &mut Parser) -> Result<FormulaAst, ParseError> {
    let mut lhs = parse_implies(parser)?;
    while parser.current == Token::DArrow {
        parser.advance()?;
        let rhs = parse_implies(parser)?;
        lhs = FormulaAst::iff(lhs, rhs);
    }
    Ok(lhs)
}

fn parse_implies(parser: &mut Parser) -> Result<FormulaAst, ParseError> {
    let lhs = parse_or(parser)?;
    if parser.current == Token::Arrow {
        parser.advance()?;
        let rhs = parse_implies(parser)?;
        Ok(FormulaAst::implies(lhs, rhs))
    } else {
        Ok(lhs)
    }
}

fn parse_or(parser: &mut Parser) -> Result<FormulaAst, ParseError> {
    let mut lhs = parse_and(parser)?;
    while parser.at_ident("v") {
        parser.advance()?;
        let rhs = parse_and(parser)?;
        lhs = FormulaAst::or(lhs, rhs);
    }
    Ok(lhs)
}

fn parse_and(parser: &mut Parser) -> Result<FormulaAst, ParseError> {
    let mut lhs = parse_unary(parser)?;
    while parser.current == Token::Caret {
        parser.advance()?;
        let rhs = parse_unary(parser)?;
        lhs = FormulaAst::and(lhs, rhs);
    }
    Ok(lhs)
}

fn parse_unary(parser: &mut Parser) -> Result<FormulaAst, ParseError> {
    if parser.current == Token::Tilde {
        parser.advance()?;
        return Ok(FormulaAst::not(parse_unary(parser)?));
    }
    if parser.at_ident("ex") || parser.at_ident("fa") {
        let existential = parser.at_ident("ex");
        parser.advance()?;
        let var = parser.expect_ident()?;
        let sort = if parser.current == Token::Colon {
            parser.advance()?;
            Some(parser.expect_ident()?)
        } else {
            None
        };
        parser.expect(Token::Dot)?;
        let body = parse_unary(parser)?;
        return Ok(if existential {
            FormulaAst::Exists(var, sort, Box::new(body))
        } else {
            FormulaAst::Forall(var, sort, Box::new(body))
        });
    }
    if parser.current == Token::LParen {
        parser.advance()?;
        let phi = parse_formula(parser)?;
        parser.expect(Token::RParen)?;
        return Ok(phi);
    }
    // Term-led: equality, predicate atom, or action application.
    let t = parse_term(parser)?;
    match parser.current {
        Token::Colon => {
            parser.advance()?;
            let body = parse_unary(parser)?;
            Ok(FormulaAst::act(t, body))
        }
        Token::Eq => {
            parser.advance()?;
            let rhs = parse_term(parser)?;
            Ok(FormulaAst::Eq(t, rhs))
        }
        Token::Neq => {
            parser.advance()?;
            let rhs = parse_term(parser)?;
            Ok(FormulaAst::Neq(t, rhs))
        }
        _ => Ok(FormulaAst::Pred(t)),
    }
}

fn parse_term(parser: &mut Parser) -> Result<TermAst, ParseError> {
    let name = parser.expect_ident()?;
    if is_reserved_word(&name) {
        return Err(parser.error(format!("'{}' is reserved and cannot be a term", name)));
    }
    if parser.current == Token::LParen {
        parser.advance()?;
        let mut args = vec![parse_term_arg(parser)?];
        while parser.current == Token::Comma {
            parser.advance()?;
            args.push(parse_term_arg(parser)?);
        }
        parser.expect(Token::RParen)?;
        return Ok(TermAst::app(name, args));
    }
    Ok(TermAst::sym(name))
}

/// A term in argument position; variables may carry a sort annotation here,
/// since `:` cannot start an action application inside an argument list.
fn parse_term_arg(parser: &mut Parser) -> Result<TermAst, ParseError> {
    let t = parse_term(parser)?;
    if parser.current == Token::Colon {
        match t {
            TermAst::Sym { name, sort: None } => {
                parser.advance()?;
                let sort = parser.expect_ident()?;
                return Ok(TermAst::Sym {
                    name,
                    sort: Some(sort),
                });
            }
            _ => return Err(parser.error("only variables can carry a sort annotation".into())),
        }
    }
    Ok(t)
}

fn is_reserved_word(word: &str) -> bool {
    matches!(
        word,
        "Sort" | "Name" | "Fun" | "Let" | "Assert" | "Refute" | "Sense" | "Know" | "G" | "box"
            | "static" | "belief" | "ex" | "fa" | "v"
    )
}
