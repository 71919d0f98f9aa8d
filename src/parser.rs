use crate::ast::*;
use crate::lexer::{LexError, Lexer, Token};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Unexpected token: {0:?}, expected {1}")]
    Unexpected(Token, &'static str),
    #[error("Wrong arrow in {0:?} dependency list")]
    WrongArrow(DependencyKind),
    #[error("Missing `relation` statement")]
    MissingRelation,
    #[error("Relation declared twice: {0}")]
    DuplicateRelation(String),
    #[error("Keyword `{0}` cannot be used as an attribute name in a document")]
    ReservedAttribute(String),
}

const KEYWORDS: [&str; 3] = ["relation", "fd", "mvd"];

enum Item {
    Empty,
    Dependency(DependencyDecl),
    Malformed,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> &Token {
        let tok = self.tokens.get(self.pos).unwrap_or(&Token::Eof);
        self.pos += 1;
        tok
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.advance().clone() {
            Token::Ident(s) => Ok(s),
            tok => Err(ParseError::Unexpected(tok, "identifier")),
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        let tok = self.advance().clone();
        if tok == expected {
            Ok(())
        } else {
            Err(ParseError::Unexpected(tok, what))
        }
    }

    fn expect_eof(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            Token::Eof => Ok(()),
            tok => Err(ParseError::Unexpected(tok.clone(), "end of input")),
        }
    }

    fn check_keyword(&self) -> Option<&'static str> {
        match self.peek() {
            Token::Ident(s) => KEYWORDS.iter().copied().find(|k| k == s),
            _ => None,
        }
    }

    /// Parse a whole document of `relation`, `fd` and `mvd` statements.
    pub fn parse(&mut self) -> Result<Document, ParseError> {
        let mut schema: Option<SchemaDecl> = None;
        let mut fds = Vec::new();
        let mut mvds = Vec::new();
        let mut malformed = 0;

        while *self.peek() != Token::Eof {
            match self.check_keyword() {
                Some("relation") => {
                    self.advance();
                    let decl = self.parse_schema_decl()?;
                    if let Some(name) = decl
                        .attributes
                        .iter()
                        .find(|a| KEYWORDS.contains(&a.as_str()))
                    {
                        return Err(ParseError::ReservedAttribute(name.clone()));
                    }
                    if schema.is_some() {
                        return Err(ParseError::DuplicateRelation(decl.name));
                    }
                    schema = Some(decl);
                }
                Some("fd") => {
                    self.advance();
                    let list = self.parse_list(DependencyKind::Functional, true)?;
                    fds.extend(list.items);
                    malformed += list.malformed;
                }
                Some("mvd") => {
                    self.advance();
                    let list = self.parse_list(DependencyKind::Multivalued, true)?;
                    mvds.extend(list.items);
                    malformed += list.malformed;
                }
                _ => {
                    return Err(ParseError::Unexpected(
                        self.peek().clone(),
                        "relation, fd, or mvd",
                    ));
                }
            }
        }

        let schema = schema.ok_or(ParseError::MissingRelation)?;
        Ok(Document {
            schema,
            fds,
            mvds,
            malformed,
        })
    }

    /// Parse a bare schema such as `R(A, B, C)`.
    pub fn parse_schema(&mut self) -> Result<SchemaDecl, ParseError> {
        let decl = self.parse_schema_decl()?;
        self.expect_eof()?;
        Ok(decl)
    }

    /// Parse a bare `;`-separated dependency list such as `A->B; B,C->D`.
    pub fn parse_dependencies(&mut self, kind: DependencyKind) -> Result<DependencyList, ParseError> {
        let list = self.parse_list(kind, false)?;
        self.expect_eof()?;
        Ok(list)
    }

    fn parse_schema_decl(&mut self) -> Result<SchemaDecl, ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LParen, "`(`")?;

        let mut attributes = Vec::new();
        if *self.peek() != Token::RParen {
            attributes.push(self.expect_ident()?);
            while *self.peek() == Token::Comma {
                self.advance();
                attributes.push(self.expect_ident()?);
            }
        }

        self.expect(Token::RParen, "`)`")?;
        Ok(SchemaDecl { name, attributes })
    }

    fn parse_list(
        &mut self,
        kind: DependencyKind,
        in_document: bool,
    ) -> Result<DependencyList, ParseError> {
        let mut list = DependencyList::default();

        loop {
            match self.parse_item(kind, in_document)? {
                Item::Empty => {}
                Item::Dependency(decl) => list.items.push(decl),
                Item::Malformed => list.malformed += 1,
            }
            if *self.peek() == Token::Semicolon {
                self.advance();
            } else {
                break;
            }
        }

        Ok(list)
    }

    /// One item up to the next `;`. In documents a keyword that cannot be an
    /// attribute (at the start, or right after another attribute) ends it.
    fn parse_item(&mut self, kind: DependencyKind, in_document: bool) -> Result<Item, ParseError> {
        let mut decl = DependencyDecl::default();
        let mut seen_arrow = false;
        let mut seen_any = false;
        let mut after_ident = false;

        loop {
            match self.peek().clone() {
                Token::Semicolon | Token::Eof => break,
                Token::Ident(name) => {
                    let at_boundary = !seen_any || after_ident;
                    if in_document && at_boundary && self.check_keyword().is_some() {
                        break;
                    }
                    if after_ident {
                        return Err(ParseError::Unexpected(
                            Token::Ident(name),
                            "`,` between attributes",
                        ));
                    }
                    self.advance();
                    if seen_arrow {
                        decl.right.push(name);
                    } else {
                        decl.left.push(name);
                    }
                    after_ident = true;
                }
                Token::Comma => {
                    self.advance();
                    after_ident = false;
                }
                tok @ (Token::Arrow | Token::DoubleArrow) => {
                    if seen_arrow {
                        return Err(ParseError::Unexpected(tok, "`;` before another arrow"));
                    }
                    let matches_kind = match kind {
                        DependencyKind::Functional => tok == Token::Arrow,
                        DependencyKind::Multivalued => tok == Token::DoubleArrow,
                    };
                    if !matches_kind {
                        return Err(ParseError::WrongArrow(kind));
                    }
                    self.advance();
                    seen_arrow = true;
                    after_ident = false;
                }
                tok => return Err(ParseError::Unexpected(tok, "attribute, `,`, or arrow")),
            }
            seen_any = true;
        }

        if !seen_any {
            Ok(Item::Empty)
        } else if !seen_arrow {
            log::warn!("dropping dependency without arrow: {:?}", decl.left);
            Ok(Item::Malformed)
        } else {
            Ok(Item::Dependency(decl))
        }
    }
}

/// Parse a bare schema string.
pub fn parse_schema(input: &str) -> Result<SchemaDecl, ParseError> {
    Parser::new(input)?.parse_schema()
}

/// Parse a bare dependency list string.
pub fn parse_dependencies(input: &str, kind: DependencyKind) -> Result<DependencyList, ParseError> {
    Parser::new(input)?.parse_dependencies(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema() {
        let schema = parse_schema("R(TITLE, YEAR, STUDIONAME)").unwrap();
        assert_eq!(schema.name, "R");
        assert_eq!(schema.attributes, vec!["TITLE", "YEAR", "STUDIONAME"]);
    }

    #[test]
    fn test_parse_dependency_list() {
        let list = parse_dependencies("A,B->C; C->A;", DependencyKind::Functional).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0], DependencyDecl::new(["A", "B"], ["C"]));
        assert_eq!(list.items[1], DependencyDecl::new(["C"], ["A"]));
        assert_eq!(list.malformed, 0);
    }

    #[test]
    fn test_missing_arrow_is_dropped() {
        let list = parse_dependencies("A,B; B->C", DependencyKind::Functional).unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.malformed, 1);
    }

    #[test]
    fn test_empty_side_is_kept_for_ingestion() {
        let list = parse_dependencies("->C", DependencyKind::Functional).unwrap();
        assert_eq!(list.items.len(), 1);
        assert!(list.items[0].left.is_empty());
    }

    #[test]
    fn test_wrong_arrow() {
        let err = parse_dependencies("A->->B", DependencyKind::Functional).unwrap_err();
        assert!(matches!(err, ParseError::WrongArrow(DependencyKind::Functional)));
    }

    #[test]
    fn test_parse_document() {
        let input = r#"
            # movies
            relation R(NAME, STREET, CITY, TITLE, YEAR)
            fd TITLE, YEAR -> NAME
            mvd NAME ->-> STREET, CITY
        "#;
        let doc = Parser::new(input).unwrap().parse().unwrap();
        assert_eq!(doc.schema.attributes.len(), 5);
        assert_eq!(doc.fds, vec![DependencyDecl::new(["TITLE", "YEAR"], ["NAME"])]);
        assert_eq!(doc.mvds, vec![DependencyDecl::new(["NAME"], ["STREET", "CITY"])]);
    }

    #[test]
    fn test_document_requires_relation() {
        let err = Parser::new("fd A->B").unwrap().parse().unwrap_err();
        assert!(matches!(err, ParseError::MissingRelation));
    }

    #[test]
    fn test_keyword_attribute_rejected_in_document() {
        let err = Parser::new("relation R(fd, A)\nfd fd -> A").unwrap().parse().unwrap_err();
        assert!(matches!(err, ParseError::ReservedAttribute(ref name) if name == "fd"));
        // bare schemas have no statements to confuse it with
        let schema = parse_schema("R(fd, A)").unwrap();
        assert_eq!(schema.attributes, vec!["fd", "A"]);
    }

    #[test]
    fn test_missing_comma_between_attributes() {
        let err = parse_dependencies("A B->C", DependencyKind::Functional).unwrap_err();
        assert!(matches!(err, ParseError::Unexpected(Token::Ident(_), _)));
    }
}
