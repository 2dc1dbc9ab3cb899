//! Recursive descent tree builder for tag-soup HTML.

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::is_void_element;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::ParseResult;
use smol_str::SmolStr;
use source_map::{ByteOffset, Span};
use text_size::TextSize;

/// Elements whose content is raw text rather than markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// The HTML parser.
pub struct Parser<'src> {
    /// The source being parsed.
    source: &'src str,
    /// The token stream.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Parse errors collected during parsing.
    errors: Vec<ParseError>,
    /// EOF token for when we're past the end.
    eof_token: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    pub fn new(source: &'src str) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        let eof_token = Token {
            kind: TokenKind::Eof,
            span: Span::empty(TextSize::from(source.len() as u32)),
        };
        Self {
            source,
            tokens,
            pos: 0,
            errors: Vec::new(),
            eof_token,
        }
    }

    /// Parses the source into a document tree.
    pub fn parse(mut self) -> ParseResult {
        let (nodes, _) = self.parse_nodes(None);
        let document = Document {
            nodes,
            span: Span::new(0u32, self.source.len() as u32),
        };
        ParseResult {
            document,
            errors: self.errors,
        }
    }

    // === Token helpers ===

    /// Returns the current token.
    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof_token)
    }

    /// Returns the current token kind.
    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Returns the text of the current token.
    fn current_text(&self) -> &str {
        let span = self.current().span;
        &self.source[u32::from(span.start) as usize..u32::from(span.end) as usize]
    }

    /// Returns the kind of the token `offset` positions ahead.
    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Returns the text of the token `offset` positions ahead.
    fn peek_text(&self, offset: usize) -> &str {
        self.tokens
            .get(self.pos + offset)
            .map(|t| {
                &self.source[u32::from(t.span.start) as usize..u32::from(t.span.end) as usize]
            })
            .unwrap_or("")
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Advances if the current token matches, returns true if matched.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Reports an error.
    fn error(&mut self, kind: ParseErrorKind, span: Span) {
        self.errors.push(ParseError::new(kind, span));
    }

    /// Skips whitespace and newline tokens.
    fn skip_whitespace(&mut self) {
        while self.current_kind().is_whitespace() {
            self.advance();
        }
    }

    /// Advances the token stream until the current token starts at or after
    /// the given offset.
    fn skip_to(&mut self, offset: ByteOffset) {
        while self.current().span.start < offset && !self.check(TokenKind::Eof) {
            self.advance();
        }
    }

    /// Reads raw source text from `start` up to the nearest of the given
    /// delimiters (or EOF), advancing the token stream past it.
    fn read_raw_from(&mut self, start: ByteOffset, delimiters: &[&str]) -> (String, Span) {
        let start_offset = u32::from(start) as usize;
        let remaining = &self.source[start_offset..];
        let end_pos = delimiters
            .iter()
            .filter_map(|d| remaining.find(d))
            .min()
            .unwrap_or(remaining.len());

        let end = TextSize::from((start_offset + end_pos) as u32);
        self.skip_to(end);
        (remaining[..end_pos].to_string(), Span::new(start, end))
    }

    /// Reads raw source text from the current token up to the nearest
    /// delimiter.
    fn read_until(&mut self, delimiters: &[&str]) -> (String, Span) {
        let start = self.current().span.start;
        self.read_raw_from(start, delimiters)
    }

    // === Node parsing ===

    /// Parses a run of sibling nodes. With a parent tag name, stops at (and
    /// consumes) the matching closing tag and returns its span.
    fn parse_nodes(&mut self, parent: Option<&str>) -> (Vec<Node>, Option<Span>) {
        let mut nodes = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::Eof => {
                    if let Some(name) = parent {
                        self.error(
                            ParseErrorKind::UnclosedTag {
                                tag_name: name.to_string(),
                            },
                            self.current().span,
                        );
                    }
                    return (nodes, None);
                }
                TokenKind::LAngleSlash => {
                    let close_start = self.current().span.start;
                    let close_name = self.peek_text(1).to_ascii_lowercase();

                    match parent {
                        Some(name) if close_name == name => {
                            self.advance(); // `</`
                            self.advance(); // name
                            self.skip_whitespace();
                            let end = if self.check(TokenKind::RAngle) {
                                let end = self.current().span.end;
                                self.advance();
                                end
                            } else {
                                self.current().span.start
                            };
                            return (nodes, Some(Span::new(close_start, end)));
                        }
                        Some(name) => {
                            self.error(
                                ParseErrorKind::MismatchedClosingTag {
                                    expected: name.to_string(),
                                    found: close_name,
                                },
                                self.current().span,
                            );
                            self.skip_stray_close();
                        }
                        None => {
                            self.error(
                                ParseErrorKind::StrayClosingTag {
                                    tag_name: close_name,
                                },
                                self.current().span,
                            );
                            self.skip_stray_close();
                        }
                    }
                }
                _ => {
                    if let Some(node) = self.parse_node() {
                        nodes.push(node);
                    }
                }
            }
        }
    }

    /// Parses a single node.
    fn parse_node(&mut self) -> Option<Node> {
        match self.current_kind() {
            TokenKind::CommentStart => Some(self.parse_comment()),
            TokenKind::LAngleBang => Some(self.parse_doctype()),
            TokenKind::LAngle if self.peek_kind(1) == TokenKind::Ident => {
                Some(Node::Element(self.parse_element()))
            }
            TokenKind::Eof => None,
            _ => Some(self.parse_text()),
        }
    }

    /// Parses a text run up to the next `<`.
    fn parse_text(&mut self) -> Node {
        let start = self.current().span.start;
        let start_offset = u32::from(start) as usize;
        let remaining = &self.source[start_offset..];

        // A lone `<` that does not open anything is part of the text run.
        let search_from = if remaining.starts_with('<') { 1 } else { 0 };
        let end_pos = remaining[search_from..]
            .find('<')
            .map(|p| p + search_from)
            .unwrap_or(remaining.len());

        let end = TextSize::from((start_offset + end_pos) as u32);
        let content = remaining[..end_pos].to_string();
        self.skip_to(end);

        Node::Text(Text {
            span: Span::new(start, end),
            content,
        })
    }

    /// Parses a `<!-- -->` comment.
    fn parse_comment(&mut self) -> Node {
        let start = self.current().span.start;
        let content_start = self.current().span.end;
        self.advance(); // `<!--`

        let (content, content_span) = self.read_raw_from(content_start, &["-->"]);

        let end_offset = u32::from(content_span.end) as usize;
        let end = if self.source[end_offset..].starts_with("-->") {
            let end = content_span.end + TextSize::from(3);
            self.skip_to(end);
            end
        } else {
            self.error(
                ParseErrorKind::UnterminatedComment,
                Span::new(start, content_span.end),
            );
            content_span.end
        };

        Node::Comment(Comment {
            span: Span::new(start, end),
            content,
        })
    }

    /// Parses a `<!DOCTYPE ...>` or other markup declaration.
    fn parse_doctype(&mut self) -> Node {
        let start = self.current().span.start;
        let content_start = self.current().span.end;
        self.advance(); // `<!`

        let (content, content_span) = self.read_raw_from(content_start, &[">"]);

        let end_offset = u32::from(content_span.end) as usize;
        let end = if self.source[end_offset..].starts_with('>') {
            let end = content_span.end + TextSize::from(1);
            self.skip_to(end);
            end
        } else {
            self.error(
                ParseErrorKind::UnterminatedDeclaration,
                Span::new(start, content_span.end),
            );
            content_span.end
        };

        Node::Doctype(Doctype {
            span: Span::new(start, end),
            content,
        })
    }

    /// Parses an element, including its children and closing tag.
    fn parse_element(&mut self) -> Element {
        let start = self.current().span.start;
        self.advance(); // `<`

        let name = SmolStr::new(self.current_text().to_ascii_lowercase());
        self.advance();

        let mut attributes = Vec::new();
        let (self_closing, start_tag_end) = loop {
            self.skip_whitespace();
            match self.current_kind() {
                TokenKind::Ident => attributes.push(self.parse_attribute()),
                TokenKind::RAngle => {
                    let end = self.current().span.end;
                    self.advance();
                    break (false, end);
                }
                TokenKind::SlashRAngle => {
                    let end = self.current().span.end;
                    self.advance();
                    break (true, end);
                }
                TokenKind::Eof
                | TokenKind::LAngle
                | TokenKind::LAngleSlash
                | TokenKind::CommentStart
                | TokenKind::LAngleBang => {
                    self.error(
                        ParseErrorKind::MalformedStartTag {
                            tag_name: name.to_string(),
                        },
                        Span::new(start, self.current().span.start),
                    );
                    break (false, self.current().span.start);
                }
                _ => self.advance(),
            }
        };

        let start_tag_span = Span::new(start, start_tag_end);

        if self_closing || is_void_element(&name) {
            return Element {
                span: start_tag_span,
                name,
                attributes,
                children: Vec::new(),
                self_closing,
                start_tag_span,
                end_tag_span: None,
            };
        }

        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            return self.finish_raw_text_element(start, name, attributes, start_tag_span);
        }

        let (children, end_tag_span) = self.parse_nodes(Some(name.as_str()));
        let end = end_tag_span
            .map(|s| s.end)
            .or_else(|| children.last().map(|n| n.span().end))
            .unwrap_or(start_tag_end);

        Element {
            span: Span::new(start, end),
            name,
            attributes,
            children,
            self_closing: false,
            start_tag_span,
            end_tag_span,
        }
    }

    /// Finishes a `<script>`/`<style>` element whose content is raw text.
    fn finish_raw_text_element(
        &mut self,
        start: ByteOffset,
        name: SmolStr,
        attributes: Vec<Attribute>,
        start_tag_span: Span,
    ) -> Element {
        let close = format!("</{}>", name);
        let (content, content_span) = self.read_raw_from(start_tag_span.end, &[close.as_str()]);

        let mut children = Vec::new();
        if !content.is_empty() {
            children.push(Node::Text(Text {
                span: content_span,
                content,
            }));
        }

        let end_tag_span = if self.check(TokenKind::LAngleSlash) {
            let close_start = self.current().span.start;
            self.advance(); // `</`
            if self.check(TokenKind::Ident) {
                self.advance();
            }
            self.skip_whitespace();
            let end = if self.check(TokenKind::RAngle) {
                let end = self.current().span.end;
                self.advance();
                end
            } else {
                self.current().span.start
            };
            Some(Span::new(close_start, end))
        } else {
            self.error(
                ParseErrorKind::UnclosedTag {
                    tag_name: name.to_string(),
                },
                Span::new(start, content_span.end),
            );
            None
        };

        let end = end_tag_span.map(|s| s.end).unwrap_or(content_span.end);

        Element {
            span: Span::new(start, end),
            name,
            attributes,
            children,
            self_closing: false,
            start_tag_span,
            end_tag_span,
        }
    }

    /// Parses one attribute (the current token is its name).
    fn parse_attribute(&mut self) -> Attribute {
        let attr_start = self.current().span.start;
        let name = SmolStr::new(self.current_text().to_ascii_lowercase());
        self.advance();

        self.skip_whitespace();
        let value = if self.eat(TokenKind::Eq) {
            self.skip_whitespace();
            if self.eat(TokenKind::DoubleQuote) {
                let (text, span) = self.read_until(&["\""]);
                self.eat(TokenKind::DoubleQuote);
                AttributeValue::Text(TextValue { span, value: text })
            } else if self.eat(TokenKind::SingleQuote) {
                let (text, span) = self.read_until(&["'"]);
                self.eat(TokenKind::SingleQuote);
                AttributeValue::Text(TextValue { span, value: text })
            } else {
                let (text, span) = self.read_until(&[" ", "\t", "\r", "\n", ">"]);
                AttributeValue::Text(TextValue { span, value: text })
            }
        } else {
            AttributeValue::True
        };

        let attr_end = self
            .tokens
            .get(self.pos.saturating_sub(1))
            .map(|t| t.span.end)
            .unwrap_or(attr_start);

        Attribute {
            span: Span::new(attr_start, attr_end),
            name,
            value,
        }
    }

    /// Consumes a closing tag that matches nothing, through its `>`.
    fn skip_stray_close(&mut self) {
        self.advance(); // `</`
        while !matches!(
            self.current_kind(),
            TokenKind::RAngle
                | TokenKind::Eof
                | TokenKind::LAngle
                | TokenKind::LAngleSlash
                | TokenKind::CommentStart
                | TokenKind::LAngleBang
        ) {
            self.advance();
        }
        self.eat(TokenKind::RAngle);
    }
}
