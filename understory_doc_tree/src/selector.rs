// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small CSS selector subset: type, universal, `#id`, `.class` and `[attr]`/`[attr=value]`
//! simple selectors, descendant (` `) and child (`>`) combinators, and comma-separated lists.
//!
//! Pseudo-classes, pseudo-elements and sibling combinators are rejected as malformed.
//!
//! ```
//! use understory_doc_tree::Selector;
//!
//! assert!(Selector::parse("h1, h2, article > h3.title").is_ok());
//! assert!(Selector::parse("h1,").is_err());
//! assert!(Selector::parse("h1:first-child").is_err());
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::iter::Peekable;
use core::str::CharIndices;

use crate::document::Document;
use crate::types::ElementId;

/// Error produced when a selector string is malformed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector (or one entry of a list) is empty.
    #[error("empty selector at offset {offset}")]
    Empty {
        /// Byte offset where a selector was expected.
        offset: usize,
    },
    /// A character that cannot appear at this position.
    #[error("unexpected character {found:?} at offset {offset}")]
    Unexpected {
        /// The offending character.
        found: char,
        /// Byte offset of the character.
        offset: usize,
    },
    /// Input ended inside a construct (for example an unterminated `[`).
    #[error("unexpected end of selector")]
    UnexpectedEnd,
}

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    // Leftmost compound first; each combinator links a compound to the one before it.
    head: Compound,
    tail: Vec<(Combinator, Compound)>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.ids.is_empty()
            && self.classes.is_empty()
            && self.attributes.is_empty()
    }

    fn matches(&self, doc: &Document, el: ElementId) -> bool {
        let Some(data) = doc.data(el) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if tag != "*" && !tag.eq_ignore_ascii_case(&data.tag) {
                return false;
            }
        }
        if !self
            .ids
            .iter()
            .all(|id| data.id.as_deref() == Some(id.as_str()))
        {
            return false;
        }
        if !self.classes.iter().all(|c| data.classes.contains(c)) {
            return false;
        }
        self.attributes
            .iter()
            .all(|(name, value)| match (data.attribute(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            })
    }
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser {
            input,
            chars: input.char_indices().peekable(),
        };
        let mut alternatives = Vec::new();
        loop {
            alternatives.push(parser.complex()?);
            match parser.chars.next() {
                None => break,
                Some((_, ',')) => {}
                Some((offset, found)) => return Err(SelectorError::Unexpected { found, offset }),
            }
        }
        Ok(Self { alternatives })
    }

    /// Returns true if `el` matches any selector in the list.
    ///
    /// Ancestors are matched against the whole document, not just a query scope.
    pub fn matches(&self, doc: &Document, el: ElementId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, el))
    }
}

impl Complex {
    fn matches(&self, doc: &Document, el: ElementId) -> bool {
        let mut compounds: Vec<&Compound> = Vec::with_capacity(self.tail.len() + 1);
        let mut combinators: Vec<Combinator> = Vec::with_capacity(self.tail.len());
        compounds.push(&self.head);
        for (comb, compound) in &self.tail {
            combinators.push(*comb);
            compounds.push(compound);
        }
        match_from(doc, el, &compounds, &combinators)
    }
}

// Match `compounds` right-to-left with `el` as the subject of the last compound.
fn match_from(
    doc: &Document,
    el: ElementId,
    compounds: &[&Compound],
    combinators: &[Combinator],
) -> bool {
    let Some((last, rest)) = compounds.split_last() else {
        return true;
    };
    if !last.matches(doc, el) {
        return false;
    }
    let Some((comb, rest_combinators)) = combinators.split_last() else {
        return true;
    };
    match comb {
        Combinator::Child => doc
            .parent(el)
            .is_some_and(|p| match_from(doc, p, rest, rest_combinators)),
        Combinator::Descendant => {
            let mut cursor = doc.parent(el);
            while let Some(ancestor) = cursor {
                if match_from(doc, ancestor, rest, rest_combinators) {
                    return true;
                }
                cursor = doc.parent(ancestor);
            }
            false
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl Parser<'_> {
    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(i, _)| *i)
            .unwrap_or(self.input.len())
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {
            skipped = true;
        }
        skipped
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_whitespace();
        let head = self.compound()?;
        let mut tail = Vec::new();
        loop {
            let had_space = self.skip_whitespace();
            let comb = match self.chars.peek().copied() {
                None | Some((_, ',')) => break,
                Some((_, '>')) => {
                    self.chars.next();
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if had_space => Combinator::Descendant,
                Some((offset, found)) => return Err(SelectorError::Unexpected { found, offset }),
            };
            tail.push((comb, self.compound()?));
        }
        Ok(Complex { head, tail })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.offset();
        let mut compound = Compound::default();
        match self.chars.peek().copied() {
            Some((_, '*')) => {
                self.chars.next();
                compound.tag = Some(String::from("*"));
            }
            Some((_, c)) if is_ident_char(c) => compound.tag = Some(self.ident()?),
            _ => {}
        }
        loop {
            match self.chars.peek().copied() {
                Some((_, '#')) => {
                    self.chars.next();
                    compound.ids.push(self.ident()?);
                }
                Some((_, '.')) => {
                    self.chars.next();
                    compound.classes.push(self.ident()?);
                }
                Some((_, '[')) => {
                    self.chars.next();
                    compound.attributes.push(self.attribute()?);
                }
                Some((_, c)) if c.is_whitespace() || c == ',' || c == '>' => break,
                None => break,
                Some((offset, found)) => return Err(SelectorError::Unexpected { found, offset }),
            }
        }
        if compound.is_empty() {
            return Err(SelectorError::Empty { offset: start });
        }
        Ok(compound)
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some((_, c)) = self.chars.next_if(|(_, c)| is_ident_char(*c)) {
            out.push(c);
        }
        if out.is_empty() {
            return match self.chars.peek() {
                Some(&(offset, found)) => Err(SelectorError::Unexpected { found, offset }),
                None => Err(SelectorError::UnexpectedEnd),
            };
        }
        Ok(out)
    }

    fn attribute(&mut self) -> Result<(String, Option<String>), SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();
        let value = match self.chars.next() {
            Some((_, ']')) => return Ok((name, None)),
            Some((_, '=')) => {
                self.skip_whitespace();
                let value = match self.chars.peek().copied() {
                    Some((_, quote @ ('"' | '\''))) => {
                        self.chars.next();
                        let mut out = String::new();
                        loop {
                            match self.chars.next() {
                                Some((_, c)) if c == quote => break,
                                Some((_, c)) => out.push(c),
                                None => return Err(SelectorError::UnexpectedEnd),
                            }
                        }
                        out
                    }
                    _ => self.ident()?,
                };
                self.skip_whitespace();
                value
            }
            Some((offset, found)) => return Err(SelectorError::Unexpected { found, offset }),
            None => return Err(SelectorError::UnexpectedEnd),
        };
        match self.chars.next() {
            Some((_, ']')) => Ok((name, Some(value))),
            Some((offset, found)) => Err(SelectorError::Unexpected { found, offset }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
