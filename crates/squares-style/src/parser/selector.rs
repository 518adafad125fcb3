//! Selector parsing using the `cssparser` tokenizer.
//!
//! Whitespace is significant between compound selectors (it is the
//! descendant combinator), so the main loop reads tokens with
//! `next_including_whitespace` and only skips whitespace where the grammar
//! allows it.

use cssparser::{
    BasicParseErrorKind, ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, Token,
};

use crate::selector::{
    AttributeOperator, AttributeSelector, Combinator, NthExpr, PseudoClass, Selector, SelectorList,
    SelectorPart, TypeSelector,
};
use crate::{Error, Result};

type ParseResult<'i, T> = std::result::Result<T, CssParseError<'i, &'static str>>;

/// Parse a comma-separated selector list.
///
/// # Example
///
/// ```
/// use squares_style::parse_selector_list;
///
/// let list = parse_selector_list(".squares table, .squares button").unwrap();
/// assert_eq!(list.selectors().len(), 2);
/// assert_eq!(list.to_string(), ".squares table, .squares button");
/// ```
pub fn parse_selector_list(input: &str) -> Result<SelectorList> {
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);
    parser
        .parse_comma_separated(parse_complex)
        .map(SelectorList::new)
        .map_err(|e| selector_error(input, e))
}

/// Parse a single selector (no commas).
pub fn parse_selector(input: &str) -> Result<Selector> {
    let mut list = parse_selector_list(input)?;
    if list.0.len() != 1 {
        return Err(Error::invalid_selector(input, "Expected a single selector"));
    }
    Ok(list.0.remove(0))
}

fn selector_error(input: &str, error: CssParseError<'_, &'static str>) -> Error {
    let message = match error.kind {
        ParseErrorKind::Custom(message) => message.to_string(),
        ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => "Unexpected end of input".to_string(),
        ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
            format!("Unexpected token {token:?}")
        }
        ParseErrorKind::Basic(other) => format!("{other:?}"),
    };
    tracing::debug!(selector = input, %message, "rejected selector");
    Error::invalid_selector(input, format!("{message} (column {})", error.location.column))
}

/// Parse one complex selector: compounds joined by combinators.
fn parse_complex<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, Selector> {
    let mut parts = Vec::new();
    let mut combinators = Vec::new();
    let mut current = SelectorPart::default();
    let mut pending: Option<Combinator> = None;

    loop {
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        let explicit = match token {
            Token::WhiteSpace(_) => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                    pending = Some(Combinator::Descendant);
                }
                continue;
            }
            Token::Delim('>') => Some(Combinator::Child),
            Token::Delim('+') => Some(Combinator::AdjacentSibling),
            Token::Delim('~') => Some(Combinator::GeneralSibling),
            _ => None,
        };

        if let Some(combinator) = explicit {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            if parts.is_empty() {
                return Err(parser.new_custom_error("Combinator without a left-hand selector"));
            }
            match pending {
                None | Some(Combinator::Descendant) => pending = Some(combinator),
                Some(_) => return Err(parser.new_custom_error("Consecutive combinators")),
            }
            continue;
        }

        if current.is_empty() && !parts.is_empty() {
            let combinator = pending
                .take()
                .ok_or_else(|| parser.new_custom_error("Expected a combinator"))?;
            combinators.push(combinator);
        }
        apply_simple(parser, &mut current, token)?;
    }

    if !current.is_empty() {
        parts.push(current);
    } else if matches!(
        pending,
        Some(Combinator::Child | Combinator::AdjacentSibling | Combinator::GeneralSibling)
    ) {
        return Err(parser.new_custom_error("Combinator without a right-hand selector"));
    }

    if parts.is_empty() {
        return Err(parser.new_custom_error("Empty selector"));
    }
    Ok(Selector { parts, combinators })
}

/// Parse a compound selector, used as the argument of `:not()`.
fn parse_compound<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, SelectorPart> {
    parser.skip_whitespace();
    let mut part = SelectorPart::default();
    loop {
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        if let Token::WhiteSpace(_) = token {
            // Only trailing whitespace is allowed inside :not().
            parser.expect_exhausted()?;
            break;
        }
        apply_simple(parser, &mut part, token)?;
    }
    if part.is_empty() {
        return Err(parser.new_custom_error("Empty :not() argument"));
    }
    Ok(part)
}

/// Add one simple selector to a compound.
fn apply_simple<'i>(
    parser: &mut Parser<'i, '_>,
    part: &mut SelectorPart,
    token: Token<'i>,
) -> ParseResult<'i, ()> {
    match token {
        Token::Ident(name) => {
            if !part.is_empty() {
                return Err(parser.new_custom_error("Type selector must come first"));
            }
            part.type_selector = Some(TypeSelector::Type(name.to_ascii_lowercase()));
        }
        Token::Delim('*') => {
            if !part.is_empty() {
                return Err(parser.new_custom_error("Universal selector must come first"));
            }
            part.type_selector = Some(TypeSelector::Universal);
        }
        Token::Delim('.') => match parser.next_including_whitespace()?.clone() {
            Token::Ident(class) => part.classes.push(class.to_string()),
            _ => return Err(parser.new_custom_error("Expected class name after '.'")),
        },
        Token::IDHash(id) => {
            if part.id.is_some() {
                return Err(parser.new_custom_error("Duplicate id selector"));
            }
            part.id = Some(id.to_string());
        }
        Token::SquareBracketBlock => {
            let attribute = parser.parse_nested_block(parse_attribute)?;
            part.attributes.push(attribute);
        }
        Token::Colon => {
            let pseudo = parse_pseudo(parser)?;
            part.pseudo_classes.push(pseudo);
        }
        _ => return Err(parser.new_custom_error("Unexpected token in selector")),
    }
    Ok(())
}

/// Parse the inside of `[...]`.
fn parse_attribute<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, AttributeSelector> {
    let name = parser.expect_ident()?.to_ascii_lowercase();
    if parser.is_exhausted() {
        return Ok(AttributeSelector::exists(name));
    }

    let operator = parser.next()?.clone();
    let value = match parser.next()?.clone() {
        Token::Ident(value) | Token::QuotedString(value) => value.to_string(),
        Token::Number {
            int_value: Some(n), ..
        } => n.to_string(),
        _ => return Err(parser.new_custom_error("Expected attribute value")),
    };

    let operator = match operator {
        Token::Delim('=') => AttributeOperator::Equals(value),
        Token::IncludeMatch => AttributeOperator::Includes(value),
        Token::DashMatch => AttributeOperator::DashMatch(value),
        Token::PrefixMatch => AttributeOperator::Prefix(value),
        Token::SuffixMatch => AttributeOperator::Suffix(value),
        Token::SubstringMatch => AttributeOperator::Substring(value),
        _ => return Err(parser.new_custom_error("Unknown attribute operator")),
    };
    Ok(AttributeSelector { name, operator })
}

/// Parse a pseudo-class after its ':'.
fn parse_pseudo<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, PseudoClass> {
    match parser.next_including_whitespace()?.clone() {
        Token::Ident(name) => match name.to_ascii_lowercase().as_str() {
            "first-child" => Ok(PseudoClass::FirstChild),
            "last-child" => Ok(PseudoClass::LastChild),
            "only-child" => Ok(PseudoClass::OnlyChild),
            "empty" => Ok(PseudoClass::Empty),
            _ => Err(parser.new_custom_error("Unknown pseudo-class")),
        },
        Token::Function(name) => match name.to_ascii_lowercase().as_str() {
            "nth-child" => Ok(PseudoClass::NthChild(parser.parse_nested_block(parse_nth_expr)?)),
            "not" => Ok(PseudoClass::Not(Box::new(
                parser.parse_nested_block(parse_compound)?,
            ))),
            _ => Err(parser.new_custom_error("Unknown functional pseudo-class")),
        },
        _ => Err(parser.new_custom_error("Expected pseudo-class name after ':'")),
    }
}

/// Parse an An+B expression (e.g. "odd", "3", "2n+1", "-n+2").
fn parse_nth_expr<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, NthExpr> {
    let (a, b) = match parser.next()?.clone() {
        Token::Number {
            int_value: Some(b), ..
        } => return Ok(NthExpr::new(0, b)),
        Token::Ident(name) if name.eq_ignore_ascii_case("odd") => return Ok(NthExpr::odd()),
        Token::Ident(name) if name.eq_ignore_ascii_case("even") => return Ok(NthExpr::even()),
        Token::Ident(name) => {
            let lower = name.to_ascii_lowercase();
            let (a, unit) = match lower.strip_prefix('-') {
                Some(rest) => (-1, rest.to_string()),
                None => (1, lower),
            };
            (a, split_n_unit(&unit).ok_or_else(|| parser.new_custom_error("Invalid An+B"))?)
        }
        Token::Dimension {
            int_value: Some(a),
            unit,
            ..
        } => (
            a,
            split_n_unit(&unit.to_ascii_lowercase())
                .ok_or_else(|| parser.new_custom_error("Invalid An+B"))?,
        ),
        _ => return Err(parser.new_custom_error("Invalid An+B")),
    };

    if let Some(b) = b {
        return Ok(NthExpr::new(a, b));
    }
    if parser.is_exhausted() {
        return Ok(NthExpr::new(a, 0));
    }

    let b = match parser.next()?.clone() {
        Token::Number {
            int_value: Some(b),
            has_sign: true,
            ..
        } => b,
        Token::Delim(sign @ ('+' | '-')) => match parser.next()?.clone() {
            Token::Number {
                int_value: Some(b),
                has_sign: false,
                ..
            } => {
                if sign == '-' {
                    -b
                } else {
                    b
                }
            }
            _ => return Err(parser.new_custom_error("Invalid An+B")),
        },
        _ => return Err(parser.new_custom_error("Invalid An+B")),
    };
    Ok(NthExpr::new(a, b))
}

/// Split the "n" part of an An+B token.
///
/// `"n"` yields `Some(None)`; `"n-3"` yields `Some(Some(-3))` because the
/// tokenizer folds a trailing `-digits` into the identifier.
fn split_n_unit(unit: &str) -> Option<Option<i32>> {
    let rest = unit.strip_prefix('n')?;
    if rest.is_empty() {
        return Some(None);
    }
    let digits = rest.strip_prefix('-')?;
    digits.parse::<i32>().ok().map(|b| Some(-b))
}
