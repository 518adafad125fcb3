//! Parsing of root custom property blocks.
//!
//! Accepts stylesheets such as:
//!
//! ```css
//! :root {
//!     --square-size: 40px;
//!     --square-offset: 3px;
//! }
//! ```
//!
//! Only rules whose selector is `:root` or `html` contribute. Other rules and
//! malformed declarations are skipped with a warning, so a single bad line
//! does not discard the whole sheet.

use cssparser::{Delimiter, ParseError as CssParseError, Parser, ParserInput, Token};

use crate::{Error, Result};

/// Parse the declarations of every `:root` / `html` rule in `css`.
///
/// Returns `(property, value)` pairs in source order with values trimmed.
/// A later declaration of the same property does not remove the earlier
/// entry; callers that build a map get last-wins semantics.
pub fn parse_root_declarations(css: &str) -> Result<Vec<(String, String)>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut declarations = Vec::new();

    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        let location = parser.current_source_location();
        let is_root = parser
            .parse_until_before(Delimiter::CurlyBracketBlock, |p| {
                let start = p.position();
                while p.next().is_ok() {}
                let prelude = p.slice_from(start).trim();
                Ok::<_, CssParseError<'_, ()>>(prelude == ":root" || prelude.eq_ignore_ascii_case("html"))
            })
            .unwrap_or(false);

        match parser.next() {
            Ok(Token::CurlyBracketBlock) => {}
            _ => {
                return Err(Error::parse(
                    "Expected '{' after selector",
                    location.line,
                    location.column,
                ));
            }
        }

        let block = parser.parse_nested_block(|p| {
            Ok::<_, CssParseError<'_, ()>>(parse_declaration_block(p))
        });
        match block {
            Ok(block) if is_root => declarations.extend(block),
            Ok(_) => {
                tracing::warn!(line = location.line, "skipping non-root rule");
            }
            Err(e) => {
                tracing::warn!(line = location.line, "failed to parse rule block: {:?}", e);
            }
        }
    }

    Ok(declarations)
}

/// Parse `name: value;` pairs until the block is exhausted.
fn parse_declaration_block(parser: &mut Parser<'_, '_>) -> Vec<(String, String)> {
    let mut declarations = Vec::new();
    loop {
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }

        let result = parser.parse_until_after(Delimiter::Semicolon, |p| {
            let name = p.expect_ident()?.to_string();
            p.expect_colon()?;
            let start = p.position();
            while p.next().is_ok() {}
            let value = p.slice_from(start).trim().to_string();
            Ok::<_, CssParseError<'_, ()>>((name, value))
        });

        match result {
            Ok((name, value)) if !value.is_empty() => declarations.push((name, value)),
            Ok((name, _)) => tracing::warn!(property = %name, "ignoring empty declaration"),
            Err(e) => tracing::warn!("ignoring malformed declaration: {:?}", e),
        }
    }
    declarations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_root_block() {
        let css = ":root {\n  --square-size: 40px;\n  --square-offset: 3px;\n  --square-border-width: 1px\n}";
        let declarations = parse_root_declarations(css).unwrap();
        assert_eq!(
            declarations,
            vec![
                ("--square-size".to_string(), "40px".to_string()),
                ("--square-offset".to_string(), "3px".to_string()),
                ("--square-border-width".to_string(), "1px".to_string()),
            ]
        );
    }

    #[test]
    fn skips_other_rules_and_bad_declarations() {
        let css = ".squares { --square-size: 99px; }\nhtml { --square-size: 20px; : broken; --square-offset: ; }";
        let declarations = parse_root_declarations(css).unwrap();
        assert_eq!(declarations, vec![("--square-size".to_string(), "20px".to_string())]);
    }

    #[test]
    fn missing_block_is_an_error() {
        let err = parse_root_declarations(":root --square-size: 1px;").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 0, .. }));
    }
}
