//! Selector type definitions.

use std::fmt;

/// A comma-separated group of selectors (e.g. ".squares table, .squares button").
///
/// An element matches the list when it matches any member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorList(pub Vec<Selector>);

impl SelectorList {
    /// Wrap parsed selectors.
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self(selectors)
    }

    /// The member selectors in source order.
    pub fn selectors(&self) -> &[Selector] {
        &self.0
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

/// One complex selector such as `table.grid > tbody tr[data-row]`.
///
/// `parts` run left to right; `combinators[i]` sits between `parts[i]` and
/// `parts[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    /// Compound selectors, leftmost first.
    pub parts: Vec<SelectorPart>,
    /// One fewer than `parts`.
    pub combinators: Vec<Combinator>,
}

impl Selector {
    /// A selector made of a single compound.
    pub fn new(part: SelectorPart) -> Self {
        Self {
            parts: vec![part],
            combinators: Vec::new(),
        }
    }

    /// Extend the selector to the right.
    pub fn then(mut self, combinator: Combinator, part: SelectorPart) -> Self {
        self.combinators.push(combinator);
        self.parts.push(part);
        self
    }

    /// The compound the matched element itself must satisfy.
    pub fn subject(&self) -> Option<&SelectorPart> {
        self.parts.last()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.parts.iter();
        if let Some(first) = parts.next() {
            write!(f, "{first}")?;
        }
        for (combinator, part) in self.combinators.iter().zip(parts) {
            write!(f, "{}{part}", combinator.as_str())?;
        }
        Ok(())
    }
}

/// A compound selector: everything between two combinators, e.g.
/// `td.cell[data-column]:first-child`. An element must satisfy every field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectorPart {
    /// `td` or `*`.
    pub type_selector: Option<TypeSelector>,
    /// `#id`.
    pub id: Option<String>,
    /// `.class`, possibly repeated.
    pub classes: Vec<String>,
    /// `[name]`, `[name=value]` and friends.
    pub attributes: Vec<AttributeSelector>,
    /// `:first-child`, `:not(..)` and friends.
    pub pseudo_classes: Vec<PseudoClass>,
}

impl SelectorPart {
    /// A part with no constraints. Matches nothing on its own once parsed,
    /// since the parser never produces one.
    pub fn new() -> Self {
        Self::default()
    }

    /// A part matching elements by tag name.
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            type_selector: Some(TypeSelector::Type(name.into())),
            ..Self::default()
        }
    }

    /// Require a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Require an attribute.
    pub fn with_attribute(mut self, attribute: AttributeSelector) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Require a pseudo-class.
    pub fn with_pseudo(mut self, pseudo: PseudoClass) -> Self {
        self.pseudo_classes.push(pseudo);
        self
    }

    /// Whether the part carries no constraint at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for SelectorPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_selector {
            Some(TypeSelector::Universal) => write!(f, "*")?,
            Some(TypeSelector::Type(t)) => write!(f, "{t}")?,
            None => {}
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for attribute in &self.attributes {
            write!(f, "{attribute}")?;
        }
        for pseudo in &self.pseudo_classes {
            write!(f, ":{pseudo}")?;
        }
        Ok(())
    }
}

/// Tag constraint of a compound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSelector {
    /// `*`
    Universal,
    /// A tag name, compared case-insensitively.
    Type(String),
}

/// How two compounds relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Whitespace: some ancestor.
    Descendant,
    /// `>`: the parent.
    Child,
    /// `+`: the previous element sibling.
    AdjacentSibling,
    /// `~`: any earlier element sibling.
    GeneralSibling,
}

impl Combinator {
    /// Source form, including surrounding spaces.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::AdjacentSibling => " + ",
            Self::GeneralSibling => " ~ ",
        }
    }
}

/// An attribute selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeSelector {
    /// Lowercase attribute name.
    pub name: String,
    /// How the value is compared.
    pub operator: AttributeOperator,
}

impl AttributeSelector {
    /// `[name]`
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator: AttributeOperator::Exists,
        }
    }

    /// `[name="value"]`
    pub fn equals(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator: AttributeOperator::Equals(value.into()),
        }
    }

    /// Check an attribute value (None when the attribute is absent).
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match &self.operator {
            AttributeOperator::Exists => true,
            AttributeOperator::Equals(expected) => value == expected,
            AttributeOperator::Includes(word) => {
                value.split_ascii_whitespace().any(|w| w == word)
            }
            AttributeOperator::DashMatch(prefix) => {
                value == prefix
                    || value
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttributeOperator::Prefix(prefix) => !prefix.is_empty() && value.starts_with(prefix.as_str()),
            AttributeOperator::Suffix(suffix) => !suffix.is_empty() && value.ends_with(suffix.as_str()),
            AttributeOperator::Substring(needle) => !needle.is_empty() && value.contains(needle.as_str()),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        match &self.operator {
            AttributeOperator::Exists => write!(f, "[{name}]"),
            AttributeOperator::Equals(v) => write!(f, "[{name}=\"{v}\"]"),
            AttributeOperator::Includes(v) => write!(f, "[{name}~=\"{v}\"]"),
            AttributeOperator::DashMatch(v) => write!(f, "[{name}|=\"{v}\"]"),
            AttributeOperator::Prefix(v) => write!(f, "[{name}^=\"{v}\"]"),
            AttributeOperator::Suffix(v) => write!(f, "[{name}$=\"{v}\"]"),
            AttributeOperator::Substring(v) => write!(f, "[{name}*=\"{v}\"]"),
        }
    }
}

/// Attribute comparison operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeOperator {
    /// `[name]`
    Exists,
    /// `[name=value]`
    Equals(String),
    /// `[name~=value]` - whitespace-separated word match.
    Includes(String),
    /// `[name|=value]` - exact or followed by a hyphen.
    DashMatch(String),
    /// `[name^=value]`
    Prefix(String),
    /// `[name$=value]`
    Suffix(String),
    /// `[name*=value]`
    Substring(String),
}

/// Pseudo-classes. Only structural ones are supported; the document has
/// no interaction state to match `:hover` against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    NthChild(NthExpr),
    OnlyChild,
    /// No child nodes, text included.
    Empty,
    /// The element does not satisfy the inner compound.
    Not(Box<SelectorPart>),
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstChild => f.write_str("first-child"),
            Self::LastChild => f.write_str("last-child"),
            Self::NthChild(expr) => write!(f, "nth-child({expr})"),
            Self::OnlyChild => f.write_str("only-child"),
            Self::Empty => f.write_str("empty"),
            Self::Not(inner) => write!(f, "not({inner})"),
        }
    }
}

/// An `an+b` position pattern. Positions are 1-based, as in CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NthExpr {
    pub a: i32,
    pub b: i32,
}

impl NthExpr {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// `2n+1`
    pub fn odd() -> Self {
        Self::new(2, 1)
    }

    /// `2n`
    pub fn even() -> Self {
        Self::new(2, 0)
    }

    /// Whether the element at 0-based `index` among its siblings matches:
    /// some `n >= 0` satisfies `a*n + b == index + 1`.
    pub fn matches(&self, index: usize) -> bool {
        // i64 holds every i32 difference and quotient, so extreme
        // coefficients cannot overflow.
        let Ok(position) = i64::try_from(index) else {
            return false;
        };
        let offset = position + 1 - i64::from(self.b);
        match i64::from(self.a) {
            0 => offset == 0,
            a => offset % a == 0 && offset / a >= 0,
        }
    }
}

impl fmt::Display for NthExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.a, self.b) {
            (2, 1) => f.write_str("odd"),
            (2, 0) => f.write_str("even"),
            (0, b) => write!(f, "{b}"),
            (a, b) => {
                match a {
                    1 => f.write_str("n")?,
                    -1 => f.write_str("-n")?,
                    a => write!(f, "{a}n")?,
                }
                match b {
                    0 => Ok(()),
                    b if b > 0 => write!(f, "+{b}"),
                    b => write!(f, "{b}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_display() {
        let sel = Selector::new(SelectorPart::new().with_class("squares"))
            .then(Combinator::Descendant, SelectorPart::tag("button"));
        assert_eq!(sel.to_string(), ".squares button");

        let sel = Selector::new(SelectorPart::tag("tbody")).then(
            Combinator::Child,
            SelectorPart::tag("tr").with_attribute(AttributeSelector::equals("data-row", "2")),
        );
        assert_eq!(sel.to_string(), "tbody > tr[data-row=\"2\"]");
        assert_eq!(sel.subject(), Some(&sel.parts[1]));
    }

    #[test]
    fn selector_list_display() {
        let squares = || Selector::new(SelectorPart::new().with_class("squares"));
        let list = SelectorList::new(vec![
            squares().then(Combinator::Descendant, SelectorPart::tag("table")),
            squares().then(Combinator::Descendant, SelectorPart::tag("button")),
        ]);
        assert_eq!(list.to_string(), ".squares table, .squares button");
    }

    #[test]
    fn attribute_operators() {
        let includes = AttributeSelector {
            name: "class".into(),
            operator: AttributeOperator::Includes("minus".into()),
        };
        assert!(includes.matches(Some("minus row show")));
        assert!(!includes.matches(Some("minuses")));
        assert!(!includes.matches(None));

        let dash = AttributeSelector {
            name: "lang".into(),
            operator: AttributeOperator::DashMatch("en".into()),
        };
        assert!(dash.matches(Some("en-US")));
        assert!(!dash.matches(Some("english")));

        assert!(AttributeSelector::exists("data-row").matches(Some("")));
    }

    #[test]
    fn nth_positions() {
        let third = NthExpr::new(0, 3);
        assert_eq!((0..5).filter(|&i| third.matches(i)).collect::<Vec<_>>(), [2]);

        let odd = NthExpr::odd();
        assert_eq!((0..5).filter(|&i| odd.matches(i)).collect::<Vec<_>>(), [0, 2, 4]);

        let even = NthExpr::even();
        assert_eq!((0..5).filter(|&i| even.matches(i)).collect::<Vec<_>>(), [1, 3]);

        let first_two = NthExpr::new(-1, 2);
        assert_eq!((0..5).filter(|&i| first_two.matches(i)).collect::<Vec<_>>(), [0, 1]);

        let from_third = NthExpr::new(1, 3);
        assert_eq!((0..5).filter(|&i| from_third.matches(i)).collect::<Vec<_>>(), [2, 3, 4]);
    }

    #[test]
    fn nth_extreme_coefficients() {
        assert!(!NthExpr::new(0, i32::MIN).matches(0));
        assert!(!NthExpr::new(-1, i32::MIN).matches(3));
        assert!(NthExpr::new(i32::MIN, 1).matches(0));
        assert!(!NthExpr::new(i32::MIN, 1).matches(1));
        assert!(NthExpr::new(i32::MAX, i32::MAX).matches(i32::MAX as usize - 1));
        assert!(!NthExpr::new(1, 0).matches(usize::MAX));
    }

    #[test]
    fn nth_display() {
        assert_eq!(NthExpr::new(3, -1).to_string(), "3n-1");
        assert_eq!(NthExpr::new(-1, 2).to_string(), "-n+2");
        assert_eq!(NthExpr::new(1, 0).to_string(), "n");
        assert_eq!(NthExpr::odd().to_string(), "odd");
    }
}
