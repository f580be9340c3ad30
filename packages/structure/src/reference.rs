//! Reference addresses into the document hierarchy.
//!
//! A [`Reference`] addresses content at up to five levels: act, article,
//! paragraph, point and subpoint. Each level below the act is either absent,
//! a single identifier, or a contiguous range. References are used both as
//! the address of a tree node and as a citation target; a reference without
//! an act is relative and is resolved against the surrounding context with
//! [`Reference::relative_to`].

use serde::{Deserialize, Serialize};

use crate::error::{Result, StructureError};
use crate::numbering::{
    next_alphabetic_point_identifier, next_alphabetic_subpoint_identifier,
    next_article_identifier, next_numeric_identifier,
};

/// One level of a reference: a single identifier or a contiguous range.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefPart {
    Single(String),
    Range(String, String),
}

impl RefPart {
    /// Create a single-identifier part.
    #[must_use]
    pub fn single(id: impl Into<String>) -> Self {
        Self::Single(id.into())
    }

    /// Create a range part.
    #[must_use]
    pub fn range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::Range(start.into(), end.into())
    }

    /// Whether this part is a range.
    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range(_, _))
    }

    /// First identifier of the part (the identifier itself for singles).
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::Single(id) | Self::Range(id, _) => id,
        }
    }

    /// Last identifier of the part (the identifier itself for singles).
    #[must_use]
    pub fn last(&self) -> &str {
        match self {
            Self::Single(id) | Self::Range(_, id) => id,
        }
    }
}

/// The address levels below the act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceLevel {
    Article,
    Paragraph,
    Point,
    Subpoint,
}

impl ReferenceLevel {
    /// Position of the level in address order.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Article => 0,
            Self::Paragraph => 1,
            Self::Point => 2,
            Self::Subpoint => 3,
        }
    }
}

/// The concrete element kind a reference component refers to.
///
/// Points and subpoints come in alphabetic and numeric variants with
/// different numbering schemes, so the kind is finer-grained than
/// [`ReferenceLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferredKind {
    Article,
    Paragraph,
    AlphabeticPoint,
    NumericPoint,
    AlphabeticSubpoint,
    NumericSubpoint,
}

impl ReferredKind {
    /// The address level this kind occupies.
    #[must_use]
    pub fn level(self) -> ReferenceLevel {
        match self {
            Self::Article => ReferenceLevel::Article,
            Self::Paragraph => ReferenceLevel::Paragraph,
            Self::AlphabeticPoint | Self::NumericPoint => ReferenceLevel::Point,
            Self::AlphabeticSubpoint | Self::NumericSubpoint => ReferenceLevel::Subpoint,
        }
    }

    /// Successor identifier in this kind's numbering scheme.
    #[must_use]
    pub fn next_identifier(self, identifier: &str) -> Option<String> {
        match self {
            Self::Article => next_article_identifier(identifier),
            Self::Paragraph | Self::NumericPoint | Self::NumericSubpoint => {
                next_numeric_identifier(identifier)
            }
            Self::AlphabeticPoint => next_alphabetic_point_identifier(identifier),
            Self::AlphabeticSubpoint => next_alphabetic_subpoint_identifier(identifier),
        }
    }
}

/// A five-level address into the document hierarchy.
///
/// # Examples
///
/// ```
/// use torvenytar_structure::reference::{RefPart, Reference};
///
/// let relative = Reference {
///     paragraph: Some(RefPart::single("2")),
///     point: Some(RefPart::single("a")),
///     ..Reference::default()
/// };
/// assert!(relative.is_relative());
///
/// let context = Reference {
///     act: Some("2012. évi I. törvény".to_string()),
///     article: Some(RefPart::single("5")),
///     ..Reference::default()
/// };
/// let absolute = relative.relative_to(&context);
/// assert_eq!(absolute.act.as_deref(), Some("2012. évi I. törvény"));
/// assert_eq!(absolute.article, Some(RefPart::single("5")));
/// assert_eq!(absolute.paragraph, Some(RefPart::single("2")));
/// ```
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<RefPart>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<RefPart>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<RefPart>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subpoint: Option<RefPart>,
}

impl Reference {
    /// Whether this reference lacks an act and must be resolved against
    /// surrounding context.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        self.act.is_none()
    }

    /// Whether any level is a range.
    #[must_use]
    pub fn is_range(&self) -> bool {
        [&self.article, &self.paragraph, &self.point, &self.subpoint]
            .iter()
            .any(|part| part.as_ref().is_some_and(RefPart::is_range))
    }

    /// Resolve this reference against another one.
    ///
    /// Walking the levels in address order, every level before the first
    /// one populated in `self` is inherited from `other`; from that level
    /// on, everything comes from `self`.
    #[must_use]
    pub fn relative_to(&self, other: &Reference) -> Reference {
        let mut own = self.act.is_some();
        let act = if own { self.act.clone() } else { other.act.clone() };
        own = own || self.article.is_some();
        let article = if own {
            self.article.clone()
        } else {
            other.article.clone()
        };
        own = own || self.paragraph.is_some();
        let paragraph = if own {
            self.paragraph.clone()
        } else {
            other.paragraph.clone()
        };
        own = own || self.point.is_some();
        let point = if own {
            self.point.clone()
        } else {
            other.point.clone()
        };
        own = own || self.subpoint.is_some();
        let subpoint = if own {
            self.subpoint.clone()
        } else {
            other.subpoint.clone()
        };
        Reference {
            act,
            article,
            paragraph,
            point,
            subpoint,
        }
    }

    /// Collapse every range level to the first element of the range.
    #[must_use]
    pub fn first_in_range(&self) -> Reference {
        let collapse = |part: &Option<RefPart>| {
            part.as_ref().map(|p| RefPart::single(p.first()))
        };
        Reference {
            act: self.act.clone(),
            article: collapse(&self.article),
            paragraph: collapse(&self.paragraph),
            point: collapse(&self.point),
            subpoint: collapse(&self.subpoint),
        }
    }

    /// The deepest populated component and the element kind it refers to.
    ///
    /// Point and subpoint variants are told apart by their identifier: ids
    /// starting with a digit are numeric (`"1"`, `"12"` and `"3a"` alike).
    /// Returns `None` for act-only and empty references.
    #[must_use]
    pub fn last_component(&self) -> Option<(&RefPart, ReferredKind)> {
        fn starts_with_digit(part: &RefPart) -> bool {
            part.first().chars().next().is_some_and(|c| c.is_ascii_digit())
        }
        if let Some(subpoint) = &self.subpoint {
            let kind = if starts_with_digit(subpoint) {
                ReferredKind::NumericSubpoint
            } else {
                ReferredKind::AlphabeticSubpoint
            };
            return Some((subpoint, kind));
        }
        if let Some(point) = &self.point {
            let kind = if starts_with_digit(point) {
                ReferredKind::NumericPoint
            } else {
                ReferredKind::AlphabeticPoint
            };
            return Some((point, kind));
        }
        if let Some(paragraph) = &self.paragraph {
            return Some((paragraph, ReferredKind::Paragraph));
        }
        if let Some(article) = &self.article {
            return Some((article, ReferredKind::Article));
        }
        None
    }
}

/// A resolved reference found at a character span of some text.
///
/// `start` and `end` are a half-open character range.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InTextReference {
    pub start: usize,
    pub end: usize,
    pub reference: Reference,
}

/// An outgoing reference attached to a document element.
///
/// `source` is the address of the element the citation was found in;
/// `start` and `end` are the citation's character span within that
/// element's own text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutgoingReference {
    pub source: Reference,
    pub start: usize,
    pub end: usize,
    pub target: Reference,
}

/// A short alias introduced for an act with "(a továbbiakban: ...)".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActIdAbbreviation {
    pub abbreviation: String,
    pub act: String,
}

/// The target addresses of a block amendment.
///
/// `inserted_reference` is expressed relative to `amended_reference` when
/// both are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAmendmentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amended_reference: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_reference: Option<Reference>,
}

impl BlockAmendmentMetadata {
    /// Create the metadata, rejecting the all-absent case.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::EmptyBlockAmendmentMetadata`] when neither
    /// reference is given.
    pub fn new(
        amended_reference: Option<Reference>,
        inserted_reference: Option<Reference>,
    ) -> Result<Self> {
        if amended_reference.is_none() && inserted_reference.is_none() {
            return Err(StructureError::EmptyBlockAmendmentMetadata);
        }
        Ok(Self {
            amended_reference,
            inserted_reference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reference(
        act: Option<&str>,
        article: Option<&str>,
        paragraph: Option<&str>,
        point: Option<&str>,
        subpoint: Option<&str>,
    ) -> Reference {
        Reference {
            act: act.map(str::to_string),
            article: article.map(RefPart::single),
            paragraph: paragraph.map(RefPart::single),
            point: point.map(RefPart::single),
            subpoint: subpoint.map(RefPart::single),
        }
    }

    #[test]
    fn test_relative_to_inherits_prefix() {
        let relative = reference(None, None, Some("2"), Some("a"), None);
        let context = reference(Some("2012. évi I. törvény"), Some("5"), Some("9"), None, None);
        let resolved = relative.relative_to(&context);
        assert_eq!(
            resolved,
            reference(Some("2012. évi I. törvény"), Some("5"), Some("2"), Some("a"), None)
        );
    }

    #[test]
    fn test_relative_to_own_fields_win_after_first() {
        // Once a field is present in self, later absent fields stay absent.
        let relative = reference(None, Some("7"), None, None, None);
        let context = reference(Some("Act"), Some("5"), Some("2"), Some("x"), None);
        let resolved = relative.relative_to(&context);
        assert_eq!(resolved, reference(Some("Act"), Some("7"), None, None, None));
    }

    #[test]
    fn test_is_relative_and_is_range() {
        assert!(reference(None, Some("1"), None, None, None).is_relative());
        assert!(!reference(Some("Act"), None, None, None, None).is_relative());

        let ranged = Reference {
            article: Some(RefPart::range("8/A", "8/B")),
            ..Reference::default()
        };
        assert!(ranged.is_range());
        assert!(!reference(None, Some("8"), None, None, None).is_range());
    }

    #[test]
    fn test_first_in_range() {
        let ranged = Reference {
            act: Some("Act".to_string()),
            article: Some(RefPart::single("1")),
            paragraph: Some(RefPart::range("2", "6")),
            ..Reference::default()
        };
        assert_eq!(
            ranged.first_in_range(),
            reference(Some("Act"), Some("1"), Some("2"), None, None)
        );
    }

    #[test]
    fn test_last_component() {
        let r = reference(Some("Act"), Some("1"), Some("2"), None, None);
        let (part, kind) = r.last_component().unwrap();
        assert_eq!(part, &RefPart::single("2"));
        assert_eq!(kind, ReferredKind::Paragraph);

        let r = reference(None, Some("1"), None, Some("12"), None);
        assert_eq!(r.last_component().unwrap().1, ReferredKind::NumericPoint);

        let r = reference(None, Some("1"), None, Some("a"), Some("3a"));
        assert_eq!(r.last_component().unwrap().1, ReferredKind::NumericSubpoint);

        let r = reference(None, None, None, None, Some("ab"));
        assert_eq!(
            r.last_component().unwrap().1,
            ReferredKind::AlphabeticSubpoint
        );

        assert_eq!(reference(Some("Act"), None, None, None, None).last_component(), None);
    }

    #[test]
    fn test_referred_kind_successors() {
        assert_eq!(
            ReferredKind::Article.next_identifier("3:116"),
            Some("3:117".to_string())
        );
        assert_eq!(
            ReferredKind::AlphabeticPoint.next_identifier("ny"),
            Some("o".to_string())
        );
        assert_eq!(
            ReferredKind::Paragraph.next_identifier("4b"),
            Some("4c".to_string())
        );
    }

    #[test]
    fn test_block_amendment_metadata_invariant() {
        assert!(BlockAmendmentMetadata::new(None, None).is_err());
        let amended = reference(Some("Act"), Some("1"), None, None, None);
        assert!(BlockAmendmentMetadata::new(Some(amended), None).is_ok());
    }

    #[test]
    fn test_reference_serde_round_trip() {
        let r = Reference {
            act: Some("2012. évi I. törvény".to_string()),
            article: Some(RefPart::range("8/A", "8/B")),
            point: Some(RefPart::single("a")),
            ..Reference::default()
        };
        let json = serde_json::to_string(&r).unwrap();
        let back: Reference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
        // Absent levels are omitted entirely.
        assert!(!json.contains("paragraph"));
    }
}
