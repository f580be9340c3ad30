//! Reference fragment collection and merging.
//!
//! The grammar reports one fragment per identifier it saw, so a citation
//! like "8/A. §–8/B. §-a és 17. §-a" arrives as a stream of per-level
//! fragments. The collector turns that stream into a minimal ordered set
//! of [`Reference`]s covering exactly the original spans: adjacent
//! identifiers merge into ranges, every level's last fragment is carried
//! into the deeper levels, and earlier fragments are emitted as complete
//! references of their own.

use torvenytar_structure::{InTextReference, RefPart, Reference, ReferenceLevel, ReferredKind};

use crate::grammar::Span;

#[derive(Debug, Clone)]
struct Fragment {
    kind: ReferredKind,
    part: RefPart,
    start: usize,
    end: usize,
}

/// Collects the fragments of one reference expression and converts them
/// into minimal references.
///
/// # Examples
///
/// ```
/// use torvenytar_parser::collector::ReferenceCollector;
/// use torvenytar_parser::grammar::Span;
/// use torvenytar_structure::{RefPart, ReferredKind};
///
/// let mut collector = ReferenceCollector::new();
/// collector.add(ReferredKind::Article, RefPart::single("1"), Span::new(0, 5));
/// collector.add(ReferredKind::Article, RefPart::single("2"), Span::new(6, 11));
/// let references = collector.into_references(0, 11);
///
/// // "1" and "2" are adjacent, so they merge into a single range.
/// assert_eq!(references.len(), 1);
/// assert_eq!(references[0].reference.article, Some(RefPart::range("1", "2")));
/// assert_eq!((references[0].start, references[0].end), (0, 11));
/// ```
#[derive(Debug, Default)]
pub struct ReferenceCollector {
    act: Option<String>,
    levels: [Vec<Fragment>; 4],
}

impl ReferenceCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the act every produced reference belongs to.
    pub fn set_act(&mut self, act: impl Into<String>) {
        self.act = Some(act.into());
    }

    /// Record one fragment.
    pub fn add(&mut self, kind: ReferredKind, part: RefPart, span: Span) {
        self.levels[kind.level().index()].push(Fragment {
            kind,
            part,
            start: span.start,
            end: span.end,
        });
    }

    /// Merge and emit the collected fragments.
    ///
    /// `start_override` replaces the start position of the very first
    /// emitted reference (citations start before their first fragment,
    /// e.g. at the act name); `end` closes the final reference.
    #[must_use]
    pub fn into_references(self, start_override: usize, end: usize) -> Vec<InTextReference> {
        let Self { act, levels } = self;
        let merged = levels.map(merge_level);

        let mut result: Vec<InTextReference> = Vec::new();
        let mut parts: [Option<RefPart>; 4] = [None, None, None, None];
        let mut pending_start: Option<usize> = Some(start_override);

        let build = |act: &Option<String>, parts: &[Option<RefPart>; 4]| Reference {
            act: act.clone(),
            article: parts[ReferenceLevel::Article.index()].clone(),
            paragraph: parts[ReferenceLevel::Paragraph.index()].clone(),
            point: parts[ReferenceLevel::Point.index()].clone(),
            subpoint: parts[ReferenceLevel::Subpoint.index()].clone(),
        };

        for (level, fragments) in merged.iter().enumerate() {
            let Some((last, earlier)) = fragments.split_last() else {
                continue;
            };
            // Every fragment but the last becomes a complete reference on
            // its own; the last one is carried into the deeper levels.
            for fragment in earlier {
                let start = pending_start.take().unwrap_or(fragment.start);
                parts[level] = Some(fragment.part.clone());
                result.push(InTextReference {
                    start,
                    end: fragment.end,
                    reference: build(&act, &parts),
                });
            }
            parts[level] = Some(last.part.clone());
            if !earlier.is_empty() && pending_start.is_none() {
                pending_start = Some(last.start);
            }
        }

        result.push(InTextReference {
            start: pending_start.unwrap_or(start_override),
            end,
            reference: build(&act, &parts),
        });
        result
    }
}

/// Sort one level's fragments by start position, then merge adjacent
/// single identifiers into ranges.
///
/// Fragments are sorted before any adjacency check, never merged in
/// discovery order. A merge happens only between two singles of the same
/// kind where the second identifier is the successor of the first; ranges
/// (reported or merged) are never chained further.
fn merge_level(mut fragments: Vec<Fragment>) -> Vec<Fragment> {
    fragments.sort_by_key(|f| f.start);
    let mut committed: Vec<Fragment> = Vec::new();
    for fragment in fragments {
        if let Some(previous) = committed.last_mut() {
            let mergeable = previous.kind == fragment.kind
                && !previous.part.is_range()
                && !fragment.part.is_range()
                && previous.kind.next_identifier(previous.part.first())
                    == Some(fragment.part.first().to_string());
            if mergeable {
                previous.part = RefPart::range(previous.part.first(), fragment.part.first());
                previous.end = fragment.end;
                continue;
            }
        }
        committed.push(fragment);
    }
    committed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reference(
        act: Option<&str>,
        article: Option<RefPart>,
        paragraph: Option<RefPart>,
        point: Option<RefPart>,
        subpoint: Option<RefPart>,
    ) -> Reference {
        Reference {
            act: act.map(str::to_string),
            article,
            paragraph,
            point,
            subpoint,
        }
    }

    #[test]
    fn test_single_reference_spans_whole_expression() {
        let mut collector = ReferenceCollector::new();
        collector.add(ReferredKind::Article, RefPart::single("8"), Span::new(0, 4));
        collector.add(
            ReferredKind::Paragraph,
            RefPart::single("5"),
            Span::new(5, 13),
        );
        let refs = collector.into_references(0, 13);
        assert_eq!(
            refs,
            vec![InTextReference {
                start: 0,
                end: 13,
                reference: reference(
                    None,
                    Some(RefPart::single("8")),
                    Some(RefPart::single("5")),
                    None,
                    None
                ),
            }]
        );
    }

    #[test]
    fn test_adjacent_identifiers_merge_into_range() {
        let mut collector = ReferenceCollector::new();
        collector.add(ReferredKind::Article, RefPart::single("1"), Span::new(0, 5));
        collector.add(ReferredKind::Article, RefPart::single("2"), Span::new(6, 11));
        let refs = collector.into_references(0, 11);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].reference.article, Some(RefPart::range("1", "2")));
        assert_eq!((refs[0].start, refs[0].end), (0, 11));
    }

    #[test]
    fn test_non_adjacent_identifiers_stay_separate() {
        let mut collector = ReferenceCollector::new();
        collector.add(ReferredKind::Article, RefPart::single("1"), Span::new(0, 5));
        collector.add(ReferredKind::Article, RefPart::single("3"), Span::new(6, 11));
        let refs = collector.into_references(0, 11);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].reference.article, Some(RefPart::single("1")));
        assert_eq!((refs[0].start, refs[0].end), (0, 5));
        assert_eq!(refs[1].reference.article, Some(RefPart::single("3")));
        assert_eq!((refs[1].start, refs[1].end), (6, 11));
    }

    #[test]
    fn test_ranges_are_never_chained() {
        let mut collector = ReferenceCollector::new();
        collector.add(
            ReferredKind::NumericPoint,
            RefPart::range("19", "20"),
            Span::new(0, 9),
        );
        collector.add(
            ReferredKind::NumericPoint,
            RefPart::single("21"),
            Span::new(10, 19),
        );
        let refs = collector.into_references(0, 19);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].reference.point, Some(RefPart::range("19", "20")));
        assert_eq!(refs[1].reference.point, Some(RefPart::single("21")));
    }

    #[test]
    fn test_mixed_point_kinds_do_not_merge() {
        // "1. pont" followed by alphabetic "b) pont": same level, different
        // numbering scheme, so no adjacency is possible.
        let mut collector = ReferenceCollector::new();
        collector.add(
            ReferredKind::NumericPoint,
            RefPart::single("1"),
            Span::new(0, 7),
        );
        collector.add(
            ReferredKind::AlphabeticPoint,
            RefPart::single("b"),
            Span::new(8, 15),
        );
        let refs = collector.into_references(0, 15);
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn test_fragments_sorted_before_merging() {
        // Discovered out of textual order; sorting restores adjacency.
        let mut collector = ReferenceCollector::new();
        collector.add(ReferredKind::Article, RefPart::single("2"), Span::new(6, 11));
        collector.add(ReferredKind::Article, RefPart::single("1"), Span::new(0, 5));
        let refs = collector.into_references(0, 11);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].reference.article, Some(RefPart::range("1", "2")));
    }

    #[test]
    fn test_multi_level_emission_carries_last_item() {
        // "1. § (1) és (3) bekezdése": paragraph (1) is emitted on its own,
        // paragraph (3) closes the final reference; both carry article 1.
        let mut collector = ReferenceCollector::new();
        collector.set_act("2020. évi I. törvény");
        collector.add(ReferredKind::Article, RefPart::single("1"), Span::new(0, 4));
        collector.add(
            ReferredKind::Paragraph,
            RefPart::single("1"),
            Span::new(5, 8),
        );
        collector.add(
            ReferredKind::Paragraph,
            RefPart::single("3"),
            Span::new(12, 26),
        );
        let refs = collector.into_references(0, 26);
        assert_eq!(
            refs,
            vec![
                InTextReference {
                    start: 0,
                    end: 8,
                    reference: reference(
                        Some("2020. évi I. törvény"),
                        Some(RefPart::single("1")),
                        Some(RefPart::single("1")),
                        None,
                        None
                    ),
                },
                InTextReference {
                    start: 12,
                    end: 26,
                    reference: reference(
                        Some("2020. évi I. törvény"),
                        Some(RefPart::single("1")),
                        Some(RefPart::single("3")),
                        None,
                        None
                    ),
                },
            ]
        );
    }

    #[test]
    fn test_act_only_collector() {
        let mut collector = ReferenceCollector::new();
        collector.set_act("2012. évi CXVI. törvény");
        let refs = collector.into_references(3, 25);
        assert_eq!(
            refs,
            vec![InTextReference {
                start: 3,
                end: 25,
                reference: reference(Some("2012. évi CXVI. törvény"), None, None, None, None),
            }]
        );
    }
}
