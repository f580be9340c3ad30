//! Semantic resolution of an act's citations.
//!
//! The walker visits every literal-text leaf of the document tree in
//! document order, carrying the text of ancestor intros and wrap-ups as
//! prefix/postfix context: points and subpoints are sentence fragments
//! that only parse correctly with the surrounding sentence attached. Each
//! leaf's combined text goes through the external grammar once; the
//! resulting fragments are converted to references, abbreviations are
//! registered and resolved left to right, and every reference span is
//! clipped back to the leaf's own text. The act is rebuilt with the
//! results attached; the input tree is never mutated, so resolution is a
//! pure function of the tree and running it again yields the same output.

use torvenytar_structure::{
    Act, ActIdAbbreviation, AlphabeticPoint, AlphabeticPointChildren, ElementBody,
    InTextReference, NumericPoint, NumericPointChildren, OutgoingReference, Paragraph,
    ParagraphChildren, RefPart, Reference,
};

use crate::collector::ReferenceCollector;
use crate::config::{is_act_identifier, MAX_ANALYZED_TEXT_LEN, REFERENCE_SIGNAL_SUBSTRINGS};
use crate::grammar::{GrammarParser, ParseTree, ReferenceNode};

/// Resolution results accumulated over one act, in document order.
#[derive(Debug, Default)]
struct ResolutionState {
    abbreviations: Vec<ActIdAbbreviation>,
    outgoing_references: Vec<OutgoingReference>,
}

/// Resolve abbreviations and outgoing references of an act.
///
/// Returns a new act with `abbreviations` and `outgoing_references`
/// populated; the input is left untouched.
#[must_use]
pub fn resolve_semantics(act: &Act, grammar: &dyn GrammarParser) -> Act {
    let mut state = ResolutionState::default();
    for article in act.articles() {
        let article_reference = article.relative_reference();
        for paragraph in article.paragraphs() {
            walk_paragraph(paragraph, &article_reference, "", "", grammar, &mut state);
        }
    }
    Act {
        abbreviations: Some(state.abbreviations),
        outgoing_references: Some(state.outgoing_references),
        ..act.clone()
    }
}

fn walk_paragraph(
    paragraph: &Paragraph,
    parent: &Reference,
    prefix: &str,
    postfix: &str,
    grammar: &dyn GrammarParser,
    state: &mut ResolutionState,
) {
    let element_reference = paragraph.relative_reference().relative_to(parent);
    match &paragraph.body {
        ElementBody::Text(text) => {
            analyze_leaf(text, prefix, postfix, &element_reference, grammar, state);
        }
        ElementBody::Children {
            intro,
            children,
            wrap_up,
        } => {
            // The intro is analyzed on its own first: the same text is
            // parsed again as the children's context, but references found
            // there are attributed to this element, not to the children.
            if let Some(intro) = intro {
                analyze_leaf(intro, prefix, "", &element_reference, grammar, state);
            }
            let child_prefix = match intro {
                Some(intro) => format!("{prefix}{intro} "),
                None => prefix.to_string(),
            };
            let child_postfix = match wrap_up {
                Some(wrap_up) => format!(" {wrap_up}{postfix}"),
                None => postfix.to_string(),
            };
            match children {
                ParagraphChildren::AlphabeticPoints(points) => {
                    for point in points {
                        walk_alphabetic_point(
                            point,
                            &element_reference,
                            &child_prefix,
                            &child_postfix,
                            grammar,
                            state,
                        );
                    }
                }
                ParagraphChildren::NumericPoints(points) => {
                    for point in points {
                        walk_numeric_point(
                            point,
                            &element_reference,
                            &child_prefix,
                            &child_postfix,
                            grammar,
                            state,
                        );
                    }
                }
                // Quoted blocks are verbatim foreign text; amendment
                // bodies belong to the amended act, not this one.
                ParagraphChildren::QuotedBlocks(_) | ParagraphChildren::BlockAmendment(_) => {}
            }
        }
    }
}

fn walk_alphabetic_point(
    point: &AlphabeticPoint,
    parent: &Reference,
    prefix: &str,
    postfix: &str,
    grammar: &dyn GrammarParser,
    state: &mut ResolutionState,
) {
    let element_reference = point.relative_reference().relative_to(parent);
    match &point.body {
        ElementBody::Text(text) => {
            analyze_leaf(text, prefix, postfix, &element_reference, grammar, state);
        }
        ElementBody::Children {
            intro,
            children,
            wrap_up,
        } => {
            if let Some(intro) = intro {
                analyze_leaf(intro, prefix, "", &element_reference, grammar, state);
            }
            let child_prefix = match intro {
                Some(intro) => format!("{prefix}{intro} "),
                None => prefix.to_string(),
            };
            let child_postfix = match wrap_up {
                Some(wrap_up) => format!(" {wrap_up}{postfix}"),
                None => postfix.to_string(),
            };
            match children {
                AlphabeticPointChildren::AlphabeticSubpoints(subpoints) => {
                    for subpoint in subpoints {
                        let reference =
                            subpoint.relative_reference().relative_to(&element_reference);
                        analyze_leaf(
                            &subpoint.text,
                            &child_prefix,
                            &child_postfix,
                            &reference,
                            grammar,
                            state,
                        );
                    }
                }
                AlphabeticPointChildren::NumericSubpoints(subpoints) => {
                    for subpoint in subpoints {
                        let reference =
                            subpoint.relative_reference().relative_to(&element_reference);
                        analyze_leaf(
                            &subpoint.text,
                            &child_prefix,
                            &child_postfix,
                            &reference,
                            grammar,
                            state,
                        );
                    }
                }
            }
        }
    }
}

fn walk_numeric_point(
    point: &NumericPoint,
    parent: &Reference,
    prefix: &str,
    postfix: &str,
    grammar: &dyn GrammarParser,
    state: &mut ResolutionState,
) {
    let element_reference = point.relative_reference().relative_to(parent);
    match &point.body {
        ElementBody::Text(text) => {
            analyze_leaf(text, prefix, postfix, &element_reference, grammar, state);
        }
        ElementBody::Children {
            intro,
            children,
            wrap_up,
        } => {
            if let Some(intro) = intro {
                analyze_leaf(intro, prefix, "", &element_reference, grammar, state);
            }
            let child_prefix = match intro {
                Some(intro) => format!("{prefix}{intro} "),
                None => prefix.to_string(),
            };
            let child_postfix = match wrap_up {
                Some(wrap_up) => format!(" {wrap_up}{postfix}"),
                None => postfix.to_string(),
            };
            let NumericPointChildren::AlphabeticSubpoints(subpoints) = children;
            for subpoint in subpoints {
                let reference = subpoint.relative_reference().relative_to(&element_reference);
                analyze_leaf(
                    &subpoint.text,
                    &child_prefix,
                    &child_postfix,
                    &reference,
                    grammar,
                    state,
                );
            }
        }
    }
}

fn analyze_leaf(
    middle: &str,
    prefix: &str,
    postfix: &str,
    element_reference: &Reference,
    grammar: &dyn GrammarParser,
    state: &mut ResolutionState,
) {
    let text = format!("{prefix}{middle}{postfix}");
    if text.chars().count() > MAX_ANALYZED_TEXT_LEN {
        return;
    }
    if !REFERENCE_SIGNAL_SUBSTRINGS
        .iter()
        .any(|signal| text.contains(signal))
    {
        return;
    }

    let tree = match grammar.parse(&text) {
        Ok(tree) => tree,
        Err(err) => {
            tracing::debug!(error = %err, "grammar analysis failed, no structured data for leaf");
            return;
        }
    };

    for act_reference in tree.act_references() {
        if let (Some(alias), Some(act)) = (&act_reference.from_now_on, act_reference.act_string())
        {
            state.abbreviations.push(ActIdAbbreviation {
                abbreviation: alias.clone(),
                act,
            });
        }
    }

    let prefix_len = prefix.chars().count();
    let text_len = text.chars().count() - postfix.chars().count();

    let mut converted: Vec<OutgoingReference> = Vec::new();
    for in_text in collect_in_text_references(&tree) {
        // The end position decides ownership, so that references starting
        // in inherited context but ending in this leaf's own text are
        // still attributed here.
        if in_text.end <= prefix_len || in_text.end > text_len {
            continue;
        }
        let Some(target) = resolve_act_alias(in_text.reference, &state.abbreviations) else {
            continue;
        };
        converted.push(OutgoingReference {
            source: element_reference.clone(),
            start: in_text.start.saturating_sub(prefix_len),
            end: in_text.end - prefix_len,
            target,
        });
    }
    converted.sort();
    state.outgoing_references.extend(converted);
}

/// Replace an abbreviated act with its registered identifier.
///
/// Relative references and references with a full act identifier pass
/// through; a reference using an abbreviation that was never registered is
/// dropped, since documents are allowed to cite undefined abbreviations.
fn resolve_act_alias(
    reference: Reference,
    abbreviations: &[ActIdAbbreviation],
) -> Option<Reference> {
    let Some(act) = reference.act.clone() else {
        return Some(reference);
    };
    if is_act_identifier(&act) {
        return Some(reference);
    }
    match abbreviations.iter().rev().find(|a| a.abbreviation == act) {
        Some(known) => Some(Reference {
            act: Some(known.act.clone()),
            ..reference
        }),
        None => {
            tracing::debug!(abbreviation = %act, "dropping reference with unregistered abbreviation");
            None
        }
    }
}

/// All in-text references of a parse tree: act mentions, compound
/// references with their inherited act, and leftover bare references.
pub(crate) fn collect_in_text_references(tree: &ParseTree) -> Vec<InTextReference> {
    let mut result: Vec<InTextReference> = Vec::new();

    for act_reference in tree.act_references() {
        if let (Some(act), Some(span)) = (act_reference.act_string(), act_reference.span()) {
            result.push(InTextReference {
                start: span.start,
                end: span.end,
                reference: Reference {
                    act: Some(act),
                    ..Reference::default()
                },
            });
        }
    }

    match tree {
        ParseTree::Sentence(sentence) => {
            for compound in &sentence.compound_references {
                let act = compound
                    .act_reference
                    .as_ref()
                    .and_then(|a| a.act_string());
                for node in &compound.references {
                    result.extend(convert_reference_node(act.clone(), node));
                }
            }
            for node in &sentence.standalone_references {
                result.extend(convert_reference_node(None, node));
            }
        }
        ParseTree::BlockAmendment(amendment) => {
            let act = amendment.act_reference.act_string();
            for node in [&amendment.amended_reference, &amendment.inserted_reference]
                .into_iter()
                .flatten()
            {
                result.extend(convert_reference_node(act.clone(), node));
            }
        }
    }
    result
}

/// Convert one grammar reference node through the merge algorithm.
pub(crate) fn convert_reference_node(
    act: Option<String>,
    node: &ReferenceNode,
) -> Vec<InTextReference> {
    let mut collector = ReferenceCollector::new();
    if let Some(act) = act {
        collector.set_act(act);
    }
    for part in &node.parts {
        for single in &part.singles {
            collector.add(part.kind, RefPart::single(&single.id), single.span);
        }
        for range in &part.ranges {
            collector.add(
                part.kind,
                RefPart::range(&range.start_id, &range.end_id),
                range.span,
            );
        }
    }
    collector.into_references(node.span.start, node.span.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    use torvenytar_structure::{ActChild, Article, ReferredKind};

    use crate::grammar::{
        ActIdNode, ActReferenceNode, AbbreviationNode, CompoundReferenceNode, GrammarError,
        IdNode, ReferencePartNode, SentenceNode, Span,
    };

    struct StubGrammar {
        responses: HashMap<String, ParseTree>,
    }

    impl StubGrammar {
        fn new(responses: impl IntoIterator<Item = (String, ParseTree)>) -> Self {
            Self {
                responses: responses.into_iter().collect(),
            }
        }
    }

    impl GrammarParser for StubGrammar {
        fn parse(&self, text: &str) -> Result<ParseTree, GrammarError> {
            self.responses
                .get(text)
                .cloned()
                .ok_or_else(|| GrammarError(format!("no parse for '{text}'")))
        }
    }

    fn span_of(haystack: &str, needle: &str) -> Span {
        let byte_start = haystack.find(needle).expect("needle present");
        let start = haystack[..byte_start].chars().count();
        Span::new(start, start + needle.chars().count())
    }

    fn text_paragraph(identifier: Option<&str>, text: &str) -> Paragraph {
        Paragraph {
            identifier: identifier.map(str::to_string),
            body: ElementBody::Text(text.to_string()),
        }
    }

    fn act_of_articles(articles: Vec<Article>) -> Act {
        Act {
            identifier: "2345. évi I. törvény".to_string(),
            subject: "A tesztelésről".to_string(),
            preamble: String::new(),
            children: articles.into_iter().map(ActChild::Article).collect(),
            abbreviations: None,
            outgoing_references: None,
        }
    }

    fn article_reference(id: &str) -> Reference {
        Reference {
            article: Some(RefPart::single(id)),
            ..Reference::default()
        }
    }

    fn single_part(kind: ReferredKind, text: &str, id: &str, full: &str) -> ReferencePartNode {
        ReferencePartNode {
            kind,
            singles: vec![IdNode {
                id: id.to_string(),
                span: span_of(full, text),
            }],
            ranges: Vec::new(),
        }
    }

    #[test]
    fn test_abbreviation_registration_and_resolution() {
        let text_1 = "A tesztelésről szóló 2012. évi I. törvény (a továbbiakban: Kódex) fontos.";
        let text_2 = "A Kódex 5. §-a szerint kell eljárni.";

        let tree_1 = ParseTree::Sentence(SentenceNode {
            compound_references: Vec::new(),
            standalone_act_references: vec![ActReferenceNode {
                act_id: Some(ActIdNode {
                    year: 2012,
                    number: "I".to_string(),
                    span: span_of(text_1, "2012. évi I. törvény"),
                }),
                abbreviation: None,
                from_now_on: Some("Kódex".to_string()),
            }],
            standalone_references: Vec::new(),
        });
        let tree_2 = ParseTree::Sentence(SentenceNode {
            compound_references: vec![CompoundReferenceNode {
                act_reference: Some(ActReferenceNode {
                    act_id: None,
                    abbreviation: Some(AbbreviationNode {
                        text: "Kódex".to_string(),
                        span: span_of(text_2, "Kódex"),
                    }),
                    from_now_on: None,
                }),
                references: vec![ReferenceNode {
                    parts: vec![single_part(ReferredKind::Article, "5. §-a", "5", text_2)],
                    span: span_of(text_2, "5. §-a"),
                }],
            }],
            standalone_act_references: Vec::new(),
            standalone_references: Vec::new(),
        });

        let grammar = StubGrammar::new([
            (text_1.to_string(), tree_1),
            (text_2.to_string(), tree_2),
        ]);
        let act = act_of_articles(vec![
            Article::new("1", None, vec![text_paragraph(None, text_1)]).unwrap(),
            Article::new("2", None, vec![text_paragraph(None, text_2)]).unwrap(),
        ]);

        let resolved = resolve_semantics(&act, &grammar);

        assert_eq!(
            resolved.abbreviations,
            Some(vec![ActIdAbbreviation {
                abbreviation: "Kódex".to_string(),
                act: "2012. évi I. törvény".to_string(),
            }])
        );

        let targets: Vec<(Reference, Reference)> = resolved
            .outgoing_references
            .unwrap()
            .into_iter()
            .map(|r| (r.source, r.target))
            .collect();
        let full_act = |article: Option<&str>| Reference {
            act: Some("2012. évi I. törvény".to_string()),
            article: article.map(RefPart::single),
            ..Reference::default()
        };
        assert_eq!(
            targets,
            vec![
                (article_reference("1"), full_act(None)),
                (article_reference("2"), full_act(None)),
                (article_reference("2"), full_act(Some("5"))),
            ]
        );
    }

    #[test]
    fn test_unregistered_abbreviation_is_dropped() {
        let text = "A Katv. 2. §-a szerint.";
        let tree = ParseTree::Sentence(SentenceNode {
            compound_references: vec![CompoundReferenceNode {
                act_reference: Some(ActReferenceNode {
                    act_id: None,
                    abbreviation: Some(AbbreviationNode {
                        text: "Katv.".to_string(),
                        span: span_of(text, "Katv."),
                    }),
                    from_now_on: None,
                }),
                references: vec![ReferenceNode {
                    parts: vec![single_part(ReferredKind::Article, "2. §-a", "2", text)],
                    span: span_of(text, "2. §-a"),
                }],
            }],
            standalone_act_references: Vec::new(),
            standalone_references: Vec::new(),
        });
        let grammar = StubGrammar::new([(text.to_string(), tree)]);
        let act = act_of_articles(vec![
            Article::new("1", None, vec![text_paragraph(None, text)]).unwrap()
        ]);

        let resolved = resolve_semantics(&act, &grammar);
        assert_eq!(resolved.outgoing_references, Some(Vec::new()));
    }

    #[test]
    fn test_context_references_not_reattributed_to_children() {
        let intro = "A 2. § szerint:";
        let point_a_text = "első pont";
        let point_b_text = "második pont";
        let combined_a = format!("{intro} {point_a_text}");
        let combined_b = format!("{intro} {point_b_text}");

        let intro_tree = ParseTree::Sentence(SentenceNode {
            compound_references: Vec::new(),
            standalone_act_references: Vec::new(),
            standalone_references: vec![ReferenceNode {
                parts: vec![single_part(ReferredKind::Article, "2. §", "2", intro)],
                span: span_of(intro, "2. §"),
            }],
        });
        // The children see the same sentence; the reference still lies
        // wholly inside the inherited prefix.
        let child_tree = |full: &str| {
            ParseTree::Sentence(SentenceNode {
                compound_references: Vec::new(),
                standalone_act_references: Vec::new(),
                standalone_references: vec![ReferenceNode {
                    parts: vec![single_part(ReferredKind::Article, "2. §", "2", full)],
                    span: span_of(full, "2. §"),
                }],
            })
        };

        let grammar = StubGrammar::new([
            (intro.to_string(), intro_tree),
            (combined_a.clone(), child_tree(&combined_a)),
            (combined_b.clone(), child_tree(&combined_b)),
        ]);

        let paragraph = Paragraph {
            identifier: None,
            body: ElementBody::Children {
                intro: Some(intro.to_string()),
                children: ParagraphChildren::AlphabeticPoints(vec![
                    AlphabeticPoint {
                        identifier: "a".to_string(),
                        body: ElementBody::Text(point_a_text.to_string()),
                    },
                    AlphabeticPoint {
                        identifier: "b".to_string(),
                        body: ElementBody::Text(point_b_text.to_string()),
                    },
                ]),
                wrap_up: None,
            },
        };
        let act = act_of_articles(vec![Article::new("1", None, vec![paragraph]).unwrap()]);

        let resolved = resolve_semantics(&act, &grammar);
        let references = resolved.outgoing_references.unwrap();
        // Only the intro's own analysis contributes; the children drop the
        // prefix-context reference.
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].source, article_reference("1"));
        assert_eq!((references[0].start, references[0].end), (2, 6));
        assert_eq!(
            references[0].target,
            Reference {
                article: Some(RefPart::single("2")),
                ..Reference::default()
            }
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let text = "A 3. § alapján.";
        let tree = ParseTree::Sentence(SentenceNode {
            compound_references: Vec::new(),
            standalone_act_references: Vec::new(),
            standalone_references: vec![ReferenceNode {
                parts: vec![single_part(ReferredKind::Article, "3. §", "3", text)],
                span: span_of(text, "3. §"),
            }],
        });
        let grammar = StubGrammar::new([(text.to_string(), tree)]);
        let act = act_of_articles(vec![
            Article::new("1", None, vec![text_paragraph(None, text)]).unwrap()
        ]);

        let once = resolve_semantics(&act, &grammar);
        let twice = resolve_semantics(&once, &grammar);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_uninteresting_text_skips_grammar() {
        // No parenthesis, no section mark, no statute token: the grammar
        // is never invoked, so the missing stub response is not an issue.
        let act = act_of_articles(vec![Article::new(
            "1",
            None,
            vec![text_paragraph(None, "Teljesen hétköznapi mondat.")],
        )
        .unwrap()]);
        let grammar = StubGrammar::new([]);
        let resolved = resolve_semantics(&act, &grammar);
        assert_eq!(resolved.outgoing_references, Some(Vec::new()));
    }
}
