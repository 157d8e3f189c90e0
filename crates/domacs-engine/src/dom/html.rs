//! Minimal HTML fragment reader and writer for [`Dom`].
//!
//! Handles elements, void elements, text with entity references and
//! comments. Attributes are accepted and dropped: the engine only cares about
//! element names and text.

use thiserror::Error;

use super::{Dom, NodeId};
use crate::tree::{DocumentTree, EditableTree};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("unexpected closing tag </{name}> at byte {at}")]
    UnexpectedClose { name: String, at: usize },

    #[error("<{name}> is never closed")]
    Unclosed { name: String },

    #[error("malformed tag at byte {at}")]
    MalformedTag { at: usize },
}

pub(super) fn parse_into(dom: &mut Dom, root: NodeId, markup: &str) -> Result<(), DomError> {
    let mut open = vec![root];
    let mut at = 0;

    while at < markup.len() {
        let rest = &markup[at..];

        if let Some(comment) = rest.strip_prefix("<!--") {
            let end = comment.find("-->").ok_or(DomError::MalformedTag { at })?;
            at += "<!--".len() + end + "-->".len();
            continue;
        }

        if rest.starts_with('<') {
            let close = rest.find('>').ok_or(DomError::MalformedTag { at })?;
            let tag = &rest[1..close];
            let parent = *open.last().unwrap_or(&root);

            if let Some(name) = tag.strip_prefix('/') {
                let name = name.trim().to_ascii_lowercase();
                if open.len() == 1 || dom.name(parent) != Some(name.as_str()) {
                    return Err(DomError::UnexpectedClose { name, at });
                }
                open.pop();
            } else if !tag.starts_with('!') {
                let self_closing = tag.ends_with('/');
                let name: String = tag
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
                    .collect();
                if name.is_empty() {
                    return Err(DomError::MalformedTag { at });
                }
                let element = dom.create_element(&name);
                dom.append_child(parent, element);
                let name = name.to_ascii_lowercase();
                if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
                    open.push(element);
                }
            }
            at += close + 1;
            continue;
        }

        let end = rest.find('<').unwrap_or(rest.len());
        let decoded = html_escape::decode_html_entities(&rest[..end]);
        let parent = *open.last().unwrap_or(&root);
        let text = dom.create_text(&decoded);
        dom.append_child(parent, text);
        at += end;
    }

    match open.len() {
        1 => Ok(()),
        _ => {
            let innermost = open[open.len() - 1];
            Err(DomError::Unclosed {
                name: dom.name(innermost).unwrap_or_default().to_string(),
            })
        }
    }
}

pub(super) fn write_node(dom: &Dom, node: NodeId, out: &mut String) {
    if let Some(text) = dom.text(node) {
        out.push_str(&html_escape::encode_text(text));
        return;
    }
    let name = dom.name(node).unwrap_or_default();
    out.push('<');
    out.push_str(name);
    out.push('>');
    if VOID_ELEMENTS.contains(&name) {
        return;
    }
    for child in dom.children(node) {
        write_node(dom, child, out);
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain text")]
    #[case("<p>Hello <b>world</b></p>")]
    #[case("<div>one<br>two</div><p></p>")]
    #[case("a &lt; b &amp;&amp; c &gt; d")]
    fn serialisation_reproduces_canonical_markup(#[case] markup: &str) {
        let dom = Dom::parse_html(markup).unwrap();
        assert_eq!(dom.inner_html(dom.root()), markup);
    }

    #[test]
    fn entities_are_decoded_into_text() {
        let dom = Dom::parse_html("x&nbsp;&amp;y").unwrap();
        let leaf = dom.first_child(dom.root()).unwrap();
        assert_eq!(dom.text(leaf), Some("x\u{a0}&y"));
    }

    #[test]
    fn attributes_comments_and_case_are_normalised() {
        let dom = Dom::parse_html(r#"<P class="x">a<!-- note --><BR/>b</P>"#).unwrap();
        assert_eq!(dom.inner_html(dom.root()), "<p>a<br>b</p>");
    }

    #[test]
    fn adjacent_text_becomes_one_leaf() {
        let dom = Dom::parse_html("<p>a &amp; b</p>").unwrap();
        let p = dom.first_child(dom.root()).unwrap();
        assert_eq!(dom.children(p).count(), 1);
    }

    #[rstest]
    #[case("<p>open", DomError::Unclosed { name: "p".into() })]
    #[case("</p>", DomError::UnexpectedClose { name: "p".into(), at: 0 })]
    #[case("<p>x</b></p>", DomError::UnexpectedClose { name: "b".into(), at: 4 })]
    #[case("<p", DomError::MalformedTag { at: 0 })]
    #[case("a<>b", DomError::MalformedTag { at: 1 })]
    fn malformed_markup_is_rejected(#[case] markup: &str, #[case] expected: DomError) {
        assert_eq!(Dom::parse_html(markup).unwrap_err(), expected);
    }
}
