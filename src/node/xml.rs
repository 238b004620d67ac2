use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use roxmltree::{Document, Node};

use super::{ConfigNode, TreeNode};
use crate::data::Scalar;

impl ConfigNode {
    /// Parses a document of `<map>`, `<list>` and `<value>` elements.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid document XML")?;
        parse_element(document.root_element())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_xml(&xml).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        write_element(&mut out, self, 0);
        out
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_xml())
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

fn parse_element(element: Node<'_, '_>) -> Result<ConfigNode> {
    let mut node = ConfigNode::root();
    match element.tag_name().name() {
        "map" => {
            node.make_map();
            for child in element_children(element) {
                let key = child.attribute("key").ok_or_else(|| {
                    anyhow!("<{}> inside <map> is missing a key", child.tag_name().name())
                })?;
                node.set_child(key, parse_element(child)?);
            }
        }
        "list" => {
            let items = element_children(element)
                .map(parse_element)
                .collect::<Result<Vec<_>>>()?;
            node.set_children_list(items);
        }
        "value" => {
            if let Some(type_name) = element.attribute("type") {
                let text = element.text().unwrap_or_default();
                let scalar = Scalar::parse(type_name, text)
                    .ok_or_else(|| anyhow!("invalid {type_name} value {text:?}"))?;
                node.set_value(scalar);
            }
        }
        other => bail!("unexpected <{other}> element"),
    }
    Ok(node)
}

fn element_children<'a, 'input>(
    element: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    element.children().filter(|child| child.is_element())
}

fn write_element(out: &mut String, node: &ConfigNode, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);

    let key = node
        .key()
        .map(|key| format!(" key=\"{}\"", escape_attribute(key)))
        .unwrap_or_default();

    if let Some(value) = node.value() {
        let text = match value {
            Scalar::String(text) => escape_text(text),
            other => other.to_string(),
        };
        out.push_str(&format!(
            "<value{key} type=\"{}\">{text}</value>\n",
            value.type_name()
        ));
        return;
    }

    let (tag, children) = if node.is_list() {
        ("list", node.children_list())
    } else if node.is_map() {
        ("map", node.children_map().into_iter().map(|(_, child)| child).collect())
    } else {
        out.push_str(&format!("<value{key}/>\n"));
        return;
    };

    if children.is_empty() {
        out.push_str(&format!("<{tag}{key}/>\n"));
        return;
    }
    out.push_str(&format!("<{tag}{key}>\n"));
    for child in children {
        write_element(out, child, depth + 1);
    }
    out.push_str(&format!("{indent}</{tag}>\n"));
}

/// Escapes character data. Carriage returns are written as references so
/// the parser's line-ending normalization leaves them intact.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\r' => escaped.push_str("&#13;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Attribute values also lose literal whitespace to normalization.
fn escape_attribute(text: &str) -> String {
    escape_text(text)
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
    <map>
        <map key="foo">
            <value key="int" type="int">1</value>
            <value key="double" type="double">10.2</value>
            <list key="stringList">
                <value type="string">foo</value>
                <value type="string">bar</value>
            </list>
        </map>
        <value key="flag" type="bool">true</value>
        <value key="nothing"/>
    </map>
    "#;

    #[test]
    fn parse_document_builds_tree() {
        let node = ConfigNode::from_xml(SAMPLE).unwrap();
        assert_eq!(node.key(), None);
        assert_eq!(
            node.get_path(&["foo", "int"]).and_then(TreeNode::value),
            Some(&Scalar::Int(1))
        );
        assert_eq!(
            node.get_path(&["foo", "double"]).and_then(TreeNode::value),
            Some(&Scalar::Double(10.2))
        );
        let list = node.get_path(&["foo", "stringList"]).unwrap();
        assert_eq!(list.children_list().len(), 2);
        assert!(node.child("nothing").unwrap().is_empty());
    }

    #[test]
    fn written_document_parses_back_identically() {
        let mut node = ConfigNode::from_xml(SAMPLE).unwrap();
        node.child_mut("quoted")
            .set_value(Scalar::from("a < b & \"c\""));
        node.child_mut("tiny").set_value(Scalar::Byte(-3));
        node.child_mut("ratio").set_value(Scalar::Float(0.5));
        let reparsed = ConfigNode::from_xml(&node.to_xml()).unwrap();
        assert_eq!(reparsed, node);
    }

    #[test]
    fn line_breaks_and_tabs_survive_rewriting() {
        let mut node = ConfigNode::root();
        node.child_mut("tab\tkey")
            .set_value(Scalar::from("line1\r\nline2\rend"));
        node.child_mut("multi\nline\r\nkey")
            .set_value(Scalar::from("\ttabbed\n"));

        let xml = node.to_xml();
        assert!(xml.contains("key=\"tab&#9;key\""));
        assert!(xml.contains("line1&#13;\nline2&#13;end"));

        let reparsed = ConfigNode::from_xml(&xml).unwrap();
        assert_eq!(reparsed, node);
        assert_eq!(
            reparsed.child("tab\tkey").and_then(TreeNode::value),
            Some(&Scalar::from("line1\r\nline2\rend"))
        );
    }

    #[test]
    fn save_and_load_use_the_filesystem() {
        let node = ConfigNode::from_xml(SAMPLE).unwrap();
        let file = NamedTempFile::new().unwrap();
        node.save(file.path()).unwrap();
        assert_eq!(ConfigNode::load(file.path()).unwrap(), node);
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(ConfigNode::from_xml("<map><value type=\"int\">1</value></map>").is_err());
        assert!(ConfigNode::from_xml("<value type=\"int\">one</value>").is_err());
        assert!(ConfigNode::from_xml("<scene/>").is_err());
        assert!(ConfigNode::from_xml("<map>").is_err());
    }
}
