use serde::Serialize;

/// Namespace-stripped XML element.
///
/// Element and attribute names are local names (`prod:keha` becomes `keha`);
/// `text` holds the trimmed, unescaped character data directly inside the
/// element, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// First direct child called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Every direct child called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Follow a path of child names, taking the first match at every step.
    /// An empty path returns `self`.
    pub fn find(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter()
            .try_fold(self, |element, name| element.child(name))
    }

    pub fn find_text(&self, path: &[&str]) -> Option<&str> {
        self.find(path).and_then(XmlElement::text)
    }

    /// Hash-like view of the element for parsers that prefer JSON.
    ///
    /// Leaves become strings (or `null` when empty), repeated child names
    /// become arrays, attributes are keyed as `@name` and mixed text as
    /// `#text`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{Map, Value};

        if self.children.is_empty() && self.attributes.is_empty() {
            return match &self.text {
                Some(text) => Value::String(text.clone()),
                None => Value::Null,
            };
        }

        let mut object = Map::new();
        for (name, value) in &self.attributes {
            object.insert(format!("@{name}"), Value::String(value.clone()));
        }
        if let Some(text) = &self.text {
            object.insert("#text".to_owned(), Value::String(text.clone()));
        }
        for child in &self.children {
            let value = child.to_json();
            match object.get_mut(&child.name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    object.insert(child.name.clone(), value);
                }
            }
        }
        Value::Object(object)
    }
}

/// Successful, undecoded result of one operation call.
///
/// `body` is the operation response element (e.g. `lihtandmed_v2Response`);
/// business fields are reached through [`RawResponse::find`]. Which path
/// holds what is up to the response parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub operation: String,
    pub http_status: u16,
    pub body: XmlElement,
    pub raw: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.http_status)
    }

    pub fn find(&self, path: &[&str]) -> Option<&XmlElement> {
        self.body.find(path)
    }

    pub fn find_text(&self, path: &[&str]) -> Option<&str> {
        self.body.find_text(path)
    }
}
