use crate::classifier::Document;

#[derive(Clone, Debug)]
struct Node {
    parent: Option<usize>,
    background: Option<String>,
}

/// A detached snapshot of a page's element chain and computed backgrounds.
///
/// Used wherever no live DOM exists: the command line tool and tests. The
/// first node pushed is the root element. Elements are addressed by index.
#[derive(Clone, Debug, Default)]
pub struct StaticDocument {
    nodes: Vec<Node>,
    body: Option<usize>,
}

impl StaticDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds `<html>` (transparent) with a `<body>` painting `background`.
    pub fn with_body_background(background: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.push(None, Some("rgba(0, 0, 0, 0)"));
        let body = doc.push(Some(root), Some(background));
        doc.set_body(body);
        doc
    }

    /// Appends an element and returns its index.
    pub fn push(&mut self, parent: Option<usize>, background: Option<&str>) -> usize {
        self.nodes.push(Node {
            parent,
            background: background.map(str::to_string),
        });
        self.nodes.len() - 1
    }

    pub fn set_body(&mut self, element: usize) {
        self.body = Some(element);
    }

    /// Changes the computed background of an existing element, e.g. to
    /// simulate a page switching its own theme at runtime.
    pub fn set_background(&mut self, element: usize, background: Option<&str>) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.background = background.map(str::to_string);
        }
    }

    pub fn body_element(&self) -> Option<usize> {
        self.body
    }
}

impl Document for StaticDocument {
    type Element = usize;

    fn body(&self) -> Option<usize> {
        self.body
    }

    fn document_element(&self) -> Option<usize> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn parent_element(&self, element: &usize) -> Option<usize> {
        self.nodes.get(*element).and_then(|node| node.parent)
    }

    fn background_color(&self, element: &usize) -> Option<String> {
        self.nodes.get(*element).and_then(|node| node.background.clone())
    }
}
