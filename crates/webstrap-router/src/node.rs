//! Segment tree used by the router.

use crate::methods::MethodRouter;
use crate::vars::{decode_segment, PathVars};

/// Kind of a template segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Literal text, matched exactly.
    Literal(String),
    /// `{name}`: captures one segment.
    Var(String),
    /// `*name`: captures the remainder of the path.
    CatchAll(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if let Some(name) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Self::Var(name.to_string())
        } else if let Some(name) = raw.strip_prefix('*') {
            Self::CatchAll(name.to_string())
        } else {
            Self::Literal(raw.to_string())
        }
    }
}

/// Splits a template into segments; empty segments are dropped so
/// `/users/` and `/users` describe the same route.
pub(crate) fn parse_template(path: &str) -> Vec<Segment> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(Segment::parse)
        .collect()
}

/// Methods registered for one template, with the template's variable
/// names in capture order.
#[derive(Debug, Clone)]
struct Leaf<T> {
    names: Vec<String>,
    methods: MethodRouter<T>,
}

impl<T> Leaf<T> {
    fn merge_into(slot: &mut Option<Self>, names: Vec<String>, methods: MethodRouter<T>) {
        match slot {
            // Same shape registered again: the first template's names stay.
            Some(existing) => existing.methods.merge(methods),
            None => *slot = Some(Self { names, methods }),
        }
    }

    fn bind(&self, values: Vec<String>) -> PathVars {
        self.names.iter().cloned().zip(values).collect()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    leaf: Option<Leaf<T>>,
    /// Sorted by literal for binary search.
    literals: Vec<(String, Node<T>)>,
    var: Option<Box<Node<T>>>,
    catch_all: Option<Leaf<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            leaf: None,
            literals: Vec::new(),
            var: None,
            catch_all: None,
        }
    }
}

impl<T> Node<T> {
    pub(crate) fn insert(&mut self, segments: &[Segment], methods: MethodRouter<T>) {
        let names = segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Var(name) | Segment::CatchAll(name) => Some(name.clone()),
                Segment::Literal(_) => None,
            })
            .collect();
        self.insert_at(segments, names, methods);
    }

    fn insert_at(&mut self, segments: &[Segment], names: Vec<String>, methods: MethodRouter<T>) {
        let Some((first, rest)) = segments.split_first() else {
            Leaf::merge_into(&mut self.leaf, names, methods);
            return;
        };

        match first {
            Segment::Literal(text) => {
                let idx = match self
                    .literals
                    .binary_search_by(|(lit, _)| lit.as_str().cmp(text))
                {
                    Ok(idx) => idx,
                    Err(idx) => {
                        self.literals.insert(idx, (text.clone(), Node::default()));
                        idx
                    }
                };
                self.literals[idx].1.insert_at(rest, names, methods);
            }
            Segment::Var(_) => {
                self.var
                    .get_or_insert_with(Box::default)
                    .insert_at(rest, names, methods);
            }
            Segment::CatchAll(name) => {
                assert!(
                    rest.is_empty(),
                    "catch-all segment `*{name}` must be the last segment"
                );
                Leaf::merge_into(&mut self.catch_all, names, methods);
            }
        }
    }

    /// Resolves `segments`, naming the captures after the matched template.
    pub(crate) fn find(&self, segments: &[&str]) -> Option<(&MethodRouter<T>, PathVars)> {
        let mut values = Vec::new();
        let leaf = self.find_leaf(segments, &mut values)?;
        Some((&leaf.methods, leaf.bind(values)))
    }

    /// Walks the tree collecting captured values. On failure the values
    /// added by this call are rolled back.
    fn find_leaf<'a>(&'a self, segments: &[&str], values: &mut Vec<String>) -> Option<&'a Leaf<T>> {
        let Some((first, rest)) = segments.split_first() else {
            return self.leaf.as_ref();
        };

        if let Ok(idx) = self
            .literals
            .binary_search_by(|(lit, _)| lit.as_str().cmp(first))
        {
            if let Some(found) = self.literals[idx].1.find_leaf(rest, values) {
                return Some(found);
            }
        }

        if let Some(child) = &self.var {
            let mark = values.len();
            values.push(decode_segment(first));
            if let Some(found) = child.find_leaf(rest, values) {
                return Some(found);
            }
            values.truncate(mark);
        }

        if let Some(leaf) = &self.catch_all {
            values.push(decode_segment(&segments.join("/")));
            return Some(leaf);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(root: &'a Node<&'static str>, path: &str) -> Option<(&'a MethodRouter<&'static str>, PathVars)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        root.find(&segments)
    }

    #[test]
    fn test_parse_template() {
        assert_eq!(
            parse_template("/users/{id}/files/*rest"),
            vec![
                Segment::Literal("users".into()),
                Segment::Var("id".into()),
                Segment::Literal("files".into()),
                Segment::CatchAll("rest".into()),
            ]
        );
        assert_eq!(parse_template("//users//"), vec![Segment::Literal("users".into())]);
        assert!(parse_template("/").is_empty());
    }

    #[test]
    fn test_backtracks_var_bindings() {
        let mut root = Node::default();
        root.insert(&parse_template("/a/{x}/b"), MethodRouter::new().get("via-var"));
        root.insert(&parse_template("/a/*rest"), MethodRouter::new().get("via-rest"));

        let (methods, vars) = lookup(&root, "/a/1/c").unwrap();
        assert_eq!(methods.target(&http::Method::GET), Some(&"via-rest"));
        assert_eq!(vars.get("x"), None);
        assert_eq!(vars.get("rest"), Some("1/c"));
    }

    #[test]
    fn test_shared_var_position_keeps_each_templates_names() {
        let mut root = Node::default();
        root.insert(&parse_template("/users/{id}"), MethodRouter::new().get("by-id"));
        root.insert(&parse_template("/users/{name}/posts"), MethodRouter::new().get("posts"));
        root.insert(&parse_template("/users/{user}/files/*path"), MethodRouter::new().get("files"));

        let (methods, vars) = lookup(&root, "/users/bob/posts").unwrap();
        assert_eq!(methods.target(&http::Method::GET), Some(&"posts"));
        assert_eq!(vars.get("name"), Some("bob"));
        assert_eq!(vars.get("id"), None);

        let (_, vars) = lookup(&root, "/users/42").unwrap();
        assert_eq!(vars.get("id"), Some("42"));
        assert_eq!(vars.get("name"), None);

        let (_, vars) = lookup(&root, "/users/ann/files/a/b.txt").unwrap();
        assert_eq!(vars.get("user"), Some("ann"));
        assert_eq!(vars.get("path"), Some("a/b.txt"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_root_route() {
        let mut root = Node::default();
        root.insert(&parse_template("/"), MethodRouter::new().get("index"));
        assert!(lookup(&root, "/").is_some());
        assert!(lookup(&root, "").is_some());
    }

    #[test]
    #[should_panic(expected = "must be the last segment")]
    fn test_catch_all_must_be_last() {
        let mut root: Node<&str> = Node::default();
        root.insert(&parse_template("/files/*rest/more"), MethodRouter::new().get("x"));
    }
}
