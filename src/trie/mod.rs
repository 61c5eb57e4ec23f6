mod compiler;

pub(crate) use self::compiler::TrieCompiler;

use crate::router::{Route, RouterError};
use crate::rules::{Rule, RuleSpec};
use crate::strmap::StrMap;

use std::fmt::Write as _;
use std::sync::Arc;

use regex::Regex;
use smallvec::SmallVec;

pub(crate) type CaptureBuf<'t, 'r> = SmallVec<[(&'t str, &'r str); 8]>;

/// A named variable plus the rules its captured value must pass.
#[derive(Debug, Clone)]
pub(crate) struct RouteVariable {
    name: Box<str>,
    specs: Vec<RuleSpec>,
    rules: Vec<Arc<dyn Rule>>,
}

impl PartialEq for RouteVariable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.specs == other.specs
    }
}

impl RouteVariable {
    pub(crate) fn new(name: &str, specs: Vec<RuleSpec>, rules: Vec<Arc<dyn Rule>>) -> Self {
        Self {
            name: name.into(),
            specs,
            rules,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Rules run in registration order and stop at the first rejection.
    pub(crate) fn accepts(&self, value: &str) -> bool {
        !value.is_empty() && self.rules.iter().all(|rule| rule.matches(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SegmentPart {
    Literal(Box<str>),
    Variable(RouteVariable),
}

/// Key of a variable trie level: one or more variables, possibly mixed with
/// literal text, such as `:name.:ext`.
#[derive(Debug, Clone)]
pub(crate) struct VariableSegment {
    parts: Vec<SegmentPart>,
    pattern: Option<Regex>,
}

impl PartialEq for VariableSegment {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl VariableSegment {
    pub(crate) fn new(parts: Vec<SegmentPart>) -> Result<Self, RouterError> {
        let mut segment = Self {
            parts,
            pattern: None,
        };
        if let [SegmentPart::Variable(_)] = segment.parts.as_slice() {
            return Ok(segment);
        }

        let mut re = String::from("^");
        for part in &segment.parts {
            match part {
                SegmentPart::Literal(text) => re.push_str(&regex::escape(text)),
                SegmentPart::Variable(_) => re.push_str("(.+?)"),
            }
        }
        re.push('$');

        match Regex::new(&re) {
            Ok(pattern) => segment.pattern = Some(pattern),
            Err(source) => {
                return Err(RouterError::SegmentPattern {
                    pattern: segment.to_string(),
                    source,
                })
            }
        }
        Ok(segment)
    }

    fn variables(&self) -> impl Iterator<Item = &RouteVariable> + '_ {
        self.parts.iter().filter_map(|part| match part {
            SegmentPart::Variable(v) => Some(v),
            SegmentPart::Literal(_) => None,
        })
    }

    /// Pushes one capture per variable. Leaves `captures` untouched on failure.
    pub(crate) fn capture<'t, 'r>(&'t self, segment: &'r str, captures: &mut CaptureBuf<'t, 'r>) -> bool {
        let pattern = match self.pattern {
            None => {
                return match self.parts.first() {
                    Some(SegmentPart::Variable(v)) if v.accepts(segment) => {
                        captures.push((v.name(), segment));
                        true
                    }
                    _ => false,
                };
            }
            Some(ref pattern) => pattern,
        };

        let caps = match pattern.captures(segment) {
            Some(caps) => caps,
            None => return false,
        };
        let mark = captures.len();
        for (i, var) in self.variables().enumerate() {
            let value = caps.get(i + 1).map_or("", |m| m.as_str());
            if !var.accepts(value) {
                captures.truncate(mark);
                return false;
            }
            captures.push((var.name(), value));
        }
        true
    }
}

impl std::fmt::Display for VariableSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for part in &self.parts {
            match part {
                SegmentPart::Literal(text) => f.write_str(text)?,
                SegmentPart::Variable(v) => {
                    f.write_char(':')?;
                    f.write_str(v.name())?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Root,
    Literal,
    Variable(VariableSegment),
}

/// One level of the compiled trie.
///
/// Literal children are keyed by their text in the parent, variable children are kept in
/// registration order. A node carries routes only where a complete template
/// ends; routes bound to a host hang off the node's host trie instead, whose
/// levels are host labels from the rightmost one inwards.
#[derive(Debug)]
pub(crate) struct TrieNode<A> {
    kind: NodeKind,
    literals: StrMap<TrieNode<A>>,
    variables: Vec<TrieNode<A>>,
    routes: Vec<Arc<Route<A>>>,
    host_trie: Option<Box<TrieNode<A>>>,
}

impl<A> TrieNode<A> {
    pub(crate) fn root() -> Self {
        Self::with_kind(NodeKind::Root)
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            literals: StrMap::new(),
            variables: Vec::new(),
            routes: Vec::new(),
            host_trie: None,
        }
    }

    pub(crate) fn literal(&self, segment: &str) -> Option<&TrieNode<A>> {
        self.literals.find(segment)
    }

    pub(crate) fn variables(&self) -> &[TrieNode<A>] {
        &self.variables
    }

    pub(crate) fn routes(&self) -> &[Arc<Route<A>>] {
        &self.routes
    }

    pub(crate) fn host_trie(&self) -> Option<&TrieNode<A>> {
        self.host_trie.as_deref()
    }

    pub(crate) fn variable_segment(&self) -> Option<&VariableSegment> {
        match self.kind {
            NodeKind::Variable(ref segment) => Some(segment),
            _ => None,
        }
    }

    pub(crate) fn literal_child_mut(&mut self, text: &str) -> &mut TrieNode<A> {
        self.literals
            .find_mut_with(text, || TrieNode::with_kind(NodeKind::Literal))
    }

    pub(crate) fn variable_child_mut(&mut self, segment: VariableSegment) -> &mut TrieNode<A> {
        let pos = self
            .variables
            .iter()
            .position(|child| child.variable_segment() == Some(&segment));
        let i = match pos {
            Some(i) => i,
            None => {
                self.variables
                    .push(TrieNode::with_kind(NodeKind::Variable(segment)));
                self.variables.len() - 1
            }
        };
        &mut self.variables[i]
    }

    pub(crate) fn host_trie_mut(&mut self) -> &mut TrieNode<A> {
        self.host_trie.get_or_insert_with(|| Box::new(TrieNode::root()))
    }

    /// Returns false when this exact route is already attached here.
    pub(crate) fn attach(&mut self, route: &Arc<Route<A>>) -> bool {
        if self.routes.iter().any(|r| Arc::ptr_eq(r, route)) {
            return false;
        }
        self.routes.push(Arc::clone(route));
        true
    }

    /// Nodes in this subtree, host tries included.
    pub(crate) fn node_count(&self) -> usize {
        1 + self.literals.values().map(TrieNode::node_count).sum::<usize>()
            + self.variables.iter().map(TrieNode::node_count).sum::<usize>()
            + self.host_trie.as_ref().map_or(0, |h| h.node_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleFactory;

    fn var(name: &str, rule: Option<&str>) -> RouteVariable {
        let factory = RuleFactory::default();
        let specs: Vec<RuleSpec> = rule.map(|r| RuleSpec::new(r, Vec::new())).into_iter().collect();
        let rules = specs
            .iter()
            .map(|s| factory.create_rule(s.name(), s.params()).unwrap())
            .collect();
        RouteVariable::new(name, specs, rules)
    }

    #[test]
    fn mixed_segment_captures_every_variable() {
        let segment = VariableSegment::new(vec![
            SegmentPart::Variable(var("name", None)),
            SegmentPart::Literal(".".into()),
            SegmentPart::Variable(var("ext", Some("alpha"))),
        ])
        .unwrap();

        let mut captures = CaptureBuf::new();
        assert!(segment.capture("report.pdf", &mut captures));
        assert_eq!(&captures[..], &[("name", "report"), ("ext", "pdf")]);

        let mut captures = CaptureBuf::new();
        assert!(!segment.capture("report.p2f", &mut captures));
        assert!(captures.is_empty());
        assert!(!segment.capture("report", &mut captures));
        assert_eq!(segment.to_string(), ":name.:ext");
    }

    #[test]
    fn variables_never_match_empty_segments() {
        let segment = VariableSegment::new(vec![SegmentPart::Variable(var("id", None))]).unwrap();
        let mut captures = CaptureBuf::new();
        assert!(!segment.capture("", &mut captures));
        assert!(segment.capture("42", &mut captures));
    }

    #[test]
    fn same_variable_key_is_merged() {
        let mut root: TrieNode<()> = TrieNode::root();
        for _ in 0..2 {
            let segment =
                VariableSegment::new(vec![SegmentPart::Variable(var("id", Some("int")))]).unwrap();
            root.variable_child_mut(segment);
        }
        let other = VariableSegment::new(vec![SegmentPart::Variable(var("id", None))]).unwrap();
        root.variable_child_mut(other);
        assert_eq!(root.variables().len(), 2);
    }
}
