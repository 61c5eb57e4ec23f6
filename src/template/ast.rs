use crate::rules::RuleParam;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstNodeKind {
    Root,
    Host,
    Path,
    SegmentDelimiter,
    Text,
    Variable,
    VariableConstraint,
    VariableConstraintParameters,
    OptionalRoutePart,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstValue {
    None,
    Text(Box<str>),
    Parameters(Vec<RuleParam>),
}

#[derive(Debug, Clone)]
pub struct AstNode {
    kind: AstNodeKind,
    value: AstValue,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl AstNode {
    pub fn kind(&self) -> AstNodeKind {
        self.kind
    }

    pub fn value(&self) -> &AstValue {
        &self.value
    }

    pub fn text(&self) -> Option<&str> {
        match self.value {
            AstValue::Text(ref s) => Some(s),
            _ => None,
        }
    }

    pub fn parameters(&self) -> Option<&[RuleParam]> {
        match self.value {
            AstValue::Parameters(ref p) => Some(p),
            _ => None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Syntax tree of one template, stored as an arena. Children and parents are
/// indices into the arena; the root is always the first node.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<AstNode>,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    pub fn new() -> Self {
        Self {
            nodes: vec![AstNode {
                kind: AstNodeKind::Root,
                value: AstValue::None,
                children: Vec::new(),
                parent: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // the root is always there
        false
    }

    pub fn add_child(&mut self, parent: NodeId, kind: AstNodeKind, value: AstValue) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(AstNode {
            kind,
            value,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn host(&self) -> Option<NodeId> {
        self.child_of_kind(self.root(), AstNodeKind::Host)
    }

    pub fn path(&self) -> Option<NodeId> {
        self.child_of_kind(self.root(), AstNodeKind::Path)
    }

    pub fn child_of_kind(&self, id: NodeId, kind: AstNodeKind) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).kind == kind)
    }

    pub fn last_child(&self, id: NodeId) -> Option<&AstNode> {
        self.node(id).children.last().map(|&c| self.node(c))
    }

    /// Every node below `id`, depth first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.node(next).children.iter().rev().copied());
        }
        out
    }
}
