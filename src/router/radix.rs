//! Radix tree implementation for HTTP route matching
//!
//! This module provides a radix tree (also called compact prefix tree) for O(k)
//! route matching where k is the path length, independent of the number of
//! registered routes.
//!
//! ## Node Kinds
//!
//! - **Static** nodes hold a compressed run of literal path bytes. A node's
//!   prefix may span several segments (`/api/v1/`) and is split when a later
//!   route shares only part of it.
//! - **Param** nodes (prefix `:`) capture one segment, up to the next `/`.
//! - **Wildcard** nodes (prefix `*`) capture everything that remains.
//!
//! Parameter names are not part of the tree key: `/users/:id` is stored as
//! `/users/:`, and the names are kept on the node that terminates the route.
//!
//! ## Lookup Order
//!
//! At every node the search tries static children first, then the param child,
//! then the wildcard child. A branch that dead-ends deeper in the tree is
//! abandoned and the next less specific kind is tried at the most recent
//! branch point. The backtracking state is an explicit stack of frames, kept
//! inline in a `SmallVec` for typical path depths.
//!
//! Backtracking only happens on dead ends. Once the path is consumed at a node
//! with handlers, that node decides: its handler for the method, or method not
//! allowed with its `Allow` list.
//!
//! ## Example
//!
//! Registering `/users/new`, `/users/:id`, `/users/:id/posts/lucky`,
//! `/users/:id/posts/:pid` and `/users/*` yields:
//!
//! ```text
//! /users/
//! ├── new
//! ├── :
//! │   └── /posts/
//! │       ├── lucky
//! │       └── :
//! └── *
//! ```

use http::Method;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::ops::Range;
use std::sync::Arc;

/// Backtracking frames kept on the stack before spilling to the heap.
pub const MAX_INLINE_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Static,
    Param,
    Wildcard,
}

/// A route terminating at a node: one handler for one method.
pub(crate) struct Endpoint<H> {
    pub method: Method,
    pub handler: Arc<H>,
    pub param_names: Arc<[Arc<str>]>,
    pub pattern: Arc<str>,
}

/// Node in the radix tree
pub(crate) struct Node<H> {
    /// First byte of `prefix`
    label: u8,
    kind: NodeKind,
    /// Compressed literal bytes; `:` for param nodes, `*` for wildcard nodes
    prefix: Vec<u8>,
    /// At most one child per label, so at most one param and one wildcard child
    children: Vec<Node<H>>,
    /// Names bound from the root to this node, aligned with captured values
    param_names: Arc<[Arc<str>]>,
    /// Route path as registered, e.g. `/users/:id`
    pattern: Option<Arc<str>>,
    handlers: HashMap<Method, Arc<H>>,
    /// `Allow` header value listing the methods in `handlers`
    allow: String,
}

impl<H> Node<H> {
    fn empty() -> Self {
        Self {
            label: 0,
            kind: NodeKind::Static,
            prefix: Vec::new(),
            children: Vec::new(),
            param_names: Arc::from(Vec::new()),
            pattern: None,
            handlers: HashMap::new(),
            allow: String::new(),
        }
    }

    fn leaf(prefix: &[u8], kind: NodeKind, endpoint: Option<Endpoint<H>>) -> Self {
        let mut node = Self {
            label: prefix[0],
            kind,
            prefix: prefix.to_vec(),
            ..Self::empty()
        };
        if let Some(endpoint) = endpoint {
            node.attach(endpoint);
        }
        node
    }

    /// Register a handler on this node. Names and pattern are kept from the
    /// first registration so every method on a node shares one binding layout.
    fn attach(&mut self, endpoint: Endpoint<H>) {
        self.handlers.insert(endpoint.method, endpoint.handler);
        if self.param_names.is_empty() {
            self.param_names = endpoint.param_names;
        }
        if self.pattern.is_none() {
            self.pattern = Some(endpoint.pattern);
        }

        let mut methods: Vec<&str> = self.handlers.keys().map(Method::as_str).collect();
        methods.sort_unstable();
        self.allow = methods.join(", ");
    }

    /// Move everything after `at` into a new child, leaving a static node
    /// that holds the shared part of the prefix.
    fn split(&mut self, at: usize) {
        let suffix = self.prefix.split_off(at);
        let child = Node {
            label: suffix[0],
            kind: self.kind,
            prefix: suffix,
            children: mem::take(&mut self.children),
            param_names: mem::replace(&mut self.param_names, Arc::from(Vec::new())),
            pattern: self.pattern.take(),
            handlers: mem::take(&mut self.handlers),
            allow: mem::take(&mut self.allow),
        };
        self.kind = NodeKind::Static;
        self.children.push(child);
    }

    #[inline]
    fn static_child(&self, label: u8) -> Option<&Node<H>> {
        self.children
            .iter()
            .find(|c| c.label == label && c.kind == NodeKind::Static)
    }

    #[inline]
    fn child_of_kind(&self, kind: NodeKind) -> Option<&Node<H>> {
        self.children.iter().find(|c| c.kind == kind)
    }

    #[inline]
    fn handler(&self, method: &Method) -> Option<&H> {
        self.handlers.get(method).map(Arc::as_ref)
    }

    #[inline]
    fn is_terminal(&self) -> bool {
        !self.handlers.is_empty()
    }

    #[inline]
    pub(crate) fn is_wildcard(&self) -> bool {
        self.kind == NodeKind::Wildcard
    }

    pub(crate) fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    pub(crate) fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub(crate) fn allow(&self) -> &str {
        &self.allow
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(
            f,
            "{:indent$}{}{}",
            "",
            String::from_utf8_lossy(&self.prefix),
            if self.is_terminal() {
                format!(" [{}]", self.allow)
            } else {
                String::new()
            },
            indent = depth * 2
        )?;
        for child in &self.children {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl<H> Clone for Node<H> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            kind: self.kind,
            prefix: self.prefix.clone(),
            children: self.children.clone(),
            param_names: Arc::clone(&self.param_names),
            pattern: self.pattern.clone(),
            handlers: self.handlers.clone(),
            allow: self.allow.clone(),
        }
    }
}

/// Outcome of a tree search.
pub(crate) enum Lookup<'t, H> {
    /// A node serving the method; captured spans are in the caller's buffer
    Found(&'t Node<H>, &'t H),
    /// The path ends at a terminal node that does not serve the method
    MethodNotAllowed(&'t Node<H>),
    NotFound,
}

/// Which kind of child a frame will try next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Static,
    Param,
    Wildcard,
    Exhausted,
}

/// A point in the search with untried alternatives.
struct Frame<'t, H> {
    node: &'t Node<H>,
    /// Position in the path just after `node.prefix`
    offset: usize,
    /// Number of captures made up to and including this node
    captured: usize,
    next: Step,
}

impl<'t, H> Frame<'t, H> {
    fn enter(node: &'t Node<H>, offset: usize, captured: usize) -> Self {
        Self {
            node,
            offset,
            captured,
            next: Step::Static,
        }
    }
}

/// Compressed prefix tree mapping structural paths to per-method handlers
pub(crate) struct RadixTree<H> {
    root: Node<H>,
}

impl<H> RadixTree<H> {
    pub(crate) fn new() -> Self {
        Self { root: Node::empty() }
    }

    pub(crate) fn node_count(&self) -> usize {
        if self.root.prefix.is_empty() {
            0
        } else {
            self.root.count()
        }
    }

    /// Insert one structural path into the tree, splitting nodes as needed.
    ///
    /// `endpoint` is `None` for the intermediate inserts that create node
    /// boundaries in front of a `:` or `*` marker.
    pub(crate) fn insert(&mut self, path: &str, kind: NodeKind, endpoint: Option<Endpoint<H>>) {
        let mut node = &mut self.root;
        let mut search = path.as_bytes();

        loop {
            let lcp = common_prefix_len(search, &node.prefix);

            if node.prefix.is_empty() {
                // fresh root adopts the first path wholesale
                node.label = search[0];
                node.kind = kind;
                node.prefix = search.to_vec();
                if let Some(endpoint) = endpoint {
                    node.attach(endpoint);
                }
                return;
            }

            debug_assert!(lcp > 0, "descended into a child with a different label");

            if lcp < node.prefix.len() {
                node.split(lcp);
                if lcp == search.len() {
                    node.kind = kind;
                    if let Some(endpoint) = endpoint {
                        node.attach(endpoint);
                    }
                } else {
                    node.children
                        .push(Node::leaf(&search[lcp..], kind, endpoint));
                }
                return;
            }

            if lcp < search.len() {
                search = &search[lcp..];
                let label = search[0];
                match node.children.iter().position(|c| c.label == label) {
                    Some(i) => {
                        node = &mut node.children[i];
                        continue;
                    }
                    None => {
                        node.children.push(Node::leaf(search, kind, endpoint));
                        return;
                    }
                }
            }

            // node already exists structurally
            if let Some(endpoint) = endpoint {
                node.attach(endpoint);
            }
            return;
        }
    }

    /// Find the handler for `method` on `path`.
    ///
    /// Capture spans of the winning branch are left in `spans`, in path order.
    pub(crate) fn search<'t>(
        &'t self,
        method: &Method,
        path: &str,
        spans: &mut Vec<Range<usize>>,
    ) -> Lookup<'t, H> {
        spans.clear();
        let bytes = path.as_bytes();
        let root = &self.root;
        if root.prefix.is_empty() || !bytes.starts_with(&root.prefix) {
            return Lookup::NotFound;
        }

        let mut stack: SmallVec<[Frame<'t, H>; MAX_INLINE_DEPTH]> = SmallVec::new();
        stack.push(Frame::enter(root, root.prefix.len(), 0));

        while let Some(frame) = stack.last_mut() {
            spans.truncate(frame.captured);
            let node = frame.node;
            let offset = frame.offset;
            let rest = &bytes[offset..];

            match frame.next {
                Step::Static => {
                    frame.next = Step::Param;
                    if rest.is_empty() {
                        if node.is_terminal() {
                            return resolve_at(node, method, spans);
                        }
                        continue;
                    }
                    if let Some(child) = node.static_child(rest[0]) {
                        if rest.starts_with(&child.prefix) {
                            let next = offset + child.prefix.len();
                            stack.push(Frame::enter(child, next, spans.len()));
                        }
                    }
                }
                Step::Param => {
                    frame.next = Step::Wildcard;
                    if let Some(child) = node.child_of_kind(NodeKind::Param) {
                        let end = memchr::memchr(b'/', rest).unwrap_or(rest.len());
                        if end > 0 {
                            spans.push(offset..offset + end);
                            stack.push(Frame::enter(child, offset + end, spans.len()));
                        }
                    }
                }
                Step::Wildcard => {
                    frame.next = Step::Exhausted;
                    if let Some(child) = node.child_of_kind(NodeKind::Wildcard) {
                        spans.push(offset..bytes.len());
                        return resolve_at(child, method, spans);
                    }
                }
                Step::Exhausted => {
                    stack.pop();
                }
            }
        }

        spans.clear();
        Lookup::NotFound
    }
}

/// The search ends at a terminal node: it either serves `method` or the
/// request is rejected with that node's `Allow` list.
fn resolve_at<'t, H>(node: &'t Node<H>, method: &Method, spans: &mut Vec<Range<usize>>) -> Lookup<'t, H> {
    match node.handler(method) {
        Some(handler) => Lookup::Found(node, handler),
        None => {
            spans.clear();
            Lookup::MethodNotAllowed(node)
        }
    }
}

impl<H> Clone for RadixTree<H> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<H> fmt::Display for RadixTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.root.prefix.is_empty() {
            return Ok(());
        }
        self.root.write_tree(f, 0)
    }
}

#[inline]
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
