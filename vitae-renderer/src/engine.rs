//! Template expansion engine with `{{ path }}` interpolation and nestable
//! `{{#each path}} … {{/each}}` blocks.
//!
//! A body is parsed once into a [`Node`] tree and expanded recursively against
//! a JSON scope. Substituted text is never rescanned, so values that happen to
//! contain `{{` are emitted as-is.
//!
//! # Resolution rules
//!
//! | Path            | Resolves to                                           |
//! |-----------------|-------------------------------------------------------|
//! | `a.b.c`         | key walk from the current scope                       |
//! | `items.0.name`  | numeric segments index into arrays                    |
//! | `this`          | the current scope (renders only when it is a scalar)  |
//! | anything else   | empty string, missing data is never an error          |

use serde_json::Value;

use crate::sanitize::SanitizedModel;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const EACH: &str = "#each";
const END_EACH: &str = "/each";
const THIS: &str = "this";

/// One node of a parsed template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(String),
    Var(String),
    Each { path: String, children: Vec<Node> },
}

/// A parsed template body, reusable across renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    nodes: Vec<Node>,
}

impl CompiledTemplate {
    /// Parse `body` into a node tree.
    ///
    /// Malformed input is handled best effort: an unterminated `{{` and a stray
    /// `{{/each}}` stay literal text, and blocks still open at the end of input
    /// are closed implicitly.
    pub fn parse(body: &str) -> Self {
        let mut stack: Vec<(String, Vec<Node>)> = Vec::new();
        let mut current: Vec<Node> = Vec::new();
        let mut rest = body;

        loop {
            let Some(mut open) = rest.find(OPEN) else {
                push_literal(&mut current, rest);
                break;
            };
            // `{{{x}}}`: the outermost braces belong to the surrounding markup.
            while rest[open + OPEN.len()..].starts_with('{') {
                open += 1;
            }
            push_literal(&mut current, &rest[..open]);

            let after_open = &rest[open + OPEN.len()..];
            let Some(close) = after_open.find(CLOSE) else {
                push_literal(&mut current, &rest[open..]);
                break;
            };
            let raw = &rest[open..open + OPEN.len() + close + CLOSE.len()];
            let tag = after_open[..close].trim();
            rest = &after_open[close + CLOSE.len()..];

            if let Some(path) = each_path(tag) {
                stack.push((path.to_string(), std::mem::take(&mut current)));
            } else if tag == END_EACH {
                match stack.pop() {
                    Some((path, parent)) => {
                        let children = std::mem::replace(&mut current, parent);
                        current.push(Node::Each { path, children });
                    }
                    None => {
                        tracing::debug!("stray {{{{/each}}}} kept as literal text");
                        push_literal(&mut current, raw)
                    }
                }
            } else {
                current.push(Node::Var(tag.to_string()));
            }
        }

        while let Some((path, parent)) = stack.pop() {
            tracing::debug!(path = %path, "closing unterminated each block at end of template");
            let children = std::mem::replace(&mut current, parent);
            current.push(Node::Each { path, children });
        }

        CompiledTemplate { nodes: current }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Expand against an arbitrary root scope.
    pub fn expand_value(&self, root: &Value) -> String {
        let mut out = String::new();
        expand_nodes(&self.nodes, root, &mut out);
        out
    }

    /// Expand against a sanitized model.
    pub fn expand(&self, model: &SanitizedModel) -> String {
        self.expand_value(model.as_value())
    }
}

/// Parse and expand `body` in one step.
pub fn expand(body: &str, model: &SanitizedModel) -> String {
    CompiledTemplate::parse(body).expand(model)
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn each_path(tag: &str) -> Option<&str> {
    let rest = tag.strip_prefix(EACH)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn push_literal(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Literal(prev)) = nodes.last_mut() {
        prev.push_str(text);
    } else {
        nodes.push(Node::Literal(text.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

fn expand_nodes(nodes: &[Node], scope: &Value, out: &mut String) {
    for node in nodes {
        match node {
            Node::Literal(text) => out.push_str(text),
            Node::Var(path) => push_scalar(out, resolve(scope, path)),
            Node::Each { path, children } => {
                if let Some(Value::Array(items)) = resolve(scope, path) {
                    for item in items {
                        expand_nodes(children, item, out);
                    }
                }
            }
        }
    }
}

/// Walk a dotted path from `scope`. `None` for any missing segment.
pub fn resolve<'a>(scope: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    if path == THIS {
        return Some(scope);
    }
    path.split('.').try_fold(scope, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn push_scalar(out: &mut String, value: Option<&Value>) {
    match value {
        Some(Value::String(s)) => out.push_str(s),
        Some(Value::Number(n)) => out.push_str(&n.to_string()),
        Some(Value::Bool(b)) => out.push_str(if *b { "true" } else { "false" }),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
