//! Minimal behaviour tree: leaves, AND and OR.
//!
//! Leaves may act on the context as well as test it; the tree is used for
//! action selection, so a leaf that changes state and returns `true` is the
//! normal way to make a decision. Both branch kinds evaluate children left to
//! right and stop at the first child that settles the result, so children
//! after that point never run.
//!
//! Leaves can also fail hard with `E`. That aborts the whole evaluation and
//! is meant for broken invariants, not for "this option does not apply".

use std::convert::Infallible;

type LeafFn<C, E> = Box<dyn Fn(&mut C) -> Result<bool, E>>;

pub enum Node<C, E = Infallible> {
    Leaf(LeafFn<C, E>),
    And(Vec<Node<C, E>>),
    Or(Vec<Node<C, E>>),
}

impl<C: 'static, E: 'static> Node<C, E> {
    /// Leaf that cannot fail.
    pub fn leaf(f: impl Fn(&mut C) -> bool + 'static) -> Self {
        Node::Leaf(Box::new(move |ctx| Ok(f(ctx))))
    }

    /// Leaf whose action can hit a broken invariant.
    pub fn try_leaf(f: impl Fn(&mut C) -> Result<bool, E> + 'static) -> Self {
        Node::Leaf(Box::new(f))
    }

    /// Always succeeds. Closes an OR whose earlier options are optional.
    pub fn succeed() -> Self {
        Self::leaf(|_| true)
    }

    pub fn and(children: Vec<Node<C, E>>) -> Self {
        Node::And(children)
    }

    pub fn or(children: Vec<Node<C, E>>) -> Self {
        Node::Or(children)
    }
}

impl<C, E> Node<C, E> {
    pub fn evaluate(&self, ctx: &mut C) -> Result<bool, E> {
        match self {
            Node::Leaf(f) => f(ctx),
            Node::And(children) => {
                for child in children {
                    if !child.evaluate(ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Node::Or(children) => {
                for child in children {
                    if child.evaluate(ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::And(children) | Node::Or(children) => children.iter().map(Node::leaf_count).sum(),
        }
    }
}

impl<C> Node<C, Infallible> {
    /// Evaluation for trees whose leaves cannot fail.
    pub fn run(&self, ctx: &mut C) -> bool {
        match self.evaluate(ctx) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }
}
