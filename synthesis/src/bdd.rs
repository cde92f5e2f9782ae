use std::collections::{BTreeSet, HashMap};

/// Reference to a node of a [`BddManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BddNode(u32);

impl BddNode {
    pub const ZERO: BddNode = BddNode(0);
    pub const ONE: BddNode = BddNode(1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Node {
    variable: u32,
    low: BddNode,
    high: BddNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Op {
    And,
    Or,
}

const TERMINAL_VAR: u32 = u32::MAX;

/// Reduced ordered BDDs with a unique table and an operation cache.
///
/// Variables are ordered by index, smaller indices closer to the root. Nodes are
/// never collected; a manager lives as long as one synthesis run.
#[derive(Debug)]
pub struct BddManager {
    nodes: Vec<Node>,
    unique: HashMap<Node, BddNode>,
    cache: HashMap<(Op, BddNode, BddNode), BddNode>,
    not_cache: HashMap<BddNode, BddNode>,
}

impl Default for BddManager {
    fn default() -> Self {
        BddManager::new()
    }
}

impl BddManager {
    pub fn new() -> BddManager {
        let terminal = |node| Node { variable: TERMINAL_VAR, low: node, high: node };
        BddManager {
            nodes: vec![terminal(BddNode::ZERO), terminal(BddNode::ONE)],
            unique: HashMap::new(),
            cache: HashMap::new(),
            not_cache: HashMap::new(),
        }
    }

    pub fn zero(&self) -> BddNode {
        BddNode::ZERO
    }

    pub fn one(&self) -> BddNode {
        BddNode::ONE
    }

    pub fn is_zero(&self, node: BddNode) -> bool {
        node == BddNode::ZERO
    }

    pub fn is_one(&self, node: BddNode) -> bool {
        node == BddNode::ONE
    }

    pub fn is_terminal(&self, node: BddNode) -> bool {
        node.0 < 2
    }

    /// Number of allocated nodes, terminals included.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    fn variable(&self, node: BddNode) -> u32 {
        self.nodes[node.0 as usize].variable
    }

    fn low(&self, node: BddNode) -> BddNode {
        self.nodes[node.0 as usize].low
    }

    fn high(&self, node: BddNode) -> BddNode {
        self.nodes[node.0 as usize].high
    }

    fn mk_node(&mut self, variable: u32, low: BddNode, high: BddNode) -> BddNode {
        if low == high {
            return low;
        }
        let node = Node { variable, low, high };
        if let Some(existing) = self.unique.get(&node) {
            return *existing;
        }
        let reference = BddNode(self.nodes.len() as u32);
        self.nodes.push(node);
        self.unique.insert(node, reference);
        reference
    }

    pub fn mk_var(&mut self, variable: u32) -> BddNode {
        self.mk_node(variable, BddNode::ZERO, BddNode::ONE)
    }

    pub fn apply_not(&mut self, f: BddNode) -> BddNode {
        if self.is_zero(f) {
            return BddNode::ONE;
        }
        if self.is_one(f) {
            return BddNode::ZERO;
        }
        if let Some(result) = self.not_cache.get(&f) {
            return *result;
        }
        let low = self.apply_not(self.low(f));
        let high = self.apply_not(self.high(f));
        let result = self.mk_node(self.variable(f), low, high);
        self.not_cache.insert(f, result);
        result
    }

    pub fn apply_and(&mut self, u: BddNode, v: BddNode) -> BddNode {
        self.apply(Op::And, u, v)
    }

    pub fn apply_or(&mut self, u: BddNode, v: BddNode) -> BddNode {
        self.apply(Op::Or, u, v)
    }

    pub fn apply_and_many(&mut self, nodes: impl IntoIterator<Item = BddNode>) -> BddNode {
        nodes.into_iter().fold(BddNode::ONE, |acc, node| self.apply_and(acc, node))
    }

    pub fn apply_or_many(&mut self, nodes: impl IntoIterator<Item = BddNode>) -> BddNode {
        nodes.into_iter().fold(BddNode::ZERO, |acc, node| self.apply_or(acc, node))
    }

    fn apply(&mut self, op: Op, u: BddNode, v: BddNode) -> BddNode {
        match op {
            Op::And => {
                if self.is_zero(u) || self.is_zero(v) {
                    return BddNode::ZERO;
                }
                if self.is_one(u) {
                    return v;
                }
                if self.is_one(v) || u == v {
                    return u;
                }
            }
            Op::Or => {
                if self.is_one(u) || self.is_one(v) {
                    return BddNode::ONE;
                }
                if self.is_zero(u) {
                    return v;
                }
                if self.is_zero(v) || u == v {
                    return u;
                }
            }
        }
        // commutative, normalise the cache key
        let (u, v) = if u <= v { (u, v) } else { (v, u) };
        if let Some(result) = self.cache.get(&(op, u, v)) {
            return *result;
        }
        let (var_u, var_v) = (self.variable(u), self.variable(v));
        let top = var_u.min(var_v);
        let (u_low, u_high) = if var_u == top { (self.low(u), self.high(u)) } else { (u, u) };
        let (v_low, v_high) = if var_v == top { (self.low(v), self.high(v)) } else { (v, v) };
        let low = self.apply(op, u_low, v_low);
        let high = self.apply(op, u_high, v_high);
        let result = self.mk_node(top, low, high);
        self.cache.insert((op, u, v), result);
        result
    }

    /// Existential quantification over `variables`.
    pub fn exists(&mut self, f: BddNode, variables: &BTreeSet<u32>) -> BddNode {
        let mut memo = HashMap::new();
        self.quantify(f, variables, Op::Or, &mut memo)
    }

    /// Universal quantification over `variables`.
    pub fn forall(&mut self, f: BddNode, variables: &BTreeSet<u32>) -> BddNode {
        let mut memo = HashMap::new();
        self.quantify(f, variables, Op::And, &mut memo)
    }

    fn quantify(
        &mut self,
        f: BddNode,
        variables: &BTreeSet<u32>,
        op: Op,
        memo: &mut HashMap<BddNode, BddNode>,
    ) -> BddNode {
        if self.is_terminal(f) {
            return f;
        }
        if let Some(result) = memo.get(&f) {
            return *result;
        }
        let variable = self.variable(f);
        let low = self.quantify(self.low(f), variables, op, memo);
        let high = self.quantify(self.high(f), variables, op, memo);
        let result = if variables.contains(&variable) {
            self.apply(op, low, high)
        } else {
            self.mk_node(variable, low, high)
        };
        memo.insert(f, result);
        result
    }

    /// One satisfying partial assignment, as `(variable, value)` pairs along a
    /// path to `ONE`. Variables not listed are free. `None` for `ZERO`.
    pub fn pick_cube(&self, f: BddNode) -> Option<Vec<(u32, bool)>> {
        if self.is_zero(f) {
            return None;
        }
        let mut cube = Vec::new();
        let mut current = f;
        while !self.is_terminal(current) {
            let high = self.high(current);
            if self.is_zero(high) {
                cube.push((self.variable(current), false));
                current = self.low(current);
            } else {
                cube.push((self.variable(current), true));
                current = high;
            }
        }
        Some(cube)
    }

    /// Evaluates `f` under a total assignment given as a predicate on variables.
    pub fn eval(&self, f: BddNode, assignment: impl Fn(u32) -> bool) -> bool {
        let mut current = f;
        while !self.is_terminal(current) {
            current = if assignment(self.variable(current)) {
                self.high(current)
            } else {
                self.low(current)
            };
        }
        self.is_one(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminals_and_vars() {
        let mut manager = BddManager::new();
        let x = manager.mk_var(0);
        assert!(!manager.is_terminal(x));
        assert_eq!(manager.mk_var(0), x);
        let not_x = manager.apply_not(x);
        assert_eq!(manager.apply_and(x, not_x), BddNode::ZERO);
        assert_eq!(manager.apply_or(x, not_x), BddNode::ONE);
        assert_eq!(manager.apply_not(not_x), x);
    }

    #[test]
    fn test_canonicity() {
        let mut manager = BddManager::new();
        let x = manager.mk_var(0);
        let y = manager.mk_var(1);
        let z = manager.mk_var(2);
        // x & (y | z) == (x & y) | (x & z)
        let y_or_z = manager.apply_or(y, z);
        let left = manager.apply_and(x, y_or_z);
        let x_and_y = manager.apply_and(x, y);
        let x_and_z = manager.apply_and(x, z);
        let right = manager.apply_or(x_and_y, x_and_z);
        assert_eq!(left, right);
        // built in a different order
        let again = manager.apply_and_many([z, x, y]);
        let expected = manager.apply_and_many([x, y, z]);
        assert_eq!(again, expected);
        let allocated = manager.size();
        manager.apply_or(x_and_y, x_and_z);
        assert_eq!(manager.size(), allocated);
    }

    #[test]
    fn test_quantification() {
        let mut manager = BddManager::new();
        let y = manager.mk_var(0);
        let x = manager.mk_var(1);
        let xor = {
            let not_x = manager.apply_not(x);
            let not_y = manager.apply_not(y);
            let a = manager.apply_and(x, not_y);
            let b = manager.apply_and(not_x, y);
            manager.apply_or(a, b)
        };
        let inputs: BTreeSet<u32> = [1].into_iter().collect();
        let outputs: BTreeSet<u32> = [0].into_iter().collect();
        // exists y forall x (x xor y) is false
        let inner = manager.forall(xor, &inputs);
        assert_eq!(manager.exists(inner, &outputs), BddNode::ZERO);
        // forall x exists y (x xor y) is true
        let inner = manager.exists(xor, &outputs);
        assert_eq!(manager.forall(inner, &inputs), BddNode::ONE);
    }

    #[test]
    fn test_pick_cube_and_eval() {
        let mut manager = BddManager::new();
        let x = manager.mk_var(0);
        let y = manager.mk_var(1);
        let not_y = manager.apply_not(y);
        let f = manager.apply_and(x, not_y);
        let cube = manager.pick_cube(f).unwrap();
        assert_eq!(cube, vec![(0, true), (1, false)]);
        assert!(manager.eval(f, |v| v == 0));
        assert!(!manager.eval(f, |_| true));
        assert!(manager.pick_cube(BddNode::ZERO).is_none());
        assert_eq!(manager.pick_cube(BddNode::ONE), Some(vec![]));
    }
}
