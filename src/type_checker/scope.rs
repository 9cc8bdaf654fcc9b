use crate::ast::{expressions::Param, types::TypeNode};

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Var {
        decl_type: TypeNode,
    },
    Func {
        params: Vec<Param>,
        return_type: TypeNode,
        is_async: bool,
        /// Registered ahead of its declaration so earlier statements can call it.
        hoisted: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub constant: bool,
}

impl Symbol {
    pub fn var(name: &str, decl_type: TypeNode, constant: bool) -> Self {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Var { decl_type },
            constant,
        }
    }

    /// The type a plain reference to this symbol evaluates to.
    pub fn value_type(&self) -> TypeNode {
        match &self.kind {
            SymbolKind::Var { decl_type } => decl_type.clone(),
            SymbolKind::Func { .. } => TypeNode::func(),
        }
    }
}

/// One block's symbols, in declaration order, names unique.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    symbols: Vec<Symbol>,
}

impl Frame {
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Inserts the symbol, replacing any symbol of the same name.
    pub fn upsert(&mut self, symbol: Symbol) {
        match self.symbols.iter_mut().find(|s| s.name == symbol.name) {
            Some(existing) => *existing = symbol,
            None => self.symbols.push(symbol),
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

/// Nested block scopes. Lookups go from the innermost frame outwards.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        ScopeStack::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![Frame::default()],
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    pub fn pop_frame(&mut self) -> Option<Frame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn lookup_current(&self, name: &str) -> Option<&Symbol> {
        self.current().get(name)
    }

    pub fn upsert(&mut self, symbol: Symbol) {
        if let Some(frame) = self.frames.last_mut() {
            frame.upsert(symbol);
        }
    }

    pub fn current(&self) -> &Frame {
        // The global frame is never popped.
        &self.frames[self.frames.len() - 1]
    }
}
