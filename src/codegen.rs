//! Python code generation from a resolved block graph.
//!
//! Generation walks the `next` chain from a head block. Nest blocks emit a
//! header line and then their whole body one level deeper. Argument blocks
//! only ever appear as sub-expressions of their parent's argument slot.
//!
//! Generation never fails: empty argument slots are filled with a fixed
//! placeholder (see [`placeholder`]) and empty bodies with `pass`. The walk
//! terminates because the resolver never creates cycles.

use crate::block::{Block, BlockId, BlockKind, NestForm};
use crate::graph::BlockGraph;

/// One level of indentation.
pub const INDENT: &str = "    ";

/// Literal substituted for an empty argument slot.
pub fn placeholder(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Declare => "None",
        BlockKind::Nest(NestForm::If) => "True",
        BlockKind::Nest(NestForm::Class) => "Foo",
        BlockKind::Function
        | BlockKind::Nest(NestForm::Define)
        | BlockKind::Argument
        | BlockKind::Call => "",
    }
}

/// Generate source for the chain starting at `head`.
///
/// Returns the text and the indentation level the walk finished at, which is
/// always the level it started at (zero).
pub fn generate(graph: &BlockGraph, head: BlockId) -> (String, usize) {
    let mut generator = CodeGenerator::new(graph);
    generator.emit_chain(Some(head));
    generator.finish()
}

/// Generate the whole program, or `None` unless the graph has exactly one
/// head block.
pub fn generate_program(graph: &BlockGraph) -> Option<String> {
    graph.head().map(|head| generate(graph, head).0)
}

/// Recursive emitter threading the output buffer and indentation level.
pub struct CodeGenerator<'a> {
    graph: &'a BlockGraph,
    out: String,
    indent: usize,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(graph: &'a BlockGraph) -> Self {
        Self {
            graph,
            out: String::new(),
            indent: 0,
        }
    }

    pub fn finish(self) -> (String, usize) {
        (self.out, self.indent)
    }

    /// Emit `start` and every block after it in its sequence.
    pub fn emit_chain(&mut self, start: Option<BlockId>) {
        let graph = self.graph;
        for id in graph.chain(start) {
            self.emit_block(&graph[id]);
        }
    }

    fn emit_block(&mut self, block: &Block) {
        match block.kind() {
            BlockKind::Argument => self.out.push_str(block.code()),
            BlockKind::Function => {
                self.begin_line();
                self.out.push_str(block.code());
                self.out.push('(');
                self.emit_argument(block);
                self.out.push_str(")\n");
            }
            BlockKind::Declare => {
                self.begin_line();
                self.out.push_str(block.code());
                self.out.push_str(" = ");
                self.emit_argument(block);
                self.out.push('\n');
            }
            BlockKind::Call => {
                self.begin_line();
                self.out.push_str(block.code());
                self.out.push_str("()\n");
            }
            BlockKind::Nest(form) => {
                self.begin_line();
                match form {
                    NestForm::If | NestForm::Class => {
                        self.out.push_str(block.code());
                        self.out.push(' ');
                        self.emit_argument(block);
                    }
                    NestForm::Define => {
                        self.out.push_str("def ");
                        self.out.push_str(block.code());
                        self.out.push('(');
                        self.emit_argument(block);
                        self.out.push(')');
                    }
                }
                self.out.push_str(":\n");
                self.emit_body(block);
            }
        }
    }

    fn emit_argument(&mut self, block: &Block) {
        match block.elem_block() {
            Some(elem) => {
                let graph = self.graph;
                self.emit_block(&graph[elem]);
            }
            None => self.out.push_str(placeholder(block.kind())),
        }
    }

    fn emit_body(&mut self, block: &Block) {
        self.indent += 1;
        match block.nest_block() {
            Some(first) => self.emit_chain(Some(first)),
            None => {
                self.begin_line();
                self.out.push_str("pass\n");
            }
        }
        self.indent -= 1;
    }

    fn begin_line(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }
}
