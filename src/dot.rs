//! Simple graphviz dot file format output.

use std::fmt::{self, Write};

use crate::graph::DiGraph;

static INDENT: &str = "    ";

/// `Dot` implements output to graphviz .dot format for a graph.
///
/// Node labels are the `Display` rendering of the node content, with
/// quotes and backslashes escaped. Edge labels are off by default, since
/// most graphs in this crate carry unit edge content; they can be
/// supplied through [`Dot::with_edge_labels`].
///
/// # Examples
///
/// ```
/// use lattices::graph::DiGraph;
/// use lattices::dot::Dot;
///
/// let mut graph: DiGraph<&str, ()> = DiGraph::new();
/// let a = graph.add_node("a");
/// let b = graph.add_node("b");
/// graph.add_edge(a, b, ());
///
/// let output = format!("{}", Dot::new(&graph));
/// assert!(output.starts_with("digraph G {"));
/// assert!(output.contains("0 -> 1"));
/// ```
pub struct Dot<'a, N, E> {
    graph: &'a DiGraph<N, E>,
    edge_label: Option<&'a dyn Fn(&E, &mut fmt::Formatter) -> fmt::Result>,
}

impl<'a, N, E> Dot<'a, N, E> {
    /// Create a `Dot` formatting wrapper with unlabeled edges.
    #[inline]
    pub fn new(graph: &'a DiGraph<N, E>) -> Self {
        Dot {
            graph,
            edge_label: None,
        }
    }

    /// Create a `Dot` formatting wrapper that labels each edge through
    /// the given formatter.
    #[inline]
    pub fn with_edge_labels(
        graph: &'a DiGraph<N, E>,
        edge_label: &'a dyn Fn(&E, &mut fmt::Formatter) -> fmt::Result,
    ) -> Self {
        Dot {
            graph,
            edge_label: Some(edge_label),
        }
    }
}

impl<'a, N: fmt::Display, E> fmt::Display for Dot<'a, N, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let g = self.graph;
        writeln!(f, "digraph G {{")?;
        writeln!(f, "{}Graph [rankdir=BT];", INDENT)?;

        for ix in g.node_indices() {
            if let Some(weight) = g.node_weight(ix) {
                write!(f, "{}{} [label=\"", INDENT, ix.index())?;
                Escaped(weight).fmt(f)?;
                writeln!(f, "\"];")?;
            }
        }
        for e in g.edge_indices() {
            let (a, b) = match g.edge_endpoints(e) {
                Some(ends) => ends,
                None => continue,
            };
            write!(f, "{}{} -> {}", INDENT, a.index(), b.index())?;
            if let (Some(label), Some(weight)) = (self.edge_label, g.edge_weight(e)) {
                write!(f, " [label=\"")?;
                Escaped(FnFmt(weight, label)).fmt(f)?;
                write!(f, "\"]")?;
            }
            writeln!(f, ";")?;
        }
        writeln!(f, "}}")
    }
}

/// Escape for Graphviz.
struct Escaper<W>(W);

impl<W> fmt::Write for Escaper<W>
where
    W: fmt::Write,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            self.write_char(c)?;
        }
        Ok(())
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        if matches!(c, '"' | '\\') {
            self.0.write_char('\\')?;
        }
        self.0.write_char(c)
    }
}

/// Pass `Display` formatting through the escaping filter.
struct Escaped<T>(T);

impl<T: fmt::Display> fmt::Display for Escaped<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(Escaper(f), "{}", &self.0)
    }
}

/// Format data using a specific format function.
struct FnFmt<'a, T>(&'a T, &'a dyn Fn(&T, &mut fmt::Formatter) -> fmt::Result);

impl<'a, T> fmt::Display for FnFmt<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.1(self.0, f)
    }
}
