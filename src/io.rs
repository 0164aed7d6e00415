//! Text serialization of contexts and implicational systems, and the
//! extension-keyed registry dispatching readers and writers.
//!
//! The context format:
//!
//! ```text
//! Observations: o1 o2 o3
//! Attributes: a b c
//! o1 : a c
//! o2 : a b
//! ```
//!
//! The implicational-system format holds one rule per line,
//! `p1 p2 -> c1 c2`; the element vocabulary is the union of all tokens.
//!
//! Undeclared tokens in a context row are silently skipped; structurally
//! broken input (missing headers, a row without `:`) surfaces as a
//! [`ReadError`] and no partial value escapes.

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use hashbrown::HashMap;

use crate::context::Context;
use crate::dot::Dot;
use crate::implications::{ImplicationalSystem, Rule};
use crate::set::ComparableSet;

/// Reading failed: either the underlying stream or the syntax.
#[derive(Debug)]
pub enum ReadError {
    /// The underlying reader failed.
    Io(io::Error),
    /// The input is not in the expected format.
    Syntax {
        /// 1-based input line.
        line: usize,
        message: String,
    },
    /// No reader is registered for the file extension.
    UnknownFormat(String),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReadError::Io(err) => write!(f, "read failed: {}", err),
            ReadError::Syntax { line, message } => {
                write!(f, "syntax error on line {}: {}", line, message)
            }
            ReadError::UnknownFormat(ext) => {
                write!(f, "no reader registered for extension `{}`", ext)
            }
        }
    }
}

impl Error for ReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ReadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        ReadError::Io(err)
    }
}

fn syntax(line: usize, message: impl Into<String>) -> ReadError {
    ReadError::Syntax {
        line,
        message: message.into(),
    }
}

/// Parse a context from its text representation.
///
/// The first line must declare the observations, the second the
/// attributes; every further non-empty line relates one declared
/// observation to its intent. Undeclared attribute tokens and rows for
/// undeclared observations are skipped silently.
pub fn read_context<R: BufRead>(input: R) -> Result<Context<String, String>, ReadError> {
    let mut ctx = Context::new();
    let mut lines = input.lines().enumerate();

    let (_, first) = lines
        .next()
        .ok_or_else(|| syntax(1, "missing `Observations:` header"))?;
    let first = first?;
    let observations = first
        .strip_prefix("Observations:")
        .ok_or_else(|| syntax(1, "expected line to start with `Observations:`"))?;
    ctx.add_observations(observations.split_whitespace().map(str::to_owned));

    let (_, second) = lines
        .next()
        .ok_or_else(|| syntax(2, "missing `Attributes:` header"))?;
    let second = second?;
    let attributes = second
        .strip_prefix("Attributes:")
        .ok_or_else(|| syntax(2, "expected line to start with `Attributes:`"))?;
    ctx.add_attributes(attributes.split_whitespace().map(str::to_owned));

    for (index, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (observation, intent) = line
            .split_once(':')
            .ok_or_else(|| syntax(index + 1, "expected `observation : attributes`"))?;
        let observation = observation.trim().to_owned();
        if !ctx.contains_observation(&observation) {
            // rows for unknown observations are dropped, as documented
            continue;
        }
        for token in intent.split_whitespace() {
            // unknown attribute tokens are dropped the same way
            ctx.add_relation(&observation, &token.to_owned());
        }
    }
    Ok(ctx)
}

/// Write a context in the format accepted by [`read_context`].
pub fn write_context<W: Write>(ctx: &Context<String, String>, mut output: W) -> io::Result<()> {
    write!(output, "Observations:")?;
    for o in ctx.observations().iter() {
        write!(output, " {}", o)?;
    }
    writeln!(output)?;
    write!(output, "Attributes:")?;
    for a in ctx.attributes().iter() {
        write!(output, " {}", a)?;
    }
    writeln!(output)?;
    for o in ctx.observations().iter() {
        write!(output, "{} :", o)?;
        for a in ctx.intent(o).iter() {
            write!(output, " {}", a)?;
        }
        writeln!(output)?;
    }
    Ok(())
}

/// Parse an implicational system from its text representation: one rule
/// per line, premise and conclusion separated by `->`.
pub fn read_implications<R: BufRead>(
    input: R,
) -> Result<ImplicationalSystem<String>, ReadError> {
    let mut premises: Vec<(ComparableSet<String>, ComparableSet<String>)> = Vec::new();
    let mut vocabulary: ComparableSet<String> = ComparableSet::new();
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (premise, conclusion) = line
            .split_once("->")
            .ok_or_else(|| syntax(index + 1, "expected `premise -> conclusion`"))?;
        let premise: ComparableSet<String> =
            premise.split_whitespace().map(str::to_owned).collect();
        let conclusion: ComparableSet<String> =
            conclusion.split_whitespace().map(str::to_owned).collect();
        for token in premise.iter().chain(conclusion.iter()) {
            vocabulary.insert(token.clone());
        }
        premises.push((premise, conclusion));
    }

    let mut sys = ImplicationalSystem::new();
    sys.add_elements(vocabulary);
    for (premise, conclusion) in premises {
        sys.add_rule(Rule::new(premise, conclusion));
    }
    Ok(sys)
}

/// Write an implicational system in the format accepted by
/// [`read_implications`].
pub fn write_implications<W: Write>(
    sys: &ImplicationalSystem<String>,
    mut output: W,
) -> io::Result<()> {
    for rule in sys.rules() {
        writeln!(output, "{}", rule)?;
    }
    Ok(())
}

/// A deserializer for values of type `T`.
pub trait Reader<T> {
    /// Read one value from the input.
    fn read(&self, input: &mut dyn BufRead) -> Result<T, ReadError>;
}

/// A serializer for values of type `T`.
pub trait Writer<T> {
    /// Write the value to the output.
    fn write(&self, value: &T, output: &mut dyn Write) -> io::Result<()>;
}

/// An extension-keyed registry of readers and writers for one value
/// type.
///
/// The registry is a plain value: construct one (usually through
/// `with_defaults`), register or unregister handlers, and thread it to
/// wherever files are opened. Extensions are matched case-insensitively.
pub struct Registry<T> {
    readers: HashMap<String, Box<dyn Reader<T>>>,
    writers: HashMap<String, Box<dyn Writer<T>>>,
}

impl<T> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Registry {
            readers: HashMap::new(),
            writers: HashMap::new(),
        }
    }

    /// Register a reader for `extension`, replacing any previous one.
    pub fn register_reader(&mut self, extension: &str, reader: Box<dyn Reader<T>>) {
        self.readers.insert(extension.to_lowercase(), reader);
    }

    /// Register a writer for `extension`, replacing any previous one.
    pub fn register_writer(&mut self, extension: &str, writer: Box<dyn Writer<T>>) {
        self.writers.insert(extension.to_lowercase(), writer);
    }

    /// Remove and return the reader registered for `extension`.
    pub fn unregister_reader(&mut self, extension: &str) -> Option<Box<dyn Reader<T>>> {
        self.readers.remove(&extension.to_lowercase())
    }

    /// Remove and return the writer registered for `extension`.
    pub fn unregister_writer(&mut self, extension: &str) -> Option<Box<dyn Writer<T>>> {
        self.writers.remove(&extension.to_lowercase())
    }

    /// The reader registered for `extension`, if any.
    pub fn reader(&self, extension: &str) -> Option<&dyn Reader<T>> {
        self.readers.get(&extension.to_lowercase()).map(Box::as_ref)
    }

    /// The writer registered for `extension`, if any.
    pub fn writer(&self, extension: &str) -> Option<&dyn Writer<T>> {
        self.writers.get(&extension.to_lowercase()).map(Box::as_ref)
    }

    /// Read a value from `path`, dispatching on the file extension.
    pub fn read_file(&self, path: &Path) -> Result<T, ReadError> {
        let extension = extension_of(path);
        let reader = self
            .reader(&extension)
            .ok_or(ReadError::UnknownFormat(extension))?;
        let mut input = BufReader::new(File::open(path)?);
        reader.read(&mut input)
    }

    /// Write a value to `path`, dispatching on the file extension.
    pub fn write_file(&self, value: &T, path: &Path) -> io::Result<()> {
        let extension = extension_of(path);
        let writer = self.writer(&extension).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no writer registered for extension `{}`", extension),
            )
        })?;
        let mut output = BufWriter::new(File::create(path)?);
        writer.write(value, &mut output)
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Registry::new()
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// The text format of contexts.
pub struct ContextText;

impl Reader<Context<String, String>> for ContextText {
    fn read(&self, input: &mut dyn BufRead) -> Result<Context<String, String>, ReadError> {
        read_context(input)
    }
}

impl Writer<Context<String, String>> for ContextText {
    fn write(&self, value: &Context<String, String>, output: &mut dyn Write) -> io::Result<()> {
        write_context(value, output)
    }
}

/// Graphviz rendering of a context's concept lattice.
pub struct ContextDot;

impl Writer<Context<String, String>> for ContextDot {
    fn write(&self, value: &Context<String, String>, output: &mut dyn Write) -> io::Result<()> {
        let lattice = value.concept_lattice();
        write!(output, "{}", Dot::new(lattice.graph()))
    }
}

/// The text format of implicational systems.
pub struct ImplicationsText;

impl Reader<ImplicationalSystem<String>> for ImplicationsText {
    fn read(&self, input: &mut dyn BufRead) -> Result<ImplicationalSystem<String>, ReadError> {
        read_implications(input)
    }
}

impl Writer<ImplicationalSystem<String>> for ImplicationsText {
    fn write(
        &self,
        value: &ImplicationalSystem<String>,
        output: &mut dyn Write,
    ) -> io::Result<()> {
        write_implications(value, output)
    }
}

impl Registry<Context<String, String>> {
    /// A registry with the text format on `txt` and the concept-lattice
    /// dot rendering on `dot`.
    pub fn with_defaults() -> Self {
        let mut registry = Registry::new();
        registry.register_reader("txt", Box::new(ContextText));
        registry.register_writer("txt", Box::new(ContextText));
        registry.register_writer("dot", Box::new(ContextDot));
        registry
    }
}

impl Registry<ImplicationalSystem<String>> {
    /// A registry with the text format on `txt`.
    pub fn with_defaults() -> Self {
        let mut registry = Registry::new();
        registry.register_reader("txt", Box::new(ImplicationsText));
        registry.register_writer("txt", Box::new(ImplicationsText));
        registry
    }
}
