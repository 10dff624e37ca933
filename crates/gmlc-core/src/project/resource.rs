//! Resource classification and per-source parse state.
//!
//! A `GMScript` descriptor owns one source file (descriptor path with the
//! extension swapped to `.gml`). A `GMObject` owns one source per event,
//! named `<EventKind>_<num>.gml` in the object's directory. Known non-code
//! resource types pass through untouched; anything else is an error on the
//! owning resource.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ast::Node;
use crate::error::Error;
use crate::lexer;
use crate::macros::{clean_tokens, extract_macros, insert_macros, MacroTable};
use crate::parser::parse_script;
use crate::token::Token;

/// Event slots an object can attach code to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Create,
    Destroy,
    Alarm,
    Step,
    Collision,
    Keyboard,
    Mouse,
    Other,
    Draw,
    KeyPress,
    KeyRelease,
    CleanUp,
    Gesture,
}

impl EventKind {
    /// Map the descriptor's numeric `eventType` to a kind.
    pub fn from_index(index: u32) -> Option<Self> {
        Some(match index {
            0 => EventKind::Create,
            1 => EventKind::Destroy,
            2 => EventKind::Alarm,
            3 => EventKind::Step,
            4 => EventKind::Collision,
            5 => EventKind::Keyboard,
            6 => EventKind::Mouse,
            7 => EventKind::Other,
            8 => EventKind::Draw,
            9 => EventKind::KeyPress,
            10 => EventKind::KeyRelease,
            11 => EventKind::CleanUp,
            12 => EventKind::Gesture,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Create => "Create",
            EventKind::Destroy => "Destroy",
            EventKind::Alarm => "Alarm",
            EventKind::Step => "Step",
            EventKind::Collision => "Collision",
            EventKind::Keyboard => "Keyboard",
            EventKind::Mouse => "Mouse",
            EventKind::Other => "Other",
            EventKind::Draw => "Draw",
            EventKind::KeyPress => "KeyPress",
            EventKind::KeyRelease => "KeyRelease",
            EventKind::CleanUp => "CleanUp",
            EventKind::Gesture => "Gesture",
        }
    }

    /// Source file for this event, e.g. `Step_0.gml` in the object's
    /// directory.
    pub fn script_path(self, dir: &Path, num: u32) -> PathBuf {
        dir.join(format!("{}_{}.gml", self.as_str(), num))
    }
}

/// Non-code resource types the loader recognises and skips.
const PASSTHROUGH_TYPES: &[&str] = &[
    "GMShader", "GMRoom", "GMSprite", "GMFont", "GMSound", "GMTileSet",
];

pub fn is_passthrough_type(resource_type: &str) -> bool {
    PASSTHROUGH_TYPES.contains(&resource_type)
}

/// One source file moving through the pipeline: raw text, then tokens,
/// then an AST, with any errors that stopped it along the way.
#[derive(Debug)]
pub struct SourceUnit {
    /// The path errors are reported under (the `.gml` path, or the unit
    /// name for in-memory sources).
    pub logical_path: PathBuf,
    pub text: String,
    pub tokens: Vec<Token>,
    pub ast: Option<Node>,
    pub errors: Vec<Error>,
}

impl SourceUnit {
    pub fn new(logical_path: PathBuf, text: String) -> Self {
        Self {
            logical_path,
            text,
            tokens: Vec::new(),
            ast: None,
            errors: Vec::new(),
        }
    }

    /// Read the `.gml` source that belongs to a descriptor path.
    pub fn load(descriptor: &Path) -> Result<Self, Error> {
        let gml_path = descriptor.with_extension("gml");
        let text = fs::read_to_string(&gml_path).map_err(|source| Error::Read {
            path: gml_path.clone(),
            source,
        })?;
        Ok(Self::new(gml_path, text))
    }

    /// Phase 1: scan the text and harvest its macro definitions. A scan
    /// failure is recorded on the unit and yields no table.
    pub fn tokenize_and_extract(&mut self) -> Option<MacroTable> {
        match lexer::scan(&self.text) {
            Ok(tokens) => {
                self.tokens = tokens;
                Some(extract_macros(&self.tokens))
            }
            Err(e) => {
                self.tokens.clear();
                self.errors.push(e);
                None
            }
        }
    }

    /// Phase 2: substitute project macros and strip markers.
    pub fn inject_macros(&mut self, table: &MacroTable) {
        if self.tokens.is_empty() {
            return;
        }
        let tokens = std::mem::take(&mut self.tokens);
        self.tokens = clean_tokens(insert_macros(tokens, table), table);
    }

    /// Phase 3: parse the cleaned tokens into an AST.
    pub fn parse_ast(&mut self) {
        if self.tokens.is_empty() && !self.errors.is_empty() {
            return;
        }
        match parse_script(&self.tokens) {
            Ok(ast) => self.ast = Some(ast),
            Err(e) => self.errors.push(e),
        }
    }
}

/// One event script of an object resource.
#[derive(Debug)]
pub struct EventUnit {
    pub kind: EventKind,
    pub num: u32,
    pub unit: SourceUnit,
}

/// A classified project resource.
#[derive(Debug)]
pub enum Resource {
    Script {
        descriptor: PathBuf,
        unit: SourceUnit,
    },
    Object {
        descriptor: PathBuf,
        name: String,
        events: Vec<EventUnit>,
        /// Event-load failures that did not stop the remaining events.
        errors: Vec<Error>,
    },
    /// A known non-code resource, carried for bookkeeping only.
    Passthrough { descriptor: PathBuf },
}

impl Resource {
    pub fn descriptor(&self) -> &Path {
        match self {
            Resource::Script { descriptor, .. }
            | Resource::Object { descriptor, .. }
            | Resource::Passthrough { descriptor } => descriptor,
        }
    }

    /// The source units this resource contributes to the pipeline.
    pub fn units_mut(&mut self) -> Vec<&mut SourceUnit> {
        match self {
            Resource::Script { unit, .. } => vec![unit],
            Resource::Object { events, .. } => events.iter_mut().map(|e| &mut e.unit).collect(),
            Resource::Passthrough { .. } => Vec::new(),
        }
    }

    pub fn units(&self) -> Vec<&SourceUnit> {
        match self {
            Resource::Script { unit, .. } => vec![unit],
            Resource::Object { events, .. } => events.iter().map(|e| &e.unit).collect(),
            Resource::Passthrough { .. } => Vec::new(),
        }
    }
}
