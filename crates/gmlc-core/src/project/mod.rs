//! Project model and the three-phase parse pipeline.
//!
//! Macros are global to the project, so parsing is staged: every unit is
//! tokenized and its definitions harvested before any substitution happens,
//! and every unit is substituted before any parsing happens. Resources are
//! visited in sorted descriptor-path order, which makes the "later
//! definition wins" collision rule deterministic instead of depending on
//! filesystem enumeration order.

pub mod manifest;
pub mod resource;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::macros::{merge_macros, MacroTable};

use manifest::{ProjectManifest, ResourceDoc};
use resource::{EventKind, EventUnit, Resource, SourceUnit};

/// How the project was constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// Loaded from a `.yyp` manifest.
    Manifest,
    /// A single `.gml` file from disk.
    SingleFile,
    /// In-memory source (stdin, tests).
    Source,
}

pub struct Project {
    pub kind: ProjectKind,
    pub root: PathBuf,
    pub resources: Vec<Resource>,
    /// Merged project-wide macro table; filled by `parse`.
    pub macros: MacroTable,
    /// Resource-load failures, tagged with the logical path they belong to.
    pub errors: Vec<(String, Error)>,
}

impl Project {
    /// Load a project from its `.yyp` manifest. A resource that fails to
    /// load is recorded and skipped; its siblings still load.
    pub fn load(manifest_path: &Path) -> Result<Self, Error> {
        let root = manifest_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let text = fs::read_to_string(manifest_path).map_err(|source| Error::Read {
            path: manifest_path.to_path_buf(),
            source,
        })?;
        let manifest: ProjectManifest = serde_json::from_str(&text)?;

        let mut resources = Vec::new();
        let mut errors = Vec::new();

        for entry in &manifest.resources {
            let descriptor = root.join(&entry.id.path);
            let logical = entry.id.path.display().to_string();
            match load_resource(&descriptor) {
                Ok(res) => resources.push(res),
                Err(e) => errors.push((logical, e)),
            }
        }

        // Stable macro-merge order regardless of manifest ordering.
        resources.sort_by(|a, b| a.descriptor().cmp(b.descriptor()));

        Ok(Self {
            kind: ProjectKind::Manifest,
            root,
            resources,
            macros: MacroTable::new(),
            errors,
        })
    }

    /// A project holding one on-disk script.
    pub fn single_file(path: &Path) -> Self {
        let mut resources = Vec::new();
        let mut errors = Vec::new();

        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        });
        match text {
            Ok(text) => resources.push(Resource::Script {
                descriptor: path.to_path_buf(),
                unit: SourceUnit::new(path.to_path_buf(), text),
            }),
            Err(e) => errors.push((path.display().to_string(), e)),
        }

        Self {
            kind: ProjectKind::SingleFile,
            root: path.to_path_buf(),
            resources,
            macros: MacroTable::new(),
            errors,
        }
    }

    /// A project holding one in-memory source.
    pub fn from_source(name: &str, text: &str) -> Self {
        Self {
            kind: ProjectKind::Source,
            root: PathBuf::from(name),
            resources: vec![Resource::Script {
                descriptor: PathBuf::from(name),
                unit: SourceUnit::new(PathBuf::from(name), text.to_string()),
            }],
            macros: MacroTable::new(),
            errors: Vec::new(),
        }
    }

    /// Run the pipeline: tokenize + extract everywhere, merge, substitute
    /// everywhere, then parse everywhere.
    pub fn parse(&mut self) {
        let mut tables = Vec::new();
        for res in &mut self.resources {
            for unit in res.units_mut() {
                if let Some(table) = unit.tokenize_and_extract() {
                    tables.push(table);
                }
            }
        }
        self.macros = merge_macros(tables);

        for res in &mut self.resources {
            for unit in res.units_mut() {
                unit.inject_macros(&self.macros);
            }
        }

        for res in &mut self.resources {
            for unit in res.units_mut() {
                unit.parse_ast();
            }
        }
    }

    /// All errors across the project: load failures first, then per-unit
    /// scanner/parser errors, each tagged with its logical path.
    pub fn all_errors(&self) -> Vec<(String, &Error)> {
        let mut out: Vec<(String, &Error)> = self
            .errors
            .iter()
            .map(|(path, e)| (path.clone(), e))
            .collect();

        for res in &self.resources {
            if let Resource::Object { descriptor, errors, .. } = res {
                for e in errors {
                    out.push((descriptor.display().to_string(), e));
                }
            }
            for unit in res.units() {
                for e in &unit.errors {
                    out.push((unit.logical_path.display().to_string(), e));
                }
            }
        }
        out
    }

    pub fn error_count(&self) -> usize {
        self.all_errors().len()
    }

    /// Parsed units, in resource order: `(logical path, ast)`.
    pub fn parsed_units(&self) -> Vec<(String, &crate::ast::Node)> {
        let mut out = Vec::new();
        for res in &self.resources {
            for unit in res.units() {
                if let Some(ast) = &unit.ast {
                    out.push((unit.logical_path.display().to_string(), ast));
                }
            }
        }
        out
    }
}

/// Read a descriptor and classify the resource it describes.
fn load_resource(descriptor: &Path) -> Result<Resource, Error> {
    let text = fs::read_to_string(descriptor).map_err(|source| Error::Read {
        path: descriptor.to_path_buf(),
        source,
    })?;
    let doc: ResourceDoc = serde_json::from_str(&text)?;

    match doc.resource_type.as_str() {
        "GMScript" => Ok(Resource::Script {
            descriptor: descriptor.to_path_buf(),
            unit: SourceUnit::load(descriptor)?,
        }),
        "GMObject" => Ok(load_object(descriptor, &doc)),
        t if resource::is_passthrough_type(t) => Ok(Resource::Passthrough {
            descriptor: descriptor.to_path_buf(),
        }),
        other => Err(Error::UnknownResourceType {
            path: descriptor.to_path_buf(),
            kind: other.to_string(),
        }),
    }
}

/// Load an object's event scripts. A missing or unknown event is recorded
/// on the object; the remaining events still load.
fn load_object(descriptor: &Path, doc: &ResourceDoc) -> Resource {
    let dir = descriptor.parent().unwrap_or(Path::new(".")).to_path_buf();
    let mut events = Vec::new();
    let mut errors = Vec::new();

    for ev in &doc.event_list {
        let Some(kind) = EventKind::from_index(ev.event_type) else {
            errors.push(Error::UnknownResourceType {
                path: descriptor.to_path_buf(),
                kind: format!("event type {}", ev.event_type),
            });
            continue;
        };
        let gml_path = kind.script_path(&dir, ev.event_num);
        match fs::read_to_string(&gml_path) {
            Ok(text) => events.push(EventUnit {
                kind,
                num: ev.event_num,
                unit: SourceUnit::new(gml_path, text),
            }),
            Err(source) => errors.push(Error::Read {
                path: gml_path,
                source,
            }),
        }
    }

    Resource::Object {
        descriptor: descriptor.to_path_buf(),
        name: doc.name.clone(),
        events,
        errors,
    }
}
