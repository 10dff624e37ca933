//! Typed views of the project manifest (`.yyp`) and resource descriptor
//! (`.yy`) JSON documents. Only the fields the pipeline needs are modelled;
//! everything else in the documents is ignored.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level project manifest. The `resources` array is the project's
/// table of contents; each entry points at a resource descriptor file.
#[derive(Debug, Deserialize)]
pub struct ProjectManifest {
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceEntry {
    pub id: ResourceId,
}

#[derive(Debug, Deserialize)]
pub struct ResourceId {
    /// Path to the resource descriptor, relative to the manifest.
    pub path: PathBuf,
    #[serde(default)]
    pub name: String,
}

/// A resource descriptor. `resource_type` discriminates; `event_list` is
/// populated for objects only.
#[derive(Debug, Deserialize)]
pub struct ResourceDoc {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "eventList", default)]
    pub event_list: Vec<EventDoc>,
}

/// One entry of an object's `eventList`.
#[derive(Debug, Deserialize)]
pub struct EventDoc {
    #[serde(rename = "eventType")]
    pub event_type: u32,
    #[serde(rename = "eventNum")]
    pub event_num: u32,
}
