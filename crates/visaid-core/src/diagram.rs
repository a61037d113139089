//! Diagram requests and markup.
//!
//! A [`DiagramRequest`] pairs a free-text description with one of the fixed
//! [`DiagramType`] tags. The text produced for it is carried around as
//! [`DiagramMarkup`], which is never parsed by this crate: the charting
//! script running in the browser is the only consumer that understands it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string is not one of the known diagram tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diagram type `{tag}` (expected one of: {expected})")]
pub struct UnknownDiagramType {
    tag: String,
    expected: String,
}

impl UnknownDiagramType {
    fn new(tag: &str) -> Self {
        let expected = DiagramType::ALL
            .iter()
            .map(|kind| kind.tag())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            tag: tag.to_string(),
            expected,
        }
    }

    /// Returns the rejected tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// The fixed set of diagram kinds a request can ask for.
///
/// Each variant is identified externally by a kebab-case tag such as
/// `flowchart-diagram` and maps to the header keyword Mermaid expects on
/// the first line of the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiagramType {
    #[default]
    #[serde(rename = "flowchart-diagram")]
    Flowchart,
    #[serde(rename = "sequence-diagram")]
    Sequence,
    #[serde(rename = "class-diagram")]
    Class,
    #[serde(rename = "state-diagram")]
    State,
    #[serde(rename = "entity-relationship-diagram")]
    EntityRelationship,
    #[serde(rename = "gantt-diagram")]
    Gantt,
    #[serde(rename = "pie-chart")]
    Pie,
    #[serde(rename = "quadrant-chart")]
    Quadrant,
    #[serde(rename = "requirement-diagram", alias = "reqirement-diagram")]
    Requirement,
    #[serde(rename = "timeline-diagram")]
    Timeline,
    #[serde(rename = "git-diagram")]
    Git,
    #[serde(rename = "mind-map-diagram")]
    MindMap,
}

impl DiagramType {
    /// Every supported diagram type, in presentation order.
    pub const ALL: [DiagramType; 12] = [
        DiagramType::Flowchart,
        DiagramType::Sequence,
        DiagramType::Class,
        DiagramType::State,
        DiagramType::EntityRelationship,
        DiagramType::Gantt,
        DiagramType::Pie,
        DiagramType::Quadrant,
        DiagramType::Requirement,
        DiagramType::Timeline,
        DiagramType::Git,
        DiagramType::MindMap,
    ];

    /// Returns the external tag for this diagram type.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart-diagram",
            Self::Sequence => "sequence-diagram",
            Self::Class => "class-diagram",
            Self::State => "state-diagram",
            Self::EntityRelationship => "entity-relationship-diagram",
            Self::Gantt => "gantt-diagram",
            Self::Pie => "pie-chart",
            Self::Quadrant => "quadrant-chart",
            Self::Requirement => "requirement-diagram",
            Self::Timeline => "timeline-diagram",
            Self::Git => "git-diagram",
            Self::MindMap => "mind-map-diagram",
        }
    }

    /// Returns the Mermaid header keyword that opens markup of this type.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart",
            Self::Sequence => "sequenceDiagram",
            Self::Class => "classDiagram",
            Self::State => "stateDiagram-v2",
            Self::EntityRelationship => "erDiagram",
            Self::Gantt => "gantt",
            Self::Pie => "pie",
            Self::Quadrant => "quadrantChart",
            Self::Requirement => "requirementDiagram",
            Self::Timeline => "timeline",
            Self::Git => "gitGraph",
            Self::MindMap => "mindmap",
        }
    }

    /// Returns a short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Flowchart => "Process steps and decisions connected by arrows",
            Self::Sequence => "Messages exchanged between participants over time",
            Self::Class => "Classes with attributes, methods and relationships",
            Self::State => "States of a system and the transitions between them",
            Self::EntityRelationship => "Entities, their attributes and cardinalities",
            Self::Gantt => "Tasks scheduled along a timeline",
            Self::Pie => "Proportions of a whole",
            Self::Quadrant => "Items plotted on two axes split into four quadrants",
            Self::Requirement => "Requirements and the elements that satisfy them",
            Self::Timeline => "Events grouped by period",
            Self::Git => "Commits, branches and merges",
            Self::MindMap => "Ideas branching out from a central topic",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DiagramType {
    type Err = UnknownDiagramType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        if tag == "reqirement-diagram" {
            return Ok(Self::Requirement);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or_else(|| UnknownDiagramType::new(tag))
    }
}

/// A single request to produce a diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramRequest {
    prompt: String,
    diagram_type: DiagramType,
}

impl DiagramRequest {
    /// Creates a new request.
    ///
    /// # Arguments
    ///
    /// * `prompt` - Free-text description of the wanted diagram.
    /// * `diagram_type` - Which kind of diagram to produce.
    pub fn new(prompt: impl Into<String>, diagram_type: DiagramType) -> Self {
        Self {
            prompt: prompt.into(),
            diagram_type,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }
}

/// Opaque diagram markup text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagramMarkup(String);

impl DiagramMarkup {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the markup text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the markup has no content other than whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Returns the markup wrapped in a fenced Markdown code block.
    ///
    /// ```
    /// use visaid_core::diagram::DiagramMarkup;
    ///
    /// let markup = DiagramMarkup::new("pie\n  \"a\" : 1");
    /// assert_eq!(markup.to_markdown(), "```mermaid\npie\n  \"a\" : 1\n```");
    /// ```
    pub fn to_markdown(&self) -> String {
        format!("```mermaid\n{}\n```", self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DiagramMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DiagramMarkup {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for DiagramMarkup {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}
