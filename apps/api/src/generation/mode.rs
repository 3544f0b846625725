use std::fmt;

use crate::llm_client::OutputFormat;

/// What kind of artifact to generate for a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Free-form Markdown test cases, returned verbatim.
    Narrative,
    /// Numbered checklist, returned as a `CaseMap`.
    Checklist,
    /// Numbered test cases, returned as a `CaseMap`.
    StructuredCases,
}

impl GenerationMode {
    pub const ALL: [GenerationMode; 3] = [
        GenerationMode::Narrative,
        GenerationMode::Checklist,
        GenerationMode::StructuredCases,
    ];

    pub fn is_structured(self) -> bool {
        !matches!(self, GenerationMode::Narrative)
    }

    pub fn output_format(self) -> OutputFormat {
        if self.is_structured() {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationMode::Narrative => "narrative",
            GenerationMode::Checklist => "checklist",
            GenerationMode::StructuredCases => "structured_cases",
        };
        f.write_str(name)
    }
}
