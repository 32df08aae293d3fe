//! Pipeline stages and what each one may see and do

use crate::tools::ToolProfile;

/// One step of a documentation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    AnalyzeStructure,
    ReviewComponents,
    WriteDocumentation,
    FormatDocumentation,
}

impl Stage {
    /// Stages of a run, in execution order
    pub fn sequence(format: bool) -> Vec<Stage> {
        let mut stages = vec![
            Stage::AnalyzeStructure,
            Stage::ReviewComponents,
            Stage::WriteDocumentation,
        ];
        if format {
            stages.push(Stage::FormatDocumentation);
        }
        stages
    }

    /// Agent role performing the stage
    pub fn role(&self) -> &'static str {
        match self {
            Stage::AnalyzeStructure => "Repository Analyzer",
            Stage::ReviewComponents => "Code Reviewer",
            Stage::WriteDocumentation => "Documentation Writer",
            Stage::FormatDocumentation => "Markdown Formatter",
        }
    }

    /// Heading used when this stage's output feeds a later stage
    pub fn title(&self) -> &'static str {
        match self {
            Stage::AnalyzeStructure => "Repository Analysis",
            Stage::ReviewComponents => "Code Review",
            Stage::WriteDocumentation => "Documentation",
            Stage::FormatDocumentation => "Formatted Documentation",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            Stage::AnalyzeStructure => "analyze",
            Stage::ReviewComponents => "review",
            Stage::WriteDocumentation => "write",
            Stage::FormatDocumentation => "format",
        }
    }

    pub fn tool_profile(&self) -> ToolProfile {
        match self {
            Stage::AnalyzeStructure => ToolProfile::Repository,
            Stage::ReviewComponents => ToolProfile::FilesOnly,
            Stage::WriteDocumentation | Stage::FormatDocumentation => ToolProfile::None,
        }
    }

    /// Earlier stages whose output this stage receives
    pub fn context(&self) -> &'static [Stage] {
        match self {
            Stage::AnalyzeStructure => &[],
            Stage::ReviewComponents => &[Stage::AnalyzeStructure],
            Stage::WriteDocumentation => &[Stage::AnalyzeStructure, Stage::ReviewComponents],
            Stage::FormatDocumentation => &[Stage::WriteDocumentation],
        }
    }

    /// Suffix for the output file this stage writes, if it writes one
    pub fn output_suffix(&self) -> Option<&'static str> {
        match self {
            Stage::WriteDocumentation => Some(""),
            Stage::FormatDocumentation => Some("_formatted"),
            Stage::AnalyzeStructure | Stage::ReviewComponents => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.role())
    }
}
