//! Feature request, research analysis, and PRD content types
//!
//! These are the structured schemas the research and document plans declare
//! as their output. The executor fills them in; this crate only reads them.

use serde::{Deserialize, Serialize};

/// A feature to research, as submitted by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRequest {
    /// Name of the feature
    pub name: String,

    /// Detailed description of the feature
    pub description: String,
}

/// A single research source found during web search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchResult {
    /// Title of the article/blog/news
    pub title: String,

    /// URL of the source
    pub url: String,

    /// Summary of the content
    pub summary: String,

    /// Relevance score from 1-10
    pub relevance_score: u8,

    /// Key insights from this source
    pub key_insights: Vec<String>,
}

/// Comprehensive analysis of a researched feature
///
/// Declared as the output schema of the research plan. All fields default
/// so that a partial payload from the executor still decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureAnalysis {
    /// Name of the feature
    pub feature_name: String,

    /// Description of the feature
    pub description: String,

    /// Research sources found
    pub research_sources: Vec<ResearchResult>,

    /// Market analysis and trends
    pub market_analysis: String,

    /// Technical considerations
    pub technical_considerations: Vec<String>,

    /// Possible implementation approaches
    pub implementation_approaches: Vec<String>,

    /// Risks and challenges
    pub risks_and_challenges: Vec<String>,

    /// Success metrics to track
    pub success_metrics: Vec<String>,

    /// Overall recommendations
    pub recommendations: String,
}

/// PRD document content, synthesized from an analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrdContent {
    pub title: String,
    pub executive_summary: String,
    pub problem_statement: String,
    pub solution_overview: String,
    pub user_stories: Vec<String>,
    pub acceptance_criteria: Vec<String>,
    pub technical_requirements: Vec<String>,
    pub design_considerations: Vec<String>,
    pub timeline: String,
    pub dependencies: Vec<String>,
}

impl PrdContent {
    /// Build PRD content from a completed analysis
    pub fn from_analysis(analysis: &FeatureAnalysis) -> Self {
        Self {
            title: format!("PRD: {}", analysis.feature_name),
            executive_summary: format!(
                "Implementation of {} based on comprehensive market research and technical analysis.",
                analysis.feature_name
            ),
            problem_statement: analysis.description.clone(),
            solution_overview: "Detailed solution based on research findings".to_string(),
            user_stories: vec!["As a user, I want...".to_string()],
            acceptance_criteria: vec![
                "Feature works as expected".to_string(),
                "Performance meets requirements".to_string(),
            ],
            technical_requirements: analysis.technical_considerations.clone(),
            design_considerations: vec![
                "User experience".to_string(),
                "Accessibility".to_string(),
                "Performance".to_string(),
            ],
            timeline: "TBD based on complexity".to_string(),
            dependencies: vec!["Technical infrastructure".to_string(), "Design resources".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_round_trip() {
        let analysis = FeatureAnalysis {
            feature_name: "dark mode".to_string(),
            description: "Theme switching".to_string(),
            technical_considerations: vec!["CSS variables".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_string(&analysis).unwrap();
        let back: FeatureAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(analysis, back);
    }

    #[test]
    fn test_partial_analysis_decodes() {
        let back: FeatureAnalysis = serde_json::from_str(r#"{"feature_name": "search"}"#).unwrap();
        assert_eq!(back.feature_name, "search");
        assert!(back.research_sources.is_empty());
    }

    #[test]
    fn test_prd_from_analysis() {
        let analysis = FeatureAnalysis {
            feature_name: "offline sync".to_string(),
            description: "Work without a network".to_string(),
            technical_considerations: vec!["conflict resolution".to_string()],
            ..Default::default()
        };

        let prd = PrdContent::from_analysis(&analysis);
        assert_eq!(prd.title, "PRD: offline sync");
        assert_eq!(prd.problem_statement, "Work without a network");
        assert_eq!(prd.technical_requirements, analysis.technical_considerations);
    }
}
