//! Plan builders for every workflow effect
//!
//! Builders are pure and deterministic: the same feature request text
//! always produces the same plan. Each plan names exactly the tool ids its
//! effect requires and declares the structured schema expected back.
//! Building never fails; executing can.

use planexec::Plan;

use crate::domain::{Comment, FeatureAnalysis, FeatureRequest, PrdContent};

/// Tool id of the web search tool
pub const SEARCH_TOOL: &str = "search_tool";

/// Tool id of the LLM analysis tool
pub const LLM_TOOL: &str = "llm_tool";

/// Tool id for creating a document-store page
pub const NOTION_CREATE_PAGE: &str = "notion:create_page";

/// Tool ids for the issue tracker
pub const LINEAR_CREATE_ISSUE: &str = "linear:create_issue";
pub const LINEAR_CREATE_COMMENT: &str = "linear:create_comment";
pub const LINEAR_LIST_COMMENTS: &str = "linear:list_comments";
pub const LINEAR_UPDATE_ISSUE: &str = "linear:update_issue";

/// Research plan: search the web, then analyze the results
pub fn research_plan(request: &FeatureRequest) -> Plan {
    Plan::builder(
        format!("Research the feature '{}' comprehensively", request.name),
        "FeatureAnalysis",
    )
    .step(
        format!("Search for information about {} and similar features", request.name),
        SEARCH_TOOL,
    )
    .step(
        format!(
            "Analyze the search results and create a comprehensive analysis of {}. Feature description: {}",
            request.name, request.description
        ),
        LLM_TOOL,
    )
    .build()
}

/// PRD page creation plan, carrying the synthesized PRD content
pub fn prd_plan(analysis: &FeatureAnalysis) -> Plan {
    let prd = PrdContent::from_analysis(analysis);
    let prd_json = serde_json::to_string_pretty(&prd).unwrap_or_default();

    Plan::builder(
        format!("Create a PRD page for {}", analysis.feature_name),
        "PageOutput",
    )
    .step(
        format!(
            "Create a new page in the document store with the PRD content for {}:\n{}",
            analysis.feature_name, prd_json
        ),
        NOTION_CREATE_PAGE,
    )
    .build()
}

/// Tracker issue creation plan
pub fn issue_plan(analysis: &FeatureAnalysis) -> Plan {
    Plan::builder(
        format!("Create a tracker issue for implementing {}", analysis.feature_name),
        "IssueOutput",
    )
    .step(
        format!(
            "Create a new issue in the tracker for {} with detailed description and requirements. \
             Recommendations: {}",
            analysis.feature_name, analysis.recommendations
        ),
        LINEAR_CREATE_ISSUE,
    )
    .build()
}

/// Implementation task kinds created per feature issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Backend,
    Frontend,
    Testing,
    Documentation,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [Self::Backend, Self::Frontend, Self::Testing, Self::Documentation];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Frontend => "frontend",
            Self::Testing => "testing",
            Self::Documentation => "documentation",
        }
    }

    /// Task title for a feature
    pub fn title(&self, analysis: &FeatureAnalysis) -> String {
        match self {
            Self::Backend => format!("Backend Implementation: {}", analysis.feature_name),
            Self::Frontend => format!("Frontend Implementation: {}", analysis.feature_name),
            Self::Testing => format!("Testing: {}", analysis.feature_name),
            Self::Documentation => format!("Documentation: {}", analysis.feature_name),
        }
    }

    /// Task description, drawing on the analysis
    pub fn description(&self, analysis: &FeatureAnalysis) -> String {
        match self {
            Self::Backend => format!(
                "Implement the backend services and APIs for {}. \
                 Focus on data models, business logic, and API endpoints. \
                 Technical considerations: {}",
                analysis.feature_name,
                join_first(&analysis.technical_considerations, 3)
            ),
            Self::Frontend => format!(
                "Create the user interface for {}. \
                 Focus on user experience, responsive design, and accessibility. \
                 Implementation approaches: {}",
                analysis.feature_name,
                join_first(&analysis.implementation_approaches, 3)
            ),
            Self::Testing => format!(
                "Comprehensive testing for {}. \
                 Unit tests, integration tests, and user acceptance testing. \
                 Success metrics to validate: {}",
                analysis.feature_name,
                join_first(&analysis.success_metrics, 3)
            ),
            Self::Documentation => {
                let insights: Vec<String> = analysis
                    .research_sources
                    .iter()
                    .take(2)
                    .filter_map(|s| s.key_insights.first().cloned())
                    .collect();
                format!(
                    "Documentation for {}. \
                     API documentation, user guides, and technical specifications. \
                     Key insights: {}",
                    analysis.feature_name,
                    insights.join(", ")
                )
            }
        }
    }
}

fn join_first(items: &[String], n: usize) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

/// Per-kind implementation task creation plan
pub fn task_plan(kind: TaskKind, analysis: &FeatureAnalysis) -> Plan {
    Plan::builder(
        format!("Create {} task for {}", kind.name(), analysis.feature_name),
        "TaskOutput",
    )
    .step(
        format!(
            "Create a new {} task in the tracker. Title: {}. Description: {}. \
             This should be a standalone task (not linked to a parent issue). \
             Use the default team or ask for team selection if needed.",
            kind.name(),
            kind.title(analysis),
            kind.description(analysis)
        ),
        LINEAR_CREATE_ISSUE,
    )
    .build()
}

/// List all comments on an issue
pub fn list_comments_plan(issue_id: &str) -> Plan {
    Plan::builder(format!("List comments for issue {}", issue_id), "CommentsListOutput")
        .step(
            format!("Get all comments for the tracker issue with ID {}", issue_id),
            LINEAR_LIST_COMMENTS,
        )
        .build()
}

/// Post a new comment on an issue
pub fn create_comment_plan(issue_id: &str, title: Option<&str>, body: &str) -> Plan {
    Plan::builder(format!("Create a new comment on issue {}", issue_id), "CommentOutput")
        .step(
            format!(
                "Create a new comment on tracker issue {}. Title: {}. Content: {}",
                issue_id,
                title.filter(|t| !t.is_empty()).unwrap_or("No title"),
                body
            ),
            LINEAR_CREATE_COMMENT,
        )
        .build()
}

/// Refine an issue from a valid comment
pub fn update_issue_plan(issue_id: &str, comment: &Comment) -> Plan {
    Plan::builder(
        format!("Update issue {} based on comment feedback", issue_id),
        "CommentOutput",
    )
    .step(
        format!(
            "Update the tracker issue {} to incorporate the feedback from the comment: {}. \
             Refine the issue description, requirements, or acceptance criteria based on this valid feedback.",
            issue_id, comment.body
        ),
        LINEAR_UPDATE_ISSUE,
    )
    .build()
}

/// Reply to an invalid comment explaining why it is not a blocker
pub fn feedback_comment_plan(issue_id: &str, comment: &Comment, feedback: &str) -> Plan {
    Plan::builder(
        format!("Create feedback comment on issue {}", issue_id),
        "CommentOutput",
    )
    .step(
        format!(
            "Create a new comment on tracker issue {} explaining why the comment from {} \
             is not a valid blocker. The feedback is: {}. \
             This should be constructive and help guide future discussions.",
            issue_id, comment.author.name, feedback
        ),
        LINEAR_CREATE_COMMENT,
    )
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> FeatureAnalysis {
        FeatureAnalysis {
            feature_name: "dark mode".to_string(),
            description: "Theme switching".to_string(),
            technical_considerations: vec![
                "CSS variables".to_string(),
                "system preference".to_string(),
                "persistence".to_string(),
                "contrast audit".to_string(),
            ],
            implementation_approaches: vec!["toggle".to_string(), "auto".to_string()],
            success_metrics: vec!["adoption".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_research_plan_shape() {
        let request = FeatureRequest {
            name: "dark mode".to_string(),
            description: "Theme switching".to_string(),
        };
        let plan = research_plan(&request);

        assert_eq!(plan.output_schema, "FeatureAnalysis");
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].tool_id, SEARCH_TOOL);
        assert_eq!(plan.steps[1].tool_id, LLM_TOOL);
        assert!(plan.steps[0].instruction.contains("dark mode"));
    }

    #[test]
    fn test_research_plan_is_deterministic() {
        let request = FeatureRequest {
            name: "search".to_string(),
            description: "Full-text search".to_string(),
        };
        assert_eq!(research_plan(&request), research_plan(&request));
    }

    #[test]
    fn test_task_descriptions_cap_list_items() {
        let analysis = sample_analysis();
        let desc = TaskKind::Backend.description(&analysis);
        assert!(desc.contains("CSS variables, system preference, persistence"));
        assert!(!desc.contains("contrast audit"));
    }

    #[test]
    fn test_prd_plan_embeds_content() {
        let plan = prd_plan(&sample_analysis());
        assert_eq!(plan.output_schema, "PageOutput");
        assert!(plan.steps[0].instruction.contains("PRD: dark mode"));
    }

    #[test]
    fn test_comment_plan_without_title() {
        let plan = create_comment_plan("LIN-1", None, "please clarify scope");
        assert!(plan.steps[0].instruction.contains("Title: No title"));
        assert!(plan.steps[0].instruction.contains("please clarify scope"));
    }
}
