//! Domain types for the feature research workflow

pub mod analysis;
pub mod outputs;

pub use analysis::{FeatureAnalysis, FeatureRequest, PrdContent, ResearchResult};
pub use outputs::{
    Comment, CommentAuthor, CommentOutput, CommentsListOutput, ContentItem, IssueOutput, PageOutput, TaskOutput,
};
