//! Typed commands accepted by the board service.

use crate::board::domain::issues::IssueFields;
use crate::board::domain::{
    IssueId, ProjectDraft, ProjectId, SprintDraft, SprintId, StageDraft, StageId, StageKey,
};
use crate::organization::domain::{CompanyDraft, CompanyId, SquadDraft, SquadId};

/// A mutation of the board.
///
/// Every write to board state goes through one of these commands so that
/// the rules of the matching controller are always applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    /// Create a project with the default stage pipeline.
    CreateProject(ProjectDraft),
    /// Delete a project with its issues, sprints and stages.
    DeleteProject(ProjectId),
    /// Create or replace a squad.
    SaveSquad(SquadDraft),
    /// Delete a squad.
    DeleteSquad(SquadId),
    /// Create or replace a company or internal area.
    SaveCompany(CompanyDraft),
    /// Delete a company or internal area.
    DeleteCompany(CompanyId),
    /// Create or edit a stage.
    SaveStage(StageDraft),
    /// Delete a stage, moving its issues to the first remaining stage.
    DeleteStage(StageId),
    /// Create an issue in a project's backlog.
    CreateIssue {
        /// Owning project.
        project: ProjectId,
        /// Issue content.
        fields: IssueFields,
    },
    /// Edit an issue's content.
    UpdateIssue {
        /// Issue to edit.
        issue: IssueId,
        /// New content.
        fields: IssueFields,
    },
    /// Delete an issue, orphaning its children.
    DeleteIssue(IssueId),
    /// Move an issue to another stage on the board.
    MoveIssue {
        /// Issue to move.
        issue: IssueId,
        /// Target stage key.
        to: StageKey,
    },
    /// Create a sprint in refinement.
    CreateSprint(SprintDraft),
    /// Add backlog issues to a sprint.
    AddToSprint {
        /// Target sprint.
        sprint: SprintId,
        /// Issues to add, in order.
        issues: Vec<IssueId>,
    },
    /// Start a refining sprint.
    ActivateSprint(SprintId),
    /// Close a sprint.
    CloseSprint(SprintId),
    /// Delete a refining sprint.
    DeleteSprint(SprintId),
    /// Remove one issue from a sprint that is not active.
    RemoveFromSprint {
        /// Sprint to edit.
        sprint: SprintId,
        /// Issue to remove.
        issue: IssueId,
    },
}

impl BoardCommand {
    /// Returns the command name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateProject(_) => "create_project",
            Self::DeleteProject(_) => "delete_project",
            Self::SaveSquad(_) => "save_squad",
            Self::DeleteSquad(_) => "delete_squad",
            Self::SaveCompany(_) => "save_company",
            Self::DeleteCompany(_) => "delete_company",
            Self::SaveStage(_) => "save_stage",
            Self::DeleteStage(_) => "delete_stage",
            Self::CreateIssue { .. } => "create_issue",
            Self::UpdateIssue { .. } => "update_issue",
            Self::DeleteIssue(_) => "delete_issue",
            Self::MoveIssue { .. } => "move_issue",
            Self::CreateSprint(_) => "create_sprint",
            Self::AddToSprint { .. } => "add_to_sprint",
            Self::ActivateSprint(_) => "activate_sprint",
            Self::CloseSprint(_) => "close_sprint",
            Self::DeleteSprint(_) => "delete_sprint",
            Self::RemoveFromSprint { .. } => "remove_from_sprint",
        }
    }
}
