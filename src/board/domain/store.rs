//! Entity store owning every board record.
//!
//! The store is the single owner of projects, issues, stages, sprints,
//! squads and companies. Readers borrow records freely; writes are
//! restricted to the crate so that every mutation goes through a controller
//! that enforces the board rules. Each write is journaled as a [`Change`],
//! which the board service drains after a command to build its state diff.

use super::{Issue, IssueId, Project, ProjectId, Sprint, SprintId, Stage, StageId, StagePipeline};
use crate::organization::domain::{Company, CompanyId, Squad, SquadId};
use crate::shared::{BoardRecord, Collection, Id};

/// Reference to one record held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordRef {
    /// A project.
    Project(ProjectId),
    /// An issue.
    Issue(IssueId),
    /// A stage.
    Stage(StageId),
    /// A sprint.
    Sprint(SprintId),
    /// A squad.
    Squad(SquadId),
    /// A company or internal area.
    Company(CompanyId),
}

impl RecordRef {
    /// Returns the collection the record belongs to.
    #[must_use]
    pub const fn collection(self) -> Collection {
        match self {
            Self::Project(_) => Collection::Projects,
            Self::Issue(_) => Collection::Issues,
            Self::Stage(_) => Collection::Stages,
            Self::Sprint(_) => Collection::Sprints,
            Self::Squad(_) => Collection::Squads,
            Self::Company(_) => Collection::Companies,
        }
    }
}

/// A write applied to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    /// The record was inserted or modified.
    Upserted(RecordRef),
    /// The record was removed.
    Removed(RecordRef),
}

impl Change {
    /// Returns the record the change applies to.
    #[must_use]
    pub const fn record(self) -> RecordRef {
        match self {
            Self::Upserted(record) | Self::Removed(record) => record,
        }
    }
}

mod sealed {
    use super::EntityStore;
    use crate::shared::Id;

    /// Access to the collection a record kind lives in.
    pub trait Slot: Sized {
        fn slot(store: &EntityStore) -> &[Self];
        fn slot_mut(store: &mut EntityStore) -> &mut Vec<Self>;
        fn rewrite_references(store: &mut EntityStore, from: Id<Self>, to: Id<Self>);
    }
}

/// Record kinds held by the [`EntityStore`].
pub trait StoredRecord: BoardRecord + sealed::Slot {
    /// Wraps an identifier of this kind into a [`RecordRef`].
    fn record_ref(id: Id<Self>) -> RecordRef;

    /// Extracts an identifier of this kind from a [`RecordRef`].
    fn from_record_ref(record: RecordRef) -> Option<Id<Self>>;
}

/// In-memory owner of all board records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityStore {
    projects: Vec<Project>,
    issues: Vec<Issue>,
    stages: Vec<Stage>,
    sprints: Vec<Sprint>,
    squads: Vec<Squad>,
    companies: Vec<Company>,
    journal: Vec<Change>,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a whole collection with loaded records, without journaling.
    pub fn replace_all<T: StoredRecord>(&mut self, records: Vec<T>) {
        *T::slot_mut(self) = records;
    }

    /// Returns every record of a kind, in insertion order.
    #[must_use]
    pub fn all<T: StoredRecord>(&self) -> &[T] {
        T::slot(self)
    }

    /// Looks up a record by identifier.
    #[must_use]
    pub fn get<T: StoredRecord>(&self, id: Id<T>) -> Option<&T> {
        T::slot(self).iter().find(|record| record.id() == id)
    }

    /// Returns `true` when a record with `id` exists.
    #[must_use]
    pub fn contains<T: StoredRecord>(&self, id: Id<T>) -> bool {
        self.get(id).is_some()
    }

    /// Returns every project.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Returns every issue.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Returns every stage.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Returns every sprint.
    #[must_use]
    pub fn sprints(&self) -> &[Sprint] {
        &self.sprints
    }

    /// Returns every squad.
    #[must_use]
    pub fn squads(&self) -> &[Squad] {
        &self.squads
    }

    /// Returns every company and internal area.
    #[must_use]
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// Looks up a project.
    #[must_use]
    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.get(id)
    }

    /// Looks up an issue.
    #[must_use]
    pub fn issue(&self, id: IssueId) -> Option<&Issue> {
        self.get(id)
    }

    /// Looks up a stage.
    #[must_use]
    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.get(id)
    }

    /// Looks up a sprint.
    #[must_use]
    pub fn sprint(&self, id: SprintId) -> Option<&Sprint> {
        self.get(id)
    }

    /// Looks up a squad.
    #[must_use]
    pub fn squad(&self, id: SquadId) -> Option<&Squad> {
        self.get(id)
    }

    /// Looks up a company or internal area.
    #[must_use]
    pub fn company(&self, id: CompanyId) -> Option<&Company> {
        self.get(id)
    }

    /// Returns the issues of a project.
    pub fn issues_of(&self, project: ProjectId) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.project_id() == project)
    }

    /// Returns the direct children of an issue.
    pub fn children_of(&self, parent: IssueId) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.parent_id() == Some(parent))
    }

    /// Returns the ordered stage pipeline of a project.
    #[must_use]
    pub fn pipeline(&self, project: ProjectId) -> StagePipeline<'_> {
        StagePipeline::new(
            self.stages
                .iter()
                .filter(|stage| stage.project_id() == project),
        )
    }

    /// Returns the project's sprint that is not closed, if any.
    #[must_use]
    pub fn current_sprint(&self, project: ProjectId) -> Option<&Sprint> {
        self.sprints
            .iter()
            .find(|sprint| sprint.project_id() == project && sprint.is_open())
    }

    /// Returns the project's backlog: issues assigned to no sprint.
    #[must_use]
    pub fn backlog(&self, project: ProjectId) -> Vec<&Issue> {
        self.issues_of(project)
            .filter(|issue| issue.is_in_backlog())
            .collect()
    }

    /// Returns the members of a sprint ordered by sprint position.
    ///
    /// Members without a position sort last, keeping insertion order.
    #[must_use]
    pub fn sprint_members(&self, sprint: SprintId) -> Vec<&Issue> {
        let mut members: Vec<&Issue> = self
            .issues
            .iter()
            .filter(|issue| issue.sprint_id() == Some(sprint))
            .collect();
        members.sort_by_key(|issue| issue.sprint_order().unwrap_or(u32::MAX));
        members
    }

    /// Rewrites a record's identifier and every reference to it.
    ///
    /// Used to write canonical identifiers back after a storage insert. The
    /// rewrite is not journaled. Returns `false` when no record had `from`.
    pub fn reassign<T: StoredRecord>(&mut self, from: Id<T>, to: Id<T>) -> bool {
        if from == to {
            return false;
        }
        let slot = T::slot_mut(self);
        let Some(position) = slot.iter().position(|record| record.id() == from) else {
            return false;
        };
        let record = slot.remove(position);
        slot.insert(position, record.with_id(to));
        T::rewrite_references(self, from, to);
        true
    }

    pub(crate) fn insert<T: StoredRecord>(&mut self, record: T) -> Id<T> {
        let id = record.id();
        T::slot_mut(self).push(record);
        self.journal.push(Change::Upserted(T::record_ref(id)));
        id
    }

    /// Inserts the record or replaces the one with the same identifier.
    pub(crate) fn upsert<T: StoredRecord>(&mut self, record: T) -> Id<T> {
        let id = record.id();
        if self.contains(id) {
            self.update(id, move |existing| *existing = record);
        } else {
            self.insert(record);
        }
        id
    }

    pub(crate) fn update<T: StoredRecord, R>(
        &mut self,
        id: Id<T>,
        apply: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let record = T::slot_mut(self)
            .iter_mut()
            .find(|record| record.id() == id)?;
        let outcome = apply(record);
        self.journal.push(Change::Upserted(T::record_ref(id)));
        Some(outcome)
    }

    pub(crate) fn remove<T: StoredRecord>(&mut self, id: Id<T>) -> Option<T> {
        let slot = T::slot_mut(self);
        let position = slot.iter().position(|record| record.id() == id)?;
        let record = slot.remove(position);
        self.journal.push(Change::Removed(T::record_ref(id)));
        Some(record)
    }

    /// Drains the journal, keeping the last change per record in order of
    /// last occurrence.
    pub(crate) fn take_changes(&mut self) -> Vec<Change> {
        let mut changes: Vec<Change> = Vec::new();
        for change in std::mem::take(&mut self.journal) {
            changes.retain(|existing| existing.record() != change.record());
            changes.push(change);
        }
        changes
    }
}

impl sealed::Slot for Project {
    fn slot(store: &EntityStore) -> &[Self] {
        &store.projects
    }

    fn slot_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.projects
    }

    fn rewrite_references(store: &mut EntityStore, from: ProjectId, to: ProjectId) {
        for issue in &mut store.issues {
            issue.replace_project(from, to);
        }
        for stage in &mut store.stages {
            stage.replace_project(from, to);
        }
        for sprint in &mut store.sprints {
            sprint.replace_project(from, to);
        }
    }
}

impl StoredRecord for Project {
    fn record_ref(id: ProjectId) -> RecordRef {
        RecordRef::Project(id)
    }

    fn from_record_ref(record: RecordRef) -> Option<ProjectId> {
        match record {
            RecordRef::Project(id) => Some(id),
            _ => None,
        }
    }
}

impl sealed::Slot for Issue {
    fn slot(store: &EntityStore) -> &[Self] {
        &store.issues
    }

    fn slot_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.issues
    }

    fn rewrite_references(store: &mut EntityStore, from: IssueId, to: IssueId) {
        for issue in &mut store.issues {
            issue.replace_parent(from, to);
        }
    }
}

impl StoredRecord for Issue {
    fn record_ref(id: IssueId) -> RecordRef {
        RecordRef::Issue(id)
    }

    fn from_record_ref(record: RecordRef) -> Option<IssueId> {
        match record {
            RecordRef::Issue(id) => Some(id),
            _ => None,
        }
    }
}

impl sealed::Slot for Stage {
    fn slot(store: &EntityStore) -> &[Self] {
        &store.stages
    }

    fn slot_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.stages
    }

    fn rewrite_references(_store: &mut EntityStore, _from: StageId, _to: StageId) {}
}

impl StoredRecord for Stage {
    fn record_ref(id: StageId) -> RecordRef {
        RecordRef::Stage(id)
    }

    fn from_record_ref(record: RecordRef) -> Option<StageId> {
        match record {
            RecordRef::Stage(id) => Some(id),
            _ => None,
        }
    }
}

impl sealed::Slot for Sprint {
    fn slot(store: &EntityStore) -> &[Self] {
        &store.sprints
    }

    fn slot_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.sprints
    }

    fn rewrite_references(store: &mut EntityStore, from: SprintId, to: SprintId) {
        for issue in &mut store.issues {
            issue.replace_sprint(from, to);
        }
    }
}

impl StoredRecord for Sprint {
    fn record_ref(id: SprintId) -> RecordRef {
        RecordRef::Sprint(id)
    }

    fn from_record_ref(record: RecordRef) -> Option<SprintId> {
        match record {
            RecordRef::Sprint(id) => Some(id),
            _ => None,
        }
    }
}

impl sealed::Slot for Squad {
    fn slot(store: &EntityStore) -> &[Self] {
        &store.squads
    }

    fn slot_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.squads
    }

    fn rewrite_references(store: &mut EntityStore, from: SquadId, to: SquadId) {
        for project in &mut store.projects {
            project.replace_squad(from, to);
        }
    }
}

impl StoredRecord for Squad {
    fn record_ref(id: SquadId) -> RecordRef {
        RecordRef::Squad(id)
    }

    fn from_record_ref(record: RecordRef) -> Option<SquadId> {
        match record {
            RecordRef::Squad(id) => Some(id),
            _ => None,
        }
    }
}

impl sealed::Slot for Company {
    fn slot(store: &EntityStore) -> &[Self] {
        &store.companies
    }

    fn slot_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.companies
    }

    fn rewrite_references(store: &mut EntityStore, from: CompanyId, to: CompanyId) {
        for squad in &mut store.squads {
            squad.replace_company(from, to);
        }
    }
}

impl StoredRecord for Company {
    fn record_ref(id: CompanyId) -> RecordRef {
        RecordRef::Company(id)
    }

    fn from_record_ref(record: RecordRef) -> Option<CompanyId> {
        match record {
            RecordRef::Company(id) => Some(id),
            _ => None,
        }
    }
}
