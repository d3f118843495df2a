use anyhow::{Context, Result};
use tasklist_core::{
    Priority, Task, TaskCounts, TaskFormData, TaskId, TaskPage, ViewParams, compute_view,
};
use time::Date;
use tracing::info;

use crate::task_writer::{TaskStore, TaskWriter};

/// Service façade that encapsulates all task-related side effects.
pub struct TaskService<S> {
    writer: TaskWriter<S>,
}

impl<S> TaskService<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self
    where
        S: TaskStore,
    {
        Self {
            writer: TaskWriter::new(store),
        }
    }

    const fn store(&self) -> &S {
        self.writer.store()
    }
}

impl<S: TaskStore> TaskService<S> {
    /// Create a task from editor input.
    ///
    /// # Errors
    /// Returns an error if validation fails or the store rejects the insert.
    pub fn create(&self, input: CreateTaskInput) -> Result<Task> {
        let CreateTaskInput {
            title,
            description,
            priority,
            due_date,
            status,
        } = input;
        let form = TaskFormData {
            id: None,
            title,
            description: description.unwrap_or_default(),
            priority,
            due_date,
            status,
        };
        Ok(self.writer.submit(form)?)
    }

    /// Apply a partial edit on top of the stored task and re-validate it.
    ///
    /// # Errors
    /// Returns an error if the task is missing, validation fails, or the store errors.
    pub fn update(&self, id: TaskId, edit: TaskEdit) -> Result<Task> {
        let current = self.writer.load(id)?;
        let mut form = TaskFormData::from_task(&current);
        edit.apply(&mut form);
        Ok(self.writer.submit(form)?)
    }

    /// Mark a task as completed.
    ///
    /// # Errors
    /// Returns an error if the task is missing or the store errors.
    pub fn mark_complete(&self, id: TaskId) -> Result<Task> {
        let task = self.update(
            id,
            TaskEdit {
                status: Some(true),
                ..TaskEdit::default()
            },
        )?;
        info!(task = %task.id, "Marked task complete");
        Ok(task)
    }

    /// Soft-delete a task.
    ///
    /// # Errors
    /// Returns an error if the task is missing or the store errors.
    pub fn delete(&self, id: TaskId) -> Result<Task> {
        Ok(self.writer.delete(id)?)
    }

    /// Load a single active task.
    ///
    /// # Errors
    /// Returns an error if the task is missing or the store errors.
    pub fn get(&self, id: TaskId) -> Result<Task> {
        Ok(self.writer.load(id)?)
    }

    /// Fetch every active task so views can be computed over it.
    ///
    /// # Errors
    /// Returns an error if the store cannot list tasks.
    pub fn snapshot(&self) -> Result<TaskSnapshot> {
        let tasks = self
            .store()
            .list_active_tasks()
            .map_err(Into::<anyhow::Error>::into)
            .context("Failed to list active tasks")?;
        Ok(TaskSnapshot { tasks })
    }

    /// Total, pending and completed counts over active tasks.
    ///
    /// # Errors
    /// Returns an error if the store cannot list tasks.
    pub fn counts(&self) -> Result<TaskCounts> {
        Ok(self.snapshot()?.counts())
    }
}

/// Editor input for a new task.
#[derive(Debug, Clone, Default)]
pub struct CreateTaskInput {
    /// Title text.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Priority; required by validation.
    pub priority: Option<Priority>,
    /// Due date; required by validation.
    pub due_date: Option<Date>,
    /// Start out completed.
    pub status: bool,
}

/// Partial edit: `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New due date.
    pub due_date: Option<Date>,
    /// New completion flag.
    pub status: Option<bool>,
}

impl TaskEdit {
    /// Whether the edit changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }

    fn apply(self, form: &mut TaskFormData) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(priority) = self.priority {
            form.priority = Some(priority);
        }
        if let Some(due_date) = self.due_date {
            form.due_date = Some(due_date);
        }
        if let Some(status) = self.status {
            form.status = status;
        }
    }
}

/// Owned list of active tasks fetched from the store.
#[derive(Debug, Clone, Default)]
pub struct TaskSnapshot {
    tasks: Vec<Task>,
}

impl TaskSnapshot {
    /// Tasks in store order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Filter, sort and paginate the snapshot.
    #[must_use]
    pub fn view(&self, params: &ViewParams) -> TaskPage<'_> {
        compute_view(&self.tasks, params)
    }

    /// Counts over the whole snapshot.
    #[must_use]
    pub fn counts(&self) -> TaskCounts {
        TaskCounts::tally(&self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_writer::TaskWriteError;
    use anyhow::anyhow;
    use tasklist_core::{SortField, StatusFilter, TaskFields};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
    use time::OffsetDateTime;
    use time::macros::date;

    #[derive(Clone, Default)]
    struct MockStore {
        inner: Arc<MockStoreInner>,
    }

    #[derive(Default)]
    struct MockStoreInner {
        tasks: Mutex<BTreeMap<i64, Task>>,
        next_id: Mutex<i64>,
        fail_on_list: Mutex<bool>,
    }

    impl TaskStore for MockStore {
        type Error = anyhow::Error;

        fn list_active_tasks(&self) -> Result<Vec<Task>, Self::Error> {
            if *guard(&self.inner.fail_on_list) {
                return Err(anyhow!("database is locked"));
            }
            Ok(guard(&self.inner.tasks)
                .values()
                .rev()
                .filter(|task| !task.is_deleted())
                .cloned()
                .collect())
        }

        fn get_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
            Ok(guard(&self.inner.tasks)
                .get(&id.get())
                .filter(|task| !task.is_deleted())
                .cloned())
        }

        fn create_task(&self, fields: &TaskFields) -> Result<Task, Self::Error> {
            let raw = {
                let mut counter = guard(&self.inner.next_id);
                *counter += 1;
                *counter
            };
            let id = TaskId::new(raw).ok_or_else(|| anyhow!("bad id {raw}"))?;
            let now = OffsetDateTime::UNIX_EPOCH;
            let task = Task {
                id,
                title: fields.title.clone(),
                description: fields.description.clone(),
                priority: fields.priority,
                due_date: fields.due_date,
                status: fields.status,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            };
            guard(&self.inner.tasks).insert(raw, task.clone());
            Ok(task)
        }

        fn update_task(&self, id: TaskId, fields: &TaskFields) -> Result<Option<Task>, Self::Error> {
            let mut tasks = guard(&self.inner.tasks);
            let Some(task) = tasks.get_mut(&id.get()).filter(|task| !task.is_deleted()) else {
                return Ok(None);
            };
            task.title.clone_from(&fields.title);
            task.description.clone_from(&fields.description);
            task.priority = fields.priority;
            task.due_date = fields.due_date;
            task.status = fields.status;
            Ok(Some(task.clone()))
        }

        fn soft_delete_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
            let mut tasks = guard(&self.inner.tasks);
            let Some(task) = tasks.get_mut(&id.get()).filter(|task| !task.is_deleted()) else {
                return Ok(None);
            };
            task.deleted_at = Some(OffsetDateTime::UNIX_EPOCH);
            Ok(Some(task.clone()))
        }
    }

    impl MockStore {
        fn raw(&self, id: TaskId) -> Option<Task> {
            guard(&self.inner.tasks).get(&id.get()).cloned()
        }

        fn fail_on_list(&self) {
            *guard(&self.inner.fail_on_list) = true;
        }
    }

    fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn service_with_store() -> (TaskService<MockStore>, MockStore) {
        let store = MockStore::default();
        (TaskService::new(store.clone()), store)
    }

    fn input(title: &str, priority: Priority) -> CreateTaskInput {
        CreateTaskInput {
            title: title.into(),
            priority: Some(priority),
            due_date: Some(date!(2024 - 05 - 01)),
            ..CreateTaskInput::default()
        }
    }

    #[test]
    fn create_then_get_round_trips_fields() -> Result<()> {
        let (service, _store) = service_with_store();
        let created = service.create(CreateTaskInput {
            description: Some("  with notes ".into()),
            ..input("  Renew passport ", Priority::High)
        })?;
        assert_eq!(created.title, "Renew passport");
        assert_eq!(created.description, "with notes");

        let fetched = service.get(created.id)?;
        assert_eq!(fetched, created);
        Ok(())
    }

    #[test]
    fn create_requires_priority_and_due_date() {
        let (service, store) = service_with_store();
        let Err(err) = service.create(CreateTaskInput {
            title: "No priority".into(),
            due_date: Some(date!(2024 - 05 - 01)),
            ..CreateTaskInput::default()
        }) else {
            panic!("missing priority should be rejected");
        };
        assert!(err.to_string().contains("priority"));
        assert!(store.list_active_tasks().is_ok_and(|tasks| tasks.is_empty()));
    }

    #[test]
    fn update_keeps_untouched_fields() -> Result<()> {
        let (service, _store) = service_with_store();
        let created = service.create(input("Plan trip", Priority::Low))?;
        let updated = service.update(
            created.id,
            TaskEdit {
                due_date: Some(date!(2024 - 06 - 30)),
                ..TaskEdit::default()
            },
        )?;
        assert_eq!(updated.title, "Plan trip");
        assert_eq!(updated.priority, Priority::Low);
        assert_eq!(updated.due_date, date!(2024 - 06 - 30));
        Ok(())
    }

    #[test]
    fn mark_complete_sets_status() -> Result<()> {
        let (service, _store) = service_with_store();
        let created = service.create(input("File taxes", Priority::Medium))?;
        let done = service.mark_complete(created.id)?;
        assert!(done.status);
        assert_eq!(service.counts()?.completed, 1);
        Ok(())
    }

    #[test]
    fn delete_hides_task_but_keeps_row() -> Result<()> {
        let (service, store) = service_with_store();
        let created = service.create(input("Cancel gym", Priority::Low))?;
        service.delete(created.id)?;

        assert!(service.snapshot()?.tasks().is_empty());
        assert!(store.raw(created.id).is_some_and(|task| task.is_deleted()));

        let Err(err) = service.get(created.id) else {
            panic!("deleted task should not load");
        };
        assert!(matches!(
            err.downcast_ref::<TaskWriteError>(),
            Some(TaskWriteError::NotFound(id)) if *id == created.id
        ));
        Ok(())
    }

    #[test]
    fn snapshot_view_filters_and_counts() -> Result<()> {
        let (service, _store) = service_with_store();
        service.create(input("Buy milk", Priority::High))?;
        let done = service.create(input("Call bank", Priority::Low))?;
        service.mark_complete(done.id)?;
        service.create(input("Fix bike", Priority::Medium))?;

        let snapshot = service.snapshot()?;
        let params = ViewParams::default()
            .with_status(StatusFilter::Pending)
            .toggle_sort(SortField::Priority)
            .toggle_sort(SortField::Priority);
        let page = snapshot.view(&params);

        let titles: Vec<_> = page.tasks.iter().map(|task| task.title.as_str()).collect();
        assert_eq!(titles, vec!["Buy milk", "Fix bike"]);
        assert_eq!(page.counts.total, 3);
        assert_eq!(page.counts.completed, 1);
        assert_eq!(snapshot.counts(), page.counts);
        Ok(())
    }

    #[test]
    fn list_failure_carries_context() {
        let (service, store) = service_with_store();
        store.fail_on_list();
        let Err(err) = service.snapshot() else {
            panic!("listing should fail");
        };
        assert!(err.to_string().contains("Failed to list active tasks"));
        assert!(format!("{err:#}").contains("database is locked"));
    }

    #[test]
    fn empty_edit_is_detected() {
        assert!(TaskEdit::default().is_empty());
        assert!(
            !TaskEdit {
                status: Some(false),
                ..TaskEdit::default()
            }
            .is_empty()
        );
    }
}
